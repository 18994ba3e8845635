//! Application services orchestrating domain logic over repository seams.

pub mod admin;
pub mod blog;
pub mod contact;
pub mod error;
pub mod repos;
pub mod site;
pub mod uploads;
