//! Handlers for the token-gated admin API.

pub mod audit;
pub mod education;
pub mod experience;
pub mod messages;
pub mod posts;
pub mod profile;
pub mod projects;
pub mod skills;
pub mod uploads;
