//! Infrastructure adapters: persistence, outbound integrations, HTTP.

pub mod db;
pub mod error;
pub mod http;
pub mod imagehost;
pub mod notify;
pub mod telemetry;
