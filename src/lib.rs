//! Diwan: a bilingual (English/Arabic) portfolio and blog backend.
//!
//! The crate is layered the same way it is deployed: `domain` holds typed
//! records and pure content parsing, `application` holds services behind
//! repository and notification seams, `infra` holds the Postgres, HTTP, and
//! outbound-integration adapters, and `config` resolves deployment settings.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
