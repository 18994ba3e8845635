//! Third-party image-hosting backends.
//!
//! Each backend implements [`ImageHost`](crate::application::uploads::ImageHost)
//! over its provider's wire format; the ordered fallback chain lives in the
//! application layer.

mod base64_form;
mod multipart_form;

pub use base64_form::Base64FormHost;
pub use multipart_form::MultipartFormHost;

use std::time::Duration;

use url::Url;

/// Connection details for one hosting backend.
#[derive(Debug, Clone)]
pub struct HostCredentials {
    pub endpoint: Url,
    pub api_key: String,
}

/// Shared HTTP client for the hosting backends, with a hard request timeout
/// so a hung provider fails over instead of stalling the upload.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(timeout).build()
}
