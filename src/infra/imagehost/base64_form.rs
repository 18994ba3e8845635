//! Primary host: accepts a base64 payload in a form-encoded POST.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;

use crate::application::uploads::{HostError, HostedImage, ImageHost, ImagePayload};
use crate::domain::types::ImageHostKind;

use super::HostCredentials;

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
    error: Option<UploadFailure>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
    display_url: Option<String>,
    delete_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadFailure {
    message: Option<String>,
}

pub struct Base64FormHost {
    client: reqwest::Client,
    credentials: HostCredentials,
}

impl Base64FormHost {
    pub fn new(client: reqwest::Client, credentials: HostCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait]
impl ImageHost for Base64FormHost {
    fn kind(&self) -> ImageHostKind {
        ImageHostKind::Primary
    }

    async fn attempt(&self, image: &ImagePayload) -> Result<HostedImage, HostError> {
        let encoded = BASE64.encode(&image.bytes);

        let response = self
            .client
            .post(self.credentials.endpoint.clone())
            .form(&[
                ("key", self.credentials.api_key.as_str()),
                ("image", encoded.as_str()),
            ])
            .send()
            .await
            .map_err(|err| HostError::Request(err.to_string()))?;

        let status = response.status();
        let envelope: UploadEnvelope = response
            .json()
            .await
            .map_err(|err| HostError::Malformed(format!("status {status}: {err}")))?;

        if !envelope.success {
            let message = envelope
                .error
                .and_then(|failure| failure.message)
                .unwrap_or_else(|| format!("non-success envelope with status {status}"));
            return Err(HostError::Rejected(message));
        }

        let data = envelope
            .data
            .ok_or_else(|| HostError::Malformed("success envelope without data".to_string()))?;

        Ok(HostedImage {
            url: data.url,
            display_url: data.display_url,
            delete_url: data.delete_url,
        })
    }
}
