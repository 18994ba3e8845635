//! Secondary host: accepts the raw file as a multipart POST.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::application::uploads::{HostError, HostedImage, ImageHost, ImagePayload};
use crate::domain::types::ImageHostKind;

use super::HostCredentials;

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    status_code: Option<u16>,
    image: Option<UploadImage>,
    error: Option<UploadFailure>,
}

#[derive(Debug, Deserialize)]
struct UploadImage {
    url: String,
    display_url: Option<String>,
    delete_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UploadFailure {
    message: Option<String>,
}

pub struct MultipartFormHost {
    client: reqwest::Client,
    credentials: HostCredentials,
}

impl MultipartFormHost {
    pub fn new(client: reqwest::Client, credentials: HostCredentials) -> Self {
        Self {
            client,
            credentials,
        }
    }
}

#[async_trait]
impl ImageHost for MultipartFormHost {
    fn kind(&self) -> ImageHostKind {
        ImageHostKind::Secondary
    }

    async fn attempt(&self, image: &ImagePayload) -> Result<HostedImage, HostError> {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.filename.clone())
            .mime_str(&image.content_type)
            .map_err(|err| HostError::Request(format!("invalid content type: {err}")))?;

        let form = Form::new()
            .text("key", self.credentials.api_key.clone())
            .text("format", "json")
            .part("source", part);

        let response = self
            .client
            .post(self.credentials.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|err| HostError::Request(err.to_string()))?;

        let status = response.status();
        let envelope: UploadEnvelope = response
            .json()
            .await
            .map_err(|err| HostError::Malformed(format!("status {status}: {err}")))?;

        if envelope.status_code != Some(200) {
            let message = envelope
                .error
                .and_then(|failure| failure.message)
                .unwrap_or_else(|| format!("non-success envelope with status {status}"));
            return Err(HostError::Rejected(message));
        }

        let image = envelope
            .image
            .ok_or_else(|| HostError::Malformed("success envelope without image".to_string()))?;

        Ok(HostedImage {
            url: image.url,
            display_url: image.display_url,
            delete_url: image.delete_url,
        })
    }
}
