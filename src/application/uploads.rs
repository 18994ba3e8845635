//! Image upload through an ordered fallback chain of third-party hosts.

use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::types::ImageHostKind;

/// Hard ceiling on accepted image payloads (10 MiB), enforced before any
/// network call is made.
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// A fully-buffered image awaiting upload.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Bytes,
    pub filename: String,
    pub content_type: String,
}

/// Normalized result from whichever host satisfied the upload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HostedImage {
    pub url: String,
    pub display_url: Option<String>,
    pub delete_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct UploadedImage {
    pub url: String,
    pub display_url: Option<String>,
    pub delete_url: Option<String>,
    pub host: ImageHostKind,
}

/// Failure from a single host attempt.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("request to image host failed: {0}")]
    Request(String),
    #[error("image host rejected the upload: {0}")]
    Rejected(String),
    #[error("image host returned an unintelligible response: {0}")]
    Malformed(String),
}

/// One third-party image-hosting backend.
///
/// The chain is an ordered iteration over implementations, stopping at the
/// first success; adding a third host means adding an implementation, not
/// new control flow.
#[async_trait::async_trait]
pub trait ImageHost: Send + Sync {
    fn kind(&self) -> ImageHostKind;

    async fn attempt(&self, image: &ImagePayload) -> Result<HostedImage, HostError>;
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("unsupported file type `{content_type}`; only images are accepted")]
    InvalidFileType { content_type: String },
    #[error("file of {size_bytes} bytes exceeds the {MAX_IMAGE_BYTES}-byte limit")]
    FileTooLarge { size_bytes: u64 },
    #[error("every configured image host failed")]
    AllHostsFailed {
        failures: Vec<(ImageHostKind, HostError)>,
    },
}

#[derive(Clone)]
pub struct ImageUploadService {
    hosts: Arc<[Arc<dyn ImageHost>]>,
}

impl ImageUploadService {
    pub fn new(hosts: Vec<Arc<dyn ImageHost>>) -> Self {
        Self {
            hosts: hosts.into(),
        }
    }

    /// Upload an image, trying each host in order until one succeeds.
    ///
    /// At most one attempt per host, strictly sequential; there is no
    /// backoff and no retry beyond the fallback hop. Invocations share no
    /// state and may run concurrently for independent files.
    pub async fn upload(&self, image: ImagePayload) -> Result<UploadedImage, UploadError> {
        if !image.content_type.starts_with("image/") {
            return Err(UploadError::InvalidFileType {
                content_type: image.content_type,
            });
        }

        let size_bytes = image.bytes.len() as u64;
        if size_bytes > MAX_IMAGE_BYTES {
            return Err(UploadError::FileTooLarge { size_bytes });
        }

        let mut failures = Vec::new();
        for host in self.hosts.iter() {
            match host.attempt(&image).await {
                Ok(hosted) => {
                    info!(
                        target = "diwan::uploads",
                        host = host.kind().as_str(),
                        filename = %image.filename,
                        "image hosted"
                    );
                    return Ok(UploadedImage {
                        url: hosted.url,
                        display_url: hosted.display_url,
                        delete_url: hosted.delete_url,
                        host: host.kind(),
                    });
                }
                Err(err) => {
                    warn!(
                        target = "diwan::uploads",
                        host = host.kind().as_str(),
                        filename = %image.filename,
                        error = %err,
                        "image host attempt failed"
                    );
                    failures.push((host.kind(), err));
                }
            }
        }

        Err(UploadError::AllHostsFailed { failures })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    struct FakeHost {
        kind: ImageHostKind,
        calls: AtomicU32,
        outcome: Result<HostedImage, &'static str>,
    }

    impl FakeHost {
        fn succeeding(kind: ImageHostKind, url: &str) -> Self {
            Self {
                kind,
                calls: AtomicU32::new(0),
                outcome: Ok(HostedImage {
                    url: url.to_string(),
                    display_url: None,
                    delete_url: None,
                }),
            }
        }

        fn failing(kind: ImageHostKind) -> Self {
            Self {
                kind,
                calls: AtomicU32::new(0),
                outcome: Err("host unavailable"),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ImageHost for FakeHost {
        fn kind(&self) -> ImageHostKind {
            self.kind
        }

        async fn attempt(&self, _image: &ImagePayload) -> Result<HostedImage, HostError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Ok(hosted) => Ok(hosted.clone()),
                Err(message) => Err(HostError::Request((*message).to_string())),
            }
        }
    }

    fn png(size: usize) -> ImagePayload {
        ImagePayload {
            bytes: Bytes::from(vec![0u8; size]),
            filename: "photo.png".to_string(),
            content_type: "image/png".to_string(),
        }
    }

    #[tokio::test]
    async fn rejects_non_image_without_touching_hosts() {
        let host = Arc::new(FakeHost::succeeding(ImageHostKind::Primary, "http://img/1"));
        let service = ImageUploadService::new(vec![host.clone()]);

        let mut payload = png(16);
        payload.content_type = "application/pdf".to_string();

        let err = service.upload(payload).await.expect_err("rejected");
        assert!(matches!(err, UploadError::InvalidFileType { .. }));
        assert_eq!(host.calls(), 0);
    }

    #[tokio::test]
    async fn rejects_oversized_file_without_touching_hosts() {
        let host = Arc::new(FakeHost::succeeding(ImageHostKind::Primary, "http://img/1"));
        let service = ImageUploadService::new(vec![host.clone()]);

        let err = service
            .upload(png(MAX_IMAGE_BYTES as usize + 1))
            .await
            .expect_err("rejected");
        assert!(matches!(err, UploadError::FileTooLarge { .. }));
        assert_eq!(host.calls(), 0);
    }

    #[tokio::test]
    async fn primary_success_skips_secondary() {
        let primary = Arc::new(FakeHost::succeeding(ImageHostKind::Primary, "http://img/1"));
        let secondary = Arc::new(FakeHost::succeeding(
            ImageHostKind::Secondary,
            "http://img/2",
        ));
        let service = ImageUploadService::new(vec![primary.clone(), secondary.clone()]);

        let uploaded = service.upload(png(16)).await.expect("uploaded");
        assert_eq!(uploaded.url, "http://img/1");
        assert_eq!(uploaded.host, ImageHostKind::Primary);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn falls_back_to_secondary_exactly_once() {
        let primary = Arc::new(FakeHost::failing(ImageHostKind::Primary));
        let secondary = Arc::new(FakeHost::succeeding(
            ImageHostKind::Secondary,
            "http://img/2",
        ));
        let service = ImageUploadService::new(vec![primary.clone(), secondary.clone()]);

        let uploaded = service.upload(png(16)).await.expect("uploaded");
        assert_eq!(uploaded.host, ImageHostKind::Secondary);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn both_hosts_failing_collapses_into_one_error() {
        let primary = Arc::new(FakeHost::failing(ImageHostKind::Primary));
        let secondary = Arc::new(FakeHost::failing(ImageHostKind::Secondary));
        let service = ImageUploadService::new(vec![primary.clone(), secondary.clone()]);

        let err = service.upload(png(16)).await.expect_err("failed");
        match err {
            UploadError::AllHostsFailed { failures } => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].0, ImageHostKind::Primary);
                assert_eq!(failures[1].0, ImageHostKind::Secondary);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }
}
