//! Contact-form intake: persistence first, best-effort notification after.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use thiserror::Error;
use tracing::{info, warn};

use crate::application::repos::{MessagesWriteRepo, NewMessageParams, RepoError};
use crate::domain::entities::MessageRecord;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("required field `{field}` is missing or blank")]
    MissingField { field: &'static str },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel misconfigured: {0}")]
    Configuration(String),
    #[error("notification transport failed: {0}")]
    Transport(String),
}

/// An outbound channel telling the site owner about a new message.
///
/// Channels are optional (configured credentials decide which exist) and
/// strictly best-effort: a failed channel is logged, never surfaced to the
/// submitting visitor.
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    fn channel(&self) -> &'static str;

    async fn notify(&self, message: &MessageRecord) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone)]
pub struct ContactCommand {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

#[derive(Clone)]
pub struct ContactService {
    messages: Arc<dyn MessagesWriteRepo>,
    notifiers: Arc<[Arc<dyn ContactNotifier>]>,
}

impl ContactService {
    pub fn new(
        messages: Arc<dyn MessagesWriteRepo>,
        notifiers: Vec<Arc<dyn ContactNotifier>>,
    ) -> Self {
        Self {
            messages,
            notifiers: notifiers.into(),
        }
    }

    /// Persist a submission, then fan notifications out in the background.
    ///
    /// Persistence failure fails the whole request; "the message was
    /// received" is guaranteed independent of whether the owner is notified
    /// promptly.
    pub async fn submit(&self, command: ContactCommand) -> Result<MessageRecord, ContactError> {
        let params = normalize(command)?;
        let record = self.messages.insert_message(params).await?;

        info!(
            target = "diwan::contact",
            message_id = %record.id,
            "contact message stored"
        );

        let service = self.clone();
        let notification = record.clone();
        tokio::spawn(async move {
            service.notify_now(&notification).await;
        });

        Ok(record)
    }

    /// Run every configured channel to completion, logging failures.
    ///
    /// Channels are independent, so they run concurrently; exposed separately
    /// from [`submit`](Self::submit) so the fan-out can be driven
    /// deterministically outside the spawned task.
    pub async fn notify_now(&self, message: &MessageRecord) {
        let attempts = self.notifiers.iter().map(|notifier| async move {
            if let Err(err) = notifier.notify(message).await {
                warn!(
                    target = "diwan::contact",
                    channel = notifier.channel(),
                    message_id = %message.id,
                    error = %err,
                    "contact notification failed"
                );
            }
        });
        join_all(attempts).await;
    }
}

fn normalize(command: ContactCommand) -> Result<NewMessageParams, ContactError> {
    let name = required(command.name, "name")?;
    let email = required(command.email, "email")?;
    let body = required(command.message, "message")?;
    let phone = command
        .phone
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    Ok(NewMessageParams {
        name,
        email,
        phone,
        body,
    })
}

fn required(value: String, field: &'static str) -> Result<String, ContactError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContactError::MissingField { field });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    struct RecordingRepo {
        inserted: Mutex<Vec<NewMessageParams>>,
        fail: bool,
    }

    #[async_trait]
    impl MessagesWriteRepo for RecordingRepo {
        async fn insert_message(
            &self,
            params: NewMessageParams,
        ) -> Result<MessageRecord, RepoError> {
            if self.fail {
                return Err(RepoError::from_persistence("connection refused"));
            }
            let record = MessageRecord {
                id: Uuid::new_v4(),
                name: params.name.clone(),
                email: params.email.clone(),
                phone: params.phone.clone(),
                body: params.body.clone(),
                read: false,
                created_at: OffsetDateTime::now_utc(),
            };
            self.inserted.lock().expect("lock").push(params);
            Ok(record)
        }

        async fn mark_read(&self, _id: Uuid) -> Result<MessageRecord, RepoError> {
            Err(RepoError::NotFound)
        }

        async fn delete_message(&self, _id: Uuid) -> Result<(), RepoError> {
            Err(RepoError::NotFound)
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        calls: Mutex<u32>,
        fail: bool,
    }

    #[async_trait]
    impl ContactNotifier for CountingNotifier {
        fn channel(&self) -> &'static str {
            "counting"
        }

        async fn notify(&self, _message: &MessageRecord) -> Result<(), NotifyError> {
            *self.calls.lock().expect("lock") += 1;
            if self.fail {
                return Err(NotifyError::Transport("boom".to_string()));
            }
            Ok(())
        }
    }

    fn command() -> ContactCommand {
        ContactCommand {
            name: "Lina".to_string(),
            email: "lina@example.com".to_string(),
            phone: Some("  ".to_string()),
            message: "Hello there".to_string(),
        }
    }

    #[tokio::test]
    async fn submit_trims_and_persists() {
        let repo = Arc::new(RecordingRepo::default());
        let service = ContactService::new(repo.clone(), Vec::new());

        let record = service.submit(command()).await.expect("stored");
        assert_eq!(record.name, "Lina");
        assert_eq!(record.phone, None);

        let inserted = repo.inserted.lock().expect("lock");
        assert_eq!(inserted.len(), 1);
    }

    #[tokio::test]
    async fn submit_rejects_blank_required_fields() {
        let repo = Arc::new(RecordingRepo::default());
        let service = ContactService::new(repo.clone(), Vec::new());

        let mut blank_email = command();
        blank_email.email = "   ".to_string();
        let err = service.submit(blank_email).await.expect_err("rejected");
        assert!(matches!(err, ContactError::MissingField { field: "email" }));
        assert!(repo.inserted.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_is_fatal() {
        let repo = Arc::new(RecordingRepo {
            fail: true,
            ..RecordingRepo::default()
        });
        let service = ContactService::new(repo, Vec::new());

        let err = service.submit(command()).await.expect_err("fatal");
        assert!(matches!(err, ContactError::Repo(_)));
    }

    #[tokio::test]
    async fn notify_now_runs_every_channel_despite_failures() {
        let failing = Arc::new(CountingNotifier {
            fail: true,
            ..CountingNotifier::default()
        });
        let succeeding = Arc::new(CountingNotifier::default());
        let repo = Arc::new(RecordingRepo::default());
        let service = ContactService::new(
            repo,
            vec![
                failing.clone() as Arc<dyn ContactNotifier>,
                succeeding.clone() as Arc<dyn ContactNotifier>,
            ],
        );

        let message = MessageRecord {
            id: Uuid::new_v4(),
            name: "Lina".to_string(),
            email: "lina@example.com".to_string(),
            phone: None,
            body: "Hello".to_string(),
            read: false,
            created_at: OffsetDateTime::now_utc(),
        };

        service.notify_now(&message).await;

        assert_eq!(*failing.calls.lock().expect("lock"), 1);
        assert_eq!(*succeeding.calls.lock().expect("lock"), 1);
    }
}
