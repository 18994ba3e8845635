use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::{
    MessageStatusCounts, MessagesRepo, MessagesWriteRepo, PageRequest, RepoError,
};
use crate::domain::entities::MessageRecord;

#[derive(Debug, Error)]
pub enum AdminMessageError {
    #[error("message not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Inbox management for contact submissions.
#[derive(Clone)]
pub struct AdminMessageService {
    reader: Arc<dyn MessagesRepo>,
    writer: Arc<dyn MessagesWriteRepo>,
    audit: AdminAuditService,
}

impl AdminMessageService {
    pub fn new(
        reader: Arc<dyn MessagesRepo>,
        writer: Arc<dyn MessagesWriteRepo>,
        audit: AdminAuditService,
    ) -> Self {
        Self {
            reader,
            writer,
            audit,
        }
    }

    pub async fn list(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Vec<MessageRecord>, AdminMessageError> {
        self.reader
            .list_messages(unread_only, page)
            .await
            .map_err(AdminMessageError::from)
    }

    /// The unread badge source of truth; one query, no client-side cache.
    pub async fn status_counts(&self) -> Result<MessageStatusCounts, AdminMessageError> {
        self.reader
            .status_counts()
            .await
            .map_err(AdminMessageError::from)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<MessageRecord>, AdminMessageError> {
        self.reader
            .find_by_id(id)
            .await
            .map_err(AdminMessageError::from)
    }

    pub async fn mark_read(
        &self,
        actor: &str,
        id: Uuid,
    ) -> Result<MessageRecord, AdminMessageError> {
        let message = match self.writer.mark_read(id).await {
            Ok(message) => message,
            Err(RepoError::NotFound) => return Err(AdminMessageError::NotFound),
            Err(err) => return Err(err.into()),
        };
        self.audit
            .record::<()>(actor, "message.read", "message", Some(&id.to_string()), None)
            .await?;
        Ok(message)
    }

    pub async fn delete_message(&self, actor: &str, id: Uuid) -> Result<(), AdminMessageError> {
        match self.writer.delete_message(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(AdminMessageError::NotFound),
            Err(err) => return Err(err.into()),
        }
        self.audit
            .record::<()>(
                actor,
                "message.delete",
                "message",
                Some(&id.to_string()),
                None,
            )
            .await?;
        Ok(())
    }
}
