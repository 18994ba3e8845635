use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};
use uuid::Uuid;

use crate::application::repos::{
    MessageStatusCounts, MessagesRepo, MessagesWriteRepo, NewMessageParams, PageRequest,
    RepoError,
};
use crate::domain::entities::MessageRecord;

use super::{PostgresRepositories, map_sqlx_error};

const MESSAGE_COLUMNS: &str = "id, name, email, phone, body, read, created_at";

fn map_message(row: &PgRow) -> Result<MessageRecord, sqlx::Error> {
    Ok(MessageRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        body: row.try_get("body")?,
        read: row.try_get("read")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl MessagesRepo for PostgresRepositories {
    async fn list_messages(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Vec<MessageRecord>, RepoError> {
        let mut sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages");
        if unread_only {
            sql.push_str(" WHERE NOT read");
        }
        sql.push_str(" ORDER BY created_at DESC LIMIT $1 OFFSET $2");

        let rows = sqlx::query(&sql)
            .bind(i64::from(page.limit))
            .bind(i64::from(page.offset))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(map_message)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }

    async fn status_counts(&self) -> Result<MessageStatusCounts, RepoError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE NOT read) AS unread FROM messages",
        )
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let total: i64 = row.try_get("total").map_err(map_sqlx_error)?;
        let unread: i64 = row.try_get("unread").map_err(map_sqlx_error)?;

        Ok(MessageStatusCounts {
            total: total
                .try_into()
                .map_err(|_| RepoError::from_persistence("count exceeds supported range"))?,
            unread: unread
                .try_into()
                .map_err(|_| RepoError::from_persistence("count exceeds supported range"))?,
        })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MessageRecord>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(map_message)
            .transpose()
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl MessagesWriteRepo for PostgresRepositories {
    async fn insert_message(&self, params: NewMessageParams) -> Result<MessageRecord, RepoError> {
        let row = sqlx::query(&format!(
            "INSERT INTO messages (name, email, phone, body) \
             VALUES ($1, $2, $3, $4) RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(&params.name)
        .bind(&params.email)
        .bind(&params.phone)
        .bind(&params.body)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_message(&row).map_err(map_sqlx_error)
    }

    async fn mark_read(&self, id: Uuid) -> Result<MessageRecord, RepoError> {
        let row = sqlx::query(&format!(
            "UPDATE messages SET read = TRUE WHERE id = $1 RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_message(&row).map_err(map_sqlx_error)
    }

    async fn delete_message(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
