use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};

use crate::application::repos::{AuditRepo, RepoError};
use crate::domain::entities::AuditLogRecord;

use super::{PostgresRepositories, map_sqlx_error};

const AUDIT_COLUMNS: &str = "id, actor, action, entity_type, entity_id, payload_text, created_at";

fn map_audit(row: &PgRow) -> Result<AuditLogRecord, sqlx::Error> {
    Ok(AuditLogRecord {
        id: row.try_get("id")?,
        actor: row.try_get("actor")?,
        action: row.try_get("action")?,
        entity_type: row.try_get("entity_type")?,
        entity_id: row.try_get("entity_id")?,
        payload_text: row.try_get("payload_text")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl AuditRepo for PostgresRepositories {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError> {
        sqlx::query(
            "INSERT INTO audit_log (id, actor, action, entity_type, entity_id, payload_text, \
             created_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(record.id)
        .bind(&record.actor)
        .bind(&record.action)
        .bind(&record.entity_type)
        .bind(&record.entity_id)
        .bind(&record.payload_text)
        .bind(record.created_at)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_log ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(i64::from(limit.clamp(1, 500)))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(map_audit)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }
}
