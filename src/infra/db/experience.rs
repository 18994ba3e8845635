use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};
use uuid::Uuid;

use crate::application::repos::{
    CreateExperienceParams, ExperienceRepo, ExperienceWriteRepo, RepoError,
    UpdateExperienceParams,
};
use crate::domain::entities::ExperienceRecord;
use crate::domain::types::Localized;

use super::{PostgresRepositories, map_sqlx_error};

const EXPERIENCE_COLUMNS: &str = "id, role_en, role_ar, organization_en, organization_ar, \
     summary_en, summary_ar, started_on, ended_on, sort_order, created_at";

fn map_experience(row: &PgRow) -> Result<ExperienceRecord, sqlx::Error> {
    Ok(ExperienceRecord {
        id: row.try_get("id")?,
        role: Localized::new(row.try_get::<String, _>("role_en")?, row.try_get("role_ar")?),
        organization: Localized::new(
            row.try_get::<String, _>("organization_en")?,
            row.try_get("organization_ar")?,
        ),
        summary: Localized::new(
            row.try_get::<String, _>("summary_en")?,
            row.try_get("summary_ar")?,
        ),
        started_on: row.try_get("started_on")?,
        ended_on: row.try_get("ended_on")?,
        sort_order: row.try_get("sort_order")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ExperienceRepo for PostgresRepositories {
    async fn list_experience(&self) -> Result<Vec<ExperienceRecord>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {EXPERIENCE_COLUMNS} FROM experience \
             ORDER BY sort_order ASC, started_on DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(map_experience)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ExperienceWriteRepo for PostgresRepositories {
    async fn create_experience(
        &self,
        params: CreateExperienceParams,
    ) -> Result<ExperienceRecord, RepoError> {
        let row = sqlx::query(&format!(
            "INSERT INTO experience (role_en, role_ar, organization_en, organization_ar, \
             summary_en, summary_ar, started_on, ended_on, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {EXPERIENCE_COLUMNS}"
        ))
        .bind(&params.role.en)
        .bind(&params.role.ar)
        .bind(&params.organization.en)
        .bind(&params.organization.ar)
        .bind(&params.summary.en)
        .bind(&params.summary.ar)
        .bind(params.started_on)
        .bind(params.ended_on)
        .bind(params.sort_order)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_experience(&row).map_err(map_sqlx_error)
    }

    async fn update_experience(
        &self,
        params: UpdateExperienceParams,
    ) -> Result<ExperienceRecord, RepoError> {
        let row = sqlx::query(&format!(
            "UPDATE experience SET role_en = $2, role_ar = $3, organization_en = $4, \
             organization_ar = $5, summary_en = $6, summary_ar = $7, started_on = $8, \
             ended_on = $9, sort_order = $10 \
             WHERE id = $1 RETURNING {EXPERIENCE_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.role.en)
        .bind(&params.role.ar)
        .bind(&params.organization.en)
        .bind(&params.organization.ar)
        .bind(&params.summary.en)
        .bind(&params.summary.ar)
        .bind(params.started_on)
        .bind(params.ended_on)
        .bind(params.sort_order)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_experience(&row).map_err(map_sqlx_error)
    }

    async fn delete_experience(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM experience WHERE id = $1")
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
