use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};
use uuid::Uuid;

use crate::application::repos::{
    CreateEducationParams, EducationRepo, EducationWriteRepo, RepoError, UpdateEducationParams,
};
use crate::domain::entities::EducationRecord;
use crate::domain::types::Localized;

use super::{PostgresRepositories, map_sqlx_error};

const EDUCATION_COLUMNS: &str = "id, degree_en, degree_ar, institution_en, institution_ar, \
     summary_en, summary_ar, started_year, ended_year, sort_order, created_at";

fn map_education(row: &PgRow) -> Result<EducationRecord, sqlx::Error> {
    Ok(EducationRecord {
        id: row.try_get("id")?,
        degree: Localized::new(
            row.try_get::<String, _>("degree_en")?,
            row.try_get("degree_ar")?,
        ),
        institution: Localized::new(
            row.try_get::<String, _>("institution_en")?,
            row.try_get("institution_ar")?,
        ),
        summary: Localized::new(
            row.try_get::<String, _>("summary_en")?,
            row.try_get("summary_ar")?,
        ),
        started_year: row.try_get("started_year")?,
        ended_year: row.try_get("ended_year")?,
        sort_order: row.try_get("sort_order")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl EducationRepo for PostgresRepositories {
    async fn list_education(&self) -> Result<Vec<EducationRecord>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {EDUCATION_COLUMNS} FROM education \
             ORDER BY sort_order ASC, started_year DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        rows.iter()
            .map(map_education)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl EducationWriteRepo for PostgresRepositories {
    async fn create_education(
        &self,
        params: CreateEducationParams,
    ) -> Result<EducationRecord, RepoError> {
        let row = sqlx::query(&format!(
            "INSERT INTO education (degree_en, degree_ar, institution_en, institution_ar, \
             summary_en, summary_ar, started_year, ended_year, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {EDUCATION_COLUMNS}"
        ))
        .bind(&params.degree.en)
        .bind(&params.degree.ar)
        .bind(&params.institution.en)
        .bind(&params.institution.ar)
        .bind(&params.summary.en)
        .bind(&params.summary.ar)
        .bind(params.started_year)
        .bind(params.ended_year)
        .bind(params.sort_order)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_education(&row).map_err(map_sqlx_error)
    }

    async fn update_education(
        &self,
        params: UpdateEducationParams,
    ) -> Result<EducationRecord, RepoError> {
        let row = sqlx::query(&format!(
            "UPDATE education SET degree_en = $2, degree_ar = $3, institution_en = $4, \
             institution_ar = $5, summary_en = $6, summary_ar = $7, started_year = $8, \
             ended_year = $9, sort_order = $10 \
             WHERE id = $1 RETURNING {EDUCATION_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.degree.en)
        .bind(&params.degree.ar)
        .bind(&params.institution.en)
        .bind(&params.institution.ar)
        .bind(&params.summary.en)
        .bind(&params.summary.ar)
        .bind(params.started_year)
        .bind(params.ended_year)
        .bind(params.sort_order)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_education(&row).map_err(map_sqlx_error)
    }

    async fn delete_education(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM education WHERE id = $1")
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
