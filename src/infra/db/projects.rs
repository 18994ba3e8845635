use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};
use uuid::Uuid;

use crate::application::repos::{
    CreateProjectParams, ProjectsRepo, ProjectsWriteRepo, RepoError, UpdateProjectParams,
};
use crate::domain::entities::ProjectRecord;
use crate::domain::types::Localized;

use super::{PostgresRepositories, map_sqlx_error};

const PROJECT_COLUMNS: &str = "id, slug, title_en, title_ar, summary_en, summary_ar, \
     description_en, description_ar, cover_image_url, gallery_urls, tech_stack, live_url, \
     source_url, featured, sort_order, created_at, updated_at";

fn map_project(row: &PgRow) -> Result<ProjectRecord, sqlx::Error> {
    Ok(ProjectRecord {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: Localized::new(
            row.try_get::<String, _>("title_en")?,
            row.try_get("title_ar")?,
        ),
        summary: Localized::new(
            row.try_get::<String, _>("summary_en")?,
            row.try_get("summary_ar")?,
        ),
        description: Localized::new(
            row.try_get::<String, _>("description_en")?,
            row.try_get("description_ar")?,
        ),
        cover_image_url: row.try_get("cover_image_url")?,
        gallery_urls: row.try_get("gallery_urls")?,
        tech_stack: row.try_get("tech_stack")?,
        live_url: row.try_get("live_url")?,
        source_url: row.try_get("source_url")?,
        featured: row.try_get("featured")?,
        sort_order: row.try_get("sort_order")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ProjectsRepo for PostgresRepositories {
    async fn list_projects(&self, featured_only: bool) -> Result<Vec<ProjectRecord>, RepoError> {
        let mut sql = format!("SELECT {PROJECT_COLUMNS} FROM projects");
        if featured_only {
            sql.push_str(" WHERE featured");
        }
        sql.push_str(" ORDER BY sort_order ASC, created_at DESC");

        let rows = sqlx::query(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(map_project)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ProjectRecord>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(map_project)
            .transpose()
            .map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(map_project)
            .transpose()
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl ProjectsWriteRepo for PostgresRepositories {
    async fn create_project(
        &self,
        params: CreateProjectParams,
    ) -> Result<ProjectRecord, RepoError> {
        let sql = format!(
            "INSERT INTO projects (slug, title_en, title_ar, summary_en, summary_ar, \
             description_en, description_ar, cover_image_url, gallery_urls, tech_stack, \
             live_url, source_url, featured, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {PROJECT_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(&params.slug)
            .bind(&params.title.en)
            .bind(&params.title.ar)
            .bind(&params.summary.en)
            .bind(&params.summary.ar)
            .bind(&params.description.en)
            .bind(&params.description.ar)
            .bind(&params.cover_image_url)
            .bind(&params.gallery_urls)
            .bind(&params.tech_stack)
            .bind(&params.live_url)
            .bind(&params.source_url)
            .bind(params.featured)
            .bind(params.sort_order)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        map_project(&row).map_err(map_sqlx_error)
    }

    async fn update_project(
        &self,
        params: UpdateProjectParams,
    ) -> Result<ProjectRecord, RepoError> {
        let sql = format!(
            "UPDATE projects SET title_en = $2, title_ar = $3, summary_en = $4, summary_ar = $5, \
             description_en = $6, description_ar = $7, cover_image_url = $8, gallery_urls = $9, \
             tech_stack = $10, live_url = $11, source_url = $12, featured = $13, \
             sort_order = $14, updated_at = now() \
             WHERE id = $1 \
             RETURNING {PROJECT_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(params.id)
            .bind(&params.title.en)
            .bind(&params.title.ar)
            .bind(&params.summary.en)
            .bind(&params.summary.ar)
            .bind(&params.description.en)
            .bind(&params.description.ar)
            .bind(&params.cover_image_url)
            .bind(&params.gallery_urls)
            .bind(&params.tech_stack)
            .bind(&params.live_url)
            .bind(&params.source_url)
            .bind(params.featured)
            .bind(params.sort_order)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        map_project(&row).map_err(map_sqlx_error)
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
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
