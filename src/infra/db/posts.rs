use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder, Row, postgres::PgRow};
use uuid::Uuid;

use crate::application::repos::{
    CreatePostParams, PageRequest, PostListScope, PostsRepo, PostsWriteRepo, RepoError,
    UpdatePostParams, UpdatePostStatusParams,
};
use crate::domain::entities::PostRecord;
use crate::domain::types::{Localized, PostStatus};

use super::{PostgresRepositories, map_sqlx_error};

const POST_COLUMNS: &str = "id, slug, title_en, title_ar, excerpt_en, excerpt_ar, body_en, \
     body_ar, cover_image_url, status, published_at, created_at, updated_at";

fn map_post(row: &PgRow) -> Result<PostRecord, sqlx::Error> {
    Ok(PostRecord {
        id: row.try_get("id")?,
        slug: row.try_get("slug")?,
        title: Localized::new(
            row.try_get::<String, _>("title_en")?,
            row.try_get("title_ar")?,
        ),
        excerpt: Localized::new(
            row.try_get::<String, _>("excerpt_en")?,
            row.try_get("excerpt_ar")?,
        ),
        body_en: row.try_get("body_en")?,
        body_ar: row.try_get("body_ar")?,
        cover_image_url: row.try_get("cover_image_url")?,
        status: row.try_get("status")?,
        published_at: row.try_get("published_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn apply_scope_conditions(qb: &mut QueryBuilder<'_, Postgres>, scope: PostListScope) {
    match scope {
        PostListScope::Public => {
            qb.push(" WHERE status = ");
            qb.push_bind(PostStatus::Published);
            qb.push(" AND published_at IS NOT NULL");
        }
        PostListScope::Admin { status } => {
            if let Some(status) = status {
                qb.push(" WHERE status = ");
                qb.push_bind(status);
            }
        }
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(
        &self,
        scope: PostListScope,
        page: PageRequest,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let mut qb = QueryBuilder::new(format!("SELECT {POST_COLUMNS} FROM posts"));
        apply_scope_conditions(&mut qb, scope);
        qb.push(" ORDER BY COALESCE(published_at, created_at) DESC, created_at DESC");
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(page.limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(page.offset));

        let rows = qb
            .build()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.iter()
            .map(map_post)
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_sqlx_error)
    }

    async fn count_posts(&self, scope: PostListScope) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts");
        apply_scope_conditions(&mut qb, scope);

        let row = qb
            .build()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        let count: i64 = row.try_get(0).map_err(map_sqlx_error)?;
        count
            .try_into()
            .map_err(|_| RepoError::from_persistence("count exceeds supported range"))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"))
            .bind(slug)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(map_post).transpose().map_err(map_sqlx_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(map_post).transpose().map_err(map_sqlx_error)
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let row = sqlx::query(&format!(
            "INSERT INTO posts (slug, title_en, title_ar, excerpt_en, excerpt_ar, body_en, \
             body_ar, cover_image_url, status, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {POST_COLUMNS}"
        ))
        .bind(&params.slug)
        .bind(&params.title.en)
        .bind(&params.title.ar)
        .bind(&params.excerpt.en)
        .bind(&params.excerpt.ar)
        .bind(&params.body_en)
        .bind(&params.body_ar)
        .bind(&params.cover_image_url)
        .bind(params.status)
        .bind(params.published_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_post(&row).map_err(map_sqlx_error)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET title_en = $2, title_ar = $3, excerpt_en = $4, excerpt_ar = $5, \
             body_en = $6, body_ar = $7, cover_image_url = $8, updated_at = now() \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(params.id)
        .bind(&params.title.en)
        .bind(&params.title.ar)
        .bind(&params.excerpt.en)
        .bind(&params.excerpt.ar)
        .bind(&params.body_en)
        .bind(&params.body_ar)
        .bind(&params.cover_image_url)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_post(&row).map_err(map_sqlx_error)
    }

    async fn update_post_status(
        &self,
        params: UpdatePostStatusParams,
    ) -> Result<PostRecord, RepoError> {
        let row = sqlx::query(&format!(
            "UPDATE posts SET status = $2, published_at = $3, updated_at = now() \
             WHERE id = $1 RETURNING {POST_COLUMNS}"
        ))
        .bind(params.id)
        .bind(params.status)
        .bind(params.published_at)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        map_post(&row).map_err(map_sqlx_error)
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
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
