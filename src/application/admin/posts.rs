use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::{
    CreatePostParams, PageRequest, PostListScope, PostsRepo, PostsWriteRepo, RepoError,
    UpdatePostParams, UpdatePostStatusParams,
};
use crate::domain::entities::PostRecord;
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async};
use crate::domain::types::{Localized, PostStatus};

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("field `{0}` must not be blank")]
    ConstraintViolation(&'static str),
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub title_en: String,
    pub title_ar: Option<String>,
    pub excerpt_en: String,
    pub excerpt_ar: Option<String>,
    pub body_en: String,
    pub body_ar: Option<String>,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub id: Uuid,
    pub title_en: String,
    pub title_ar: Option<String>,
    pub excerpt_en: String,
    pub excerpt_ar: Option<String>,
    pub body_en: String,
    pub body_ar: Option<String>,
    pub cover_image_url: Option<String>,
}

#[derive(Serialize)]
struct PostSnapshot<'a> {
    slug: &'a str,
    title: &'a str,
}

#[derive(Clone)]
pub struct AdminPostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    audit: AdminAuditService,
}

impl AdminPostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
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
        status: Option<PostStatus>,
        page: PageRequest,
    ) -> Result<Vec<PostRecord>, AdminPostError> {
        self.reader
            .list_posts(PostListScope::Admin { status }, page)
            .await
            .map_err(AdminPostError::from)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, AdminPostError> {
        self.reader
            .find_by_id(id)
            .await
            .map_err(AdminPostError::from)
    }

    pub async fn create_post(
        &self,
        actor: &str,
        command: CreatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        let title = localized(command.title_en, command.title_ar, "title_en")?;
        let excerpt = localized(command.excerpt_en, command.excerpt_ar, "excerpt_en")?;
        let body_en = required(command.body_en, "body_en")?;
        let body_ar = optional(command.body_ar);

        let reader = self.reader.clone();
        let slug = match generate_unique_slug_async(&title.en, move |candidate| {
            let reader = reader.clone();
            let candidate = candidate.to_string();
            async move {
                reader
                    .find_by_slug(&candidate)
                    .await
                    .map(|existing| existing.is_none())
            }
        })
        .await
        {
            Ok(slug) => slug,
            Err(SlugAsyncError::Slug(SlugError::EmptyInput))
            | Err(SlugAsyncError::Slug(SlugError::Unrepresentable { .. })) => {
                return Err(AdminPostError::ConstraintViolation("title_en"));
            }
            Err(SlugAsyncError::Slug(SlugError::Exhausted { .. })) => {
                return Err(AdminPostError::ConstraintViolation("slug"));
            }
            Err(SlugAsyncError::Predicate(err)) => return Err(AdminPostError::Repo(err)),
        };

        let params = CreatePostParams {
            slug,
            title,
            excerpt,
            body_en,
            body_ar,
            cover_image_url: optional(command.cover_image_url),
            status: PostStatus::Draft,
            published_at: None,
        };

        let post = self.writer.create_post(params).await?;
        self.record(actor, "post.create", &post).await?;
        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: &str,
        command: UpdatePostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        let title = localized(command.title_en, command.title_ar, "title_en")?;
        let excerpt = localized(command.excerpt_en, command.excerpt_ar, "excerpt_en")?;
        let body_en = required(command.body_en, "body_en")?;

        let params = UpdatePostParams {
            id: command.id,
            title,
            excerpt,
            body_en,
            body_ar: optional(command.body_ar),
            cover_image_url: optional(command.cover_image_url),
        };

        let post = map_not_found(self.writer.update_post(params).await)?;
        self.record(actor, "post.update", &post).await?;
        Ok(post)
    }

    /// Publish a post. The first publication stamps `published_at`; pressing
    /// publish again later keeps the original timestamp.
    pub async fn publish_post(&self, actor: &str, id: Uuid) -> Result<PostRecord, AdminPostError> {
        let existing = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(AdminPostError::NotFound)?;

        let params = UpdatePostStatusParams {
            id,
            status: PostStatus::Published,
            published_at: existing
                .published_at
                .or_else(|| Some(OffsetDateTime::now_utc())),
        };

        let post = map_not_found(self.writer.update_post_status(params).await)?;
        self.record(actor, "post.publish", &post).await?;
        Ok(post)
    }

    pub async fn unpublish_post(
        &self,
        actor: &str,
        id: Uuid,
    ) -> Result<PostRecord, AdminPostError> {
        let existing = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(AdminPostError::NotFound)?;

        let params = UpdatePostStatusParams {
            id,
            status: PostStatus::Draft,
            published_at: existing.published_at,
        };

        let post = map_not_found(self.writer.update_post_status(params).await)?;
        self.record(actor, "post.unpublish", &post).await?;
        Ok(post)
    }

    pub async fn delete_post(&self, actor: &str, id: Uuid) -> Result<(), AdminPostError> {
        match self.writer.delete_post(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(AdminPostError::NotFound),
            Err(err) => return Err(err.into()),
        }
        self.audit
            .record::<()>(actor, "post.delete", "post", Some(&id.to_string()), None)
            .await?;
        Ok(())
    }

    async fn record(
        &self,
        actor: &str,
        action: &str,
        post: &PostRecord,
    ) -> Result<(), RepoError> {
        let snapshot = PostSnapshot {
            slug: post.slug.as_str(),
            title: post.title.en.as_str(),
        };
        self.audit
            .record(
                actor,
                action,
                "post",
                Some(&post.id.to_string()),
                Some(&snapshot),
            )
            .await
    }
}

fn map_not_found(result: Result<PostRecord, RepoError>) -> Result<PostRecord, AdminPostError> {
    match result {
        Ok(post) => Ok(post),
        Err(RepoError::NotFound) => Err(AdminPostError::NotFound),
        Err(err) => Err(err.into()),
    }
}

fn required(value: String, field: &'static str) -> Result<String, AdminPostError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdminPostError::ConstraintViolation(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn localized(
    en: String,
    ar: Option<String>,
    field: &'static str,
) -> Result<Localized, AdminPostError> {
    Ok(Localized::new(required(en, field)?, optional(ar)))
}
