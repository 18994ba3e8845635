//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::entities::{
    AuditLogRecord, EducationRecord, ExperienceRecord, MessageRecord, ProfileRecord, ProjectRecord,
    PostRecord, SkillRecord,
};
use crate::domain::types::{Localized, PostStatus, SkillCategory};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Offset pagination for list queries. Collections here are small (a personal
/// site), so offset paging is sufficient; limits are clamped at the edge.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: limit.clamp(1, Self::MAX_LIMIT),
            offset,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(20, 0)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PostListScope {
    /// Published posts only, newest first.
    Public,
    /// Every post, optionally filtered by status.
    Admin { status: Option<PostStatus> },
}

#[derive(Debug, Clone)]
pub struct UpsertProfileParams {
    pub name: Localized,
    pub headline: Localized,
    pub bio: Localized,
    pub location: Localized,
    pub email: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub resume_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateProjectParams {
    pub slug: String,
    pub title: Localized,
    pub summary: Localized,
    pub description: Localized,
    pub cover_image_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub tech_stack: Vec<String>,
    pub live_url: Option<String>,
    pub source_url: Option<String>,
    pub featured: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateProjectParams {
    pub id: Uuid,
    pub title: Localized,
    pub summary: Localized,
    pub description: Localized,
    pub cover_image_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub tech_stack: Vec<String>,
    pub live_url: Option<String>,
    pub source_url: Option<String>,
    pub featured: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct CreateSkillParams {
    pub name: String,
    pub category: SkillCategory,
    pub level: i16,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateSkillParams {
    pub id: Uuid,
    pub name: String,
    pub category: SkillCategory,
    pub level: i16,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct CreateExperienceParams {
    pub role: Localized,
    pub organization: Localized,
    pub summary: Localized,
    pub started_on: Date,
    pub ended_on: Option<Date>,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateExperienceParams {
    pub id: Uuid,
    pub role: Localized,
    pub organization: Localized,
    pub summary: Localized,
    pub started_on: Date,
    pub ended_on: Option<Date>,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct CreateEducationParams {
    pub degree: Localized,
    pub institution: Localized,
    pub summary: Localized,
    pub started_year: i16,
    pub ended_year: Option<i16>,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct UpdateEducationParams {
    pub id: Uuid,
    pub degree: Localized,
    pub institution: Localized,
    pub summary: Localized,
    pub started_year: i16,
    pub ended_year: Option<i16>,
    pub sort_order: i32,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub slug: String,
    pub title: Localized,
    pub excerpt: Localized,
    pub body_en: String,
    pub body_ar: Option<String>,
    pub cover_image_url: Option<String>,
    pub status: PostStatus,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: Uuid,
    pub title: Localized,
    pub excerpt: Localized,
    pub body_en: String,
    pub body_ar: Option<String>,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdatePostStatusParams {
    pub id: Uuid,
    pub status: PostStatus,
    pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewMessageParams {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub body: String,
}

/// Server-owned unread badge source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MessageStatusCounts {
    pub total: u64,
    pub unread: u64,
}

#[async_trait]
pub trait ProfileRepo: Send + Sync {
    async fn get_profile(&self) -> Result<Option<ProfileRecord>, RepoError>;

    async fn upsert_profile(
        &self,
        params: UpsertProfileParams,
    ) -> Result<ProfileRecord, RepoError>;
}

#[async_trait]
pub trait ProjectsRepo: Send + Sync {
    /// Ordered by `sort_order`, then newest first.
    async fn list_projects(&self, featured_only: bool) -> Result<Vec<ProjectRecord>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ProjectRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepoError>;
}

#[async_trait]
pub trait ProjectsWriteRepo: Send + Sync {
    async fn create_project(
        &self,
        params: CreateProjectParams,
    ) -> Result<ProjectRecord, RepoError>;

    async fn update_project(
        &self,
        params: UpdateProjectParams,
    ) -> Result<ProjectRecord, RepoError>;

    async fn delete_project(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait SkillsRepo: Send + Sync {
    /// Ordered by category, then `sort_order`.
    async fn list_skills(&self) -> Result<Vec<SkillRecord>, RepoError>;
}

#[async_trait]
pub trait SkillsWriteRepo: Send + Sync {
    async fn create_skill(&self, params: CreateSkillParams) -> Result<SkillRecord, RepoError>;

    async fn update_skill(&self, params: UpdateSkillParams) -> Result<SkillRecord, RepoError>;

    async fn delete_skill(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait ExperienceRepo: Send + Sync {
    /// Ordered by `sort_order`, then most recent start date first.
    async fn list_experience(&self) -> Result<Vec<ExperienceRecord>, RepoError>;
}

#[async_trait]
pub trait ExperienceWriteRepo: Send + Sync {
    async fn create_experience(
        &self,
        params: CreateExperienceParams,
    ) -> Result<ExperienceRecord, RepoError>;

    async fn update_experience(
        &self,
        params: UpdateExperienceParams,
    ) -> Result<ExperienceRecord, RepoError>;

    async fn delete_experience(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait EducationRepo: Send + Sync {
    /// Ordered by `sort_order`, then most recent start year first.
    async fn list_education(&self) -> Result<Vec<EducationRecord>, RepoError>;
}

#[async_trait]
pub trait EducationWriteRepo: Send + Sync {
    async fn create_education(
        &self,
        params: CreateEducationParams,
    ) -> Result<EducationRecord, RepoError>;

    async fn update_education(
        &self,
        params: UpdateEducationParams,
    ) -> Result<EducationRecord, RepoError>;

    async fn delete_education(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list_posts(
        &self,
        scope: PostListScope,
        page: PageRequest,
    ) -> Result<Vec<PostRecord>, RepoError>;

    async fn count_posts(&self, scope: PostListScope) -> Result<u64, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post_status(
        &self,
        params: UpdatePostStatusParams,
    ) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait MessagesRepo: Send + Sync {
    /// Newest first.
    async fn list_messages(
        &self,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Vec<MessageRecord>, RepoError>;

    async fn status_counts(&self) -> Result<MessageStatusCounts, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MessageRecord>, RepoError>;
}

#[async_trait]
pub trait MessagesWriteRepo: Send + Sync {
    async fn insert_message(&self, params: NewMessageParams) -> Result<MessageRecord, RepoError>;

    async fn mark_read(&self, id: Uuid) -> Result<MessageRecord, RepoError>;

    async fn delete_message(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AuditRepo: Send + Sync {
    async fn append_log(&self, record: AuditLogRecord) -> Result<(), RepoError>;

    /// Newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<AuditLogRecord>, RepoError>;
}
