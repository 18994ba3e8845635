use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::{
    CreateProjectParams, ProjectsRepo, ProjectsWriteRepo, RepoError, UpdateProjectParams,
};
use crate::domain::entities::ProjectRecord;
use crate::domain::slug::{SlugAsyncError, SlugError, generate_unique_slug_async};
use crate::domain::types::Localized;

#[derive(Debug, Error)]
pub enum AdminProjectError {
    #[error("field `{0}` must not be blank")]
    ConstraintViolation(&'static str),
    #[error("project not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub title_en: String,
    pub title_ar: Option<String>,
    pub summary_en: String,
    pub summary_ar: Option<String>,
    pub description_en: String,
    pub description_ar: Option<String>,
    pub cover_image_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub tech_stack: Vec<String>,
    pub live_url: Option<String>,
    pub source_url: Option<String>,
    pub featured: bool,
    pub sort_order: i32,
}

#[derive(Serialize)]
struct ProjectSnapshot<'a> {
    slug: &'a str,
    title: &'a str,
}

#[derive(Clone)]
pub struct AdminProjectService {
    reader: Arc<dyn ProjectsRepo>,
    writer: Arc<dyn ProjectsWriteRepo>,
    audit: AdminAuditService,
}

impl AdminProjectService {
    pub fn new(
        reader: Arc<dyn ProjectsRepo>,
        writer: Arc<dyn ProjectsWriteRepo>,
        audit: AdminAuditService,
    ) -> Self {
        Self {
            reader,
            writer,
            audit,
        }
    }

    pub async fn list(&self) -> Result<Vec<ProjectRecord>, AdminProjectError> {
        self.reader
            .list_projects(false)
            .await
            .map_err(AdminProjectError::from)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, AdminProjectError> {
        self.reader
            .find_by_id(id)
            .await
            .map_err(AdminProjectError::from)
    }

    pub async fn create_project(
        &self,
        actor: &str,
        draft: ProjectDraft,
    ) -> Result<ProjectRecord, AdminProjectError> {
        let fields = normalize(draft)?;

        let reader = self.reader.clone();
        let slug = match generate_unique_slug_async(&fields.title.en, move |candidate| {
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
                return Err(AdminProjectError::ConstraintViolation("title_en"));
            }
            Err(SlugAsyncError::Slug(SlugError::Exhausted { .. })) => {
                return Err(AdminProjectError::ConstraintViolation("slug"));
            }
            Err(SlugAsyncError::Predicate(err)) => return Err(AdminProjectError::Repo(err)),
        };

        let params = CreateProjectParams {
            slug,
            title: fields.title,
            summary: fields.summary,
            description: fields.description,
            cover_image_url: fields.cover_image_url,
            gallery_urls: fields.gallery_urls,
            tech_stack: fields.tech_stack,
            live_url: fields.live_url,
            source_url: fields.source_url,
            featured: fields.featured,
            sort_order: fields.sort_order,
        };

        let project = self.writer.create_project(params).await?;
        self.record(actor, "project.create", &project).await?;
        Ok(project)
    }

    pub async fn update_project(
        &self,
        actor: &str,
        id: Uuid,
        draft: ProjectDraft,
    ) -> Result<ProjectRecord, AdminProjectError> {
        let fields = normalize(draft)?;

        let params = UpdateProjectParams {
            id,
            title: fields.title,
            summary: fields.summary,
            description: fields.description,
            cover_image_url: fields.cover_image_url,
            gallery_urls: fields.gallery_urls,
            tech_stack: fields.tech_stack,
            live_url: fields.live_url,
            source_url: fields.source_url,
            featured: fields.featured,
            sort_order: fields.sort_order,
        };

        let project = match self.writer.update_project(params).await {
            Ok(project) => project,
            Err(RepoError::NotFound) => return Err(AdminProjectError::NotFound),
            Err(err) => return Err(err.into()),
        };
        self.record(actor, "project.update", &project).await?;
        Ok(project)
    }

    pub async fn delete_project(&self, actor: &str, id: Uuid) -> Result<(), AdminProjectError> {
        match self.writer.delete_project(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(AdminProjectError::NotFound),
            Err(err) => return Err(err.into()),
        }
        self.audit
            .record::<()>(actor, "project.delete", "project", Some(&id.to_string()), None)
            .await?;
        Ok(())
    }

    async fn record(
        &self,
        actor: &str,
        action: &str,
        project: &ProjectRecord,
    ) -> Result<(), RepoError> {
        let snapshot = ProjectSnapshot {
            slug: project.slug.as_str(),
            title: project.title.en.as_str(),
        };
        self.audit
            .record(
                actor,
                action,
                "project",
                Some(&project.id.to_string()),
                Some(&snapshot),
            )
            .await
    }
}

struct NormalizedProject {
    title: Localized,
    summary: Localized,
    description: Localized,
    cover_image_url: Option<String>,
    gallery_urls: Vec<String>,
    tech_stack: Vec<String>,
    live_url: Option<String>,
    source_url: Option<String>,
    featured: bool,
    sort_order: i32,
}

fn normalize(draft: ProjectDraft) -> Result<NormalizedProject, AdminProjectError> {
    Ok(NormalizedProject {
        title: localized(draft.title_en, draft.title_ar, "title_en")?,
        summary: localized(draft.summary_en, draft.summary_ar, "summary_en")?,
        description: localized(draft.description_en, draft.description_ar, "description_en")?,
        cover_image_url: optional(draft.cover_image_url),
        gallery_urls: compact(draft.gallery_urls),
        tech_stack: compact(draft.tech_stack),
        live_url: optional(draft.live_url),
        source_url: optional(draft.source_url),
        featured: draft.featured,
        sort_order: draft.sort_order,
    })
}

fn required(value: String, field: &'static str) -> Result<String, AdminProjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdminProjectError::ConstraintViolation(field));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn compact(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn localized(
    en: String,
    ar: Option<String>,
    field: &'static str,
) -> Result<Localized, AdminProjectError> {
    Ok(Localized::new(required(en, field)?, optional(ar)))
}
