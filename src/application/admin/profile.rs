use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::{ProfileRepo, RepoError, UpsertProfileParams};
use crate::domain::entities::ProfileRecord;
use crate::domain::types::Localized;

#[derive(Debug, Error)]
pub enum AdminProfileError {
    #[error("field `{0}` must not be blank")]
    ConstraintViolation(&'static str),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub name_en: String,
    pub name_ar: Option<String>,
    pub headline_en: String,
    pub headline_ar: Option<String>,
    pub bio_en: String,
    pub bio_ar: Option<String>,
    pub location_en: String,
    pub location_ar: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub resume_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
}

#[derive(Serialize)]
struct ProfileSnapshot<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Clone)]
pub struct AdminProfileService {
    repo: Arc<dyn ProfileRepo>,
    audit: AdminAuditService,
}

impl AdminProfileService {
    pub fn new(repo: Arc<dyn ProfileRepo>, audit: AdminAuditService) -> Self {
        Self { repo, audit }
    }

    pub async fn get(&self) -> Result<Option<ProfileRecord>, AdminProfileError> {
        self.repo.get_profile().await.map_err(AdminProfileError::from)
    }

    /// Replace the singleton profile row.
    pub async fn upsert(
        &self,
        actor: &str,
        draft: ProfileDraft,
    ) -> Result<ProfileRecord, AdminProfileError> {
        let params = UpsertProfileParams {
            name: localized(draft.name_en, draft.name_ar, "name_en")?,
            headline: localized(draft.headline_en, draft.headline_ar, "headline_en")?,
            bio: localized(draft.bio_en, draft.bio_ar, "bio_en")?,
            location: localized(draft.location_en, draft.location_ar, "location_en")?,
            email: required(draft.email, "email")?,
            phone: optional(draft.phone),
            avatar_url: optional(draft.avatar_url),
            resume_url: optional(draft.resume_url),
            github_url: optional(draft.github_url),
            linkedin_url: optional(draft.linkedin_url),
        };

        let profile = self.repo.upsert_profile(params).await?;
        let snapshot = ProfileSnapshot {
            name: profile.name.en.as_str(),
            email: profile.email.as_str(),
        };
        self.audit
            .record(actor, "profile.upsert", "profile", None, Some(&snapshot))
            .await?;
        Ok(profile)
    }
}

fn required(value: String, field: &'static str) -> Result<String, AdminProfileError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdminProfileError::ConstraintViolation(field));
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
) -> Result<Localized, AdminProfileError> {
    Ok(Localized::new(required(en, field)?, optional(ar)))
}
