use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use time::Date;
use uuid::Uuid;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::{
    CreateExperienceParams, ExperienceRepo, ExperienceWriteRepo, RepoError,
    UpdateExperienceParams,
};
use crate::domain::entities::ExperienceRecord;
use crate::domain::types::Localized;

#[derive(Debug, Error)]
pub enum AdminExperienceError {
    #[error("field `{0}` must not be blank")]
    ConstraintViolation(&'static str),
    #[error("an entry cannot end before it starts")]
    EndsBeforeStart,
    #[error("experience entry not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct ExperienceDraft {
    pub role_en: String,
    pub role_ar: Option<String>,
    pub organization_en: String,
    pub organization_ar: Option<String>,
    pub summary_en: String,
    pub summary_ar: Option<String>,
    pub started_on: Date,
    pub ended_on: Option<Date>,
    pub sort_order: i32,
}

#[derive(Serialize)]
struct ExperienceSnapshot<'a> {
    role: &'a str,
    organization: &'a str,
}

#[derive(Clone)]
pub struct AdminExperienceService {
    reader: Arc<dyn ExperienceRepo>,
    writer: Arc<dyn ExperienceWriteRepo>,
    audit: AdminAuditService,
}

impl AdminExperienceService {
    pub fn new(
        reader: Arc<dyn ExperienceRepo>,
        writer: Arc<dyn ExperienceWriteRepo>,
        audit: AdminAuditService,
    ) -> Self {
        Self {
            reader,
            writer,
            audit,
        }
    }

    pub async fn list(&self) -> Result<Vec<ExperienceRecord>, AdminExperienceError> {
        self.reader
            .list_experience()
            .await
            .map_err(AdminExperienceError::from)
    }

    pub async fn create_entry(
        &self,
        actor: &str,
        draft: ExperienceDraft,
    ) -> Result<ExperienceRecord, AdminExperienceError> {
        let fields = normalize(draft)?;

        let params = CreateExperienceParams {
            role: fields.role,
            organization: fields.organization,
            summary: fields.summary,
            started_on: fields.started_on,
            ended_on: fields.ended_on,
            sort_order: fields.sort_order,
        };

        let entry = self.writer.create_experience(params).await?;
        self.record(actor, "experience.create", &entry).await?;
        Ok(entry)
    }

    pub async fn update_entry(
        &self,
        actor: &str,
        id: Uuid,
        draft: ExperienceDraft,
    ) -> Result<ExperienceRecord, AdminExperienceError> {
        let fields = normalize(draft)?;

        let params = UpdateExperienceParams {
            id,
            role: fields.role,
            organization: fields.organization,
            summary: fields.summary,
            started_on: fields.started_on,
            ended_on: fields.ended_on,
            sort_order: fields.sort_order,
        };

        let entry = match self.writer.update_experience(params).await {
            Ok(entry) => entry,
            Err(RepoError::NotFound) => return Err(AdminExperienceError::NotFound),
            Err(err) => return Err(err.into()),
        };
        self.record(actor, "experience.update", &entry).await?;
        Ok(entry)
    }

    pub async fn delete_entry(&self, actor: &str, id: Uuid) -> Result<(), AdminExperienceError> {
        match self.writer.delete_experience(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(AdminExperienceError::NotFound),
            Err(err) => return Err(err.into()),
        }
        self.audit
            .record::<()>(
                actor,
                "experience.delete",
                "experience",
                Some(&id.to_string()),
                None,
            )
            .await?;
        Ok(())
    }

    async fn record(
        &self,
        actor: &str,
        action: &str,
        entry: &ExperienceRecord,
    ) -> Result<(), RepoError> {
        let snapshot = ExperienceSnapshot {
            role: entry.role.en.as_str(),
            organization: entry.organization.en.as_str(),
        };
        self.audit
            .record(
                actor,
                action,
                "experience",
                Some(&entry.id.to_string()),
                Some(&snapshot),
            )
            .await
    }
}

struct NormalizedExperience {
    role: Localized,
    organization: Localized,
    summary: Localized,
    started_on: Date,
    ended_on: Option<Date>,
    sort_order: i32,
}

fn normalize(draft: ExperienceDraft) -> Result<NormalizedExperience, AdminExperienceError> {
    if let Some(ended_on) = draft.ended_on
        && ended_on < draft.started_on
    {
        return Err(AdminExperienceError::EndsBeforeStart);
    }

    Ok(NormalizedExperience {
        role: localized(draft.role_en, draft.role_ar, "role_en")?,
        organization: localized(
            draft.organization_en,
            draft.organization_ar,
            "organization_en",
        )?,
        summary: localized(draft.summary_en, draft.summary_ar, "summary_en")?,
        started_on: draft.started_on,
        ended_on: draft.ended_on,
        sort_order: draft.sort_order,
    })
}

fn required(value: String, field: &'static str) -> Result<String, AdminExperienceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdminExperienceError::ConstraintViolation(field));
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
) -> Result<Localized, AdminExperienceError> {
    Ok(Localized::new(required(en, field)?, optional(ar)))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn normalize_rejects_inverted_range() {
        let draft = ExperienceDraft {
            role_en: "Engineer".to_string(),
            role_ar: None,
            organization_en: "Acme".to_string(),
            organization_ar: None,
            summary_en: "Built things".to_string(),
            summary_ar: None,
            started_on: date!(2023 - 01 - 01),
            ended_on: Some(date!(2022 - 06 - 01)),
            sort_order: 0,
        };

        assert!(matches!(
            normalize(draft),
            Err(AdminExperienceError::EndsBeforeStart)
        ));
    }
}
