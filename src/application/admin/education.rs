use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::{
    CreateEducationParams, EducationRepo, EducationWriteRepo, RepoError, UpdateEducationParams,
};
use crate::domain::entities::EducationRecord;
use crate::domain::types::Localized;

#[derive(Debug, Error)]
pub enum AdminEducationError {
    #[error("field `{0}` must not be blank")]
    ConstraintViolation(&'static str),
    #[error("an entry cannot end before it starts")]
    EndsBeforeStart,
    #[error("education entry not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct EducationDraft {
    pub degree_en: String,
    pub degree_ar: Option<String>,
    pub institution_en: String,
    pub institution_ar: Option<String>,
    pub summary_en: String,
    pub summary_ar: Option<String>,
    pub started_year: i16,
    pub ended_year: Option<i16>,
    pub sort_order: i32,
}

#[derive(Serialize)]
struct EducationSnapshot<'a> {
    degree: &'a str,
    institution: &'a str,
}

#[derive(Clone)]
pub struct AdminEducationService {
    reader: Arc<dyn EducationRepo>,
    writer: Arc<dyn EducationWriteRepo>,
    audit: AdminAuditService,
}

impl AdminEducationService {
    pub fn new(
        reader: Arc<dyn EducationRepo>,
        writer: Arc<dyn EducationWriteRepo>,
        audit: AdminAuditService,
    ) -> Self {
        Self {
            reader,
            writer,
            audit,
        }
    }

    pub async fn list(&self) -> Result<Vec<EducationRecord>, AdminEducationError> {
        self.reader
            .list_education()
            .await
            .map_err(AdminEducationError::from)
    }

    pub async fn create_entry(
        &self,
        actor: &str,
        draft: EducationDraft,
    ) -> Result<EducationRecord, AdminEducationError> {
        let fields = normalize(draft)?;

        let params = CreateEducationParams {
            degree: fields.degree,
            institution: fields.institution,
            summary: fields.summary,
            started_year: fields.started_year,
            ended_year: fields.ended_year,
            sort_order: fields.sort_order,
        };

        let entry = self.writer.create_education(params).await?;
        self.record(actor, "education.create", &entry).await?;
        Ok(entry)
    }

    pub async fn update_entry(
        &self,
        actor: &str,
        id: Uuid,
        draft: EducationDraft,
    ) -> Result<EducationRecord, AdminEducationError> {
        let fields = normalize(draft)?;

        let params = UpdateEducationParams {
            id,
            degree: fields.degree,
            institution: fields.institution,
            summary: fields.summary,
            started_year: fields.started_year,
            ended_year: fields.ended_year,
            sort_order: fields.sort_order,
        };

        let entry = match self.writer.update_education(params).await {
            Ok(entry) => entry,
            Err(RepoError::NotFound) => return Err(AdminEducationError::NotFound),
            Err(err) => return Err(err.into()),
        };
        self.record(actor, "education.update", &entry).await?;
        Ok(entry)
    }

    pub async fn delete_entry(&self, actor: &str, id: Uuid) -> Result<(), AdminEducationError> {
        match self.writer.delete_education(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(AdminEducationError::NotFound),
            Err(err) => return Err(err.into()),
        }
        self.audit
            .record::<()>(
                actor,
                "education.delete",
                "education",
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
        entry: &EducationRecord,
    ) -> Result<(), RepoError> {
        let snapshot = EducationSnapshot {
            degree: entry.degree.en.as_str(),
            institution: entry.institution.en.as_str(),
        };
        self.audit
            .record(
                actor,
                action,
                "education",
                Some(&entry.id.to_string()),
                Some(&snapshot),
            )
            .await
    }
}

struct NormalizedEducation {
    degree: Localized,
    institution: Localized,
    summary: Localized,
    started_year: i16,
    ended_year: Option<i16>,
    sort_order: i32,
}

fn normalize(draft: EducationDraft) -> Result<NormalizedEducation, AdminEducationError> {
    if let Some(ended_year) = draft.ended_year
        && ended_year < draft.started_year
    {
        return Err(AdminEducationError::EndsBeforeStart);
    }

    Ok(NormalizedEducation {
        degree: localized(draft.degree_en, draft.degree_ar, "degree_en")?,
        institution: localized(
            draft.institution_en,
            draft.institution_ar,
            "institution_en",
        )?,
        summary: localized(draft.summary_en, draft.summary_ar, "summary_en")?,
        started_year: draft.started_year,
        ended_year: draft.ended_year,
        sort_order: draft.sort_order,
    })
}

fn required(value: String, field: &'static str) -> Result<String, AdminEducationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AdminEducationError::ConstraintViolation(field));
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
) -> Result<Localized, AdminEducationError> {
    Ok(Localized::new(required(en, field)?, optional(ar)))
}
