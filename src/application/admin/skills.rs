use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::application::admin::audit::AdminAuditService;
use crate::application::repos::{
    CreateSkillParams, RepoError, SkillsRepo, SkillsWriteRepo, UpdateSkillParams,
};
use crate::domain::entities::SkillRecord;
use crate::domain::types::SkillCategory;

#[derive(Debug, Error)]
pub enum AdminSkillError {
    #[error("field `{0}` must not be blank")]
    ConstraintViolation(&'static str),
    #[error("skill level must lie within 0..=100")]
    LevelOutOfRange,
    #[error("skill not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct SkillDraft {
    pub name: String,
    pub category: SkillCategory,
    pub level: i16,
    pub sort_order: i32,
}

#[derive(Serialize)]
struct SkillSnapshot<'a> {
    name: &'a str,
    category: &'a str,
    level: i16,
}

#[derive(Clone)]
pub struct AdminSkillService {
    reader: Arc<dyn SkillsRepo>,
    writer: Arc<dyn SkillsWriteRepo>,
    audit: AdminAuditService,
}

impl AdminSkillService {
    pub fn new(
        reader: Arc<dyn SkillsRepo>,
        writer: Arc<dyn SkillsWriteRepo>,
        audit: AdminAuditService,
    ) -> Self {
        Self {
            reader,
            writer,
            audit,
        }
    }

    pub async fn list(&self) -> Result<Vec<SkillRecord>, AdminSkillError> {
        self.reader.list_skills().await.map_err(AdminSkillError::from)
    }

    pub async fn create_skill(
        &self,
        actor: &str,
        draft: SkillDraft,
    ) -> Result<SkillRecord, AdminSkillError> {
        let (name, level) = validate(&draft)?;

        let params = CreateSkillParams {
            name,
            category: draft.category,
            level,
            sort_order: draft.sort_order,
        };

        let skill = self.writer.create_skill(params).await?;
        self.record(actor, "skill.create", &skill).await?;
        Ok(skill)
    }

    pub async fn update_skill(
        &self,
        actor: &str,
        id: Uuid,
        draft: SkillDraft,
    ) -> Result<SkillRecord, AdminSkillError> {
        let (name, level) = validate(&draft)?;

        let params = UpdateSkillParams {
            id,
            name,
            category: draft.category,
            level,
            sort_order: draft.sort_order,
        };

        let skill = match self.writer.update_skill(params).await {
            Ok(skill) => skill,
            Err(RepoError::NotFound) => return Err(AdminSkillError::NotFound),
            Err(err) => return Err(err.into()),
        };
        self.record(actor, "skill.update", &skill).await?;
        Ok(skill)
    }

    pub async fn delete_skill(&self, actor: &str, id: Uuid) -> Result<(), AdminSkillError> {
        match self.writer.delete_skill(id).await {
            Ok(()) => {}
            Err(RepoError::NotFound) => return Err(AdminSkillError::NotFound),
            Err(err) => return Err(err.into()),
        }
        self.audit
            .record::<()>(actor, "skill.delete", "skill", Some(&id.to_string()), None)
            .await?;
        Ok(())
    }

    async fn record(
        &self,
        actor: &str,
        action: &str,
        skill: &SkillRecord,
    ) -> Result<(), RepoError> {
        let snapshot = SkillSnapshot {
            name: skill.name.as_str(),
            category: skill.category.as_str(),
            level: skill.level,
        };
        self.audit
            .record(
                actor,
                action,
                "skill",
                Some(&skill.id.to_string()),
                Some(&snapshot),
            )
            .await
    }
}

fn validate(draft: &SkillDraft) -> Result<(String, i16), AdminSkillError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(AdminSkillError::ConstraintViolation("name"));
    }
    if !(0..=100).contains(&draft.level) {
        return Err(AdminSkillError::LevelOutOfRange);
    }
    Ok((name.to_string(), draft.level))
}
