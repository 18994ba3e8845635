//! Read-side services for the public portfolio surface.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{
    EducationRepo, ExperienceRepo, ProfileRepo, ProjectsRepo, RepoError, SkillsRepo,
};
use crate::domain::entities::{
    EducationRecord, ExperienceRecord, ProfileRecord, ProjectRecord, SkillRecord,
};

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("profile has not been configured")]
    ProfileMissing,
    #[error("project not found")]
    ProjectNotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Aggregates the portfolio collections behind one read surface.
#[derive(Clone)]
pub struct SiteService {
    profile: Arc<dyn ProfileRepo>,
    projects: Arc<dyn ProjectsRepo>,
    skills: Arc<dyn SkillsRepo>,
    experience: Arc<dyn ExperienceRepo>,
    education: Arc<dyn EducationRepo>,
}

impl SiteService {
    pub fn new(
        profile: Arc<dyn ProfileRepo>,
        projects: Arc<dyn ProjectsRepo>,
        skills: Arc<dyn SkillsRepo>,
        experience: Arc<dyn ExperienceRepo>,
        education: Arc<dyn EducationRepo>,
    ) -> Self {
        Self {
            profile,
            projects,
            skills,
            experience,
            education,
        }
    }

    pub async fn profile(&self) -> Result<ProfileRecord, SiteError> {
        self.profile
            .get_profile()
            .await?
            .ok_or(SiteError::ProfileMissing)
    }

    pub async fn projects(&self, featured_only: bool) -> Result<Vec<ProjectRecord>, SiteError> {
        Ok(self.projects.list_projects(featured_only).await?)
    }

    pub async fn project_by_slug(&self, slug: &str) -> Result<ProjectRecord, SiteError> {
        self.projects
            .find_by_slug(slug)
            .await?
            .ok_or(SiteError::ProjectNotFound)
    }

    pub async fn skills(&self) -> Result<Vec<SkillRecord>, SiteError> {
        Ok(self.skills.list_skills().await?)
    }

    pub async fn experience(&self) -> Result<Vec<ExperienceRecord>, SiteError> {
        Ok(self.experience.list_experience().await?)
    }

    pub async fn education(&self) -> Result<Vec<EducationRecord>, SiteError> {
        Ok(self.education.list_education().await?)
    }
}
