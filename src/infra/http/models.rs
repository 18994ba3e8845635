//! Wire DTOs for the public and admin APIs.
//!
//! Public views resolve bilingual fields to the request locale; admin
//! requests carry both languages explicitly and map onto service commands.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, macros::format_description};

use crate::domain::content::ContentBlock;
use crate::domain::entities::{
    EducationRecord, ExperienceRecord, ProfileRecord, ProjectRecord, PostRecord, SkillRecord,
};
use crate::domain::types::{Locale, SkillCategory};

use super::error::ApiError;

const DATE_FORMAT: &[time::format_description::FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub fn parse_date(value: &str, field: &'static str) -> Result<Date, ApiError> {
    Date::parse(value, DATE_FORMAT).map_err(|err| {
        ApiError::bad_request("Invalid date", Some(format!("field `{field}`: {err}")))
    })
}

fn rfc3339(value: OffsetDateTime) -> String {
    value
        .format(&Rfc3339)
        .unwrap_or_else(|_| value.to_string())
}

#[derive(Debug, Deserialize, Default)]
pub struct LocaleQuery {
    pub lang: Option<String>,
}

impl LocaleQuery {
    pub fn resolve(&self, fallback: Locale) -> Locale {
        Locale::parse_or(self.lang.as_deref(), fallback)
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct PostListQuery {
    pub lang: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ProjectListQuery {
    pub lang: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct MessageListQuery {
    #[serde(default)]
    pub unread: bool,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
pub struct AuditListQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub headline: String,
    pub bio: String,
    pub location: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
}

impl ProfileView {
    pub fn from_record(record: &ProfileRecord, locale: Locale) -> Self {
        Self {
            name: record.name.pick(locale).to_string(),
            headline: record.headline.pick(locale).to_string(),
            bio: record.bio.pick(locale).to_string(),
            location: record.location.pick(locale).to_string(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            avatar_url: record.avatar_url.clone(),
            resume_url: record.resume_url.clone(),
            github_url: record.github_url.clone(),
            linkedin_url: record.linkedin_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectView {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub gallery_urls: Vec<String>,
    pub tech_stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    pub featured: bool,
}

impl ProjectView {
    pub fn from_record(record: &ProjectRecord, locale: Locale) -> Self {
        Self {
            slug: record.slug.clone(),
            title: record.title.pick(locale).to_string(),
            summary: record.summary.pick(locale).to_string(),
            description: record.description.pick(locale).to_string(),
            cover_image_url: record.cover_image_url.clone(),
            gallery_urls: record.gallery_urls.clone(),
            tech_stack: record.tech_stack.clone(),
            live_url: record.live_url.clone(),
            source_url: record.source_url.clone(),
            featured: record.featured,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SkillView {
    pub name: String,
    pub category: SkillCategory,
    pub level: i16,
}

impl SkillView {
    pub fn from_record(record: &SkillRecord) -> Self {
        Self {
            name: record.name.clone(),
            category: record.category,
            level: record.level,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExperienceView {
    pub role: String,
    pub organization: String,
    pub summary: String,
    pub started_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_on: Option<String>,
}

impl ExperienceView {
    pub fn from_record(record: &ExperienceRecord, locale: Locale) -> Self {
        Self {
            role: record.role.pick(locale).to_string(),
            organization: record.organization.pick(locale).to_string(),
            summary: record.summary.pick(locale).to_string(),
            started_on: record.started_on.to_string(),
            ended_on: record.ended_on.map(|date| date.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EducationView {
    pub degree: String,
    pub institution: String,
    pub summary: String,
    pub started_year: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_year: Option<i16>,
}

impl EducationView {
    pub fn from_record(record: &EducationRecord, locale: Locale) -> Self {
        Self {
            degree: record.degree.pick(locale).to_string(),
            institution: record.institution.pick(locale).to_string(),
            summary: record.summary.pick(locale).to_string(),
            started_year: record.started_year,
            ended_year: record.ended_year,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostSummaryView {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

impl PostSummaryView {
    pub fn from_record(record: &PostRecord, locale: Locale) -> Self {
        Self {
            slug: record.slug.clone(),
            title: record.title.pick(locale).to_string(),
            excerpt: record.excerpt.pick(locale).to_string(),
            cover_image_url: record.cover_image_url.clone(),
            published_at: record.published_at.map(rfc3339),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostSummaryView>,
    pub total: u64,
}

#[derive(Debug, Serialize)]
pub struct PostView {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
    pub locale: Locale,
    pub blocks: Vec<ContentBlock>,
}

impl PostView {
    pub fn from_record(record: &PostRecord, locale: Locale, blocks: Vec<ContentBlock>) -> Self {
        Self {
            slug: record.slug.clone(),
            title: record.title.pick(locale).to_string(),
            excerpt: record.excerpt.pick(locale).to_string(),
            cover_image_url: record.cover_image_url.clone(),
            published_at: record.published_at.map(rfc3339),
            locale,
            blocks,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct PostWriteRequest {
    pub title_en: String,
    pub title_ar: Option<String>,
    pub excerpt_en: String,
    pub excerpt_ar: Option<String>,
    pub body_en: String,
    pub body_ar: Option<String>,
    pub cover_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectWriteRequest {
    pub title_en: String,
    pub title_ar: Option<String>,
    pub summary_en: String,
    pub summary_ar: Option<String>,
    pub description_en: String,
    pub description_ar: Option<String>,
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub gallery_urls: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub live_url: Option<String>,
    pub source_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct SkillWriteRequest {
    pub name: String,
    pub category: SkillCategory,
    pub level: i16,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceWriteRequest {
    pub role_en: String,
    pub role_ar: Option<String>,
    pub organization_en: String,
    pub organization_ar: Option<String>,
    pub summary_en: String,
    pub summary_ar: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    pub started_on: String,
    pub ended_on: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct EducationWriteRequest {
    pub degree_en: String,
    pub degree_ar: Option<String>,
    pub institution_en: String,
    pub institution_ar: Option<String>,
    pub summary_en: String,
    pub summary_ar: Option<String>,
    pub started_year: i16,
    pub ended_year: Option<i16>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
pub struct ProfileWriteRequest {
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
