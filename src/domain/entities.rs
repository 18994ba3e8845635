//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::domain::types::{Localized, PostStatus, SkillCategory};

/// The site owner's personal data. Persisted as a singleton row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRecord {
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
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub id: Uuid,
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
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillRecord {
    pub id: Uuid,
    pub name: String,
    pub category: SkillCategory,
    pub level: i16,
    pub sort_order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceRecord {
    pub id: Uuid,
    pub role: Localized,
    pub organization: Localized,
    pub summary: Localized,
    pub started_on: Date,
    /// `None` marks the current position.
    pub ended_on: Option<Date>,
    pub sort_order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EducationRecord {
    pub id: Uuid,
    pub degree: Localized,
    pub institution: Localized,
    pub summary: Localized,
    pub started_year: i16,
    pub ended_year: Option<i16>,
    pub sort_order: i32,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: Uuid,
    pub slug: String,
    pub title: Localized,
    pub excerpt: Localized,
    pub body_en: String,
    pub body_ar: Option<String>,
    pub cover_image_url: Option<String>,
    pub status: PostStatus,
    pub published_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl PostRecord {
    /// The body for a locale, falling back to English when Arabic is absent.
    pub fn body(&self, locale: crate::domain::types::Locale) -> &str {
        match locale {
            crate::domain::types::Locale::En => &self.body_en,
            crate::domain::types::Locale::Ar => match self.body_ar.as_deref() {
                Some(body) if !body.trim().is_empty() => body,
                _ => &self.body_en,
            },
        }
    }
}

/// A contact-form submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub body: String,
    pub read: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditLogRecord {
    pub id: Uuid,
    pub actor: String,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub payload_text: Option<String>,
    pub created_at: OffsetDateTime,
}
