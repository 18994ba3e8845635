//! Shared domain enumerations and the bilingual text primitive.

use serde::{Deserialize, Serialize};

/// Reader-facing languages supported by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    /// Parse a `lang` query value; unknown values resolve to the fallback.
    pub fn parse_or(value: Option<&str>, fallback: Locale) -> Locale {
        match value.map(str::trim) {
            Some("en") => Locale::En,
            Some("ar") => Locale::Ar,
            _ => fallback,
        }
    }
}

/// A piece of text carried in both languages. Arabic is optional throughout
/// the model; resolution falls back to English when it is absent or blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Localized {
    pub en: String,
    pub ar: Option<String>,
}

impl Localized {
    pub fn new(en: impl Into<String>, ar: Option<String>) -> Self {
        Self { en: en.into(), ar }
    }

    /// English-only text.
    pub fn plain(en: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            ar: None,
        }
    }

    /// Resolve the text for a locale, falling back to English.
    pub fn pick(&self, locale: Locale) -> &str {
        match locale {
            Locale::En => &self.en,
            Locale::Ar => match self.ar.as_deref() {
                Some(text) if !text.trim().is_empty() => text,
                _ => &self.en,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "post_status", rename_all = "snake_case")]
pub enum PostStatus {
    Draft,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "skill_category", rename_all = "snake_case")]
pub enum SkillCategory {
    Frontend,
    Backend,
    Tooling,
    Language,
}

impl SkillCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::Frontend => "frontend",
            SkillCategory::Backend => "backend",
            SkillCategory::Tooling => "tooling",
            SkillCategory::Language => "language",
        }
    }
}

/// Which third-party image host satisfied an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageHostKind {
    Primary,
    Secondary,
}

impl ImageHostKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageHostKind::Primary => "primary",
            ImageHostKind::Secondary => "secondary",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parse_falls_back_on_unknown() {
        assert_eq!(Locale::parse_or(Some("ar"), Locale::En), Locale::Ar);
        assert_eq!(Locale::parse_or(Some("fr"), Locale::En), Locale::En);
        assert_eq!(Locale::parse_or(None, Locale::Ar), Locale::Ar);
    }

    #[test]
    fn localized_pick_falls_back_to_english() {
        let text = Localized::new("Engineer", Some("مهندس".to_string()));
        assert_eq!(text.pick(Locale::Ar), "مهندس");

        let blank_ar = Localized::new("Engineer", Some("   ".to_string()));
        assert_eq!(blank_ar.pick(Locale::Ar), "Engineer");

        let missing_ar = Localized::plain("Engineer");
        assert_eq!(missing_ar.pick(Locale::Ar), "Engineer");
    }
}
