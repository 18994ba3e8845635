use async_trait::async_trait;
use sqlx::{Row, postgres::PgRow};

use crate::application::repos::{ProfileRepo, RepoError, UpsertProfileParams};
use crate::domain::entities::ProfileRecord;
use crate::domain::types::Localized;

use super::{PostgresRepositories, map_sqlx_error};

const PROFILE_COLUMNS: &str = "name_en, name_ar, headline_en, headline_ar, bio_en, bio_ar, \
     location_en, location_ar, email, phone, avatar_url, resume_url, github_url, linkedin_url, \
     updated_at";

fn map_profile(row: &PgRow) -> Result<ProfileRecord, sqlx::Error> {
    Ok(ProfileRecord {
        name: Localized::new(row.try_get::<String, _>("name_en")?, row.try_get("name_ar")?),
        headline: Localized::new(
            row.try_get::<String, _>("headline_en")?,
            row.try_get("headline_ar")?,
        ),
        bio: Localized::new(row.try_get::<String, _>("bio_en")?, row.try_get("bio_ar")?),
        location: Localized::new(
            row.try_get::<String, _>("location_en")?,
            row.try_get("location_ar")?,
        ),
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
        avatar_url: row.try_get("avatar_url")?,
        resume_url: row.try_get("resume_url")?,
        github_url: row.try_get("github_url")?,
        linkedin_url: row.try_get("linkedin_url")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ProfileRepo for PostgresRepositories {
    async fn get_profile(&self) -> Result<Option<ProfileRecord>, RepoError> {
        let row = sqlx::query(&format!("SELECT {PROFILE_COLUMNS} FROM profile WHERE id"))
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref()
            .map(map_profile)
            .transpose()
            .map_err(map_sqlx_error)
    }

    async fn upsert_profile(
        &self,
        params: UpsertProfileParams,
    ) -> Result<ProfileRecord, RepoError> {
        let sql = format!(
            "INSERT INTO profile (id, name_en, name_ar, headline_en, headline_ar, bio_en, bio_ar, \
             location_en, location_ar, email, phone, avatar_url, resume_url, github_url, \
             linkedin_url, updated_at) \
             VALUES (TRUE, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, now()) \
             ON CONFLICT (id) DO UPDATE SET \
             name_en = EXCLUDED.name_en, name_ar = EXCLUDED.name_ar, \
             headline_en = EXCLUDED.headline_en, headline_ar = EXCLUDED.headline_ar, \
             bio_en = EXCLUDED.bio_en, bio_ar = EXCLUDED.bio_ar, \
             location_en = EXCLUDED.location_en, location_ar = EXCLUDED.location_ar, \
             email = EXCLUDED.email, phone = EXCLUDED.phone, \
             avatar_url = EXCLUDED.avatar_url, resume_url = EXCLUDED.resume_url, \
             github_url = EXCLUDED.github_url, linkedin_url = EXCLUDED.linkedin_url, \
             updated_at = now() \
             RETURNING {PROFILE_COLUMNS}"
        );

        let row = sqlx::query(&sql)
            .bind(&params.name.en)
            .bind(&params.name.ar)
            .bind(&params.headline.en)
            .bind(&params.headline.ar)
            .bind(&params.bio.en)
            .bind(&params.bio.ar)
            .bind(&params.location.en)
            .bind(&params.location.ar)
            .bind(&params.email)
            .bind(&params.phone)
            .bind(&params.avatar_url)
            .bind(&params.resume_url)
            .bind(&params.github_url)
            .bind(&params.linkedin_url)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        map_profile(&row).map_err(map_sqlx_error)
    }
}
