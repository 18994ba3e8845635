use axum::Json;
use axum::extract::State;
use axum::response::IntoResponse;

use crate::application::admin::profile::ProfileDraft;
use crate::infra::http::ADMIN_ACTOR;
use crate::infra::http::AdminState;
use crate::infra::http::error::{ApiError, profile_to_api};
use crate::infra::http::models::ProfileWriteRequest;

pub async fn get_profile(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    let profile = state.profile.get().await.map_err(profile_to_api)?;

    match profile {
        Some(profile) => Ok(Json(profile)),
        None => Err(ApiError::not_found("profile has not been configured")),
    }
}

pub async fn upsert_profile(
    State(state): State<AdminState>,
    Json(payload): Json<ProfileWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = ProfileDraft {
        name_en: payload.name_en,
        name_ar: payload.name_ar,
        headline_en: payload.headline_en,
        headline_ar: payload.headline_ar,
        bio_en: payload.bio_en,
        bio_ar: payload.bio_ar,
        location_en: payload.location_en,
        location_ar: payload.location_ar,
        email: payload.email,
        phone: payload.phone,
        avatar_url: payload.avatar_url,
        resume_url: payload.resume_url,
        github_url: payload.github_url,
        linkedin_url: payload.linkedin_url,
    };

    let profile = state
        .profile
        .upsert(ADMIN_ACTOR, draft)
        .await
        .map_err(profile_to_api)?;

    Ok(Json(profile))
}
