use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::admin::experience::ExperienceDraft;
use crate::infra::http::ADMIN_ACTOR;
use crate::infra::http::AdminState;
use crate::infra::http::error::{ApiError, experience_to_api};
use crate::infra::http::models::{ExperienceWriteRequest, parse_date};

fn draft_from_request(payload: ExperienceWriteRequest) -> Result<ExperienceDraft, ApiError> {
    let started_on = parse_date(&payload.started_on, "started_on")?;
    let ended_on = payload
        .ended_on
        .as_deref()
        .map(|value| parse_date(value, "ended_on"))
        .transpose()?;

    Ok(ExperienceDraft {
        role_en: payload.role_en,
        role_ar: payload.role_ar,
        organization_en: payload.organization_en,
        organization_ar: payload.organization_ar,
        summary_en: payload.summary_en,
        summary_ar: payload.summary_ar,
        started_on,
        ended_on,
        sort_order: payload.sort_order,
    })
}

pub async fn list_entries(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    let entries = state.experience.list().await.map_err(experience_to_api)?;
    Ok(Json(entries))
}

pub async fn create_entry(
    State(state): State<AdminState>,
    Json(payload): Json<ExperienceWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .experience
        .create_entry(ADMIN_ACTOR, draft_from_request(payload)?)
        .await
        .map_err(experience_to_api)?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExperienceWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .experience
        .update_entry(ADMIN_ACTOR, id, draft_from_request(payload)?)
        .await
        .map_err(experience_to_api)?;

    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .experience
        .delete_entry(ADMIN_ACTOR, id)
        .await
        .map_err(experience_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
