use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::admin::education::EducationDraft;
use crate::infra::http::ADMIN_ACTOR;
use crate::infra::http::AdminState;
use crate::infra::http::error::{ApiError, education_to_api};
use crate::infra::http::models::EducationWriteRequest;

fn draft_from_request(payload: EducationWriteRequest) -> EducationDraft {
    EducationDraft {
        degree_en: payload.degree_en,
        degree_ar: payload.degree_ar,
        institution_en: payload.institution_en,
        institution_ar: payload.institution_ar,
        summary_en: payload.summary_en,
        summary_ar: payload.summary_ar,
        started_year: payload.started_year,
        ended_year: payload.ended_year,
        sort_order: payload.sort_order,
    }
}

pub async fn list_entries(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    let entries = state.education.list().await.map_err(education_to_api)?;
    Ok(Json(entries))
}

pub async fn create_entry(
    State(state): State<AdminState>,
    Json(payload): Json<EducationWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .education
        .create_entry(ADMIN_ACTOR, draft_from_request(payload))
        .await
        .map_err(education_to_api)?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update_entry(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EducationWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = state
        .education
        .update_entry(ADMIN_ACTOR, id, draft_from_request(payload))
        .await
        .map_err(education_to_api)?;

    Ok(Json(entry))
}

pub async fn delete_entry(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .education
        .delete_entry(ADMIN_ACTOR, id)
        .await
        .map_err(education_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
