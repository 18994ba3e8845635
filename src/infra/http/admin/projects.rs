use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::admin::projects::ProjectDraft;
use crate::infra::http::ADMIN_ACTOR;
use crate::infra::http::AdminState;
use crate::infra::http::error::{ApiError, project_to_api};
use crate::infra::http::models::ProjectWriteRequest;

fn draft_from_request(payload: ProjectWriteRequest) -> ProjectDraft {
    ProjectDraft {
        title_en: payload.title_en,
        title_ar: payload.title_ar,
        summary_en: payload.summary_en,
        summary_ar: payload.summary_ar,
        description_en: payload.description_en,
        description_ar: payload.description_ar,
        cover_image_url: payload.cover_image_url,
        gallery_urls: payload.gallery_urls,
        tech_stack: payload.tech_stack,
        live_url: payload.live_url,
        source_url: payload.source_url,
        featured: payload.featured,
        sort_order: payload.sort_order,
    }
}

pub async fn list_projects(
    State(state): State<AdminState>,
) -> Result<impl IntoResponse, ApiError> {
    let projects = state.projects.list().await.map_err(project_to_api)?;
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state.projects.find_by_id(id).await.map_err(project_to_api)?;

    match project {
        Some(project) => Ok(Json(project)),
        None => Err(ApiError::not_found("project not found")),
    }
}

pub async fn create_project(
    State(state): State<AdminState>,
    Json(payload): Json<ProjectWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state
        .projects
        .create_project(ADMIN_ACTOR, draft_from_request(payload))
        .await
        .map_err(project_to_api)?;

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProjectWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state
        .projects
        .update_project(ADMIN_ACTOR, id, draft_from_request(payload))
        .await
        .map_err(project_to_api)?;

    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .projects
        .delete_project(ADMIN_ACTOR, id)
        .await
        .map_err(project_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
