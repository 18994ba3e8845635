use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::admin::skills::SkillDraft;
use crate::infra::http::ADMIN_ACTOR;
use crate::infra::http::AdminState;
use crate::infra::http::error::{ApiError, skill_to_api};
use crate::infra::http::models::SkillWriteRequest;

fn draft_from_request(payload: SkillWriteRequest) -> SkillDraft {
    SkillDraft {
        name: payload.name,
        category: payload.category,
        level: payload.level,
        sort_order: payload.sort_order,
    }
}

pub async fn list_skills(State(state): State<AdminState>) -> Result<impl IntoResponse, ApiError> {
    let skills = state.skills.list().await.map_err(skill_to_api)?;
    Ok(Json(skills))
}

pub async fn create_skill(
    State(state): State<AdminState>,
    Json(payload): Json<SkillWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let skill = state
        .skills
        .create_skill(ADMIN_ACTOR, draft_from_request(payload))
        .await
        .map_err(skill_to_api)?;

    Ok((StatusCode::CREATED, Json(skill)))
}

pub async fn update_skill(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SkillWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let skill = state
        .skills
        .update_skill(ADMIN_ACTOR, id, draft_from_request(payload))
        .await
        .map_err(skill_to_api)?;

    Ok(Json(skill))
}

pub async fn delete_skill(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .skills
        .delete_skill(ADMIN_ACTOR, id)
        .await
        .map_err(skill_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
