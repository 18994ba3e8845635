use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::repos::PageRequest;
use crate::infra::http::ADMIN_ACTOR;
use crate::infra::http::AdminState;
use crate::infra::http::error::{ApiError, message_to_api};
use crate::infra::http::models::MessageListQuery;

pub async fn list_messages(
    State(state): State<AdminState>,
    Query(query): Query<MessageListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.limit.unwrap_or(20), query.offset.unwrap_or(0));
    let messages = state
        .messages
        .list(query.unread, page)
        .await
        .map_err(message_to_api)?;
    Ok(Json(messages))
}

pub async fn message_status(
    State(state): State<AdminState>,
) -> Result<impl IntoResponse, ApiError> {
    let counts = state
        .messages
        .status_counts()
        .await
        .map_err(message_to_api)?;
    Ok(Json(counts))
}

pub async fn get_message(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state.messages.find_by_id(id).await.map_err(message_to_api)?;

    match message {
        Some(message) => Ok(Json(message)),
        None => Err(ApiError::not_found("message not found")),
    }
}

pub async fn mark_read(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let message = state
        .messages
        .mark_read(ADMIN_ACTOR, id)
        .await
        .map_err(message_to_api)?;
    Ok(Json(message))
}

pub async fn delete_message(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .messages
        .delete_message(ADMIN_ACTOR, id)
        .await
        .map_err(message_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
