use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::admin::posts::{CreatePostCommand, UpdatePostCommand};
use crate::application::repos::PageRequest;
use crate::domain::types::PostStatus;
use crate::infra::http::ADMIN_ACTOR;
use crate::infra::http::AdminState;
use crate::infra::http::error::{ApiError, post_to_api};
use crate::infra::http::models::PostWriteRequest;

#[derive(Debug, Deserialize, Default)]
pub struct PostListQuery {
    pub status: Option<PostStatus>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub async fn list_posts(
    State(state): State<AdminState>,
    Query(query): Query<PostListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = PageRequest::new(query.limit.unwrap_or(20), query.offset.unwrap_or(0));
    let posts = state
        .posts
        .list(query.status, page)
        .await
        .map_err(post_to_api)?;
    Ok(Json(posts))
}

pub async fn get_post(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.posts.find_by_id(id).await.map_err(post_to_api)?;

    match post {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::not_found("post not found")),
    }
}

pub async fn create_post(
    State(state): State<AdminState>,
    Json(payload): Json<PostWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = CreatePostCommand {
        title_en: payload.title_en,
        title_ar: payload.title_ar,
        excerpt_en: payload.excerpt_en,
        excerpt_ar: payload.excerpt_ar,
        body_en: payload.body_en,
        body_ar: payload.body_ar,
        cover_image_url: payload.cover_image_url,
    };

    let post = state
        .posts
        .create_post(ADMIN_ACTOR, command)
        .await
        .map_err(post_to_api)?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn update_post(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PostWriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = UpdatePostCommand {
        id,
        title_en: payload.title_en,
        title_ar: payload.title_ar,
        excerpt_en: payload.excerpt_en,
        excerpt_ar: payload.excerpt_ar,
        body_en: payload.body_en,
        body_ar: payload.body_ar,
        cover_image_url: payload.cover_image_url,
    };

    let post = state
        .posts
        .update_post(ADMIN_ACTOR, command)
        .await
        .map_err(post_to_api)?;

    Ok(Json(post))
}

pub async fn publish_post(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .publish_post(ADMIN_ACTOR, id)
        .await
        .map_err(post_to_api)?;
    Ok(Json(post))
}

pub async fn unpublish_post(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state
        .posts
        .unpublish_post(ADMIN_ACTOR, id)
        .await
        .map_err(post_to_api)?;
    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AdminState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .posts
        .delete_post(ADMIN_ACTOR, id)
        .await
        .map_err(post_to_api)?;
    Ok(StatusCode::NO_CONTENT)
}
