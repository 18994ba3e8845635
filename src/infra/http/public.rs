//! Handlers for the public portfolio surface.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::contact::{ContactCommand, ContactError};
use crate::application::error::ErrorReport;
use crate::application::repos::PageRequest;

use super::PublicState;
use super::error::{ApiError, blog_to_api, site_to_api};
use super::models::{
    ContactRequest, ContactResponse, EducationView, ExperienceView, LocaleQuery, PostListQuery,
    PostListResponse, PostSummaryView, PostView, ProfileView, ProjectListQuery, ProjectView,
    SkillView,
};

pub async fn health(State(state): State<PublicState>) -> Response {
    if state.health.healthy().await {
        Json(serde_json::json!({ "status": "ok" })).into_response()
    } else {
        let mut response = (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "degraded" })),
        )
            .into_response();
        ErrorReport::from_message(
            "infra::http::public::health",
            StatusCode::SERVICE_UNAVAILABLE,
            "database ping failed",
        )
        .attach(&mut response);
        response
    }
}

pub async fn get_profile(
    State(state): State<PublicState>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let locale = query.resolve(state.default_locale);
    let profile = state.site.profile().await.map_err(site_to_api)?;
    Ok(Json(ProfileView::from_record(&profile, locale)))
}

pub async fn list_projects(
    State(state): State<PublicState>,
    Query(query): Query<ProjectListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let locale = crate::domain::types::Locale::parse_or(query.lang.as_deref(), state.default_locale);
    let projects = state
        .site
        .projects(query.featured)
        .await
        .map_err(site_to_api)?;

    let views: Vec<ProjectView> = projects
        .iter()
        .map(|project| ProjectView::from_record(project, locale))
        .collect();
    Ok(Json(views))
}

pub async fn get_project(
    State(state): State<PublicState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let locale = query.resolve(state.default_locale);
    let project = state
        .site
        .project_by_slug(&slug)
        .await
        .map_err(site_to_api)?;
    Ok(Json(ProjectView::from_record(&project, locale)))
}

pub async fn list_skills(
    State(state): State<PublicState>,
) -> Result<impl IntoResponse, ApiError> {
    let skills = state.site.skills().await.map_err(site_to_api)?;
    let views: Vec<SkillView> = skills.iter().map(SkillView::from_record).collect();
    Ok(Json(views))
}

pub async fn list_experience(
    State(state): State<PublicState>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let locale = query.resolve(state.default_locale);
    let entries = state.site.experience().await.map_err(site_to_api)?;
    let views: Vec<ExperienceView> = entries
        .iter()
        .map(|entry| ExperienceView::from_record(entry, locale))
        .collect();
    Ok(Json(views))
}

pub async fn list_education(
    State(state): State<PublicState>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let locale = query.resolve(state.default_locale);
    let entries = state.site.education().await.map_err(site_to_api)?;
    let views: Vec<EducationView> = entries
        .iter()
        .map(|entry| EducationView::from_record(entry, locale))
        .collect();
    Ok(Json(views))
}

pub async fn list_posts(
    State(state): State<PublicState>,
    Query(query): Query<PostListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let locale = crate::domain::types::Locale::parse_or(query.lang.as_deref(), state.default_locale);
    let page = PageRequest::new(query.limit.unwrap_or(20), query.offset.unwrap_or(0));

    let result = state.blog.list_published(page).await.map_err(blog_to_api)?;

    let posts: Vec<PostSummaryView> = result
        .posts
        .iter()
        .map(|post| PostSummaryView::from_record(post, locale))
        .collect();
    Ok(Json(PostListResponse {
        posts,
        total: result.total,
    }))
}

pub async fn get_post(
    State(state): State<PublicState>,
    Path(slug): Path<String>,
    Query(query): Query<LocaleQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let locale = query.resolve(state.default_locale);
    let post = state
        .blog
        .published_by_slug(&slug)
        .await
        .map_err(blog_to_api)?;

    let blocks = state.blog.blocks(&post, locale);
    Ok(Json(PostView::from_record(&post, locale, blocks)))
}

/// The contact endpoint keeps its historical `{success, message}` envelope
/// rather than the shared error body; the site frontend pattern-matches it.
pub async fn submit_contact(
    State(state): State<PublicState>,
    Json(request): Json<ContactRequest>,
) -> Response {
    let command = ContactCommand {
        name: request.name,
        email: request.email,
        phone: request.phone,
        message: request.message,
    };

    match state.contact.submit(command).await {
        Ok(_) => Json(ContactResponse {
            success: true,
            message: "Message received.".to_string(),
        })
        .into_response(),
        Err(ContactError::MissingField { field }) => {
            let mut response = (
                StatusCode::BAD_REQUEST,
                Json(ContactResponse {
                    success: false,
                    message: format!("Field `{field}` is required."),
                }),
            )
                .into_response();
            ErrorReport::from_message(
                "infra::http::public::submit_contact",
                StatusCode::BAD_REQUEST,
                format!("missing field `{field}`"),
            )
            .attach(&mut response);
            response
        }
        Err(ContactError::Repo(err)) => {
            let mut response = (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ContactResponse {
                    success: false,
                    message: "Message could not be stored. Please try again later.".to_string(),
                }),
            )
                .into_response();
            ErrorReport::from_error(
                "infra::http::public::submit_contact",
                StatusCode::INTERNAL_SERVER_ERROR,
                &err,
            )
            .attach(&mut response);
            response
        }
    }
}
