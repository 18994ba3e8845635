//! HTTP composition: router assembly and the two listeners.

pub mod admin;
pub mod error;
pub mod middleware;
pub mod models;
pub mod public;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::sync::watch;
use tokio::try_join;
use tracing::{info, warn};

use crate::application::admin::audit::AdminAuditService;
use crate::application::admin::education::AdminEducationService;
use crate::application::admin::experience::AdminExperienceService;
use crate::application::admin::messages::AdminMessageService;
use crate::application::admin::posts::AdminPostService;
use crate::application::admin::profile::AdminProfileService;
use crate::application::admin::projects::AdminProjectService;
use crate::application::admin::skills::AdminSkillService;
use crate::application::blog::BlogService;
use crate::application::contact::ContactService;
use crate::application::error::AppError;
use crate::application::site::SiteService;
use crate::application::uploads::ImageUploadService;
use crate::config::Settings;
use crate::domain::types::Locale;
use crate::infra::db::PostgresRepositories;
use crate::infra::error::InfraError;

/// Actor label recorded for every admin mutation.
pub const ADMIN_ACTOR: &str = "admin";

/// Liveness probe behind the public `/healthz` endpoint.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn healthy(&self) -> bool;
}

#[async_trait]
impl HealthProbe for PostgresRepositories {
    async fn healthy(&self) -> bool {
        self.health_check().await.is_ok()
    }
}

#[derive(Clone)]
pub struct PublicState {
    pub site: Arc<SiteService>,
    pub blog: Arc<BlogService>,
    pub contact: Arc<ContactService>,
    pub health: Arc<dyn HealthProbe>,
    pub default_locale: Locale,
}

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<AdminPostService>,
    pub projects: Arc<AdminProjectService>,
    pub skills: Arc<AdminSkillService>,
    pub experience: Arc<AdminExperienceService>,
    pub education: Arc<AdminEducationService>,
    pub messages: Arc<AdminMessageService>,
    pub profile: Arc<AdminProfileService>,
    pub audit: Arc<AdminAuditService>,
    pub uploads: Arc<ImageUploadService>,
    pub token: Arc<str>,
}

pub fn build_public_router(state: PublicState) -> Router {
    Router::new()
        .route("/healthz", get(public::health))
        .route("/api/v1/profile", get(public::get_profile))
        .route("/api/v1/projects", get(public::list_projects))
        .route("/api/v1/projects/{slug}", get(public::get_project))
        .route("/api/v1/skills", get(public::list_skills))
        .route("/api/v1/experience", get(public::list_experience))
        .route("/api/v1/education", get(public::list_education))
        .route("/api/v1/posts", get(public::list_posts))
        .route("/api/v1/posts/{slug}", get(public::get_post))
        .route("/api/v1/contact", post(public::submit_contact))
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}

pub fn build_admin_router(state: AdminState, upload_body_limit: usize) -> Router {
    let auth_state = state.clone();

    Router::new()
        .route(
            "/admin/api/v1/posts",
            get(admin::posts::list_posts).post(admin::posts::create_post),
        )
        .route(
            "/admin/api/v1/posts/{id}",
            get(admin::posts::get_post)
                .put(admin::posts::update_post)
                .delete(admin::posts::delete_post),
        )
        .route(
            "/admin/api/v1/posts/{id}/publish",
            post(admin::posts::publish_post),
        )
        .route(
            "/admin/api/v1/posts/{id}/unpublish",
            post(admin::posts::unpublish_post),
        )
        .route(
            "/admin/api/v1/projects",
            get(admin::projects::list_projects).post(admin::projects::create_project),
        )
        .route(
            "/admin/api/v1/projects/{id}",
            get(admin::projects::get_project)
                .put(admin::projects::update_project)
                .delete(admin::projects::delete_project),
        )
        .route(
            "/admin/api/v1/skills",
            get(admin::skills::list_skills).post(admin::skills::create_skill),
        )
        .route(
            "/admin/api/v1/skills/{id}",
            put(admin::skills::update_skill).delete(admin::skills::delete_skill),
        )
        .route(
            "/admin/api/v1/experience",
            get(admin::experience::list_entries).post(admin::experience::create_entry),
        )
        .route(
            "/admin/api/v1/experience/{id}",
            put(admin::experience::update_entry).delete(admin::experience::delete_entry),
        )
        .route(
            "/admin/api/v1/education",
            get(admin::education::list_entries).post(admin::education::create_entry),
        )
        .route(
            "/admin/api/v1/education/{id}",
            put(admin::education::update_entry).delete(admin::education::delete_entry),
        )
        .route(
            "/admin/api/v1/profile",
            get(admin::profile::get_profile).put(admin::profile::upsert_profile),
        )
        .route("/admin/api/v1/messages", get(admin::messages::list_messages))
        .route(
            "/admin/api/v1/messages/status",
            get(admin::messages::message_status),
        )
        .route(
            "/admin/api/v1/messages/{id}/read",
            post(admin::messages::mark_read),
        )
        .route(
            "/admin/api/v1/messages/{id}",
            get(admin::messages::get_message).delete(admin::messages::delete_message),
        )
        .route(
            "/admin/api/v1/uploads",
            post(admin::uploads::upload_image).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/admin/api/v1/audit", get(admin::audit::list_audit_logs))
        .with_state(state)
        .layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::admin_auth,
        ))
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}

/// Serve both listeners until ctrl-c, then drain within the configured grace
/// period.
pub async fn serve(
    settings: &Settings,
    public_router: Router,
    admin_router: Router,
) -> Result<(), AppError> {
    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "diwan::http",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "listening"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    let mut public_signal = shutdown_rx.clone();
    let mut admin_signal = shutdown_rx.clone();
    let public_server = axum::serve(public_listener, public_router.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = public_signal.changed().await;
        });
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = admin_signal.changed().await;
        });

    let grace = settings.server.graceful_shutdown;
    let mut deadline_signal = shutdown_rx;
    let deadline = async move {
        let _ = deadline_signal.changed().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = async { try_join!(public_server, admin_server) } => {
            result.map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = deadline => {
            warn!(
                target = "diwan::http",
                grace_secs = grace.as_secs(),
                "graceful shutdown deadline exceeded; aborting open connections"
            );
        }
    }

    Ok(())
}
