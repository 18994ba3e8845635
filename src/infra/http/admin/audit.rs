use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

use crate::infra::http::AdminState;
use crate::infra::http::error::{ApiError, repo_to_api};
use crate::infra::http::models::AuditListQuery;

pub async fn list_audit_logs(
    State(state): State<AdminState>,
    Query(query): Query<AuditListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = state
        .audit
        .list_recent(query.limit.unwrap_or(50))
        .await
        .map_err(repo_to_api)?;
    Ok(Json(entries))
}
