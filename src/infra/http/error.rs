use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::admin::education::AdminEducationError;
use crate::application::admin::experience::AdminExperienceError;
use crate::application::admin::messages::AdminMessageError;
use crate::application::admin::posts::AdminPostError;
use crate::application::admin::profile::AdminProfileError;
use crate::application::admin::projects::AdminProjectError;
use crate::application::admin::skills::AdminSkillError;
use crate::application::blog::BlogError;
use crate::application::error::ErrorReport;
use crate::application::repos::RepoError;
use crate::application::site::SiteError;
use crate::application::uploads::UploadError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "not_found";
    pub const DUPLICATE: &str = "duplicate";
    pub const INVALID_INPUT: &str = "invalid_input";
    pub const INTEGRITY: &str = "integrity_error";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const REPO: &str = "repo_error";
    pub const INVALID_FILE_TYPE: &str = "invalid_file_type";
    pub const FILE_TOO_LARGE: &str = "file_too_large";
    pub const UPLOAD_FAILED: &str = "upload_failed";
    pub const PROFILE_MISSING: &str = "profile_missing";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
        }
    }

    pub fn bad_request(message: &'static str, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "Admin token required",
            None,
        )
    }

    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let hint = self.hint.clone();
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        // Attach a structured report so shared logging middleware can emit rich diagnostics.
        ErrorReport::from_message(
            "infra::http",
            self.status,
            format!("{}: {}", self.code, hint.as_deref().unwrap_or(self.message)),
        )
        .attach(&mut response);
        response
    }
}

pub fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate resource",
            Some(format!("constraint `{constraint}`")),
        ),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_INPUT,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity violation",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::REPO,
            "Persistence failure",
            Some(message),
        ),
    }
}

pub fn site_to_api(err: SiteError) -> ApiError {
    match err {
        SiteError::ProfileMissing => ApiError::new(
            StatusCode::NOT_FOUND,
            codes::PROFILE_MISSING,
            "Profile has not been configured",
            None,
        ),
        SiteError::ProjectNotFound => ApiError::not_found("project not found"),
        SiteError::Repo(err) => repo_to_api(err),
    }
}

pub fn blog_to_api(err: BlogError) -> ApiError {
    match err {
        BlogError::PostNotFound => ApiError::not_found("post not found"),
        BlogError::Repo(err) => repo_to_api(err),
    }
}

pub fn post_to_api(err: AdminPostError) -> ApiError {
    match err {
        AdminPostError::ConstraintViolation(field) => {
            ApiError::bad_request("Invalid post", Some(format!("field `{field}`")))
        }
        AdminPostError::NotFound => ApiError::not_found("post not found"),
        AdminPostError::Repo(err) => repo_to_api(err),
    }
}

pub fn project_to_api(err: AdminProjectError) -> ApiError {
    match err {
        AdminProjectError::ConstraintViolation(field) => {
            ApiError::bad_request("Invalid project", Some(format!("field `{field}`")))
        }
        AdminProjectError::NotFound => ApiError::not_found("project not found"),
        AdminProjectError::Repo(err) => repo_to_api(err),
    }
}

pub fn skill_to_api(err: AdminSkillError) -> ApiError {
    match err {
        AdminSkillError::ConstraintViolation(field) => {
            ApiError::bad_request("Invalid skill", Some(format!("field `{field}`")))
        }
        AdminSkillError::LevelOutOfRange => {
            ApiError::bad_request("Invalid skill", Some("level must lie within 0..=100".into()))
        }
        AdminSkillError::NotFound => ApiError::not_found("skill not found"),
        AdminSkillError::Repo(err) => repo_to_api(err),
    }
}

pub fn experience_to_api(err: AdminExperienceError) -> ApiError {
    match err {
        AdminExperienceError::ConstraintViolation(field) => {
            ApiError::bad_request("Invalid entry", Some(format!("field `{field}`")))
        }
        AdminExperienceError::EndsBeforeStart => {
            ApiError::bad_request("Invalid entry", Some("entry ends before it starts".into()))
        }
        AdminExperienceError::NotFound => ApiError::not_found("experience entry not found"),
        AdminExperienceError::Repo(err) => repo_to_api(err),
    }
}

pub fn education_to_api(err: AdminEducationError) -> ApiError {
    match err {
        AdminEducationError::ConstraintViolation(field) => {
            ApiError::bad_request("Invalid entry", Some(format!("field `{field}`")))
        }
        AdminEducationError::EndsBeforeStart => {
            ApiError::bad_request("Invalid entry", Some("entry ends before it starts".into()))
        }
        AdminEducationError::NotFound => ApiError::not_found("education entry not found"),
        AdminEducationError::Repo(err) => repo_to_api(err),
    }
}

pub fn message_to_api(err: AdminMessageError) -> ApiError {
    match err {
        AdminMessageError::NotFound => ApiError::not_found("message not found"),
        AdminMessageError::Repo(err) => repo_to_api(err),
    }
}

pub fn profile_to_api(err: AdminProfileError) -> ApiError {
    match err {
        AdminProfileError::ConstraintViolation(field) => {
            ApiError::bad_request("Invalid profile", Some(format!("field `{field}`")))
        }
        AdminProfileError::Repo(err) => repo_to_api(err),
    }
}

pub fn upload_to_api(err: UploadError) -> ApiError {
    match err {
        UploadError::InvalidFileType { content_type } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_FILE_TYPE,
            "Only image files are accepted",
            Some(format!("got `{content_type}`")),
        ),
        UploadError::FileTooLarge { size_bytes } => ApiError::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            codes::FILE_TOO_LARGE,
            "Image exceeds the 10 MiB limit",
            Some(format!("{size_bytes} bytes")),
        ),
        UploadError::AllHostsFailed { failures } => {
            let hint = failures
                .iter()
                .map(|(kind, err)| format!("{}: {err}", kind.as_str()))
                .collect::<Vec<_>>()
                .join("; ");
            ApiError::new(
                StatusCode::BAD_GATEWAY,
                codes::UPLOAD_FAILED,
                "Every image host declined the upload",
                (!hint.is_empty()).then_some(hint),
            )
        }
    }
}
