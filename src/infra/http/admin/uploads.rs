use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::uploads::ImagePayload;
use crate::infra::http::AdminState;
use crate::infra::http::error::{ApiError, upload_to_api};

/// Accept a multipart upload and push it through the host fallback chain.
///
/// The first field carrying a filename (or named `image`) is taken as the
/// payload; remaining fields are ignored.
pub async fn upload_image(
    State(state): State<AdminState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request("Malformed multipart body", Some(err.to_string())))?
    {
        let is_payload = field.file_name().is_some() || field.name() == Some("image");
        if !is_payload {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "upload".to_string());
        let content_type = field.content_type().map(str::to_string).unwrap_or_else(|| {
            mime_guess::from_path(&filename)
                .first_or_octet_stream()
                .to_string()
        });
        let bytes = field.bytes().await.map_err(|err| {
            ApiError::bad_request("Failed to read upload body", Some(err.to_string()))
        })?;

        let payload = ImagePayload {
            bytes,
            filename,
            content_type,
        };

        let uploaded = state.uploads.upload(payload).await.map_err(upload_to_api)?;
        return Ok((StatusCode::CREATED, Json(uploaded)));
    }

    Err(ApiError::bad_request(
        "Multipart body contained no file field",
        None,
    ))
}
