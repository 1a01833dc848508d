//! eKYC endpoints: enrollment photo upload and face login.
//!
//! Both endpoints take `multipart/form-data`. Enrollment requires a Bearer
//! token; face login identifies the user by the `email` form field.

use axum::extract::multipart::Field;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use veridia_core::AppError;

use crate::auth::AuthUser;
use crate::error::{ApiResponse, HttpAppError};
use crate::services::ekyc::PhotoFile;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: String,
}

async fn read_photo(field: Field<'_>) -> Result<PhotoFile, AppError> {
    let filename = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read uploaded file: {e}")))?;
    Ok(PhotoFile {
        data,
        filename,
        content_type,
    })
}

async fn read_text(field: Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read field '{name}': {e}")))
}

/// Enrollment upload: three repeated file fields (`left_faces`,
/// `right_faces`, `front_faces`) and an optional `fcm_token` text field.
#[utoipa::path(
    post,
    path = "/api/v1/ekyc/upload-photos",
    tag = "ekyc",
    request_body(content_type = "multipart/form-data"),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Photos uploaded", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Missing pose group"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    )
)]
pub async fn upload_photos(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<SessionResponse>>, HttpAppError> {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut front = Vec::new();
    let mut fcm_token: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "left_faces" => left.push(read_photo(field).await?),
            "right_faces" => right.push(read_photo(field).await?),
            "front_faces" => front.push(read_photo(field).await?),
            "fcm_token" => fcm_token = Some(read_text(field, "fcm_token").await?),
            _ => {
                tracing::debug!(field.name = %name, "Ignoring unknown multipart field");
            }
        }
    }

    for (group, label) in [(&left, "left"), (&right, "right"), (&front, "front")] {
        if group.is_empty() {
            return Err(AppError::Validation(format!(
                "At least one {label} face photo is required"
            ))
            .into());
        }
    }

    let session_id = state
        .enrollment
        .upload_photos(&auth.email, fcm_token.as_deref(), left, right, front)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        SessionResponse { session_id },
        "Photos uploaded successfully",
    )))
}

/// Face login: `email` text field, exactly three repeated `faces` file
/// fields, optional `fcm_token`.
#[utoipa::path(
    post,
    path = "/api/v1/ekyc/login",
    tag = "ekyc",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Login event published", body = ApiResponse<SessionResponse>),
        (status = 400, description = "Wrong photo count or missing email"),
        (status = 404, description = "User not found")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<SessionResponse>>, HttpAppError> {
    let mut email: Option<String> = None;
    let mut fcm_token: Option<String> = None;
    let mut photos = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "email" => email = Some(read_text(field, "email").await?),
            "fcm_token" => fcm_token = Some(read_text(field, "fcm_token").await?),
            "faces" => photos.push(read_photo(field).await?),
            _ => {
                tracing::debug!(field.name = %name, "Ignoring unknown multipart field");
            }
        }
    }

    let email = email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::Validation("email field is required".to_string()))?;

    let session_id = state
        .verification
        .login(&email, fcm_token.as_deref(), photos)
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        SessionResponse { session_id },
        "Login event published successfully",
    )))
}
