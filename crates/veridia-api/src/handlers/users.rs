//! Account endpoints: register, password login, lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use validator::Validate;
use veridia_core::models::User;

use crate::error::{ApiResponse, HttpAppError, ValidatedJson};
use crate::services::users::LoginResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, max = 128, message = "password must be 6 to 128 characters"))]
    pub password: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/user/register",
    tag = "user",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = ApiResponse<User>),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), HttpAppError> {
    let user = state
        .user_service
        .register(
            &req.email,
            &req.password,
            req.full_name.as_deref(),
            req.phone_number.as_deref(),
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            user,
            "User registered successfully",
        )),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/user/login",
    tag = "user",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, HttpAppError> {
    let response = state.user_service.login(&req.email, &req.password).await?;
    Ok(Json(ApiResponse::success_with_message(
        response,
        "Login successful",
    )))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GetByEmailRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
}

#[utoipa::path(
    post,
    path = "/api/v1/user/get-by-email",
    tag = "user",
    request_body = GetByEmailRequest,
    responses(
        (status = 200, description = "User found", body = ApiResponse<User>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_by_email(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<GetByEmailRequest>,
) -> Result<Json<ApiResponse<User>>, HttpAppError> {
    let user = state.user_service.get_by_email(&req.email).await?;
    Ok(Json(ApiResponse::success_with_message(
        user,
        "User retrieved successfully",
    )))
}
