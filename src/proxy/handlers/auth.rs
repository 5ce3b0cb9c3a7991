// Account Handler: registration, login and token check
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{LoginRequest, RegisterRequest, UserProfile};
use crate::proxy::server::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub message: &'static str,
    pub user: UserProfile,
}

pub(crate) fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::InvalidRequest(rejection.body_text()))
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let request = parse_body(body)?;
    let user = state.users.create(request).await?;
    let token = state.session.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "User registered successfully",
            user: user.profile(),
            token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<SessionResponse>> {
    let request = parse_body(body)?;
    request.validate()?;

    let user = state.users.authenticate(&request).await?;
    let token = state.session.issue(&user)?;
    tracing::info!("User {} logged in", user.id);

    Ok(Json(SessionResponse {
        message: "Login successful",
        user: user.profile(),
        token,
    }))
}

/// GET /api/auth/verify-token
pub async fn handle_verify_token(Extension(user): Extension<UserProfile>) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        message: "Token is valid",
        user,
    })
}
