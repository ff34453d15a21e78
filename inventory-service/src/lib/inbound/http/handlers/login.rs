use axum::extract::State;
use axum::http::header;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

const TOKEN_FAILURE: &str = "Error generating token";

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let email = EmailAddress::new(body.email)
        .map_err(|_| ApiError::BadRequest("Invalid email format".to_string()))?;

    let session = state
        .user_service
        .login(&email, &body.password)
        .await
        .map_err(|e| match e {
            UserError::Token(_) => ApiError::InternalServerError(TOKEN_FAILURE.to_string()),
            other => ApiError::from(other),
        })?;

    let cookie = session_cookie(
        &state.gate.locations().cookie,
        &session.access_token,
        session.expires_in.num_seconds(),
    )?;

    let body = ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            message: "Login successful".to_string(),
            token: session.access_token,
        },
    );

    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

/// HttpOnly cookie carrying the token for the token's lifetime.
fn session_cookie(name: &str, token: &str, max_age: i64) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; Path=/; SameSite=Strict; Max-Age={}",
        name, token, max_age
    ))
    .map_err(|e| {
        tracing::error!(error = %e, "Invalid cookie value");
        ApiError::InternalServerError(TOKEN_FAILURE.to_string())
    })
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub message: String,
    pub token: String,
}
