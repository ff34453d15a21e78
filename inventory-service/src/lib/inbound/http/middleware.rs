use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated subject in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Middleware that runs the auth gate and adds the subject to request extensions.
///
/// Every denial produces the same 401 body; the precise reason is only logged.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let claims = state.gate.authorize(req.headers()).map_err(|denied| {
        tracing::debug!(
            reason = %denied.kind(),
            uri = %req.uri(),
            "Unauthenticated request"
        );
        ApiError::Unauthorized("Unauthorized".to_string()).into_response()
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: UserId(claims.user_id),
        email: claims.email,
    });

    Ok(next.run(req).await)
}
