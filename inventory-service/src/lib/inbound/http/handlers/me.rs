use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserName;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::UserNameError;

/// Account data for the subject of the request's token.
pub async fn me(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .get_user(&current.user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// Change the name, email or password of the token's subject.
pub async fn update_me(
    State(state): State<AppState>,
    Extension(current): Extension<AuthenticatedUser>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_service
        .update_user(&current.user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// HTTP request body for account changes; absent or empty fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseUpdateUserRequestError {
    #[error("Invalid name: {0}")]
    Name(#[from] UserNameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),
}

impl UpdateUserRequest {
    fn try_into_command(self) -> Result<UpdateUserCommand, ParseUpdateUserRequestError> {
        Ok(UpdateUserCommand {
            name: non_empty(self.name).map(UserName::new).transpose()?,
            email: non_empty(self.email).map(EmailAddress::new).transpose()?,
            password: non_empty(self.password),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

impl From<ParseUpdateUserRequestError> for ApiError {
    fn from(err: ParseUpdateUserRequestError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_kept() {
        let request: UpdateUserRequest =
            serde_json::from_str(r#"{ "name": "", "password": "NewPassword456" }"#).unwrap();

        let command = request.try_into_command().unwrap();
        assert!(command.name.is_none());
        assert!(command.email.is_none());
        assert_eq!(command.password.as_deref(), Some("NewPassword456"));
    }

    #[test]
    fn test_invalid_email_rejected() {
        let request = UpdateUserRequest {
            email: Some("not-an-email".to_string()),
            ..UpdateUserRequest::default()
        };

        assert!(matches!(
            request.try_into_command(),
            Err(ParseUpdateUserRequestError::Email(_))
        ));
    }
}
