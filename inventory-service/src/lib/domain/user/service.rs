use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;
use tokio::task::spawn_blocking;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Session;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
/// Password hashing and comparison run on the blocking pool.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password policy, hashing and token issuance
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Run CPU-heavy credential work off the async workers.
    async fn blocking<T, F>(&self, work: F) -> Result<T, UserError>
    where
        F: FnOnce(&Authenticator) -> T + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        spawn_blocking(move || work(&authenticator))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Credential task failed");
                UserError::Password(e.to_string())
            })
    }

    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        self.blocking(move |authenticator| authenticator.hash_password(&password))
            .await?
            .map_err(|e| {
                tracing::error!(error = %e, "Password hashing failed");
                UserError::Password(e.to_string())
            })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        self.authenticator.validate_password(&command.password)?;

        // Reject duplicates before paying for the hash.
        if self.repository.find_by_email(&command.email).await?.is_some() {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;

        let created_user = self
            .repository
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(user_id = %created_user.id, "User created");

        Ok(created_user)
    }

    async fn login(&self, email: &EmailAddress, password: &str) -> Result<Session, UserError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let user_id = user.id.value();
        let subject_email = user.email.to_string();

        let result = self
            .blocking(move |authenticator| {
                authenticator.authenticate(&password, &stored_hash, user_id, &subject_email)
            })
            .await?
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::info!(user_id, "Login rejected");
                    UserError::InvalidCredentials
                }
                other => {
                    tracing::error!(user_id, error = %other, "Token generation failed");
                    UserError::Token(other.to_string())
                }
            })?;

        tracing::info!(user_id, "Login succeeded");

        Ok(Session {
            user,
            access_token: result.access_token,
            expires_in: result.expires_in,
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        self.repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFoundByEmail(email.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        if let Some(password) = &command.password {
            self.authenticator.validate_password(password)?;
        }

        let mut user = self.get_user(id).await?;

        if let Some(email) = command.email {
            if email != user.email {
                if self.repository.find_by_email(&email).await?.is_some() {
                    return Err(UserError::EmailAlreadyExists(email.to_string()));
                }
                user.email = email;
            }
        }

        if let Some(name) = command.name {
            user.name = name;
        }

        if let Some(password) = command.password {
            user.password_hash = self.hash_password(password).await?;
        }

        let updated_user = self.repository.update(user).await?;

        tracing::info!(user_id = %updated_user.id, "User updated");

        Ok(updated_user)
    }
}
