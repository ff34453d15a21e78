use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Session;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Create new user with validated credentials.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, email, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `InvalidPassword` - Password violates the password policy
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Verify a password and mint an access token.
    ///
    /// Unknown emails and wrong passwords are indistinguishable.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such account or wrong password
    /// * `Token` - Token could not be signed
    async fn login(&self, email: &EmailAddress, password: &str) -> Result<Session, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// Retrieve user by unique email address.
    ///
    /// # Errors
    /// * `NotFoundByEmail` - No user with this email
    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError>;

    /// Change name, email or password of an existing user.
    ///
    /// A new password goes through the same policy and hashing as signup.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `InvalidPassword` - New password violates the password policy
    /// * `EmailAlreadyExists` - New email belongs to another user
    /// * `Password` - Hashing failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;
}

/// Port for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Store a new user and assign its identifier.
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Replace a stored user.
    ///
    /// # Errors
    /// * `NotFound` - No user with this identifier
    /// * `EmailAlreadyExists` - Email is registered to another user
    async fn update(&self, user: User) -> Result<User, UserError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
}
