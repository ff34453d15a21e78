use thiserror::Error;

/// Error type for password hashing.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

/// Reason a plaintext password was rejected by a [`PasswordPolicy`].
///
/// The display text is safe to return to the caller verbatim.
///
/// [`PasswordPolicy`]: super::PasswordPolicy
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("password is too short")]
    TooShort { min: usize, actual: usize },

    #[error("password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("password must contain at least one number")]
    MissingDigit,

    #[error("password must contain at least one special character")]
    MissingSpecialCharacter,

    #[error("{0}")]
    Custom(String),
}
