use thiserror::Error;

use crate::secret::ConfigurationError;

/// Error type for token issuance.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigningError {
    #[error("Signing secret unavailable: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Token lifetime out of range")]
    LifetimeOutOfRange,
}

/// Reason a token was refused.
///
/// Every variant is a denial. The variant is meant for diagnostics and
/// should not be echoed to the client.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq, Hash)]
pub enum AuthError {
    #[error("No token provided")]
    Missing,

    #[error("Token is malformed")]
    Malformed,

    #[error("Token is expired")]
    Expired,

    #[error("Token signature is invalid")]
    BadSignature,
}
