use thiserror::Error;

/// Error type for token signing configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Signing secret is too weak: minimum {min} characters, got {actual}")]
    WeakSecret { min: usize, actual: usize },

    #[error("Failed to generate signing secret: {0}")]
    GenerationFailed(String),

    #[error("Token lifetime must be a positive number of hours within range, got {hours}")]
    InvalidTokenLifetime { hours: i64 },
}
