use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use super::claims::Claims;
use super::codec::Hs256Codec;
use super::codec::TokenCodec;
use super::errors::AuthError;
use crate::secret::SecretProvider;

/// Tracing target for token verification.
pub const TRACING_TARGET: &str = "auth::jwt::verifier";

/// Checks signature and expiry of access tokens against the current secret.
#[derive(Clone)]
pub struct TokenVerifier {
    secrets: Arc<SecretProvider>,
    codec: Arc<dyn TokenCodec>,
}

impl TokenVerifier {
    /// Create a verifier for HS256 tokens.
    pub fn new(secrets: Arc<SecretProvider>) -> Self {
        Self::with_codec(secrets, Arc::new(Hs256Codec::new()))
    }

    pub fn with_codec(secrets: Arc<SecretProvider>, codec: Arc<dyn TokenCodec>) -> Self {
        Self { secrets, codec }
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    /// * `Missing` - Empty token
    /// * `Malformed` - Token does not parse
    /// * `BadSignature` - Signature does not match the current secret
    /// * `Expired` - Signature is valid but `exp <= now`
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Missing);
        }

        // Nothing can be verified without a usable secret.
        let secret = self.secrets.get().map_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Signing secret unavailable");
            AuthError::BadSignature
        })?;

        let claims = self.codec.decode(token, &secret)?;

        if claims.is_expired(now.timestamp()) {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}
