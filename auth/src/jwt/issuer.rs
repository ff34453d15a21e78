use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::claims::Claims;
use super::codec::Hs256Codec;
use super::codec::TokenCodec;
use super::errors::SigningError;
use crate::secret::SecretProvider;

/// Tracing target for token issuance.
pub const TRACING_TARGET: &str = "auth::jwt::issuer";

/// Mints signed, time-bound access tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secrets: Arc<SecretProvider>,
    codec: Arc<dyn TokenCodec>,
}

impl TokenIssuer {
    /// Create an issuer signing with HS256.
    pub fn new(secrets: Arc<SecretProvider>) -> Self {
        Self::with_codec(secrets, Arc::new(Hs256Codec::new()))
    }

    pub fn with_codec(secrets: Arc<SecretProvider>, codec: Arc<dyn TokenCodec>) -> Self {
        Self { secrets, codec }
    }

    /// Issue a token for an account.
    ///
    /// A zero or negative `ttl` is accepted; the token is simply expired
    /// by the time anyone verifies it.
    ///
    /// # Arguments
    /// * `user_id` - Subject identifier
    /// * `email` - Subject email address
    /// * `ttl` - Lifetime from now
    ///
    /// # Errors
    /// * `Configuration` - The signing secret is missing or too weak
    /// * `LifetimeOutOfRange` - `now + ttl` is not a representable date
    /// * `Encoding` - Token encoding failed
    pub fn issue(&self, user_id: u64, email: &str, ttl: Duration) -> Result<String, SigningError> {
        self.issue_at(user_id, email, ttl, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        user_id: u64,
        email: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, SigningError> {
        let secret = self.secrets.get().inspect_err(|e| {
            tracing::error!(target: TRACING_TARGET, error = %e, "Signing secret unavailable");
        })?;

        let claims =
            Claims::issued_at(user_id, email, now, ttl).ok_or(SigningError::LifetimeOutOfRange)?;
        let token = self.codec.encode(&claims, &secret)?;

        tracing::debug!(
            target: TRACING_TARGET,
            user_id,
            expires_at = claims.exp,
            "Access token issued"
        );

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::ConfigurationError;

    fn provider() -> Arc<SecretProvider> {
        Arc::new(SecretProvider::new(Some(
            "test_secret_key_at_least_32_bytes!".to_string(),
        )))
    }

    #[test]
    fn test_issue_embeds_claims() {
        let issuer = TokenIssuer::new(provider());
        let before = Utc::now().timestamp();

        let token = issuer
            .issue(1, "a@b.com", Duration::hours(24))
            .expect("Failed to issue token");

        let claims = Hs256Codec::new().inspect(&token).unwrap();
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.email, "a@b.com");
        assert!(claims.iat >= before);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_issue_accepts_non_positive_ttl() {
        let issuer = TokenIssuer::new(provider());

        assert!(issuer.issue(1, "a@b.com", Duration::zero()).is_ok());
        assert!(issuer.issue(1, "a@b.com", Duration::seconds(-60)).is_ok());
    }

    #[test]
    fn test_issue_with_weak_secret() {
        let issuer = TokenIssuer::new(Arc::new(SecretProvider::new(Some("weak".to_string()))));

        let result = issuer.issue(1, "a@b.com", Duration::hours(1));
        assert_eq!(
            result,
            Err(SigningError::Configuration(ConfigurationError::WeakSecret {
                min: 32,
                actual: 4
            }))
        );
    }

    #[test]
    fn test_issue_lifetime_out_of_range() {
        let issuer = TokenIssuer::new(provider());

        let result = issuer.issue(1, "a@b.com", Duration::days(365 * 1_000_000));
        assert_eq!(result, Err(SigningError::LifetimeOutOfRange));
    }
}
