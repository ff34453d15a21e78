use std::sync::Arc;

use chrono::Duration;

use crate::config::TokenConfig;
use crate::email::validate_email;
use crate::gate::AuthGate;
use crate::gate::TokenLocations;
use crate::jwt::AuthError;
use crate::jwt::Claims;
use crate::jwt::SigningError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenVerifier;
use crate::password::Argon2Hasher;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::PasswordPolicy;
use crate::password::PasswordPolicyConfig;
use crate::password::PolicyViolation;
use crate::secret::ConfigurationError;
use crate::secret::SecretProvider;

/// Authentication coordinator for signup and login flows.
///
/// Combines the password policy, the password hasher and token
/// issuance/verification over one shared signing secret.
pub struct Authenticator {
    policy: PasswordPolicy,
    password_hasher: Box<dyn PasswordHasher>,
    secrets: Arc<SecretProvider>,
    issuer: TokenIssuer,
    verifier: TokenVerifier,
    token_ttl: Duration,
    locations: TokenLocations,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// Signed access token
    pub access_token: String,

    /// Lifetime the token was issued with
    pub expires_in: Duration,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PolicyViolation),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Signing error: {0}")]
    SigningError(#[from] SigningError),
}

impl Authenticator {
    pub const DEFAULT_TOKEN_TTL_HOURS: i64 = TokenConfig::DEFAULT_EXPIRATION_HOURS;

    /// Create a new authenticator with the default policy, Argon2id hashing
    /// and a 24 hour token lifetime.
    ///
    /// # Arguments
    /// * `secrets` - Provider of the signing secret
    pub fn new(secrets: Arc<SecretProvider>) -> Self {
        Self {
            policy: PasswordPolicy::default(),
            password_hasher: Box::new(Argon2Hasher::new()),
            issuer: TokenIssuer::new(Arc::clone(&secrets)),
            verifier: TokenVerifier::new(Arc::clone(&secrets)),
            secrets,
            token_ttl: Duration::hours(Self::DEFAULT_TOKEN_TTL_HOURS),
            locations: TokenLocations::default(),
        }
    }

    /// Create an authenticator from configuration.
    ///
    /// # Errors
    /// * `InvalidTokenLifetime` - `expiration_hours` is not a usable lifetime
    pub fn from_config(
        token: &TokenConfig,
        password: &PasswordPolicyConfig,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::new(Arc::new(SecretProvider::new(token.secret.clone())))
            .with_policy(PasswordPolicy::from_config(password))
            .with_token_ttl(token.ttl()?)
            .with_locations(token.locations()))
    }

    pub fn with_policy(mut self, policy: PasswordPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hasher(mut self, hasher: impl PasswordHasher + 'static) -> Self {
        self.password_hasher = Box::new(hasher);
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_locations(mut self, locations: TokenLocations) -> Self {
        self.locations = locations;
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn secrets(&self) -> &Arc<SecretProvider> {
        &self.secrets
    }

    /// Gate guarding protected endpoints with this authenticator's secret.
    pub fn gate(&self) -> AuthGate {
        AuthGate::with_locations(self.verifier.clone(), self.locations.clone())
    }

    /// Check a plaintext password against the policy.
    pub fn validate_password(&self, password: &str) -> Result<(), PolicyViolation> {
        self.policy.validate(password)
    }

    /// Hash a password for storage, without policy checks.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Compare a plaintext password with a stored hash.
    pub fn compare_password(&self, stored_hash: &str, password: &str) -> bool {
        self.password_hasher.compare(stored_hash, password)
    }

    /// Validate signup credentials and hash the password for storage.
    ///
    /// # Arguments
    /// * `email` - Account email address
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Password hash to be persisted by the caller
    ///
    /// # Errors
    /// * `InvalidEmail` - Email is not syntactically valid
    /// * `InvalidPassword` - Password violates the policy
    /// * `PasswordError` - Hashing operation failed
    pub fn register(&self, email: &str, password: &str) -> Result<String, AuthenticationError> {
        if !validate_email(email) {
            return Err(AuthenticationError::InvalidEmail);
        }

        self.policy.validate(password)?;

        Ok(self.password_hasher.hash(password)?)
    }

    /// Verify credentials and generate a token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Account identifier placed in the token
    /// * `email` - Account email placed in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `SigningError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: u64,
        email: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.compare(stored_hash, password) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.generate_token(user_id, email)?;

        Ok(AuthenticationResult {
            access_token,
            expires_in: self.token_ttl,
        })
    }

    /// Generate a token without password verification.
    ///
    /// # Errors
    /// * `SigningError` - Token generation failed
    pub fn generate_token(&self, user_id: u64, email: &str) -> Result<String, SigningError> {
        self.issuer.issue(user_id, email, self.token_ttl)
    }

    /// Validate and decode a token.
    ///
    /// # Errors
    /// * `AuthError` - Token missing, malformed, expired or badly signed
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.verifier.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::BcryptHasher;
    use crate::password::UppercaseAndDigit;

    fn authenticator() -> Authenticator {
        Authenticator::new(Arc::new(SecretProvider::new(Some(
            "test_secret_key_at_least_32_bytes!".to_string(),
        ))))
        .with_hasher(BcryptHasher::with_cost(4))
    }

    #[test]
    fn test_register_and_authenticate() {
        let authenticator = authenticator();

        let hash = authenticator
            .register("a@b.com", "my_password")
            .expect("Failed to register");

        let result = authenticator
            .authenticate("my_password", &hash, 1, "a@b.com")
            .expect("Authentication failed");
        assert!(!result.access_token.is_empty());
        assert_eq!(result.expires_in, Duration::hours(24));

        let claims = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(claims.user_id, 1);
        assert_eq!(claims.email, "a@b.com");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.authenticate("wrong_password", &hash, 1, "a@b.com");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_malformed_stored_hash() {
        let authenticator = authenticator();

        let result = authenticator.authenticate("my_password", "not-a-hash", 1, "a@b.com");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_register_invalid_email() {
        let result = authenticator().register("not-an-email", "my_password");
        assert!(matches!(result, Err(AuthenticationError::InvalidEmail)));
    }

    #[test]
    fn test_register_policy_violation() {
        let authenticator =
            authenticator().with_policy(PasswordPolicy::new(8).with_rule(UppercaseAndDigit));

        let result = authenticator.register("a@b.com", "abc");
        assert_eq!(
            result.unwrap_err().to_string(),
            "Invalid password: password is too short"
        );

        let result = authenticator.register("a@b.com", "longenough1");
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidPassword(
                PolicyViolation::MissingUppercase
            ))
        ));

        assert!(authenticator.register("a@b.com", "LongEnough1").is_ok());
    }

    #[test]
    fn test_weak_secret_fails_login() {
        let authenticator = Authenticator::new(Arc::new(SecretProvider::new(Some(
            "weak".to_string(),
        ))))
        .with_hasher(BcryptHasher::with_cost(4));
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.authenticate("my_password", &hash, 1, "a@b.com");
        assert!(matches!(
            result,
            Err(AuthenticationError::SigningError(
                SigningError::Configuration(_)
            ))
        ));
    }

    #[test]
    fn test_from_config() {
        let token = TokenConfig {
            expiration_hours: 2,
            cookie_name: "session".to_string(),
            ..TokenConfig::default()
        };
        let password = PasswordPolicyConfig {
            min_length: 12,
            ..PasswordPolicyConfig::default()
        };
        let authenticator = Authenticator::from_config(&token, &password).unwrap();

        assert_eq!(authenticator.token_ttl(), Duration::hours(2));
        assert!(authenticator.validate_password("elevenchars").is_err());

        let token = authenticator.generate_token(3, "c@d.com").unwrap();
        let claims = authenticator.validate_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 2 * 60 * 60);
        assert_eq!(authenticator.gate().locations().cookie, "session");
    }

    #[test]
    fn test_from_config_rejects_bad_lifetime() {
        let token = TokenConfig {
            expiration_hours: i64::MAX,
            ..TokenConfig::default()
        };

        let result = Authenticator::from_config(&token, &PasswordPolicyConfig::default());
        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidTokenLifetime { hours: i64::MAX })
        ));
    }

    #[test]
    fn test_gate_shares_secret() {
        let authenticator = Authenticator::new(Arc::new(SecretProvider::generated()));
        let token = authenticator.generate_token(1, "a@b.com").unwrap();

        let mut headers = http::HeaderMap::new();
        headers.insert(
            http::header::AUTHORIZATION,
            http::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );

        let claims = authenticator.gate().authorize(&headers).unwrap();
        assert_eq!(claims.user_id, 1);
    }
}
