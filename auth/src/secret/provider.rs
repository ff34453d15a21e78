use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use once_cell::sync::OnceCell;
use rand::rngs::OsRng;
use rand::RngCore;

use super::errors::ConfigurationError;
use crate::password::PasswordPolicy;
use crate::password::PolicyViolation;

/// Tracing target for signing secret lifecycle events.
pub const TRACING_TARGET: &str = "auth::secret";

/// Where a [`SecretMaterial`] value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretOrigin {
    Supplied,
    Generated,
}

/// Symmetric key used to sign and verify tokens.
///
/// Cheap to clone. The key never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretMaterial {
    value: Arc<str>,
    origin: SecretOrigin,
}

impl SecretMaterial {
    fn new(value: impl Into<Arc<str>>, origin: SecretOrigin) -> Self {
        Self {
            value: value.into(),
            origin,
        }
    }

    /// Key bytes fed to the MAC.
    pub fn as_bytes(&self) -> &[u8] {
        self.value.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn origin(&self) -> SecretOrigin {
        self.origin
    }
}

impl fmt::Debug for SecretMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretMaterial")
            .field("value", &"<redacted>")
            .field("len", &self.value.len())
            .field("origin", &self.origin)
            .finish()
    }
}

/// Owner of the process-wide signing secret.
///
/// A supplied secret is used as-is once it passes the strength check. Without
/// one, a random secret is generated on first use; concurrent first callers
/// block on a single initialization and all observe the same value. Reads
/// after that take no lock.
#[derive(Debug)]
pub struct SecretProvider {
    supplied: Option<SecretMaterial>,
    generated: OnceCell<SecretMaterial>,
    strength: PasswordPolicy,
}

impl SecretProvider {
    /// Minimum secret length, in characters.
    pub const MIN_SECRET_LENGTH: usize = 32;

    /// Random bytes drawn for a generated secret.
    const GENERATED_SECRET_BYTES: usize = 32;

    /// Create a provider.
    ///
    /// # Arguments
    /// * `supplied` - Externally configured secret; `None` or an empty string
    ///   lets the provider generate one on first use
    pub fn new(supplied: Option<String>) -> Self {
        let supplied = supplied
            .filter(|secret| !secret.is_empty())
            .map(|secret| SecretMaterial::new(secret, SecretOrigin::Supplied));

        Self {
            supplied,
            generated: OnceCell::new(),
            strength: PasswordPolicy::new(Self::MIN_SECRET_LENGTH),
        }
    }

    /// Provider that always generates its own secret.
    pub fn generated() -> Self {
        Self::new(None)
    }

    /// Return the signing secret, generating it if none exists yet.
    ///
    /// # Errors
    /// * `WeakSecret` - The supplied secret is shorter than 32 characters
    /// * `GenerationFailed` - The OS random source failed
    pub fn get(&self) -> Result<SecretMaterial, ConfigurationError> {
        let secret = match &self.supplied {
            Some(supplied) => supplied,
            None => self.generated.get_or_try_init(Self::generate)?,
        };

        self.ensure_strong(secret)?;
        Ok(secret.clone())
    }

    fn ensure_strong(&self, secret: &SecretMaterial) -> Result<(), ConfigurationError> {
        self.strength.validate(&secret.value).map_err(|violation| {
            tracing::error!(
                target: TRACING_TARGET,
                origin = ?secret.origin,
                length = secret.len(),
                min_length = Self::MIN_SECRET_LENGTH,
                "Signing secret rejected"
            );

            match violation {
                PolicyViolation::TooShort { min, actual } => {
                    ConfigurationError::WeakSecret { min, actual }
                }
                _ => ConfigurationError::WeakSecret {
                    min: Self::MIN_SECRET_LENGTH,
                    actual: secret.len(),
                },
            }
        })
    }

    fn generate() -> Result<SecretMaterial, ConfigurationError> {
        let mut bytes = [0u8; Self::GENERATED_SECRET_BYTES];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| ConfigurationError::GenerationFailed(e.to_string()))?;

        let secret = SecretMaterial::new(URL_SAFE_NO_PAD.encode(bytes), SecretOrigin::Generated);

        tracing::info!(
            target: TRACING_TARGET,
            length = secret.len(),
            "No signing secret configured, generated a new one"
        );

        Ok(secret)
    }
}

impl Default for SecretProvider {
    fn default() -> Self {
        Self::generated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRONG_SECRET: &str = "test_secret_key_at_least_32_bytes!";

    #[test]
    fn test_supplied_secret_is_returned_unchanged() {
        let provider = SecretProvider::new(Some(STRONG_SECRET.to_string()));

        let secret = provider.get().expect("Failed to get secret");

        assert_eq!(secret.as_bytes(), STRONG_SECRET.as_bytes());
        assert_eq!(secret.origin(), SecretOrigin::Supplied);
    }

    #[test]
    fn test_weak_supplied_secret_is_rejected() {
        let provider = SecretProvider::new(Some("too_short".to_string()));

        assert_eq!(
            provider.get(),
            Err(ConfigurationError::WeakSecret { min: 32, actual: 9 })
        );
        // Never silently replaced by a generated one.
        assert!(provider.get().is_err());
    }

    #[test]
    fn test_secret_of_exactly_minimum_length_is_accepted() {
        let provider = SecretProvider::new(Some("a".repeat(32)));
        assert!(provider.get().is_ok());
    }

    #[test]
    fn test_missing_secret_is_generated_once() {
        let provider = SecretProvider::new(None);

        let first = provider.get().expect("Failed to generate secret");
        let second = provider.get().expect("Failed to get secret");

        assert_eq!(first, second);
        assert_eq!(first.origin(), SecretOrigin::Generated);
        // 32 random bytes, base64url without padding.
        assert_eq!(first.len(), 43);
        assert!(first
            .as_bytes()
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_'));
    }

    #[test]
    fn test_empty_supplied_secret_counts_as_missing() {
        let provider = SecretProvider::new(Some(String::new()));

        let secret = provider.get().expect("Failed to generate secret");
        assert_eq!(secret.origin(), SecretOrigin::Generated);
    }

    #[test]
    fn test_providers_generate_distinct_secrets() {
        let first = SecretProvider::generated().get().unwrap();
        let second = SecretProvider::generated().get().unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_debug_output_is_redacted() {
        let provider = SecretProvider::new(Some(STRONG_SECRET.to_string()));
        let secret = provider.get().unwrap();

        let debug = format!("{:?} {:?}", secret, provider);
        assert!(!debug.contains(STRONG_SECRET));
        assert!(debug.contains("<redacted>"));
    }
}
