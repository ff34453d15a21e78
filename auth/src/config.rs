use chrono::Duration;
use serde::Deserialize;

use crate::gate::TokenLocations;
use crate::secret::ConfigurationError;

/// Access token configuration.
///
/// Usually deserialized from the `jwt` section of a service config.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TokenConfig {
    /// Signing secret; generated on first use when unset or empty
    #[serde(default)]
    pub secret: Option<String>,

    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,

    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    #[serde(default = "default_header_name")]
    pub header_name: String,
}

fn default_expiration_hours() -> i64 {
    TokenConfig::DEFAULT_EXPIRATION_HOURS
}

fn default_cookie_name() -> String {
    TokenLocations::DEFAULT_COOKIE.to_string()
}

fn default_header_name() -> String {
    TokenLocations::DEFAULT_HEADER.to_string()
}

impl TokenConfig {
    pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

    /// Token lifetime.
    ///
    /// # Errors
    /// * `InvalidTokenLifetime` - Hours are not positive or overflow a duration
    pub fn ttl(&self) -> Result<Duration, ConfigurationError> {
        Duration::try_hours(self.expiration_hours)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or(ConfigurationError::InvalidTokenLifetime {
                hours: self.expiration_hours,
            })
    }

    pub fn locations(&self) -> TokenLocations {
        TokenLocations {
            cookie: self.cookie_name.clone(),
            header: self.header_name.clone(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: None,
            expiration_hours: Self::DEFAULT_EXPIRATION_HOURS,
            cookie_name: default_cookie_name(),
            header_name: default_header_name(),
        }
    }
}
