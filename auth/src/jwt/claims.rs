use chrono::DateTime;
use chrono::Duration;
use chrono::TimeZone;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Identity claims carried by an access token.
///
/// Timestamps are Unix seconds. Field names match what clients of the
/// inventory API already read out of the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub user_id: u64,

    /// Subject email address
    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: u64, email: impl ToString, iat: i64, exp: i64) -> Self {
        Self {
            user_id,
            email: email.to_string(),
            iat,
            exp,
        }
    }

    /// Create claims issued at `now` that expire after `ttl`.
    ///
    /// # Returns
    /// `None` if `now + ttl` is outside the representable date range
    pub fn issued_at(
        user_id: u64,
        email: impl ToString,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Option<Self> {
        let expiration = now.checked_add_signed(ttl)?;

        Some(Self::new(
            user_id,
            email,
            now.timestamp(),
            expiration.timestamp(),
        ))
    }

    /// Check if the token is expired.
    ///
    /// A token whose expiry equals the current second is already expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }

    pub fn issued_at_time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}
