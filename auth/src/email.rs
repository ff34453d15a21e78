use std::str::FromStr;

use email_address::EmailAddress;

/// Syntactic email address check.
///
/// Run before any password work on signup and login.
pub fn validate_email(email: &str) -> bool {
    EmailAddress::from_str(email).is_ok()
}
