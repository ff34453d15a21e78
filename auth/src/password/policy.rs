use serde::Deserialize;

use super::errors::PolicyViolation;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &str = "0123456789";
const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+[]{}|;:,.<>?";

/// A single password strength rule.
///
/// Rules are composed by [`PasswordPolicy`]; new rules are added by
/// implementing this trait, without touching the policy itself.
pub trait PasswordRule: Send + Sync {
    fn validate(&self, password: &str) -> Result<(), PolicyViolation>;
}

/// Requires at least one ASCII uppercase letter and one ASCII digit.
#[derive(Debug, Clone, Copy, Default)]
pub struct UppercaseAndDigit;

impl PasswordRule for UppercaseAndDigit {
    fn validate(&self, password: &str) -> Result<(), PolicyViolation> {
        if !password.contains(|c: char| UPPERCASE.contains(c)) {
            return Err(PolicyViolation::MissingUppercase);
        }
        if !password.contains(|c: char| DIGITS.contains(c)) {
            return Err(PolicyViolation::MissingDigit);
        }
        Ok(())
    }
}

/// Requires at least one character from `!@#$%^&*()_+[]{}|;:,.<>?`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialCharacter;

impl PasswordRule for SpecialCharacter {
    fn validate(&self, password: &str) -> Result<(), PolicyViolation> {
        if password.contains(|c: char| SPECIAL_CHARACTERS.contains(c)) {
            Ok(())
        } else {
            Err(PolicyViolation::MissingSpecialCharacter)
        }
    }
}

/// Password policy configuration surface.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PasswordPolicyConfig {
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    #[serde(default)]
    pub require_uppercase_and_digit: bool,

    #[serde(default)]
    pub require_special_character: bool,
}

fn default_min_length() -> usize {
    PasswordPolicy::DEFAULT_MIN_LENGTH
}

impl Default for PasswordPolicyConfig {
    fn default() -> Self {
        Self {
            min_length: PasswordPolicy::DEFAULT_MIN_LENGTH,
            require_uppercase_and_digit: false,
            require_special_character: false,
        }
    }
}

/// Ordered set of password rules behind a minimum length check.
///
/// The length check always runs first and short-circuits. The remaining
/// rules run in registration order and the first violation is returned.
pub struct PasswordPolicy {
    min_length: usize,
    rules: Vec<Box<dyn PasswordRule>>,
}

impl PasswordPolicy {
    pub const DEFAULT_MIN_LENGTH: usize = 8;

    /// Create a policy with only a minimum length (in bytes).
    pub fn new(min_length: usize) -> Self {
        Self {
            min_length,
            rules: Vec::new(),
        }
    }

    /// Build a policy from configuration.
    ///
    /// Rules are registered as uppercase+digit first, then special character.
    pub fn from_config(config: &PasswordPolicyConfig) -> Self {
        let mut policy = Self::new(config.min_length);
        if config.require_uppercase_and_digit {
            policy = policy.with_rule(UppercaseAndDigit);
        }
        if config.require_special_character {
            policy = policy.with_rule(SpecialCharacter);
        }
        policy
    }

    /// Append a rule after the already registered ones.
    pub fn with_rule(mut self, rule: impl PasswordRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Validate a plaintext password.
    ///
    /// # Errors
    /// * `TooShort` - Shorter than the minimum length; no other rule runs
    /// * Any violation reported by the first failing rule
    pub fn validate(&self, password: &str) -> Result<(), PolicyViolation> {
        if password.len() < self.min_length {
            return Err(PolicyViolation::TooShort {
                min: self.min_length,
                actual: password.len(),
            });
        }

        self.rules.iter().try_for_each(|rule| rule.validate(password))
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_LENGTH)
    }
}

impl std::fmt::Debug for PasswordPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordPolicy")
            .field("min_length", &self.min_length)
            .field("rules", &self.rules.len())
            .finish()
    }
}
