use super::errors::PasswordError;
use super::hasher::PasswordHasher;

/// bcrypt password hasher.
///
/// Reads and writes modular crypt strings (`$2b$10$...`), so hashes
/// stored by earlier deployments of the service keep verifying.
/// bcrypt only looks at the first 72 bytes of the input.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub const DEFAULT_COST: u32 = 10;

    pub fn new() -> Self {
        Self::with_cost(Self::DEFAULT_COST)
    }

    /// Create a hasher with an explicit work factor (4..=31).
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    fn compare(&self, hash: &str, plaintext: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }
}
