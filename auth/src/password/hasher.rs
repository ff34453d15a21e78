use super::errors::PasswordError;

/// One-way, salted password hashing.
///
/// Implementations must produce self-describing hashes (algorithm, cost
/// and salt embedded in the string) so that [`compare`] needs nothing but
/// the stored hash.
///
/// [`compare`]: PasswordHasher::compare
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Errors
    /// * `HashingFailed` - Entropy or resource failure in the underlying KDF
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns false for any mismatch, including hashes that cannot be parsed.
    fn compare(&self, hash: &str, plaintext: &str) -> bool;
}
