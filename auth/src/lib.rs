//! Credential and token management for the inventory service.
//!
//! Provides the authentication building blocks used by the HTTP handlers:
//! - Password policy enforcement with pluggable rules
//! - Password hashing (Argon2id, bcrypt)
//! - Signing secret lifecycle (supplied or generated once per process)
//! - HS256 access token issuance and verification
//! - A request gate reading tokens from a cookie or a header
//!
//! # Examples
//!
//! ## Password Policy
//! ```
//! use auth::{PasswordPolicy, UppercaseAndDigit};
//!
//! let policy = PasswordPolicy::new(8).with_rule(UppercaseAndDigit);
//! assert!(policy.validate("LongEnough1").is_ok());
//! assert!(policy.validate("abc").is_err());
//! ```
//!
//! ## Password Hashing
//! ```
//! use auth::{Argon2Hasher, PasswordHasher};
//!
//! let hasher = Argon2Hasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.compare(&hash, "my_password"));
//! ```
//!
//! ## Access Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{SecretProvider, TokenIssuer, TokenVerifier};
//! use chrono::Duration;
//!
//! let secrets = Arc::new(SecretProvider::new(None));
//! let issuer = TokenIssuer::new(Arc::clone(&secrets));
//! let verifier = TokenVerifier::new(secrets);
//!
//! let token = issuer.issue(1, "a@b.com", Duration::hours(24)).unwrap();
//! let claims = verifier.verify(&token).unwrap();
//! assert_eq!(claims.user_id, 1);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use std::sync::Arc;
//!
//! use auth::{Authenticator, SecretProvider};
//!
//! let auth = Authenticator::new(Arc::new(SecretProvider::new(None)));
//!
//! // Signup: validate and hash password
//! let hash = auth.register("a@b.com", "password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, 1, "a@b.com").unwrap();
//!
//! // Protected request: validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.email, "a@b.com");
//! ```

pub mod authenticator;
pub mod config;
pub mod email;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod secret;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use config::TokenConfig;
pub use email::validate_email;
pub use gate::AuthGate;
pub use gate::Denied;
pub use gate::TokenCarrier;
pub use gate::TokenLocations;
pub use jwt::AuthError;
pub use jwt::Claims;
pub use jwt::Hs256Codec;
pub use jwt::SigningError;
pub use jwt::TokenCodec;
pub use jwt::TokenIssuer;
pub use jwt::TokenVerifier;
pub use password::Argon2Hasher;
pub use password::BcryptHasher;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicy;
pub use password::PasswordPolicyConfig;
pub use password::PasswordRule;
pub use password::PolicyViolation;
pub use password::SpecialCharacter;
pub use password::UppercaseAndDigit;
pub use secret::ConfigurationError;
pub use secret::SecretMaterial;
pub use secret::SecretOrigin;
pub use secret::SecretProvider;
