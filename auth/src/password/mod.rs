pub mod argon2;
pub mod bcrypt;
pub mod errors;
pub mod hasher;
pub mod policy;

pub use self::argon2::Argon2Hasher;
pub use self::bcrypt::BcryptHasher;
pub use errors::PasswordError;
pub use errors::PolicyViolation;
pub use hasher::PasswordHasher;
pub use policy::PasswordPolicy;
pub use policy::PasswordPolicyConfig;
pub use policy::PasswordRule;
pub use policy::SpecialCharacter;
pub use policy::UppercaseAndDigit;
