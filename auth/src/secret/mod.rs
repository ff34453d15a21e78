pub mod errors;
pub mod provider;

pub use errors::ConfigurationError;
pub use provider::SecretMaterial;
pub use provider::SecretOrigin;
pub use provider::SecretProvider;
