pub mod claims;
pub mod codec;
pub mod errors;
pub mod issuer;
pub mod verifier;

pub use claims::Claims;
pub use codec::Hs256Codec;
pub use codec::TokenCodec;
pub use errors::AuthError;
pub use errors::SigningError;
pub use issuer::TokenIssuer;
pub use verifier::TokenVerifier;
