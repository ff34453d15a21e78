use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::Hmac;
use hmac::Mac;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use sha2::Sha256;

use super::claims::Claims;
use super::errors::AuthError;
use super::errors::SigningError;
use crate::secret::SecretMaterial;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

/// Signs and parses the compact token encoding.
///
/// `decode` checks structure and signature only; expiry is the verifier's job.
pub trait TokenCodec: Send + Sync {
    /// Encode and sign claims.
    ///
    /// # Errors
    /// * `Encoding` - Claims could not be serialized or the MAC could not be keyed
    fn encode(&self, claims: &Claims, secret: &SecretMaterial) -> Result<String, SigningError>;

    /// Parse a token and check its signature.
    ///
    /// # Errors
    /// * `Malformed` - Not three non-empty segments, bad header, or bad claims
    /// * `BadSignature` - Signature does not match the secret
    fn decode(&self, token: &str, secret: &SecretMaterial) -> Result<Claims, AuthError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    typ: Option<String>,
}

impl Header {
    fn hs256() -> Self {
        Self {
            alg: ALGORITHM.to_string(),
            typ: Some("JWT".to_string()),
        }
    }
}

/// JWS compact serialization with HMAC-SHA256.
///
/// `base64url(header).base64url(claims).base64url(HMAC-SHA256(secret, header.claims))`,
/// all segments without padding. Output decodes with any standard JWT library.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hs256Codec;

impl Hs256Codec {
    pub fn new() -> Self {
        Self
    }

    /// Read the claims of a token without checking its signature.
    ///
    /// # Security Warning
    /// Never use the result for authorization decisions.
    pub fn inspect(&self, token: &str) -> Result<Claims, AuthError> {
        let (header, payload, _) = split(token)?;
        Self::check_header(header)?;
        decode_segment(payload)
    }

    fn check_header(segment: &str) -> Result<(), AuthError> {
        let header: Header = decode_segment(segment)?;

        // Only HS256 is accepted, whatever the token claims.
        if header.alg == ALGORITHM {
            Ok(())
        } else {
            Err(AuthError::Malformed)
        }
    }

    fn mac(secret: &SecretMaterial) -> Option<HmacSha256> {
        HmacSha256::new_from_slice(secret.as_bytes()).ok()
    }
}

impl TokenCodec for Hs256Codec {
    fn encode(&self, claims: &Claims, secret: &SecretMaterial) -> Result<String, SigningError> {
        let header = encode_segment(&Header::hs256())?;
        let payload = encode_segment(claims)?;
        let signing_input = format!("{}.{}", header, payload);

        let mut mac = Self::mac(secret)
            .ok_or_else(|| SigningError::Encoding("invalid HMAC key".to_string()))?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    fn decode(&self, token: &str, secret: &SecretMaterial) -> Result<Claims, AuthError> {
        let (header, payload, signature) = split(token)?;
        Self::check_header(header)?;

        if !is_base64url(signature) {
            return Err(AuthError::Malformed);
        }

        // In-alphabet but undecodable (non-canonical trailing bits) is a mismatch.
        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| AuthError::BadSignature)?;

        let mut mac = Self::mac(secret).ok_or(AuthError::BadSignature)?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| AuthError::BadSignature)?;

        decode_segment(payload)
    }
}

fn split(token: &str) -> Result<(&str, &str, &str), AuthError> {
    let mut segments = token.split('.');

    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() && !signature.is_empty() =>
        {
            Ok((header, payload, signature))
        }
        _ => Err(AuthError::Malformed),
    }
}

fn is_base64url(segment: &str) -> bool {
    segment
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn encode_segment<T: Serialize>(value: &T) -> Result<String, SigningError> {
    let json = serde_json::to_vec(value).map_err(|e| SigningError::Encoding(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| AuthError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::Malformed)
}
