//! Request gate for protected endpoints.
//!
//! The gate looks for a token in a cookie first and in a request header
//! second, verifies it, and either yields the claims or denies the request.
//! Denials carry the precise [`AuthError`] for diagnostics only; their
//! display text is always the same generic message.

use std::fmt;

use http::header;
use http::HeaderMap;
use http::Request;

use crate::jwt::AuthError;
use crate::jwt::Claims;
use crate::jwt::TokenVerifier;

/// Tracing target for gate decisions.
pub const TRACING_TARGET: &str = "auth::gate";

const BEARER_SCHEME: &str = "Bearer";

/// Something a token can be read from.
pub trait TokenCarrier {
    /// Value of the named cookie, if present.
    fn cookie(&self, name: &str) -> Option<&str>;

    /// Value of the named header, if present and valid UTF-8.
    fn header(&self, name: &str) -> Option<&str>;
}

impl TokenCarrier for HeaderMap {
    fn cookie(&self, name: &str) -> Option<&str> {
        self.get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.trim())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|value| value.to_str().ok())
    }
}

impl<B> TokenCarrier for Request<B> {
    fn cookie(&self, name: &str) -> Option<&str> {
        self.headers().cookie(name)
    }

    fn header(&self, name: &str) -> Option<&str> {
        TokenCarrier::header(self.headers(), name)
    }
}

impl TokenCarrier for http::request::Parts {
    fn cookie(&self, name: &str) -> Option<&str> {
        self.headers.cookie(name)
    }

    fn header(&self, name: &str) -> Option<&str> {
        TokenCarrier::header(&self.headers, name)
    }
}

/// Where the gate looks for a token, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLocations {
    pub cookie: String,
    pub header: String,
}

impl TokenLocations {
    pub const DEFAULT_COOKIE: &'static str = "jwt_token";
    pub const DEFAULT_HEADER: &'static str = "authorization";
}

impl Default for TokenLocations {
    fn default() -> Self {
        Self {
            cookie: Self::DEFAULT_COOKIE.to_string(),
            header: Self::DEFAULT_HEADER.to_string(),
        }
    }
}

/// A denied request.
///
/// Displays as a generic message regardless of the underlying reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Denied {
    kind: AuthError,
}

impl Denied {
    /// The precise reason, for logs and metrics only.
    pub fn kind(&self) -> AuthError {
        self.kind
    }
}

impl fmt::Display for Denied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unauthorized")
    }
}

impl std::error::Error for Denied {}

/// Guards protected endpoints.
#[derive(Clone)]
pub struct AuthGate {
    verifier: TokenVerifier,
    locations: TokenLocations,
}

impl AuthGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self::with_locations(verifier, TokenLocations::default())
    }

    pub fn with_locations(verifier: TokenVerifier, locations: TokenLocations) -> Self {
        Self { verifier, locations }
    }

    pub fn locations(&self) -> &TokenLocations {
        &self.locations
    }

    /// Find the token carried by a request.
    ///
    /// The cookie wins over the header; empty values count as absent. A
    /// `Bearer ` prefix on the header value is stripped.
    pub fn extract<'a, C>(&self, carrier: &'a C) -> Option<&'a str>
    where
        C: TokenCarrier + ?Sized,
    {
        let from_cookie = carrier
            .cookie(&self.locations.cookie)
            .filter(|token| !token.is_empty());

        from_cookie.or_else(|| {
            carrier
                .header(&self.locations.header)
                .map(strip_bearer)
                .filter(|token| !token.is_empty())
        })
    }

    /// Allow or deny a request.
    ///
    /// # Errors
    /// * `Denied` - No token, or the token failed verification
    pub fn authorize<C>(&self, carrier: &C) -> Result<Claims, Denied>
    where
        C: TokenCarrier + ?Sized,
    {
        let result = match self.extract(carrier) {
            Some(token) => self.verifier.verify(token),
            None => Err(AuthError::Missing),
        };

        result.map_err(|kind| {
            tracing::warn!(target: TRACING_TARGET, reason = %kind, "Request denied");
            Denied { kind }
        })
    }
}

/// Drop an optional `Bearer` scheme; a bare scheme leaves nothing.
fn strip_bearer(value: &str) -> &str {
    let value = value.trim();

    match value.strip_prefix(BEARER_SCHEME) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use chrono::Duration;
    use http::HeaderValue;

    use super::*;
    use crate::jwt::Hs256Codec;
    use crate::jwt::SigningError;
    use crate::jwt::TokenCodec;
    use crate::jwt::TokenIssuer;
    use crate::secret::SecretMaterial;
    use crate::secret::SecretProvider;

    /// Codec that counts decode calls.
    #[derive(Default)]
    struct CountingCodec {
        decodes: AtomicUsize,
    }

    impl TokenCodec for CountingCodec {
        fn encode(&self, claims: &Claims, secret: &SecretMaterial) -> Result<String, SigningError> {
            Hs256Codec::new().encode(claims, secret)
        }

        fn decode(&self, token: &str, secret: &SecretMaterial) -> Result<Claims, AuthError> {
            self.decodes.fetch_add(1, Ordering::SeqCst);
            Hs256Codec::new().decode(token, secret)
        }
    }

    fn provider() -> Arc<SecretProvider> {
        Arc::new(SecretProvider::new(Some(
            "test_secret_key_at_least_32_bytes!".to_string(),
        )))
    }

    fn gate_and_token() -> (AuthGate, String) {
        let secrets = provider();
        let token = TokenIssuer::new(Arc::clone(&secrets))
            .issue(1, "a@b.com", Duration::hours(1))
            .unwrap();
        (AuthGate::new(TokenVerifier::new(secrets)), token)
    }

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        headers
    }

    #[test]
    fn test_missing_token_denied_without_crypto() {
        let codec = Arc::new(CountingCodec::default());
        let gate = AuthGate::new(TokenVerifier::with_codec(provider(), codec.clone()));

        let denied = gate.authorize(&HeaderMap::new()).unwrap_err();

        assert_eq!(denied.kind(), AuthError::Missing);
        assert_eq!(denied.to_string(), "unauthorized");
        assert_eq!(codec.decodes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_token_from_cookie() {
        let (gate, token) = gate_and_token();
        let cookie = format!("theme=dark; jwt_token={}; lang=en", token);

        let claims = gate
            .authorize(&headers(&[(header::COOKIE, cookie.as_str())]))
            .expect("Request should be allowed");
        assert_eq!(claims.user_id, 1);
    }

    #[test]
    fn test_token_from_header_with_and_without_bearer() {
        let (gate, token) = gate_and_token();

        let raw = headers(&[(header::AUTHORIZATION, token.as_str())]);
        assert!(gate.authorize(&raw).is_ok());

        let bearer = format!("Bearer {}", token);
        let bearer = headers(&[(header::AUTHORIZATION, bearer.as_str())]);
        assert!(gate.authorize(&bearer).is_ok());
    }

    #[test]
    fn test_cookie_wins_over_header() {
        let (gate, token) = gate_and_token();
        let cookie = format!("jwt_token={}", token);
        let map = headers(&[
            (header::COOKIE, cookie.as_str()),
            (header::AUTHORIZATION, "Bearer other"),
        ]);

        assert_eq!(gate.extract(&map), Some(token.as_str()));
        assert!(gate.authorize(&map).is_ok());
    }

    #[test]
    fn test_empty_cookie_falls_back_to_header() {
        let (gate, token) = gate_and_token();
        let bearer = format!("Bearer {}", token);
        let map = headers(&[
            (header::COOKIE, "jwt_token="),
            (header::AUTHORIZATION, bearer.as_str()),
        ]);

        assert_eq!(gate.extract(&map), Some(token.as_str()));
    }

    #[test]
    fn test_bare_bearer_prefix_is_missing() {
        let codec = Arc::new(CountingCodec::default());
        let gate = AuthGate::new(TokenVerifier::with_codec(provider(), codec.clone()));

        for value in ["Bearer ", "Bearer", "  Bearer   ", "Bearer\t"] {
            let map = headers(&[(header::AUTHORIZATION, value)]);

            assert_eq!(gate.extract(&map), None, "header: {:?}", value);
            assert_eq!(gate.authorize(&map).unwrap_err().kind(), AuthError::Missing);
        }
        assert_eq!(codec.decodes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_strip_bearer() {
        assert_eq!(strip_bearer("Bearer abc"), "abc");
        assert_eq!(strip_bearer("  Bearer   abc  "), "abc");
        assert_eq!(strip_bearer("abc"), "abc");
        assert_eq!(strip_bearer("Bearer"), "");
        assert_eq!(strip_bearer("Bearerabc"), "Bearerabc");
    }

    #[test]
    fn test_invalid_token_is_denied_generically() {
        let (gate, token) = gate_and_token();
        let tampered = format!("{}x", token);

        for value in ["garbage", tampered.as_str()] {
            let denied = gate
                .authorize(&headers(&[(header::AUTHORIZATION, value)]))
                .unwrap_err();
            assert_ne!(denied.kind(), AuthError::Missing);
            assert_eq!(denied.to_string(), "unauthorized");
        }
    }

    #[test]
    fn test_custom_locations() {
        let secrets = provider();
        let token = TokenIssuer::new(Arc::clone(&secrets))
            .issue(1, "a@b.com", Duration::hours(1))
            .unwrap();
        let gate = AuthGate::with_locations(
            TokenVerifier::new(secrets),
            TokenLocations {
                cookie: "session".to_string(),
                header: "x-access-token".to_string(),
            },
        );

        let mut map = HeaderMap::new();
        map.insert("x-access-token", HeaderValue::from_str(&token).unwrap());
        assert!(gate.authorize(&map).is_ok());

        let default_cookie = format!("jwt_token={}", token);
        let map = headers(&[(header::COOKIE, default_cookie.as_str())]);
        assert!(gate.authorize(&map).is_err());
    }

    #[test]
    fn test_request_carrier() {
        let (gate, token) = gate_and_token();
        let request = Request::builder()
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(())
            .unwrap();

        assert!(gate.authorize(&request).is_ok());
    }
}
