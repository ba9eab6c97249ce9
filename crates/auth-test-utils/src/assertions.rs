//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for session-token validation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Session-token claims structure
#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub success: bool,
    pub email: String,
    pub name: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Custom assertions for session tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_session_token()
///     .assert_success_claim()
///     .assert_for_email("a@x.com")
///     .assert_ttl_seconds(86_400);
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a well-formed HS256 session token
    fn assert_valid_session_token(&self) -> &Self;

    /// Assert that the token's `success` claim is true
    fn assert_success_claim(&self) -> &Self;

    /// Assert that the token was issued for the given email
    fn assert_for_email(&self, email: &str) -> &Self;

    /// Assert that the token carries the given display name
    fn assert_named(&self, name: &str) -> &Self;

    /// Assert that the token's lifetime (`exp - iat`) is exactly `seconds`
    fn assert_ttl_seconds(&self, seconds: i64) -> &Self;
}

fn decode_claims(token: &str) -> JwtClaims {
    let parts: Vec<&str> = token.split('.').collect();
    assert_eq!(
        parts.len(),
        3,
        "JWT must have 3 parts (header.payload.signature), got {}",
        parts.len()
    );

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .expect("Invalid JWT payload");
    serde_json::from_slice(&payload).expect("Failed to parse JWT claims")
}

impl TokenAssertions for String {
    fn assert_valid_session_token(&self) -> &Self {
        let parts: Vec<&str> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header_bytes = URL_SAFE_NO_PAD
            .decode(parts[0])
            .expect("Failed to base64 decode JWT header");
        let header: JwtHeader =
            serde_json::from_slice(&header_bytes).expect("Failed to parse JWT header JSON");

        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        // Payload must decode and carry the session claim set
        let claims = decode_claims(self);
        assert!(!claims.jti.is_empty(), "Token must carry a jti claim");

        self
    }

    fn assert_success_claim(&self) -> &Self {
        let claims = decode_claims(self);
        assert!(claims.success, "Token's success claim should be true");
        self
    }

    fn assert_for_email(&self, email: &str) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(
            claims.email, email,
            "Expected email '{}', got '{}'",
            email, claims.email
        );
        self
    }

    fn assert_named(&self, name: &str) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(
            claims.name, name,
            "Expected name '{}', got '{}'",
            name, claims.name
        );
        self
    }

    fn assert_ttl_seconds(&self, seconds: i64) -> &Self {
        let claims = decode_claims(self);
        assert_eq!(
            claims.exp - claims.iat,
            seconds,
            "Expected token lifetime of {} seconds, got {}",
            seconds,
            claims.exp - claims.iat
        );
        self
    }
}
