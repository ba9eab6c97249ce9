use crate::errors::AuthError;
use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::{
    aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM},
    rand::{SecureRandom, SystemRandom},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;
use uuid::Uuid;

/// Session lifetime: tokens expire one day after issuance.
pub const SESSION_TTL_SECONDS: i64 = 86_400;

/// Maximum accepted session-token size in bytes (4KB).
///
/// Oversized tokens are rejected before any base64 or signature work, so a
/// hostile caller cannot make verification allocate or hash megabytes.
pub const MAX_TOKEN_SIZE_BYTES: usize = 4096;

// AES-256-GCM parameters for the stored-password codec.
const NONCE_LEN: usize = 12; // 96-bit
const TAG_LEN: usize = 16; // 128-bit

/// Session token claims.
///
/// The `email` and `jti` fields identify a person and a token instance;
/// a custom Debug implementation redacts both.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Always true in issued tokens; carried in the payload for wire
    /// compatibility with existing token consumers.
    pub success: bool,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique token identifier; two logins never yield the same token.
    pub jti: String,
}

impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("success", &self.success)
            .field("email", &"[REDACTED]")
            .field("name", &self.name)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("jti", &"[REDACTED]")
            .finish()
    }
}

/// Build the claims for a session issued at `issued_at` (unix seconds).
///
/// The issuance instant is a parameter so expiry boundaries are testable
/// without sleeping; production callers pass the current time.
pub fn session_claims(email: &str, name: &str, issued_at: i64) -> SessionClaims {
    SessionClaims {
        success: true,
        email: email.to_string(),
        name: name.to_string(),
        iat: issued_at,
        exp: issued_at + SESSION_TTL_SECONDS,
        jti: Uuid::new_v4().to_string(),
    }
}

/// Sign session claims with the shared signing secret (HS256).
#[instrument(skip_all)]
pub fn sign_session_token(claims: &SessionClaims, secret: &str) -> Result<String, AuthError> {
    let header = Header::new(Algorithm::HS256);
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &encoding_key)
        .map_err(|e| AuthError::Crypto(format!("Token signing operation failed: {}", e)))
}

/// Verify a session token and extract its claims.
///
/// Validates:
/// - Token size (must be <= `MAX_TOKEN_SIZE_BYTES`)
/// - Signature (HS256 under the shared secret)
/// - Expiration (`exp` claim, zero leeway)
#[instrument(skip_all)]
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims, AuthError> {
    // Size check before any parsing or cryptographic work.
    if token.len() > MAX_TOKEN_SIZE_BYTES {
        tracing::debug!(
            target: "crypto",
            token_size = token.len(),
            max_size = MAX_TOKEN_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(AuthError::InvalidToken(
            "The session token is invalid or expired".to_string(),
        ));
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(target: "crypto", error = %e, "Token verification failed");
        AuthError::InvalidToken("The session token is invalid or expired".to_string())
    })?;

    Ok(token_data.claims)
}

/// Encrypt a plaintext password for storage (AES-256-GCM).
///
/// Output encoding is `base64(nonce || ciphertext || tag)` so the record
/// fits a single column. A fresh 96-bit nonce is drawn per call.
#[instrument(skip_all)]
pub fn encrypt_password(plaintext: &str, key: &[u8]) -> Result<String, AuthError> {
    if key.len() != 32 {
        return Err(AuthError::Crypto(format!(
            "Invalid password key length: {} (expected 32)",
            key.len()
        )));
    }

    let rng = SystemRandom::new();

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill(&mut nonce_bytes)
        .map_err(|e| AuthError::Crypto(format!("Nonce generation failed: {}", e)))?;

    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    let unbound_key = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|e| AuthError::Crypto(format!("Cipher key creation failed: {}", e)))?;
    let sealing_key = LessSafeKey::new(unbound_key);

    // seal_in_place_append_tag leaves ciphertext + 16-byte tag in the buffer
    let mut in_out = plaintext.as_bytes().to_vec();
    sealing_key
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|e| AuthError::Crypto(format!("Encryption operation failed: {}", e)))?;

    let mut raw = Vec::with_capacity(NONCE_LEN + in_out.len());
    raw.extend_from_slice(&nonce_bytes);
    raw.extend_from_slice(&in_out);

    Ok(general_purpose::STANDARD.encode(raw))
}

/// Decrypt a stored password ciphertext back to plaintext.
#[instrument(skip_all)]
pub fn decrypt_password(ciphertext: &str, key: &[u8]) -> Result<String, AuthError> {
    if key.len() != 32 {
        return Err(AuthError::Crypto(format!(
            "Invalid password key length: {} (expected 32)",
            key.len()
        )));
    }

    let raw = general_purpose::STANDARD
        .decode(ciphertext)
        .map_err(|e| AuthError::Crypto(format!("Invalid ciphertext encoding: {}", e)))?;

    if raw.len() < NONCE_LEN + TAG_LEN {
        return Err(AuthError::Crypto(format!(
            "Ciphertext too short: {} bytes",
            raw.len()
        )));
    }

    let nonce_bytes: [u8; NONCE_LEN] = raw
        .get(..NONCE_LEN)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| AuthError::Crypto("Ciphertext missing nonce".to_string()))?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Remainder is ciphertext || tag, exactly what open_in_place expects
    let mut in_out = raw
        .get(NONCE_LEN..)
        .ok_or_else(|| AuthError::Crypto("Ciphertext missing payload".to_string()))?
        .to_vec();

    let unbound_key = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|e| AuthError::Crypto(format!("Cipher key creation failed: {}", e)))?;
    let opening_key = LessSafeKey::new(unbound_key);

    let decrypted = opening_key
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|e| AuthError::Crypto(format!("Decryption operation failed: {}", e)))?;

    String::from_utf8(decrypted.to_vec())
        .map_err(|e| AuthError::Crypto(format!("Decrypted password is not valid UTF-8: {}", e)))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const TEST_SECRET: &str = "test-signing-secret";

    fn test_key() -> Vec<u8> {
        vec![7u8; 32]
    }

    #[test]
    fn test_password_round_trip() {
        let ciphertext = encrypt_password("secret", &test_key()).unwrap();
        let plaintext = decrypt_password(&ciphertext, &test_key()).unwrap();

        assert_eq!(plaintext, "secret");
    }

    #[test]
    fn test_encrypt_produces_distinct_ciphertexts() {
        // Fresh nonce per call: equal plaintexts must not produce equal records
        let first = encrypt_password("secret", &test_key()).unwrap();
        let second = encrypt_password("secret", &test_key()).unwrap();

        assert_ne!(first, second);
        assert_eq!(decrypt_password(&first, &test_key()).unwrap(), "secret");
        assert_eq!(decrypt_password(&second, &test_key()).unwrap(), "secret");
    }

    #[test]
    fn test_decrypt_with_wrong_key_fails() {
        let ciphertext = encrypt_password("secret", &test_key()).unwrap();
        let wrong_key = vec![9u8; 32];

        let err = decrypt_password(&ciphertext, &wrong_key).expect_err("Expected Crypto error");
        assert!(
            matches!(err, AuthError::Crypto(msg) if msg.starts_with("Decryption operation failed:"))
        );
    }

    #[test]
    fn test_decrypt_tampered_ciphertext_fails() {
        let ciphertext = encrypt_password("secret", &test_key()).unwrap();
        let mut raw = general_purpose::STANDARD.decode(&ciphertext).unwrap();
        // Flip one bit in the payload
        if let Some(byte) = raw.last_mut() {
            *byte ^= 0x01;
        }
        let tampered = general_purpose::STANDARD.encode(raw);

        let err = decrypt_password(&tampered, &test_key()).expect_err("Expected Crypto error");
        assert!(matches!(err, AuthError::Crypto(_)));
    }

    #[test]
    fn test_decrypt_invalid_base64_fails() {
        let err =
            decrypt_password("not-base64!@#$", &test_key()).expect_err("Expected Crypto error");
        assert!(
            matches!(err, AuthError::Crypto(msg) if msg.starts_with("Invalid ciphertext encoding:"))
        );
    }

    #[test]
    fn test_decrypt_truncated_ciphertext_fails() {
        let short = general_purpose::STANDARD.encode([0u8; 10]);

        let err = decrypt_password(&short, &test_key()).expect_err("Expected Crypto error");
        assert!(matches!(err, AuthError::Crypto(msg) if msg.starts_with("Ciphertext too short:")));
    }

    #[test]
    fn test_encrypt_with_invalid_key_length() {
        let err = encrypt_password("secret", &[0u8; 16]).expect_err("Expected Crypto error");
        assert!(
            matches!(err, AuthError::Crypto(msg) if msg.starts_with("Invalid password key length:"))
        );
    }

    #[test]
    fn test_decrypt_with_invalid_key_length() {
        let ciphertext = encrypt_password("secret", &test_key()).unwrap();

        let err = decrypt_password(&ciphertext, &[0u8; 16]).expect_err("Expected Crypto error");
        assert!(
            matches!(err, AuthError::Crypto(msg) if msg.starts_with("Invalid password key length:"))
        );
    }

    #[test]
    fn test_password_round_trip_empty_and_unicode() {
        for plaintext in ["", "påsswörd ✓", "a"] {
            let ciphertext = encrypt_password(plaintext, &test_key()).unwrap();
            assert_eq!(decrypt_password(&ciphertext, &test_key()).unwrap(), plaintext);
        }
    }

    #[test]
    fn test_session_token_sign_verify() {
        let now = chrono::Utc::now().timestamp();
        let claims = session_claims("a@x.com", "Ann", now);

        let token = sign_session_token(&claims, TEST_SECRET).unwrap();
        let verified = verify_session_token(&token, TEST_SECRET).unwrap();

        assert!(verified.success);
        assert_eq!(verified.email, "a@x.com");
        assert_eq!(verified.name, "Ann");
        assert_eq!(verified.iat, now);
        assert_eq!(verified.exp, now + SESSION_TTL_SECONDS);
        assert_eq!(verified.jti, claims.jti);
    }

    #[test]
    fn test_session_claims_ttl_is_one_day() {
        let claims = session_claims("a@x.com", "Ann", 1_000);
        assert_eq!(claims.exp - claims.iat, 86_400);
    }

    #[test]
    fn test_session_token_valid_just_before_expiry() {
        // Issued 86_399 seconds ago: one second of validity left
        let issued_at = chrono::Utc::now().timestamp() - (SESSION_TTL_SECONDS - 1);
        let claims = session_claims("a@x.com", "Ann", issued_at);

        let token = sign_session_token(&claims, TEST_SECRET).unwrap();
        let result = verify_session_token(&token, TEST_SECRET);

        assert!(result.is_ok(), "Token one second before expiry should verify");
    }

    #[test]
    fn test_session_token_expired_just_after_expiry() {
        // Issued 86_401 seconds ago: expired one second ago
        let issued_at = chrono::Utc::now().timestamp() - (SESSION_TTL_SECONDS + 1);
        let claims = session_claims("a@x.com", "Ann", issued_at);

        let token = sign_session_token(&claims, TEST_SECRET).unwrap();
        let err = verify_session_token(&token, TEST_SECRET)
            .expect_err("Expected InvalidToken error for expired token");

        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_session_token_wrong_secret_rejected() {
        let claims = session_claims("a@x.com", "Ann", chrono::Utc::now().timestamp());
        let token = sign_session_token(&claims, TEST_SECRET).unwrap();

        let err = verify_session_token(&token, "other-secret")
            .expect_err("Expected InvalidToken error for wrong secret");
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_session_token_tampered_payload_rejected() {
        let claims = session_claims("a@x.com", "Ann", chrono::Utc::now().timestamp());
        let token = sign_session_token(&claims, TEST_SECRET).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);
        let tampered = format!("{}.{}X.{}", parts[0], parts[1], parts[2]);

        let err = verify_session_token(&tampered, TEST_SECRET)
            .expect_err("Expected InvalidToken error for tampered token");
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_session_token_size_limit_enforced() {
        let oversized = "a".repeat(MAX_TOKEN_SIZE_BYTES + 1);

        let err = verify_session_token(&oversized, TEST_SECRET)
            .expect_err("Expected InvalidToken error for oversized token");
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_session_token_payload_matches_wire_contract() {
        let claims = session_claims("a@x.com", "Ann", chrono::Utc::now().timestamp());
        let token = sign_session_token(&claims, TEST_SECRET).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3, "JWT should have 3 parts");

        let header_bytes = URL_SAFE_NO_PAD.decode(parts[0]).unwrap();
        let header: serde_json::Value = serde_json::from_slice(&header_bytes).unwrap();
        assert_eq!(header["alg"], "HS256");
        assert_eq!(header["typ"], "JWT");

        let payload_bytes = URL_SAFE_NO_PAD.decode(parts[1]).unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&payload_bytes).unwrap();
        assert_eq!(payload["success"], serde_json::json!(true));
        assert_eq!(payload["email"], serde_json::json!("a@x.com"));
        assert_eq!(payload["name"], serde_json::json!("Ann"));
    }

    #[test]
    fn test_distinct_jti_means_distinct_tokens() {
        let now = chrono::Utc::now().timestamp();
        let first = sign_session_token(&session_claims("a@x.com", "Ann", now), TEST_SECRET).unwrap();
        let second =
            sign_session_token(&session_claims("a@x.com", "Ann", now), TEST_SECRET).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_session_claims_debug_redacts_identifiers() {
        let claims = session_claims("a@x.com", "Ann", 0);

        let debug_str = format!("{:?}", claims);
        assert!(!debug_str.contains("a@x.com"));
        assert!(!debug_str.contains(&claims.jti));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
