//! Bearer-token verification.
//!
//! Tokens use the format: `base64url(payload).base64url(signature)`
//!
//! The payload is a JSON object containing:
//! - `sub`: principal id (string)
//! - `email`: optional email
//! - `iat`: issued-at timestamp (seconds since epoch)
//!
//! The signature covers `payload_b64.as_bytes()` (the base64url-encoded
//! payload string, not the decoded JSON), matching the token issuer.
//! Verification failures all collapse to the same 401 at the API boundary so
//! nothing about the failure mode leaks to callers.

use axum::http::HeaderMap;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::Deserialize;
use thiserror::Error;
use veilforge_types::Principal;

/// Embedded Ed25519 public key of the demo token issuer (32 bytes).
const TOKEN_PUBLIC_KEY: [u8; 32] = [
    17, 204, 91, 62, 140, 35, 11, 248, 73, 190, 2, 133, 57, 166, 201, 84,
    229, 12, 178, 99, 41, 216, 154, 7, 63, 120, 245, 28, 190, 66, 103, 149,
];

/// Authentication failures. Both variants surface as a generic 401.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header was supplied.
    #[error("missing bearer token")]
    MissingToken,

    /// The token failed format, signature, or payload checks.
    #[error("invalid token")]
    InvalidToken,
}

/// Validates a bearer credential and yields the principal behind it.
pub trait TokenVerifier: Send + Sync {
    /// Verifies a raw bearer token.
    fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Decoded token payload.
#[derive(Debug, Deserialize)]
struct TokenPayload {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[allow(dead_code)]
    iat: i64,
}

/// Ed25519 signed-token verifier.
#[derive(Debug, Clone)]
pub struct SignedTokenVerifier {
    verifying_key: VerifyingKey,
}

impl SignedTokenVerifier {
    /// Creates a verifier using the embedded issuer key.
    pub fn new() -> Result<Self, AuthError> {
        Self::with_key(&TOKEN_PUBLIC_KEY)
    }

    /// Creates a verifier with a custom public key.
    /// Used for tests and deployments with their own issuer.
    pub fn with_key(pub_key_bytes: &[u8; 32]) -> Result<Self, AuthError> {
        let verifying_key =
            VerifyingKey::from_bytes(pub_key_bytes).map_err(|_| AuthError::InvalidToken)?;
        Ok(Self { verifying_key })
    }
}

impl TokenVerifier for SignedTokenVerifier {
    fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let token = token.trim();

        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 2 {
            return Err(AuthError::InvalidToken);
        }
        let payload_b64 = parts[0];
        let signature_b64 = parts[1];

        let sig_bytes = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| AuthError::InvalidToken)?;
        let signature =
            Signature::from_slice(&sig_bytes).map_err(|_| AuthError::InvalidToken)?;

        // Signature covers the base64url-encoded payload bytes.
        self.verifying_key
            .verify(payload_b64.as_bytes(), &signature)
            .map_err(|_| AuthError::InvalidToken)?;

        let payload_json = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| AuthError::InvalidToken)?;
        let payload: TokenPayload =
            serde_json::from_slice(&payload_json).map_err(|_| AuthError::InvalidToken)?;

        Ok(Principal {
            id: payload.sub.into(),
            email: payload.email,
        })
    }
}

/// Extracts the raw token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;
    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}
