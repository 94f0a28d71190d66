//! App JWT signing
//!
//! A GitHub App authenticates as the app with a short-lived RS256 JWT signed
//! by its private key. The issued-at claim is backdated to absorb clock
//! drift between us and GitHub, which rejects tokens issued "in the future".

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::Serialize;

use crate::constants::{JWT_DRIFT_SECS, JWT_TTL_SECS};
use crate::error::{Error, Result};

#[derive(Debug, Serialize)]
struct Claims {
    iat: u64,
    exp: u64,
    iss: String,
}

/// Sign an app JWT for `app_id` with the given PEM private key.
///
/// The key must already be normalized PEM text (see
/// [`crate::key::normalize_private_key`]).
pub fn sign_app_jwt(app_id: &str, private_key_pem: &str) -> Result<String> {
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .map_err(|e| Error::InvalidKey(format!("unusable RSA key: {e}")))?;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let claims = Claims {
        iat: now.saturating_sub(JWT_DRIFT_SECS),
        exp: now + JWT_TTL_SECS,
        iss: app_id.to_string(),
    };

    encode(&Header::new(Algorithm::RS256), &claims, &key).map_err(|e| Error::Signing(e.to_string()))
}
