// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Signed identity cookies.
//!
//! The role gate decides from the identity cookie, so the server only accepts
//! identities it issued itself. The cookie holds an HS256 JWT whose claims
//! carry the identity JSON and the session token it was issued with; a cookie
//! paired with a different token cookie is rejected.

use std::fmt;
use std::sync::{Arc, OnceLock};

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, get_current_timestamp, Algorithm, DecodingKey, EncodingKey,
    Header, Validation,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Issuer written into and required from every identity cookie.
pub const ISSUER: &str = "estate-console";

/// Secrets shorter than this are accepted with a warning.
pub const RECOMMENDED_SECRET_LEN: usize = 32;

// =============================================================================
// Claims
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IdentityClaims {
    iss: String,
    iat: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<u64>,
    /// Identity JSON exactly as the session store wrote it.
    idn: String,
    /// Token the identity was issued with.
    tkn: String,
}

// =============================================================================
// SigningError
// =============================================================================

/// Why an identity cookie was not issued or not accepted.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Encoding failed.
    #[error("identity could not be signed: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),

    /// Signature, issuer, expiry or format check failed.
    #[error("identity cookie rejected: {reason}")]
    Rejected {
        /// Short description of the failed check.
        reason: &'static str,
    },

    /// The cookie was issued for another token.
    #[error("identity cookie belongs to a different token")]
    TokenMismatch,
}

fn rejection(error: jsonwebtoken::errors::Error) -> SigningError {
    let reason = match error.kind() {
        ErrorKind::InvalidSignature => "bad signature",
        ErrorKind::ExpiredSignature => "expired",
        ErrorKind::InvalidIssuer => "wrong issuer",
        ErrorKind::InvalidAlgorithm => "wrong algorithm",
        ErrorKind::MissingRequiredClaim(_) => "missing claim",
        _ => "malformed",
    };
    SigningError::Rejected { reason }
}

// =============================================================================
// SessionSigner
// =============================================================================

/// Signs and verifies identity cookies with one HMAC secret.
#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl SessionSigner {
    /// Creates a signer for `secret`.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["iss"]);
        validation.leeway = 0;

        Self {
            encoding_key: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding_key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation: Arc::new(validation),
        }
    }

    /// Signs `identity` for use together with `token`.
    ///
    /// With `max_age_secs` the signature expires with the cookie.
    pub fn sign(
        &self,
        identity: &str,
        token: &str,
        max_age_secs: Option<u64>,
    ) -> Result<String, SigningError> {
        let now = get_current_timestamp();
        let claims = IdentityClaims {
            iss: ISSUER.to_string(),
            iat: now,
            exp: max_age_secs.map(|secs| now.saturating_add(secs)),
            idn: identity.to_string(),
            tkn: token.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(SigningError::Sign)
    }

    /// Verifies `signed` and returns the identity JSON inside it.
    pub fn verify(&self, signed: &str, token: &str) -> Result<String, SigningError> {
        let data = decode::<IdentityClaims>(signed, &self.decoding_key, &self.validation)
            .map_err(rejection)?;

        if data.claims.tkn != token {
            return Err(SigningError::TokenMismatch);
        }
        Ok(data.claims.idn)
    }
}

impl fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSigner")
            .field("algorithm", &Algorithm::HS256)
            .field("issuer", &ISSUER)
            .finish()
    }
}

/// Secret used when none is configured.
///
/// Generated once per process, so sessions do not survive a restart.
pub fn ephemeral_secret() -> &'static str {
    static SECRET: OnceLock<String> = OnceLock::new();
    SECRET.get_or_init(|| {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(48)
            .map(char::from)
            .collect()
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: &str = r#"{"role":"manager","displayName":"Kim","email":"kim@example.com"}"#;

    #[test]
    fn test_sign_then_verify() {
        let signer = SessionSigner::new("a-secret-long-enough-for-hmac-256-use");
        let signed = signer.sign(IDENTITY, "tok-1", Some(3600)).unwrap();

        assert_eq!(signed.split('.').count(), 3);
        assert_eq!(signer.verify(&signed, "tok-1").unwrap(), IDENTITY);
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let signed = SessionSigner::new("first-secret")
            .sign(IDENTITY, "tok-1", None)
            .unwrap();

        let err = SessionSigner::new("second-secret")
            .verify(&signed, "tok-1")
            .unwrap_err();
        assert!(matches!(err, SigningError::Rejected { reason: "bad signature" }));
    }

    #[test]
    fn test_token_swap_is_rejected() {
        let signer = SessionSigner::new("shared-secret");
        let signed = signer.sign(IDENTITY, "tok-1", None).unwrap();

        assert!(matches!(
            signer.verify(&signed, "tok-2"),
            Err(SigningError::TokenMismatch)
        ));
    }

    #[test]
    fn test_plain_json_is_rejected() {
        let signer = SessionSigner::new("shared-secret");
        let forged = r#"{"role":"admin","displayName":"Mallory","email":"m@x"}"#;
        assert!(matches!(
            signer.verify(forged, "anything"),
            Err(SigningError::Rejected { .. })
        ));
    }

    #[test]
    fn test_expired_signature_is_rejected() {
        let signer = SessionSigner::new("shared-secret");
        let claims = IdentityClaims {
            iss: ISSUER.to_string(),
            iat: 1,
            exp: Some(2),
            idn: IDENTITY.to_string(),
            tkn: "tok-1".to_string(),
        };
        let signed = encode(&Header::new(Algorithm::HS256), &claims, &signer.encoding_key).unwrap();

        assert!(matches!(
            signer.verify(&signed, "tok-1"),
            Err(SigningError::Rejected { reason: "expired" })
        ));
    }

    #[test]
    fn test_ephemeral_secret_is_stable_within_process() {
        assert_eq!(ephemeral_secret(), ephemeral_secret());
        assert!(ephemeral_secret().len() >= RECOMMENDED_SECRET_LEN);
    }
}
