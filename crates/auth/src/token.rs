//! HS256 token signing and decoding.
//!
//! Decoding only checks the signature; the time window is validated separately
//! by [`crate::claims::validate_window`] so that expiry semantics (inclusive
//! `>=` comparison, injected clock) stay deterministic and testable.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use localiz_core::UserId;

use crate::{Role, SessionClaims, VerificationClaims};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("invalid token")]
    Invalid,

    #[error("token encoding failed: {0}")]
    Encode(String),
}

/// Signs and decodes both verification and session tokens with one secret.
///
/// Built once at startup from `SECRET_KEY` and shared by reference.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Sign an email-verification token; returns the token and its expiry so
    /// the caller can report a countdown deadline.
    pub fn sign_verification(
        &self,
        email: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let claims = VerificationClaims {
            email: email.to_string(),
            iat: now,
            exp: now + ttl,
        };
        Ok((self.sign(&claims)?, claims.exp))
    }

    /// Decode a verification token and validate its window against `now`.
    pub fn decode_verification(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<VerificationClaims, TokenError> {
        let claims: VerificationClaims = self.decode(token)?;
        crate::validate_window(claims.iat, claims.exp, now)?;
        Ok(claims)
    }

    /// Sign a session token for an active user.
    pub fn sign_session(
        &self,
        user_id: UserId,
        role: Role,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sub: user_id,
            role,
            iat: now,
            exp: now + ttl,
        };
        self.sign(&claims)
    }

    /// Decode a session token and validate its window against `now`.
    pub fn decode_session(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionClaims, TokenError> {
        let claims: SessionClaims = self.decode(token)?;
        crate::validate_window(claims.iat, claims.exp, now)?;
        Ok(claims)
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<T, TokenError> {
        // Window validation is ours; jsonwebtoken only checks the signature.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        jsonwebtoken::decode::<T>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
