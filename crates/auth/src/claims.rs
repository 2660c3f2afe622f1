use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use localiz_core::UserId;

use crate::{Role, TokenError};

/// Claims embedded in an email-verification token.
///
/// The email is the lookup key on confirmation: the pending record must match
/// both the decoded email and the exact token string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationClaims {
    pub email: String,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

/// Claims embedded in a session token (the `token` cookie).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject: the active user's id.
    pub sub: UserId,

    pub role: Role,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub iat: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_seconds")]
    pub exp: DateTime<Utc>,
}

/// Deterministically validate a token's time window.
///
/// Signature verification happens in [`crate::TokenCodec`]; this checks the
/// claims only. A token presented at exactly its expiry instant is expired
/// (`now >= exp`).
pub fn validate_window(
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), TokenError> {
    if expires_at <= issued_at {
        return Err(TokenError::InvalidTimeWindow);
    }
    if now < issued_at {
        return Err(TokenError::NotYetValid);
    }
    if now >= expires_at {
        return Err(TokenError::Expired);
    }
    Ok(())
}
