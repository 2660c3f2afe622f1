use thiserror::Error;

use localiz_auth::{HashError, TokenError};

use crate::StoreError;

/// Everything that can go wrong between submission and confirmation.
///
/// The first group is user-facing validation (mapped to 400-class responses);
/// `TokenExpired` maps to 410; the trailing variants are internal faults that
/// surface as a generic 500.
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("terms of service must be accepted")]
    ConsentRequired,

    #[error("{field} contains a forbidden word")]
    ForbiddenContent { field: &'static str },

    #[error("invalid email address")]
    InvalidEmail,

    #[error("password must be at least 8 characters")]
    WeakPassword,

    #[error("birthday could not be parsed")]
    InvalidBirthday,

    #[error("you must be at least 16 years old to register")]
    UnderageRegistrant,

    #[error("an account already exists for this email or username")]
    AlreadyRegistered,

    #[error("a registration is already awaiting confirmation")]
    ConfirmationPending,

    #[error("duplicate value for unique field `{0}`")]
    DuplicateKey(String),

    #[error("invalid confirmation token")]
    InvalidToken,

    #[error("confirmation token has expired")]
    TokenExpired,

    #[error(transparent)]
    Store(StoreError),

    #[error("password hashing failed")]
    Hash(#[from] HashError),

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field } => RegistrationError::DuplicateKey(field),
            other => RegistrationError::Store(other),
        }
    }
}

impl From<TokenError> for RegistrationError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => RegistrationError::TokenExpired,
            TokenError::Encode(msg) => RegistrationError::Signing(msg),
            // NotYetValid / InvalidTimeWindow / Invalid all look the same to
            // the caller: the token is not usable.
            _ => RegistrationError::InvalidToken,
        }
    }
}
