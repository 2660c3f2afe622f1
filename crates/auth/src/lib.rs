//! `localiz-auth` — authentication primitives behind narrow seams.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how
//! to hash credentials, sign/decode tokens, and validate claim windows, and
//! nothing else.

pub mod claims;
pub mod password;
pub mod roles;
pub mod token;

pub use claims::{validate_window, SessionClaims, VerificationClaims};
pub use password::{Argon2Hasher, CredentialHasher, HashError};
pub use roles::Role;
pub use token::{TokenCodec, TokenError};
