//! Error surface shared by every store trait.
//!
//! The traits themselves live with their domain crates; implementations live
//! in `localiz-infra`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A unique index rejected the write; `field` names the conflicting key.
    #[error("duplicate value for unique field `{field}`")]
    DuplicateKey { field: String },

    #[error("record not found")]
    NotFound,

    #[error("store backend error: {0}")]
    Backend(String),
}
