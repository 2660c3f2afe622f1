//! `localiz-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod normalize;
pub mod page;
pub mod store;

pub use error::{DomainError, DomainResult};
pub use id::{BlogPostId, CategoryId, ContactMessageId, DealId, ListingId, RatingId, UserId};
pub use page::{Page, PageRequest};
pub use store::StoreError;
