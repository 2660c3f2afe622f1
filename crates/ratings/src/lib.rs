//! `localiz-ratings` — user-profile ratings, one per (author, target) pair.

pub mod rating;
pub mod store;

pub use rating::{Rating, RatingStats};
pub use store::RatingStore;
