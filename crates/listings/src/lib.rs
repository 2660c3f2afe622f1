//! `localiz-listings` — swap and donation listings between neighbours.

pub mod listing;
pub mod store;

pub use listing::{
    Condition, Listing, ListingDraft, ListingKind, ListingLocation, ListingPatch, ListingStatus,
};
pub use store::ListingStore;
