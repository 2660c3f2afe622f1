//! `localiz-deals` — local deal listings (events, promos, good plans).

pub mod deal;
pub mod store;

pub use deal::{Access, AccessKind, Deal, DealDraft, DealLocation, DealPatch, DealStatus};
pub use store::DealStore;
