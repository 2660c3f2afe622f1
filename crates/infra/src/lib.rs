//! `localiz-infra` — store implementations and background plumbing.
//!
//! Everything here is in-memory: `RwLock<HashMap>` maps with the same
//! unique-index and TTL semantics a document database would enforce, so the
//! domain crates and the API behave identically when a real driver replaces
//! this layer.

pub mod janitor;
pub mod memory;
pub mod postal;

pub use janitor::spawn_pending_janitor;
pub use memory::{
    InMemoryBlogPostStore, InMemoryCategoryStore, InMemoryContactMessageStore, InMemoryDealStore,
    InMemoryListingStore, InMemoryPendingStore, InMemoryRatingStore, InMemoryUserStore,
};
pub use postal::{PostalCodeEntry, PostalDirectory};
