//! In-memory store implementations.
//!
//! Each store is a `RwLock`-guarded map. Unique indexes are checked under the
//! write lock, so an insert either fully lands or fails with `DuplicateKey`;
//! concurrent same-key inserts cannot both succeed.

mod blog;
mod categories;
mod contact;
mod deals;
mod listings;
mod ratings;
mod users;

pub use blog::InMemoryBlogPostStore;
pub use categories::InMemoryCategoryStore;
pub use contact::InMemoryContactMessageStore;
pub use deals::InMemoryDealStore;
pub use listings::InMemoryListingStore;
pub use ratings::InMemoryRatingStore;
pub use users::{InMemoryPendingStore, InMemoryUserStore};

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use localiz_core::StoreError;

pub(crate) fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, StoreError> {
    lock.read()
        .map_err(|_| StoreError::Backend("store lock poisoned".into()))
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, StoreError> {
    lock.write()
        .map_err(|_| StoreError::Backend("store lock poisoned".into()))
}
