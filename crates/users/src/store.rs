//! Storage boundaries for the two account stores.
//!
//! Implementations live in `localiz-infra`. Uniqueness is enforced by the
//! store at insert time; orchestrator pre-checks only improve error messages,
//! the insert's `DuplicateKey` is the source of truth.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use localiz_core::{Page, PageRequest, UserId};

use crate::{ActiveUser, PendingRegistration};

pub use localiz_core::StoreError;

/// Pending registrations, keyed by email, with TTL semantics.
///
/// Lookups take `now` and must treat rows at or past `expires_at` as absent,
/// even before [`purge_expired`](Self::purge_expired) physically removes them.
#[async_trait]
pub trait PendingRegistrationStore: Send + Sync {
    async fn insert(&self, pending: PendingRegistration) -> Result<(), StoreError>;

    async fn find_by_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingRegistration>, StoreError>;

    async fn find_by_username(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingRegistration>, StoreError>;

    /// Confirmation lookup: both the email and the exact token must match.
    async fn find_by_email_and_token(
        &self,
        email: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingRegistration>, StoreError>;

    /// Returns whether a row was actually removed.
    async fn delete_by_email(&self, email: &str) -> Result<bool, StoreError>;

    /// Physically remove expired rows; returns how many were purged.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError>;

    async fn count(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}

/// Confirmed accounts.
#[async_trait]
pub trait ActiveUserStore: Send + Sync {
    async fn insert(&self, user: ActiveUser) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<ActiveUser>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<ActiveUser>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<ActiveUser>, StoreError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<ActiveUser>, StoreError>;

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<ActiveUser>, StoreError>;

    /// Replace the stored record for `user.id`. `NotFound` if it was deleted.
    async fn update(&self, user: ActiveUser) -> Result<(), StoreError>;

    async fn delete(&self, id: UserId) -> Result<bool, StoreError>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<ActiveUser>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
