use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use localiz_core::{Page, PageRequest, StoreError, UserId};
use localiz_users::{ActiveUser, ActiveUserStore, PendingRegistration, PendingRegistrationStore};

use super::{read, write};

/// Pending registrations keyed by email.
///
/// TTL is logical first, physical second: every lookup filters rows whose
/// `expires_at` has passed, and the janitor periodically calls
/// `purge_expired` to reclaim the memory (and the unique keys).
#[derive(Debug, Default)]
pub struct InMemoryPendingStore {
    rows: RwLock<HashMap<String, PendingRegistration>>,
}

impl InMemoryPendingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PendingRegistrationStore for InMemoryPendingStore {
    async fn insert(&self, pending: PendingRegistration) -> Result<(), StoreError> {
        let mut rows = write(&self.rows)?;
        if rows.contains_key(&pending.email) {
            return Err(StoreError::DuplicateKey { field: "email".into() });
        }
        if rows.values().any(|r| r.username == pending.username) {
            return Err(StoreError::DuplicateKey { field: "username".into() });
        }
        rows.insert(pending.email.clone(), pending);
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingRegistration>, StoreError> {
        let rows = read(&self.rows)?;
        Ok(rows.get(email).filter(|r| !r.is_expired(now)).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingRegistration>, StoreError> {
        let rows = read(&self.rows)?;
        Ok(rows
            .values()
            .find(|r| r.username == username && !r.is_expired(now))
            .cloned())
    }

    async fn find_by_email_and_token(
        &self,
        email: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingRegistration>, StoreError> {
        let rows = read(&self.rows)?;
        Ok(rows
            .get(email)
            .filter(|r| r.verification_token == token && !r.is_expired(now))
            .cloned())
    }

    async fn delete_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let mut rows = write(&self.rows)?;
        Ok(rows.remove(email).is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut rows = write(&self.rows)?;
        let before = rows.len();
        rows.retain(|_, r| !r.is_expired(now));
        Ok(before - rows.len())
    }

    async fn count(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        let rows = read(&self.rows)?;
        Ok(rows.values().filter(|r| !r.is_expired(now)).count() as u64)
    }
}

/// Confirmed accounts keyed by id, with unique email/username/phone indexes.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    rows: RwLock<HashMap<UserId, ActiveUser>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActiveUserStore for InMemoryUserStore {
    async fn insert(&self, user: ActiveUser) -> Result<(), StoreError> {
        let mut rows = write(&self.rows)?;
        if rows.values().any(|r| r.email == user.email) {
            return Err(StoreError::DuplicateKey { field: "email".into() });
        }
        if rows.values().any(|r| r.username == user.username) {
            return Err(StoreError::DuplicateKey { field: "username".into() });
        }
        if let Some(phone) = user.phone.as_deref() {
            if rows.values().any(|r| r.phone.as_deref() == Some(phone)) {
                return Err(StoreError::DuplicateKey { field: "phone".into() });
            }
        }
        rows.insert(user.id, user);
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<ActiveUser>, StoreError> {
        Ok(read(&self.rows)?.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<ActiveUser>, StoreError> {
        Ok(read(&self.rows)?.values().find(|r| r.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<ActiveUser>, StoreError> {
        Ok(read(&self.rows)?
            .values()
            .find(|r| r.username == username)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<ActiveUser>, StoreError> {
        Ok(read(&self.rows)?
            .values()
            .find(|r| r.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<ActiveUser>, StoreError> {
        Ok(read(&self.rows)?
            .values()
            .find(|r| r.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn update(&self, user: ActiveUser) -> Result<(), StoreError> {
        let mut rows = write(&self.rows)?;
        if !rows.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }
        rows.insert(user.id, user);
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(write(&self.rows)?.remove(&id).is_some())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<ActiveUser>, StoreError> {
        let rows = read(&self.rows)?;
        let mut all: Vec<ActiveUser> = rows.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = all.len();
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.limit)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(read(&self.rows)?.len() as u64)
    }
}
