//! Shared in-crate test doubles for the store and hashing seams.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use localiz_auth::{CredentialHasher, HashError};
use localiz_core::{Page, PageRequest, UserId};

use crate::store::{ActiveUserStore, PendingRegistrationStore, StoreError};
use crate::{ActiveUser, PendingRegistration};

/// Vec-backed pending store with the same unique/TTL semantics as the
/// production in-memory store.
#[derive(Default)]
pub(crate) struct FakePendingStore {
    rows: Mutex<Vec<PendingRegistration>>,
}

#[async_trait]
impl PendingRegistrationStore for FakePendingStore {
    async fn insert(&self, pending: PendingRegistration) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.email == pending.email) {
            return Err(StoreError::DuplicateKey { field: "email".into() });
        }
        if rows.iter().any(|r| r.username == pending.username) {
            return Err(StoreError::DuplicateKey { field: "username".into() });
        }
        rows.push(pending);
        Ok(())
    }

    async fn find_by_email(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingRegistration>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.email == email && !r.is_expired(now))
            .cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingRegistration>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.username == username && !r.is_expired(now))
            .cloned())
    }

    async fn find_by_email_and_token(
        &self,
        email: &str,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<PendingRegistration>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.email == email && r.verification_token == token && !r.is_expired(now))
            .cloned())
    }

    async fn delete_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.email != email);
        Ok(rows.len() < before)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !r.is_expired(now));
        Ok(before - rows.len())
    }

    async fn count(&self, now: DateTime<Utc>) -> Result<u64, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| !r.is_expired(now))
            .count() as u64)
    }
}

#[derive(Default)]
pub(crate) struct FakeUserStore {
    rows: Mutex<Vec<ActiveUser>>,
}

#[async_trait]
impl ActiveUserStore for FakeUserStore {
    async fn insert(&self, user: ActiveUser) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|r| r.email == user.email) {
            return Err(StoreError::DuplicateKey { field: "email".into() });
        }
        if rows.iter().any(|r| r.username == user.username) {
            return Err(StoreError::DuplicateKey { field: "username".into() });
        }
        rows.push(user);
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<ActiveUser>, StoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<ActiveUser>, StoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<ActiveUser>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.username == username)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<ActiveUser>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.phone.as_deref() == Some(phone))
            .cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<ActiveUser>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn update(&self, user: ActiveUser) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.id == user.id) {
            Some(slot) => {
                *slot = user;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| r.id != id);
        Ok(rows.len() < before)
    }

    async fn list(&self, page: PageRequest) -> Result<Page<ActiveUser>, StoreError> {
        let rows = self.rows.lock().unwrap();
        let items = rows
            .iter()
            .skip(page.offset())
            .take(page.limit)
            .cloned()
            .collect();
        Ok(Page::new(items, rows.len(), page))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }
}

/// Deterministic, cheap stand-in for Argon2.
pub(crate) struct FakeHasher;

impl CredentialHasher for FakeHasher {
    fn hash(&self, password: &str) -> Result<String, HashError> {
        Ok(format!("hashed:{password}"))
    }

    fn verify(&self, password: &str, stored: &str) -> Result<bool, HashError> {
        Ok(stored == format!("hashed:{password}"))
    }
}
