use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use localiz_core::{StoreError, UserId};
use localiz_ratings::{Rating, RatingStats, RatingStore};

use super::{read, write};

/// Keyed by (author, target): the map itself is the per-pair unique index, so
/// a repeat rating replaces the previous one.
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    rows: RwLock<HashMap<(UserId, UserId), Rating>>,
}

impl InMemoryRatingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn upsert(&self, rating: Rating) -> Result<(), StoreError> {
        write(&self.rows)?.insert((rating.author, rating.target_user), rating);
        Ok(())
    }

    async fn find(
        &self,
        author: UserId,
        target_user: UserId,
    ) -> Result<Option<Rating>, StoreError> {
        Ok(read(&self.rows)?.get(&(author, target_user)).cloned())
    }

    async fn delete(&self, author: UserId, target_user: UserId) -> Result<bool, StoreError> {
        Ok(write(&self.rows)?.remove(&(author, target_user)).is_some())
    }

    async fn stats_for(&self, target_user: UserId) -> Result<RatingStats, StoreError> {
        let rows = read(&self.rows)?;
        let values: Vec<u8> = rows
            .values()
            .filter(|r| r.target_user == target_user)
            .map(|r| r.value)
            .collect();
        Ok(RatingStats::from_values(&values))
    }

    async fn delete_involving(&self, user: UserId) -> Result<usize, StoreError> {
        let mut rows = write(&self.rows)?;
        let before = rows.len();
        rows.retain(|_, r| r.author != user && r.target_user != user);
        Ok(before - rows.len())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(read(&self.rows)?.len() as u64)
    }
}
