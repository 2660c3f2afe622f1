use async_trait::async_trait;

use localiz_core::{StoreError, UserId};

use crate::{Rating, RatingStats};

#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Insert or replace the author's rating of the target (upsert).
    async fn upsert(&self, rating: Rating) -> Result<(), StoreError>;

    async fn find(
        &self,
        author: UserId,
        target_user: UserId,
    ) -> Result<Option<Rating>, StoreError>;

    /// Returns whether a rating was removed.
    async fn delete(&self, author: UserId, target_user: UserId) -> Result<bool, StoreError>;

    async fn stats_for(&self, target_user: UserId) -> Result<RatingStats, StoreError>;

    /// Remove everything a departing user authored or received.
    async fn delete_involving(&self, user: UserId) -> Result<usize, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
