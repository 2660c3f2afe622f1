use async_trait::async_trait;

use localiz_core::{DealId, Page, PageRequest, StoreError, UserId};

use crate::Deal;

#[async_trait]
pub trait DealStore: Send + Sync {
    async fn insert(&self, deal: Deal) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: DealId) -> Result<Option<Deal>, StoreError>;

    async fn update(&self, deal: Deal) -> Result<(), StoreError>;

    async fn delete(&self, id: DealId) -> Result<bool, StoreError>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<Deal>, StoreError>;

    async fn delete_by_author(&self, author: UserId) -> Result<usize, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
