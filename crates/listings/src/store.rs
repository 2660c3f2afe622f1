use async_trait::async_trait;

use localiz_core::{ListingId, Page, PageRequest, StoreError, UserId};

use crate::Listing;

#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn insert(&self, listing: Listing) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError>;

    async fn update(&self, listing: Listing) -> Result<(), StoreError>;

    async fn delete(&self, id: ListingId) -> Result<bool, StoreError>;

    /// Published listings only, newest first.
    async fn list_published(&self, page: PageRequest) -> Result<Page<Listing>, StoreError>;

    async fn delete_by_owner(&self, owner: UserId) -> Result<usize, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
