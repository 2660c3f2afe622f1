use async_trait::async_trait;

use localiz_core::{ContactMessageId, Page, PageRequest, StoreError};

use crate::ContactMessage;

#[async_trait]
pub trait ContactMessageStore: Send + Sync {
    async fn insert(&self, message: ContactMessage) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: ContactMessageId) -> Result<Option<ContactMessage>, StoreError>;

    /// Newest first; `archived` filters when set.
    async fn list(
        &self,
        page: PageRequest,
        archived: Option<bool>,
    ) -> Result<Page<ContactMessage>, StoreError>;

    /// Flip the archive flag. `NotFound` for unknown ids.
    async fn set_archived(&self, id: ContactMessageId, archived: bool) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
