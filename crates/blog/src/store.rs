use async_trait::async_trait;

use localiz_core::{BlogPostId, Page, PageRequest, StoreError};

use crate::BlogPost;

#[async_trait]
pub trait BlogPostStore: Send + Sync {
    async fn insert(&self, post: BlogPost) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: BlogPostId) -> Result<Option<BlogPost>, StoreError>;

    async fn delete(&self, id: BlogPostId) -> Result<bool, StoreError>;

    /// Newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<BlogPost>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
