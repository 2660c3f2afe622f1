use async_trait::async_trait;

use localiz_core::{CategoryId, StoreError};

use crate::{Category, CategoryKind};

#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Names are a unique index per kind.
    async fn insert(&self, category: Category) -> Result<(), StoreError>;

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    async fn update(&self, category: Category) -> Result<(), StoreError>;

    /// Active categories of one kind, ordered by `order` then name.
    async fn list_active(&self, kind: CategoryKind) -> Result<Vec<Category>, StoreError>;

    /// Every category of one kind, same ordering, for the admin surface.
    async fn list_all(&self, kind: CategoryKind) -> Result<Vec<Category>, StoreError>;

    /// Assign sequential `order` values following the given id order. Ids not
    /// in the list keep their position after the reordered ones.
    async fn reorder(&self, kind: CategoryKind, ids: &[CategoryId]) -> Result<(), StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}
