use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use localiz_categories::{Category, CategoryKind, CategoryStore};
use localiz_core::{CategoryId, StoreError};

use super::{read, write};

#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    rows: RwLock<HashMap<CategoryId, Category>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(rows: Vec<Category>) -> Vec<Category> {
        let mut rows = rows;
        rows.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
        rows
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn insert(&self, category: Category) -> Result<(), StoreError> {
        let mut rows = write(&self.rows)?;
        if rows
            .values()
            .any(|c| c.kind == category.kind && c.name == category.name)
        {
            return Err(StoreError::DuplicateKey { field: "name".into() });
        }
        rows.insert(category.id, category);
        Ok(())
    }

    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        Ok(read(&self.rows)?.get(&id).cloned())
    }

    async fn update(&self, category: Category) -> Result<(), StoreError> {
        let mut rows = write(&self.rows)?;
        if !rows.contains_key(&category.id) {
            return Err(StoreError::NotFound);
        }
        if rows
            .values()
            .any(|c| c.id != category.id && c.kind == category.kind && c.name == category.name)
        {
            return Err(StoreError::DuplicateKey { field: "name".into() });
        }
        rows.insert(category.id, category);
        Ok(())
    }

    async fn list_active(&self, kind: CategoryKind) -> Result<Vec<Category>, StoreError> {
        let rows = read(&self.rows)?;
        Ok(Self::sorted(
            rows.values()
                .filter(|c| c.kind == kind && c.active)
                .cloned()
                .collect(),
        ))
    }

    async fn list_all(&self, kind: CategoryKind) -> Result<Vec<Category>, StoreError> {
        let rows = read(&self.rows)?;
        Ok(Self::sorted(
            rows.values().filter(|c| c.kind == kind).cloned().collect(),
        ))
    }

    async fn reorder(&self, kind: CategoryKind, ids: &[CategoryId]) -> Result<(), StoreError> {
        let mut rows = write(&self.rows)?;

        // Listed ids first, in the given order; the rest keep their relative
        // order after them.
        let mut next = 0u32;
        for id in ids {
            if let Some(cat) = rows.get_mut(id) {
                if cat.kind == kind {
                    cat.order = next;
                    next += 1;
                }
            }
        }

        let mut leftovers: Vec<CategoryId> = rows
            .values()
            .filter(|c| c.kind == kind && !ids.contains(&c.id))
            .map(|c| c.id)
            .collect();
        leftovers.sort_by_key(|id| rows.get(id).map(|c| c.order).unwrap_or(u32::MAX));
        for id in leftovers {
            if let Some(cat) = rows.get_mut(&id) {
                cat.order = next;
                next += 1;
            }
        }
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(read(&self.rows)?.len() as u64)
    }
}
