use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use localiz_core::{DealId, Page, PageRequest, StoreError, UserId};
use localiz_deals::{Deal, DealStore};

use super::{read, write};

#[derive(Debug, Default)]
pub struct InMemoryDealStore {
    rows: RwLock<HashMap<DealId, Deal>>,
}

impl InMemoryDealStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DealStore for InMemoryDealStore {
    async fn insert(&self, deal: Deal) -> Result<(), StoreError> {
        write(&self.rows)?.insert(deal.id, deal);
        Ok(())
    }

    async fn find_by_id(&self, id: DealId) -> Result<Option<Deal>, StoreError> {
        Ok(read(&self.rows)?.get(&id).cloned())
    }

    async fn update(&self, deal: Deal) -> Result<(), StoreError> {
        let mut rows = write(&self.rows)?;
        if !rows.contains_key(&deal.id) {
            return Err(StoreError::NotFound);
        }
        rows.insert(deal.id, deal);
        Ok(())
    }

    async fn delete(&self, id: DealId) -> Result<bool, StoreError> {
        Ok(write(&self.rows)?.remove(&id).is_some())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Deal>, StoreError> {
        let rows = read(&self.rows)?;
        let mut all: Vec<Deal> = rows.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = all.len();
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.limit)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn delete_by_author(&self, author: UserId) -> Result<usize, StoreError> {
        let mut rows = write(&self.rows)?;
        let before = rows.len();
        rows.retain(|_, d| d.author != author);
        Ok(before - rows.len())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(read(&self.rows)?.len() as u64)
    }
}
