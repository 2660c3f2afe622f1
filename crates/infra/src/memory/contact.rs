use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use localiz_contact::{ContactMessage, ContactMessageStore};
use localiz_core::{ContactMessageId, Page, PageRequest, StoreError};

use super::{read, write};

#[derive(Debug, Default)]
pub struct InMemoryContactMessageStore {
    rows: RwLock<HashMap<ContactMessageId, ContactMessage>>,
}

impl InMemoryContactMessageStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactMessageStore for InMemoryContactMessageStore {
    async fn insert(&self, message: ContactMessage) -> Result<(), StoreError> {
        write(&self.rows)?.insert(message.id, message);
        Ok(())
    }

    async fn find_by_id(&self, id: ContactMessageId) -> Result<Option<ContactMessage>, StoreError> {
        Ok(read(&self.rows)?.get(&id).cloned())
    }

    async fn list(
        &self,
        page: PageRequest,
        archived: Option<bool>,
    ) -> Result<Page<ContactMessage>, StoreError> {
        let rows = read(&self.rows)?;
        let mut all: Vec<ContactMessage> = rows
            .values()
            .filter(|m| archived.is_none_or(|a| m.archived == a))
            .cloned()
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = all.len();
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.limit)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn set_archived(&self, id: ContactMessageId, archived: bool) -> Result<(), StoreError> {
        let mut rows = write(&self.rows)?;
        match rows.get_mut(&id) {
            Some(message) => {
                message.archived = archived;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(read(&self.rows)?.len() as u64)
    }
}
