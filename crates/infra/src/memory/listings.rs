use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use localiz_core::{ListingId, Page, PageRequest, StoreError, UserId};
use localiz_listings::{Listing, ListingStore};

use super::{read, write};

#[derive(Debug, Default)]
pub struct InMemoryListingStore {
    rows: RwLock<HashMap<ListingId, Listing>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingStore for InMemoryListingStore {
    async fn insert(&self, listing: Listing) -> Result<(), StoreError> {
        write(&self.rows)?.insert(listing.id, listing);
        Ok(())
    }

    async fn find_by_id(&self, id: ListingId) -> Result<Option<Listing>, StoreError> {
        Ok(read(&self.rows)?.get(&id).cloned())
    }

    async fn update(&self, listing: Listing) -> Result<(), StoreError> {
        let mut rows = write(&self.rows)?;
        if !rows.contains_key(&listing.id) {
            return Err(StoreError::NotFound);
        }
        rows.insert(listing.id, listing);
        Ok(())
    }

    async fn delete(&self, id: ListingId) -> Result<bool, StoreError> {
        Ok(write(&self.rows)?.remove(&id).is_some())
    }

    async fn list_published(&self, page: PageRequest) -> Result<Page<Listing>, StoreError> {
        let rows = read(&self.rows)?;
        let mut all: Vec<Listing> = rows.values().filter(|l| l.published).cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = all.len();
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.limit)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn delete_by_owner(&self, owner: UserId) -> Result<usize, StoreError> {
        let mut rows = write(&self.rows)?;
        let before = rows.len();
        rows.retain(|_, l| l.owner != owner);
        Ok(before - rows.len())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(read(&self.rows)?.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use localiz_listings::{ListingDraft, ListingKind, ListingPatch};

    fn listing(owner: UserId) -> Listing {
        ListingDraft {
            title: Some("Table basse".into()),
            description: Some("Table basse en chêne, à venir chercher sur place.".into()),
            images: Some(vec!["table.jpg".into()]),
            kind: Some(ListingKind::Donate),
            ..ListingDraft::default()
        }
        .into_listing(owner, Utc::now())
        .unwrap()
    }

    #[tokio::test]
    async fn unpublished_listings_are_hidden_from_the_public_list() {
        let store = InMemoryListingStore::new();
        let mut hidden = listing(UserId::new());
        ListingPatch {
            published: Some(false),
            ..ListingPatch::default()
        }
        .apply(&mut hidden, Utc::now())
        .unwrap();

        store.insert(listing(UserId::new())).await.unwrap();
        store.insert(hidden).await.unwrap();

        let page = store.list_published(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(store.count().await.unwrap(), 2);
    }
}
