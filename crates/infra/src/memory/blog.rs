use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use localiz_blog::{BlogPost, BlogPostStore};
use localiz_core::{BlogPostId, Page, PageRequest, StoreError};

use super::{read, write};

#[derive(Debug, Default)]
pub struct InMemoryBlogPostStore {
    rows: RwLock<HashMap<BlogPostId, BlogPost>>,
}

impl InMemoryBlogPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogPostStore for InMemoryBlogPostStore {
    async fn insert(&self, post: BlogPost) -> Result<(), StoreError> {
        write(&self.rows)?.insert(post.id, post);
        Ok(())
    }

    async fn find_by_id(&self, id: BlogPostId) -> Result<Option<BlogPost>, StoreError> {
        Ok(read(&self.rows)?.get(&id).cloned())
    }

    async fn delete(&self, id: BlogPostId) -> Result<bool, StoreError> {
        Ok(write(&self.rows)?.remove(&id).is_some())
    }

    async fn list(&self, page: PageRequest) -> Result<Page<BlogPost>, StoreError> {
        let rows = read(&self.rows)?;
        let mut all: Vec<BlogPost> = rows.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = all.len();
        let items = all
            .into_iter()
            .skip(page.offset())
            .take(page.limit)
            .collect();
        Ok(Page::new(items, total, page))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(read(&self.rows)?.len() as u64)
    }
}
