use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use localiz_core::{normalize, BlogPostId, DomainError, UserId};

const MIN_TITLE_LEN: usize = 3;
const MIN_CONTENT_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: BlogPostId,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlogPostDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

impl BlogPostDraft {
    pub fn into_post(self, author: UserId, now: DateTime<Utc>) -> Result<BlogPost, DomainError> {
        let title = normalize::text(self.title.as_deref().unwrap_or_default());
        let content = normalize::text(self.content.as_deref().unwrap_or_default());

        if title.len() < MIN_TITLE_LEN {
            return Err(DomainError::validation(format!(
                "title must be at least {MIN_TITLE_LEN} characters"
            )));
        }
        if content.len() < MIN_CONTENT_LEN {
            return Err(DomainError::validation(format!(
                "content must be at least {MIN_CONTENT_LEN} characters"
            )));
        }

        Ok(BlogPost {
            id: BlogPostId::new(),
            title,
            content,
            image: self.image.map(|i| normalize::text(&i)).filter(|i| !i.is_empty()),
            author,
            created_at: now,
        })
    }
}
