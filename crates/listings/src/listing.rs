use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use localiz_core::{normalize, DomainError, ListingId, UserId};

const MIN_DESCRIPTION_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    LikeNew,
    Used,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Swap,
    Donate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Available,
    Reserved,
    Completed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingLocation {
    pub address: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    pub condition: Condition,
    pub kind: ListingKind,
    pub owner: UserId,
    pub tags: Vec<String>,
    pub published: bool,
    pub status: ListingStatus,
    pub location: ListingLocation,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn can_modify(&self, user: UserId, is_admin: bool) -> bool {
        is_admin || self.owner == user
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub condition: Option<Condition>,
    pub kind: Option<ListingKind>,
    pub tags: Option<Vec<String>>,
    pub location: Option<ListingLocation>,
}

impl ListingDraft {
    pub fn into_listing(self, owner: UserId, now: DateTime<Utc>) -> Result<Listing, DomainError> {
        let mut missing = Vec::new();
        if self.title.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("title");
        }
        if self.kind.is_none() {
            missing.push("kind");
        }
        if self.description.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("description");
        }
        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let images: Vec<String> = self
            .images
            .unwrap_or_default()
            .into_iter()
            .map(|i| normalize::text(&i))
            .filter(|i| !i.is_empty())
            .collect();
        if images.is_empty() {
            return Err(DomainError::validation("at least one image is required"));
        }

        let description = normalize::text(self.description.as_deref().unwrap_or_default());
        if description.len() < MIN_DESCRIPTION_LEN {
            return Err(DomainError::validation(format!(
                "description must be at least {MIN_DESCRIPTION_LEN} characters"
            )));
        }

        Ok(Listing {
            id: ListingId::new(),
            title: normalize::text(self.title.as_deref().unwrap_or_default()),
            description,
            images,
            condition: self.condition.unwrap_or(Condition::Used),
            kind: self.kind.unwrap_or(ListingKind::Donate),
            owner,
            tags: self.tags.unwrap_or_default(),
            published: true,
            status: ListingStatus::Available,
            location: self.location.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub condition: Option<Condition>,
    pub tags: Option<Vec<String>>,
    pub published: Option<bool>,
    pub status: Option<ListingStatus>,
    pub location: Option<ListingLocation>,
}

impl ListingPatch {
    pub fn apply(self, listing: &mut Listing, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(title) = self.title {
            let title = normalize::text(&title);
            if title.is_empty() {
                return Err(DomainError::validation("title cannot be empty"));
            }
            listing.title = title;
        }
        if let Some(description) = self.description {
            let description = normalize::text(&description);
            if description.len() < MIN_DESCRIPTION_LEN {
                return Err(DomainError::validation(format!(
                    "description must be at least {MIN_DESCRIPTION_LEN} characters"
                )));
            }
            listing.description = description;
        }
        if let Some(images) = self.images {
            let images: Vec<String> = images
                .into_iter()
                .map(|i| normalize::text(&i))
                .filter(|i| !i.is_empty())
                .collect();
            if images.is_empty() {
                return Err(DomainError::validation("at least one image is required"));
            }
            listing.images = images;
        }
        if let Some(condition) = self.condition {
            listing.condition = condition;
        }
        if let Some(tags) = self.tags {
            listing.tags = tags;
        }
        if let Some(published) = self.published {
            listing.published = published;
        }
        if let Some(status) = self.status {
            listing.status = status;
        }
        if let Some(location) = self.location {
            listing.location = location;
        }
        listing.updated_at = now;
        Ok(())
    }
}
