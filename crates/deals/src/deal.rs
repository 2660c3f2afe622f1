use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use localiz_core::{normalize, DomainError, DealId, UserId};

const MIN_DESCRIPTION_LEN: usize = 20;

/// Where the deal happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealLocation {
    pub name: Option<String>,
    pub address: Option<String>,
    pub zone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Free,
    Paid,
    Reservation,
    Reduction,
}

/// How the deal is accessed; `price` only makes sense for paid deals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Access {
    pub kind: AccessKind,
    pub price: Option<f64>,
}

impl Default for Access {
    fn default() -> Self {
        Self {
            kind: AccessKind::Free,
            price: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Open,
    Hidden,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: DealId,
    pub image: String,
    pub title: String,
    pub location: DealLocation,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub access: Access,
    pub website: Option<String>,
    pub description: String,
    pub author: UserId,
    pub tags: Vec<String>,
    pub status: DealStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    /// Mutation is restricted to the author, unless the caller is an admin.
    pub fn can_modify(&self, user: UserId, is_admin: bool) -> bool {
        is_admin || self.author == user
    }
}

/// Creation payload; validated into a [`Deal`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealDraft {
    pub image: Option<String>,
    pub title: Option<String>,
    pub location: Option<DealLocation>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub access: Option<Access>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl DealDraft {
    pub fn into_deal(self, author: UserId, now: DateTime<Utc>) -> Result<Deal, DomainError> {
        let mut missing = Vec::new();
        if self.image.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("image");
        }
        if self.title.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("title");
        }
        if self.start_date.is_none() {
            missing.push("startDate");
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

        let description = normalize::text(self.description.as_deref().unwrap_or_default());
        if description.len() < MIN_DESCRIPTION_LEN {
            return Err(DomainError::validation(format!(
                "description must be at least {MIN_DESCRIPTION_LEN} characters"
            )));
        }

        let start_date = self.start_date.unwrap_or_default();
        if let Some(end) = self.end_date {
            if end < start_date {
                return Err(DomainError::validation("endDate is before startDate"));
            }
        }

        Ok(Deal {
            id: DealId::new(),
            image: normalize::text(self.image.as_deref().unwrap_or_default()),
            title: normalize::text(self.title.as_deref().unwrap_or_default()),
            location: self.location.unwrap_or_default(),
            start_date,
            end_date: self.end_date,
            access: self.access.unwrap_or_default(),
            website: self.website.map(|w| normalize::text(&w)),
            description,
            author,
            tags: self.tags.unwrap_or_default(),
            status: DealStatus::Open,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealPatch {
    pub image: Option<String>,
    pub title: Option<String>,
    pub location: Option<DealLocation>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub access: Option<Access>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<DealStatus>,
}

impl DealPatch {
    pub fn apply(self, deal: &mut Deal, now: DateTime<Utc>) -> Result<(), DomainError> {
        if let Some(description) = self.description {
            let description = normalize::text(&description);
            if description.len() < MIN_DESCRIPTION_LEN {
                return Err(DomainError::validation(format!(
                    "description must be at least {MIN_DESCRIPTION_LEN} characters"
                )));
            }
            deal.description = description;
        }
        if let Some(title) = self.title {
            let title = normalize::text(&title);
            if title.is_empty() {
                return Err(DomainError::validation("title cannot be empty"));
            }
            deal.title = title;
        }
        if let Some(image) = self.image {
            deal.image = normalize::text(&image);
        }
        if let Some(location) = self.location {
            deal.location = location;
        }
        if let Some(start) = self.start_date {
            deal.start_date = start;
        }
        if let Some(end) = self.end_date {
            deal.end_date = Some(end);
        }
        if let Some(end) = deal.end_date {
            if end < deal.start_date {
                return Err(DomainError::validation("endDate is before startDate"));
            }
        }
        if let Some(access) = self.access {
            deal.access = access;
        }
        if let Some(website) = self.website {
            deal.website = Some(normalize::text(&website));
        }
        if let Some(tags) = self.tags {
            deal.tags = tags;
        }
        if let Some(status) = self.status {
            deal.status = status;
        }
        deal.updated_at = now;
        Ok(())
    }
}
