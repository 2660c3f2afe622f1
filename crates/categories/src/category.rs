use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use localiz_core::{normalize, CategoryId, DomainError};

const MAX_NAME_LEN: usize = 100;

/// Which entity the category applies to. Names are unique per kind, not
/// globally: "Vélos" can exist for both deals and listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Deal,
    Listing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub kind: CategoryKind,
    pub name: String,
    pub order: u32,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(
        kind: CategoryKind,
        name: &str,
        order: u32,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let name = normalize::text(name);
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "name cannot exceed {MAX_NAME_LEN} characters"
            )));
        }
        Ok(Self {
            id: CategoryId::new(),
            kind,
            name,
            order,
            active: true,
            created_at: now,
        })
    }

    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        let name = normalize::text(name);
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(DomainError::validation("invalid category name"));
        }
        self.name = name;
        Ok(())
    }
}
