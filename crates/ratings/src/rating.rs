use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use localiz_core::{DomainError, RatingId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: RatingId,
    pub author: UserId,
    pub target_user: UserId,
    pub value: u8,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    /// `value` must be 1..=5 and users cannot rate themselves.
    pub fn new(
        author: UserId,
        target_user: UserId,
        value: u8,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !(1..=5).contains(&value) {
            return Err(DomainError::validation("rating must be between 1 and 5"));
        }
        if author == target_user {
            return Err(DomainError::validation("you cannot rate yourself"));
        }
        Ok(Self {
            id: RatingId::new(),
            author,
            target_user,
            value,
            created_at: now,
        })
    }
}

/// Public aggregate for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    pub count: u64,
    pub average: f64,
}

impl RatingStats {
    pub fn from_values(values: &[u8]) -> Self {
        if values.is_empty() {
            return Self {
                count: 0,
                average: 0.0,
            };
        }
        let sum: u64 = values.iter().map(|v| u64::from(*v)).sum();
        Self {
            count: values.len() as u64,
            average: sum as f64 / values.len() as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_bounds_are_enforced() {
        let now = Utc::now();
        assert!(Rating::new(UserId::new(), UserId::new(), 0, now).is_err());
        assert!(Rating::new(UserId::new(), UserId::new(), 6, now).is_err());
        assert!(Rating::new(UserId::new(), UserId::new(), 1, now).is_ok());
        assert!(Rating::new(UserId::new(), UserId::new(), 5, now).is_ok());
    }

    #[test]
    fn self_rating_is_rejected() {
        let me = UserId::new();
        assert!(Rating::new(me, me, 5, Utc::now()).is_err());
    }

    #[test]
    fn stats_average() {
        let stats = RatingStats::from_values(&[5, 4, 3]);
        assert_eq!(stats.count, 3);
        assert!((stats.average - 4.0).abs() < f64::EPSILON);

        let empty = RatingStats::from_values(&[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.average, 0.0);
    }
}
