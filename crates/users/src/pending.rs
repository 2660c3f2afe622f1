use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::Profile;

/// A registration waiting for its email to be verified.
///
/// Lives only between submission and confirmation (or expiry). There is no id
/// newtype: the email is the natural key, and the row never outlives the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRegistration {
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub profile: Profile,
    pub birthday: NaiveDate,
    pub verification_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PendingRegistration {
    /// A row presented at exactly its expiry instant is already expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
