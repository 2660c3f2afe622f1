use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use localiz_auth::Role;
use localiz_core::UserId;

use crate::{PendingRegistration, Profile};

/// A confirmed account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub profile: Profile,
    pub birthday: NaiveDate,
    pub reset_token: Option<String>,
    pub reset_expires: Option<DateTime<Utc>>,
    pub disabled: bool,
    pub created_at: DateTime<Utc>,
}

impl ActiveUser {
    /// Promote a confirmed pending registration. The password hash is carried
    /// over as-is; it was hashed at submission time.
    pub fn from_pending(pending: PendingRegistration, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::new(),
            username: pending.username,
            email: pending.email,
            phone: pending.phone,
            password_hash: pending.password_hash,
            role: Role::User,
            profile: pending.profile,
            birthday: pending.birthday,
            reset_token: None,
            reset_expires: None,
            disabled: false,
            created_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// The projection sent over the wire. Never carries the password hash or
    /// reset fields.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: self.profile.first_name.clone(),
            last_name: self.profile.last_name.clone(),
            postal_code: self.profile.postal_code.clone(),
            city: self.profile.city.clone(),
            gender: self.profile.gender.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Sanitized user view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub gender: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}
