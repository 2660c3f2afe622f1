use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use localiz_core::{normalize, ContactMessageId, DomainError};

const MAX_SUBJECT_LEN: usize = 150;
const MIN_MESSAGE_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: ContactMessageId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactDraft {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
}

impl ContactDraft {
    pub fn into_message(self, now: DateTime<Utc>) -> Result<ContactMessage, DomainError> {
        let name = normalize::text(self.name.as_deref().unwrap_or_default());
        let email = normalize::email(self.email.as_deref().unwrap_or_default());
        let subject = normalize::text(self.subject.as_deref().unwrap_or_default());
        let message = normalize::text(self.message.as_deref().unwrap_or_default());

        let mut missing = Vec::new();
        if name.is_empty() {
            missing.push("name");
        }
        if email.is_empty() {
            missing.push("email");
        }
        if subject.is_empty() {
            missing.push("subject");
        }
        if message.is_empty() {
            missing.push("message");
        }
        if !missing.is_empty() {
            return Err(DomainError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        if !email.contains('@') {
            return Err(DomainError::validation("invalid email address"));
        }
        if subject.len() > MAX_SUBJECT_LEN {
            return Err(DomainError::validation(format!(
                "subject cannot exceed {MAX_SUBJECT_LEN} characters"
            )));
        }
        if message.len() < MIN_MESSAGE_LEN {
            return Err(DomainError::validation(format!(
                "message must be at least {MIN_MESSAGE_LEN} characters"
            )));
        }

        Ok(ContactMessage {
            id: ContactMessageId::new(),
            name,
            email,
            subject,
            message,
            archived: false,
            created_at: now,
        })
    }
}
