use chrono::{DateTime, Utc};

use crate::template;

/// Every transactional email the backend can send.
///
/// Tokens are carried alongside the rendered link so test transports can
/// extract them without parsing HTML.
#[derive(Debug, Clone)]
pub enum OutboundEmail {
    /// Registration confirmation with the verification link.
    Confirmation {
        to: String,
        token: String,
        link: String,
        expires_at: DateTime<Utc>,
    },

    /// Account activated notification.
    Welcome { to: String, username: String },

    /// Password-reset link.
    PasswordReset {
        to: String,
        token: String,
        link: String,
    },

    /// Confirmation that a password was changed via the reset flow.
    PasswordResetSuccess { to: String, username: String },

    /// Copy of a contact-form submission sent to the support inbox.
    ContactNotification {
        to: String,
        from_name: String,
        from_email: String,
        subject: String,
        body: String,
    },
}

impl OutboundEmail {
    pub fn to(&self) -> &str {
        match self {
            OutboundEmail::Confirmation { to, .. }
            | OutboundEmail::Welcome { to, .. }
            | OutboundEmail::PasswordReset { to, .. }
            | OutboundEmail::PasswordResetSuccess { to, .. }
            | OutboundEmail::ContactNotification { to, .. } => to,
        }
    }

    pub fn subject(&self) -> String {
        match self {
            OutboundEmail::Confirmation { .. } => "Confirm your registration".to_string(),
            OutboundEmail::Welcome { .. } => "Welcome to Localiz".to_string(),
            OutboundEmail::PasswordReset { .. } => "Reset your password".to_string(),
            OutboundEmail::PasswordResetSuccess { .. } => "Your password was updated".to_string(),
            OutboundEmail::ContactNotification { subject, .. } => {
                format!("New contact message: {subject}")
            }
        }
    }

    pub fn html(&self) -> String {
        match self {
            OutboundEmail::Confirmation { link, expires_at, .. } => template::wrap(
                "One last step",
                &format!(
                    "<p>Click the button below to confirm your registration. \
                     The link expires at {}.</p>{}",
                    expires_at.format("%Y-%m-%d %H:%M UTC"),
                    template::button("Confirm my account", link),
                ),
            ),
            OutboundEmail::Welcome { username, .. } => template::wrap(
                "Account activated",
                &format!("<p>Welcome aboard, {username}! Your account is now active.</p>"),
            ),
            OutboundEmail::PasswordReset { link, .. } => template::wrap(
                "Password reset",
                &format!(
                    "<p>A password reset was requested for this address. \
                     The link is valid for one hour.</p>{}",
                    template::button("Choose a new password", link),
                ),
            ),
            OutboundEmail::PasswordResetSuccess { username, .. } => template::wrap(
                "Password updated",
                &format!(
                    "<p>Hi {username}, your password was changed. If this wasn't you, \
                     contact support immediately.</p>"
                ),
            ),
            OutboundEmail::ContactNotification {
                from_name,
                from_email,
                subject,
                body,
                ..
            } => template::wrap(
                "New contact message",
                &format!(
                    "<p><strong>From:</strong> {from_name} &lt;{from_email}&gt;</p>\
                     <p><strong>Subject:</strong> {subject}</p><hr/>\
                     <div>{}</div>",
                    body.replace('\n', "<br/>")
                ),
            ),
        }
    }
}
