//! `localiz-mail` — outbound transactional email.
//!
//! The actual SMTP transport lives behind the [`Mailer`] trait; this crate
//! ships the message model, the shared HTML template, a logging mailer for
//! development and a recording mailer for tests. Every send in the
//! application is best-effort: callers bound it with a timeout and log
//! failures instead of propagating them.

pub mod message;
pub mod template;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

pub use message::OutboundEmail;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outbound mail transport boundary.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, mail: &OutboundEmail) -> Result<(), MailError>;
}

/// Development mailer: renders the message and logs it instead of sending.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, mail: &OutboundEmail) -> Result<(), MailError> {
        tracing::info!(
            to = mail.to(),
            subject = %mail.subject(),
            "outbound email (log transport)"
        );
        tracing::debug!(body = %mail.html(), "rendered email body");
        Ok(())
    }
}

/// Test mailer that records every message and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
    failing: AtomicBool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, mail: &OutboundEmail) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Transport("recording mailer set to fail".into()));
        }
        self.sent
            .lock()
            .map_err(|_| MailError::Transport("recording mailer poisoned".into()))?
            .push(mail.clone());
        Ok(())
    }
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Make subsequent sends fail (to exercise best-effort paths).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// The verification token from the most recent confirmation email, if any.
    pub fn last_verification_token(&self) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find_map(|mail| match mail {
                OutboundEmail::Confirmation { token, .. } => Some(token.clone()),
                _ => None,
            })
    }

    /// The reset token from the most recent password-reset email, if any.
    pub fn last_reset_token(&self) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find_map(|mail| match mail {
                OutboundEmail::PasswordReset { token, .. } => Some(token.clone()),
                _ => None,
            })
    }
}
