//! Login, logout-free session issuance and the password flows.
//!
//! Login deliberately reports one uniform error for unknown identifiers and
//! wrong passwords; forgot-password never reveals whether an email exists.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use localiz_auth::{CredentialHasher, HashError, TokenCodec, TokenError};
use localiz_core::{normalize, UserId};

use crate::store::{ActiveUserStore, StoreError};
use crate::{validate, ActiveUser};

const MAIL_TIMEOUT: StdDuration = StdDuration::from_secs(5);
const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown identifier and wrong password are indistinguishable on purpose.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("invalid or expired reset token")]
    InvalidResetToken,

    #[error("password must be at least 8 characters")]
    WeakPassword,

    #[error("account not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("password hashing failed")]
    Hash(#[from] HashError),

    #[error("token signing failed: {0}")]
    Signing(String),
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        AuthError::Signing(err.to_string())
    }
}

/// A freshly issued session: the cookie value and its deadline.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct AccountService {
    users: Arc<dyn ActiveUserStore>,
    hasher: Arc<dyn CredentialHasher>,
    mailer: Arc<dyn localiz_mail::Mailer>,
    tokens: Arc<TokenCodec>,
    session_ttl: Duration,
    reset_ttl: Duration,
    client_url: String,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn ActiveUserStore>,
        hasher: Arc<dyn CredentialHasher>,
        mailer: Arc<dyn localiz_mail::Mailer>,
        tokens: Arc<TokenCodec>,
        session_ttl: Duration,
        reset_ttl: Duration,
        client_url: String,
    ) -> Self {
        Self {
            users,
            hasher,
            mailer,
            tokens,
            session_ttl,
            reset_ttl,
            client_url,
        }
    }

    /// `identifier` is an email or a username, detected by shape.
    pub async fn login(
        &self,
        identifier: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<(ActiveUser, Session), AuthError> {
        let identifier = identifier.trim();
        let user = if validate::looks_like_email(identifier) {
            self.users.find_by_email(&normalize::email(identifier)).await?
        } else {
            self.users.find_by_username(identifier).await?
        };
        let user = user.ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        if user.disabled {
            return Err(AuthError::AccountDisabled);
        }

        let session = self.issue_session(&user, now)?;
        info!(user_id = %user.id, "login");
        Ok((user, session))
    }

    pub fn issue_session(
        &self,
        user: &ActiveUser,
        now: DateTime<Utc>,
    ) -> Result<Session, AuthError> {
        let token = self
            .tokens
            .sign_session(user.id, user.role, now, self.session_ttl)?;
        Ok(Session {
            token,
            expires_at: now + self.session_ttl,
        })
    }

    /// Always succeeds from the caller's point of view. When the email is
    /// known, stores a one-hour reset token and emails the link.
    pub async fn forgot_password(&self, email: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let email = normalize::email(email);
        let Some(mut user) = self.users.find_by_email(&email).await? else {
            return Ok(());
        };

        let token = Uuid::new_v4().simple().to_string();
        user.reset_token = Some(token.clone());
        user.reset_expires = Some(now + self.reset_ttl);
        self.users.update(user.clone()).await?;

        self.send_best_effort(localiz_mail::OutboundEmail::PasswordReset {
            to: user.email,
            link: format!("{}/reset-password/{token}", self.client_url),
            token,
        })
        .await;
        Ok(())
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<ActiveUser, AuthError> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let mut user = self
            .users
            .find_by_reset_token(token)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        match user.reset_expires {
            Some(deadline) if now < deadline => {}
            _ => return Err(AuthError::InvalidResetToken),
        }

        user.password_hash = self.hasher.hash(new_password)?;
        user.reset_token = None;
        user.reset_expires = None;
        self.users.update(user.clone()).await?;
        info!(user_id = %user.id, "password reset");

        self.send_best_effort(localiz_mail::OutboundEmail::PasswordResetSuccess {
            to: user.email.clone(),
            username: user.username.clone(),
        })
        .await;
        Ok(user)
    }

    /// The current password must verify before it is replaced.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !self.hasher.verify(current, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        user.password_hash = self.hasher.hash(new_password)?;
        self.users.update(user).await?;
        Ok(())
    }

    pub async fn delete_account(&self, user_id: UserId) -> Result<(), AuthError> {
        if self.users.delete(user_id).await? {
            info!(user_id = %user_id, "account deleted");
            Ok(())
        } else {
            Err(AuthError::NotFound)
        }
    }

    async fn send_best_effort(&self, mail: localiz_mail::OutboundEmail) {
        match tokio::time::timeout(MAIL_TIMEOUT, self.mailer.send(&mail)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(to = mail.to(), error = %err, "email delivery failed"),
            Err(_) => warn!(to = mail.to(), "email delivery timed out"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeHasher, FakeUserStore};
    use crate::Profile;
    use chrono::NaiveDate;
    use localiz_auth::Role;
    use localiz_mail::RecordingMailer;

    struct Harness {
        service: AccountService,
        users: Arc<FakeUserStore>,
        mailer: Arc<RecordingMailer>,
    }

    fn harness() -> Harness {
        let users = Arc::new(FakeUserStore::default());
        let mailer = Arc::new(RecordingMailer::new());
        let service = AccountService::new(
            users.clone(),
            Arc::new(FakeHasher),
            mailer.clone(),
            Arc::new(TokenCodec::new(b"test-secret")),
            Duration::days(7),
            Duration::seconds(3600),
            "http://localhost:3000".to_string(),
        );
        Harness {
            service,
            users,
            mailer,
        }
    }

    async fn seed_user(h: &Harness) -> ActiveUser {
        let user = ActiveUser {
            id: UserId::new(),
            username: "alice92".into(),
            email: "alice@example.com".into(),
            phone: None,
            password_hash: "hashed:Password1!".into(),
            role: Role::User,
            profile: Profile::default(),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
            reset_token: None,
            reset_expires: None,
            disabled: false,
            created_at: Utc::now(),
        };
        h.users.insert(user.clone()).await.unwrap();
        user
    }

    #[tokio::test]
    async fn login_works_with_email_or_username() {
        let h = harness();
        seed_user(&h).await;
        let now = Utc::now();

        let (by_email, _) = h
            .service
            .login("Alice@Example.com", "Password1!", now)
            .await
            .unwrap();
        let (by_username, session) = h.service.login("alice92", "Password1!", now).await.unwrap();
        assert_eq!(by_email.id, by_username.id);
        assert_eq!(session.expires_at, now + Duration::days(7));
    }

    #[tokio::test]
    async fn login_errors_are_uniform() {
        let h = harness();
        seed_user(&h).await;
        let now = Utc::now();

        let unknown = h.service.login("nobody@example.com", "Password1!", now).await;
        let wrong = h.service.login("alice92", "wrong-password", now).await;
        assert!(matches!(unknown.unwrap_err(), AuthError::InvalidCredentials));
        assert!(matches!(wrong.unwrap_err(), AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn disabled_account_cannot_login() {
        let h = harness();
        let mut user = seed_user(&h).await;
        user.disabled = true;
        h.users.update(user).await.unwrap();

        let err = h
            .service
            .login("alice92", "Password1!", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::AccountDisabled));
    }

    #[tokio::test]
    async fn forgot_password_is_silent_for_unknown_emails() {
        let h = harness();
        h.service
            .forgot_password("nobody@example.com", Utc::now())
            .await
            .unwrap();
        assert!(h.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn reset_round_trip_rotates_the_password() {
        let h = harness();
        seed_user(&h).await;
        let now = Utc::now();

        h.service
            .forgot_password("alice@example.com", now)
            .await
            .unwrap();
        let token = h.mailer.last_reset_token().unwrap();

        h.service
            .reset_password(&token, "NewPassword2!", now)
            .await
            .unwrap();

        // Old password rejected, new accepted, token single-use.
        assert!(h.service.login("alice92", "Password1!", now).await.is_err());
        h.service.login("alice92", "NewPassword2!", now).await.unwrap();
        let err = h
            .service
            .reset_password(&token, "Another3!", now)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResetToken));
    }

    #[tokio::test]
    async fn expired_reset_token_is_rejected() {
        let h = harness();
        seed_user(&h).await;
        let now = Utc::now();
        h.service
            .forgot_password("alice@example.com", now)
            .await
            .unwrap();
        let token = h.mailer.last_reset_token().unwrap();

        let late = now + Duration::seconds(3600);
        let err = h
            .service
            .reset_password(&token, "NewPassword2!", late)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResetToken));
    }

    #[tokio::test]
    async fn change_password_verifies_the_current_one() {
        let h = harness();
        let user = seed_user(&h).await;

        let err = h
            .service
            .change_password(user.id, "wrong", "NewPassword2!")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        h.service
            .change_password(user.id, "Password1!", "NewPassword2!")
            .await
            .unwrap();
        h.service
            .login("alice92", "NewPassword2!", Utc::now())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn delete_account_removes_the_user() {
        let h = harness();
        let user = seed_user(&h).await;
        h.service.delete_account(user.id).await.unwrap();
        assert!(matches!(
            h.service.delete_account(user.id).await.unwrap_err(),
            AuthError::NotFound
        ));
    }
}
