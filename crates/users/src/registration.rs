//! Registration and confirmation orchestrators.
//!
//! `register` writes a pending row and emails a verification link; `confirm`
//! promotes the row to an active account. Both take `now` explicitly so expiry
//! behavior is deterministic under test.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use localiz_auth::{CredentialHasher, Role, TokenCodec};
use localiz_core::normalize;
use localiz_mail::{Mailer, OutboundEmail};

use crate::store::{ActiveUserStore, PendingRegistrationStore};
use crate::validate::{self, ForbiddenWords, MIN_AGE};
use crate::{ActiveUser, PendingRegistration, Profile, RegistrationError};

/// Upper bound on any single outbound email send. Delivery is best-effort;
/// a slow provider must not stall the request.
const MAIL_TIMEOUT: StdDuration = StdDuration::from_secs(5);

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    /// Public base URL of this API, used to build verification links.
    pub public_base_url: String,
    pub token_ttl: Duration,
    pub session_ttl: Duration,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            public_base_url: "http://localhost:5000".to_string(),
            token_ttl: Duration::seconds(3600),
            session_ttl: Duration::days(7),
        }
    }
}

/// Raw registration payload; field presence is validated here, not at the
/// deserialization boundary, so the error can name every missing field at once.
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub birthday: Option<String>,
    pub agree_to_terms: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub gender: Option<String>,
}

/// What `register` hands back: the deadline drives a front-end countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

/// What `confirm` hands back: the activated account plus a fresh session.
#[derive(Debug, Clone)]
pub struct ConfirmedAccount {
    pub user: ActiveUser,
    pub session_token: String,
    pub session_expires: DateTime<Utc>,
}

pub struct RegistrationService {
    pending: Arc<dyn PendingRegistrationStore>,
    users: Arc<dyn ActiveUserStore>,
    hasher: Arc<dyn CredentialHasher>,
    mailer: Arc<dyn Mailer>,
    tokens: Arc<TokenCodec>,
    forbidden: ForbiddenWords,
    config: RegistrationConfig,
}

impl RegistrationService {
    pub fn new(
        pending: Arc<dyn PendingRegistrationStore>,
        users: Arc<dyn ActiveUserStore>,
        hasher: Arc<dyn CredentialHasher>,
        mailer: Arc<dyn Mailer>,
        tokens: Arc<TokenCodec>,
        config: RegistrationConfig,
    ) -> Self {
        Self {
            pending,
            users,
            hasher,
            mailer,
            tokens,
            forbidden: ForbiddenWords::default(),
            config,
        }
    }

    pub fn with_forbidden_words(mut self, forbidden: ForbiddenWords) -> Self {
        self.forbidden = forbidden;
        self
    }

    /// Validate the submission, write a pending row and email the
    /// verification link. The email send never rolls back the write.
    pub async fn register(
        &self,
        input: RegisterInput,
        now: DateTime<Utc>,
    ) -> Result<RegistrationReceipt, RegistrationError> {
        let mut missing = Vec::new();
        if input.username.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("username".to_string());
        }
        if input.email.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("email".to_string());
        }
        if input.password.as_deref().is_none_or(str::is_empty) {
            missing.push("password".to_string());
        }
        if input.birthday.as_deref().is_none_or(|s| s.trim().is_empty()) {
            missing.push("birthday".to_string());
        }
        if input.agree_to_terms.is_none() {
            missing.push("agreeToTerms".to_string());
        }
        if !missing.is_empty() {
            return Err(RegistrationError::MissingFields(missing));
        }

        // All five are present past this point.
        let username = normalize::text(input.username.as_deref().unwrap_or_default());
        let email = normalize::email(input.email.as_deref().unwrap_or_default());
        let password = input.password.as_deref().unwrap_or_default();
        let birthday_raw = input.birthday.as_deref().unwrap_or_default();

        if input.agree_to_terms != Some(true) {
            return Err(RegistrationError::ConsentRequired);
        }

        if !validate::looks_like_email(&email) {
            return Err(RegistrationError::InvalidEmail);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::WeakPassword);
        }

        if self.forbidden.contains_substring(&username) {
            return Err(RegistrationError::ForbiddenContent { field: "username" });
        }
        if let Some(name) = input.first_name.as_deref() {
            if self.forbidden.contains_word(name) {
                return Err(RegistrationError::ForbiddenContent { field: "first name" });
            }
        }
        if let Some(name) = input.last_name.as_deref() {
            if self.forbidden.contains_word(name) {
                return Err(RegistrationError::ForbiddenContent { field: "last name" });
            }
        }

        let birthday =
            validate::parse_birthday(birthday_raw).ok_or(RegistrationError::InvalidBirthday)?;
        if validate::age_on(birthday, now.date_naive()) < MIN_AGE {
            return Err(RegistrationError::UnderageRegistrant);
        }

        // Pre-checks across both stores. These give precise errors; the
        // insert's unique index below remains the source of truth under
        // concurrency.
        if self.users.find_by_email(&email).await?.is_some()
            || self.users.find_by_username(&username).await?.is_some()
        {
            return Err(RegistrationError::AlreadyRegistered);
        }
        if self.pending.find_by_email(&email, now).await?.is_some()
            || self.pending.find_by_username(&username, now).await?.is_some()
        {
            return Err(RegistrationError::ConfirmationPending);
        }
        let phone = input
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from);
        if let Some(phone) = phone.as_deref() {
            if self.users.find_by_phone(phone).await?.is_some() {
                return Err(RegistrationError::DuplicateKey("phone".to_string()));
            }
        }

        let password_hash = self.hasher.hash(password)?;
        let (token, expires_at) = self
            .tokens
            .sign_verification(&email, now, self.config.token_ttl)?;

        let pending = PendingRegistration {
            username,
            email: email.clone(),
            phone,
            password_hash,
            profile: Profile {
                first_name: input.first_name.as_deref().map(normalize::capitalize_name),
                last_name: input.last_name.as_deref().map(normalize::capitalize_name),
                postal_code: input.postal_code.map(|s| normalize::text(&s)),
                city: input.city.map(|s| normalize::text(&s)),
                gender: input.gender,
            },
            birthday,
            verification_token: token.clone(),
            created_at: now,
            expires_at,
        };
        self.pending.insert(pending).await?;
        info!(email = %email, "registration pending, confirmation email queued");

        self.send_best_effort(OutboundEmail::Confirmation {
            to: email.clone(),
            link: format!("{}/user/verifyMail/{token}", self.config.public_base_url),
            token,
            expires_at,
        })
        .await;

        Ok(RegistrationReceipt { email, expires_at })
    }

    /// Promote a pending registration whose token came back.
    ///
    /// A token that decodes but matches no pending row is indistinguishable
    /// from one that never existed: already-confirmed, purged and forged
    /// tokens all surface as `InvalidToken`.
    pub async fn confirm(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<ConfirmedAccount, RegistrationError> {
        let claims = self.tokens.decode_verification(token, now)?;

        let pending = self
            .pending
            .find_by_email_and_token(&claims.email, token, now)
            .await?
            .ok_or(RegistrationError::InvalidToken)?;

        let user = ActiveUser::from_pending(pending, now);
        self.users.insert(user.clone()).await?;

        // The account exists; a leftover pending row is the janitor's problem.
        match self.pending.delete_by_email(&user.email).await {
            Ok(_) => {}
            Err(err) => warn!(email = %user.email, error = %err, "pending cleanup failed"),
        }
        info!(user_id = %user.id, username = %user.username, "account confirmed");

        self.send_best_effort(OutboundEmail::Welcome {
            to: user.email.clone(),
            username: user.username.clone(),
        })
        .await;

        let session_token = self
            .tokens
            .sign_session(user.id, Role::User, now, self.config.session_ttl)?;

        Ok(ConfirmedAccount {
            user,
            session_token,
            session_expires: now + self.config.session_ttl,
        })
    }

    async fn send_best_effort(&self, mail: OutboundEmail) {
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
    use crate::testutil::{FakeHasher, FakePendingStore, FakeUserStore};
    use localiz_mail::RecordingMailer;

    struct Harness {
        service: RegistrationService,
        pending: Arc<FakePendingStore>,
        users: Arc<FakeUserStore>,
        mailer: Arc<RecordingMailer>,
        tokens: Arc<TokenCodec>,
    }

    fn harness() -> Harness {
        let pending = Arc::new(FakePendingStore::default());
        let users = Arc::new(FakeUserStore::default());
        let mailer = Arc::new(RecordingMailer::new());
        let tokens = Arc::new(TokenCodec::new(b"test-secret"));
        let service = RegistrationService::new(
            pending.clone(),
            users.clone(),
            Arc::new(FakeHasher),
            mailer.clone(),
            tokens.clone(),
            RegistrationConfig::default(),
        );
        Harness {
            service,
            pending,
            users,
            mailer,
            tokens,
        }
    }

    fn alice() -> RegisterInput {
        RegisterInput {
            username: Some("alice92".into()),
            email: Some("Alice@Example.com".into()),
            password: Some("Password1!".into()),
            birthday: Some("1990-05-17".into()),
            agree_to_terms: Some(true),
            first_name: Some("alice".into()),
            last_name: Some("dupont".into()),
            ..RegisterInput::default()
        }
    }

    #[tokio::test]
    async fn register_then_confirm_creates_one_active_user() {
        let h = harness();
        let now = Utc::now();

        let receipt = h.service.register(alice(), now).await.unwrap();
        assert_eq!(receipt.email, "alice@example.com");
        assert_eq!(h.pending.count(now).await.unwrap(), 1);
        assert_eq!(h.users.count().await.unwrap(), 0);

        let token = h.mailer.last_verification_token().unwrap();
        let confirmed = h.service.confirm(&token, now).await.unwrap();

        assert_eq!(confirmed.user.email, "alice@example.com");
        assert_eq!(confirmed.user.username, "alice92");
        assert_eq!(confirmed.user.profile.first_name.as_deref(), Some("Alice"));
        assert_eq!(confirmed.user.password_hash, "hashed:Password1!");
        assert_eq!(h.users.count().await.unwrap(), 1);
        assert_eq!(h.pending.count(now).await.unwrap(), 0);

        // The issued session token is usable.
        let claims = h.tokens.decode_session(&confirmed.session_token, now).unwrap();
        assert_eq!(claims.sub, confirmed.user.id);
    }

    #[tokio::test]
    async fn second_confirm_with_same_token_is_invalid() {
        let h = harness();
        let now = Utc::now();
        h.service.register(alice(), now).await.unwrap();
        let token = h.mailer.last_verification_token().unwrap();

        h.service.confirm(&token, now).await.unwrap();
        let err = h.service.confirm(&token, now).await.unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidToken));
        assert_eq!(h.users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_registration_is_pending_then_registered() {
        let h = harness();
        let now = Utc::now();
        h.service.register(alice(), now).await.unwrap();

        let err = h.service.register(alice(), now).await.unwrap_err();
        assert!(matches!(err, RegistrationError::ConfirmationPending));

        let token = h.mailer.last_verification_token().unwrap();
        h.service.confirm(&token, now).await.unwrap();

        let err = h.service.register(alice(), now).await.unwrap_err();
        assert!(matches!(err, RegistrationError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn expired_pending_row_frees_the_identity() {
        let h = harness();
        let now = Utc::now();
        h.service.register(alice(), now).await.unwrap();

        // Past the TTL the row is invisible; the same identity registers anew
        // once the janitor (here: purge) clears the old row's unique keys.
        let later = now + Duration::seconds(3600);
        h.pending.purge_expired(later).await.unwrap();
        h.service.register(alice(), later).await.unwrap();
        assert_eq!(h.pending.count(later).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn expired_token_reports_token_expired() {
        let h = harness();
        let now = Utc::now();
        h.service.register(alice(), now).await.unwrap();
        let token = h.mailer.last_verification_token().unwrap();

        let at_expiry = now + Duration::seconds(3600);
        let err = h.service.confirm(&token, at_expiry).await.unwrap_err();
        assert!(matches!(err, RegistrationError::TokenExpired));
        assert_eq!(h.users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn consent_refusal_writes_nothing() {
        let h = harness();
        let now = Utc::now();
        let input = RegisterInput {
            agree_to_terms: Some(false),
            ..alice()
        };
        let err = h.service.register(input, now).await.unwrap_err();
        assert!(matches!(err, RegistrationError::ConsentRequired));
        assert_eq!(h.pending.count(now).await.unwrap(), 0);
        assert!(h.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_are_all_named() {
        let h = harness();
        let err = h
            .service
            .register(RegisterInput::default(), Utc::now())
            .await
            .unwrap_err();
        match err {
            RegistrationError::MissingFields(fields) => {
                assert_eq!(
                    fields,
                    vec!["username", "email", "password", "birthday", "agreeToTerms"]
                );
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn underage_is_rejected_regardless_of_other_fields() {
        let h = harness();
        let now = Utc::now();
        let recent = (now.date_naive() - Duration::days(15 * 365)).format("%Y-%m-%d");
        let input = RegisterInput {
            birthday: Some(recent.to_string()),
            ..alice()
        };
        let err = h.service.register(input, now).await.unwrap_err();
        assert!(matches!(err, RegistrationError::UnderageRegistrant));
    }

    #[tokio::test]
    async fn forbidden_username_and_name_are_rejected() {
        let h = harness();
        let now = Utc::now();

        let err = h
            .service
            .register(
                RegisterInput {
                    username: Some("xX_admin_Xx".into()),
                    ..alice()
                },
                now,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::ForbiddenContent { field: "username" }
        ));

        // Substring inside a last name is fine; whole word is not.
        h.service
            .register(
                RegisterInput {
                    last_name: Some("Badminton".into()),
                    ..alice()
                },
                now,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn mail_failure_does_not_roll_back_registration() {
        let h = harness();
        let now = Utc::now();
        h.mailer.set_failing(true);

        h.service.register(alice(), now).await.unwrap();
        assert_eq!(h.pending.count(now).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_phone_is_a_duplicate_key() {
        let h = harness();
        let now = Utc::now();
        h.service
            .register(
                RegisterInput {
                    phone: Some("0612345678".into()),
                    ..alice()
                },
                now,
            )
            .await
            .unwrap();
        let token = h.mailer.last_verification_token().unwrap();
        h.service.confirm(&token, now).await.unwrap();

        let err = h
            .service
            .register(
                RegisterInput {
                    username: Some("bob77".into()),
                    email: Some("bob@example.com".into()),
                    phone: Some("0612345678".into()),
                    ..alice()
                },
                now,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateKey(field) if field == "phone"));
    }
}
