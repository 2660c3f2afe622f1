//! Application state: stores, orchestrators and shared clients.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use localiz_auth::{Argon2Hasher, TokenCodec};
use localiz_blog::BlogPostStore;
use localiz_categories::CategoryStore;
use localiz_contact::{ContactMessage, ContactMessageStore};
use localiz_core::{StoreError, UserId};
use localiz_deals::DealStore;
use localiz_infra::{
    spawn_pending_janitor, InMemoryBlogPostStore, InMemoryCategoryStore,
    InMemoryContactMessageStore, InMemoryDealStore, InMemoryListingStore, InMemoryPendingStore,
    InMemoryRatingStore, InMemoryUserStore, PostalDirectory,
};
use localiz_listings::ListingStore;
use localiz_mail::{Mailer, OutboundEmail};
use localiz_ratings::RatingStore;
use localiz_users::{
    AccountService, ActiveUserStore, PendingRegistrationStore, RegistrationConfig,
    RegistrationService,
};

use crate::config::AppConfig;

const JANITOR_INTERVAL: Duration = Duration::from_secs(60);
const MAIL_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything a handler can reach, shared behind one `Arc` via `Extension`.
pub struct AppServices {
    pub config: AppConfig,
    pub tokens: Arc<TokenCodec>,
    pub pending: Arc<dyn PendingRegistrationStore>,
    pub users: Arc<dyn ActiveUserStore>,
    pub deals: Arc<dyn DealStore>,
    pub listings: Arc<dyn ListingStore>,
    pub blog: Arc<dyn BlogPostStore>,
    pub ratings: Arc<dyn RatingStore>,
    pub contact: Arc<dyn ContactMessageStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub registration: RegistrationService,
    pub accounts: AccountService,
    pub postal: PostalDirectory,
    pub mailer: Arc<dyn Mailer>,
}

/// Wire up the in-memory stores, the orchestrators and the background
/// janitor. Must run inside a tokio runtime (the janitor is spawned here).
pub fn build_services(config: AppConfig, mailer: Arc<dyn Mailer>) -> Arc<AppServices> {
    let tokens = Arc::new(TokenCodec::new(config.secret_key.as_bytes()));
    let hasher = Arc::new(Argon2Hasher);

    let pending: Arc<dyn PendingRegistrationStore> = Arc::new(InMemoryPendingStore::new());
    let users: Arc<dyn ActiveUserStore> = Arc::new(InMemoryUserStore::new());

    let registration = RegistrationService::new(
        pending.clone(),
        users.clone(),
        hasher.clone(),
        mailer.clone(),
        tokens.clone(),
        RegistrationConfig {
            public_base_url: config.public_base_url.clone(),
            token_ttl: config.token_ttl,
            session_ttl: config.session_ttl,
        },
    );
    let accounts = AccountService::new(
        users.clone(),
        hasher,
        mailer.clone(),
        tokens.clone(),
        config.session_ttl,
        config.reset_ttl,
        config.client_url.clone(),
    );

    spawn_pending_janitor(pending.clone(), JANITOR_INTERVAL);

    Arc::new(AppServices {
        config,
        tokens,
        pending,
        users,
        deals: Arc::new(InMemoryDealStore::new()),
        listings: Arc::new(InMemoryListingStore::new()),
        blog: Arc::new(InMemoryBlogPostStore::new()),
        ratings: Arc::new(InMemoryRatingStore::new()),
        contact: Arc::new(InMemoryContactMessageStore::new()),
        categories: Arc::new(InMemoryCategoryStore::new()),
        registration,
        accounts,
        postal: PostalDirectory::new(),
        mailer,
    })
}

impl AppServices {
    /// Remove an account and everything it owns. Content removal runs first
    /// so a failure never leaves orphans behind a deleted user.
    pub async fn purge_user(&self, user: UserId) -> Result<bool, StoreError> {
        let deals = self.deals.delete_by_author(user).await?;
        let listings = self.listings.delete_by_owner(user).await?;
        let ratings = self.ratings.delete_involving(user).await?;
        let removed = self.users.delete(user).await?;
        if removed {
            info!(user_id = %user, deals, listings, ratings, "account purged");
        }
        Ok(removed)
    }

    /// Forward a contact message to the support inbox, best-effort.
    pub async fn notify_support(&self, message: &ContactMessage) {
        let mail = OutboundEmail::ContactNotification {
            to: self.config.support_email.clone(),
            from_name: message.name.clone(),
            from_email: message.email.clone(),
            subject: message.subject.clone(),
            body: message.message.clone(),
        };
        match tokio::time::timeout(MAIL_TIMEOUT, self.mailer.send(&mail)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => warn!(error = %err, "support notification failed"),
            Err(_) => warn!("support notification timed out"),
        }
    }
}
