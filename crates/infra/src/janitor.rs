//! Background purge of expired pending registrations.
//!
//! Lookups already ignore expired rows; this task reclaims the memory and,
//! more importantly, frees the unique email/username keys so the identity can
//! register again.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use localiz_users::PendingRegistrationStore;

pub fn spawn_pending_janitor(
    store: Arc<dyn PendingRegistrationStore>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // Skip the immediate first tick; a fresh store has nothing to purge.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match store.purge_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(purged) => debug!(purged, "purged expired pending registrations"),
                Err(err) => warn!(error = %err, "pending janitor sweep failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryPendingStore;
    use chrono::{Duration as ChronoDuration, NaiveDate};
    use localiz_users::{PendingRegistration, Profile};

    #[tokio::test(start_paused = true)]
    async fn janitor_sweeps_expired_rows() {
        let store = Arc::new(InMemoryPendingStore::new());
        let now = Utc::now();
        store
            .insert(PendingRegistration {
                username: "alice".into(),
                email: "alice@example.com".into(),
                phone: None,
                password_hash: "hash".into(),
                profile: Profile::default(),
                birthday: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                verification_token: "tok".into(),
                created_at: now - ChronoDuration::seconds(7200),
                expires_at: now - ChronoDuration::seconds(3600),
            })
            .await
            .unwrap();

        let handle = spawn_pending_janitor(store.clone(), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(61)).await;
        handle.abort();

        // Row is gone physically, not just logically.
        assert!(!store.delete_by_email("alice@example.com").await.unwrap());
    }
}
