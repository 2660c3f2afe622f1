//! Postal-code to town resolution with a long-lived cache.
//!
//! The remote source is zippopotam.us. Lookups are best-effort: any network
//! or decoding failure degrades to `None`, and successful answers are cached
//! for 90 days.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

const CACHE_TTL_DAYS: i64 = 90;
const REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostalCodeEntry {
    pub country: String,
    pub postal_code: String,
    pub town: String,
    pub hits: u64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ZippoResponse {
    places: Vec<ZippoPlace>,
}

#[derive(Debug, Deserialize)]
struct ZippoPlace {
    #[serde(rename = "place name")]
    place_name: String,
}

/// Cache-first town lookup. One instance lives in the application state.
pub struct PostalDirectory {
    cache: RwLock<HashMap<String, PostalCodeEntry>>,
    client: reqwest::Client,
    base_url: String,
    country: String,
}

impl PostalDirectory {
    pub fn new() -> Self {
        Self::with_base_url("https://api.zippopotam.us")
    }

    /// Point at a different endpoint (tests use a local stub).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            country: "fr".to_string(),
        }
    }

    /// Resolve a postal code to a town name, hitting the remote source only
    /// on a cache miss. Never fails: unknown codes and outages both yield
    /// `None`.
    pub async fn town_for(&self, postal_code: &str, now: DateTime<Utc>) -> Option<String> {
        let postal_code = postal_code.trim();
        if postal_code.is_empty() {
            return None;
        }

        if let Some(town) = self.cached(postal_code, now) {
            return Some(town);
        }

        let town = self.fetch_remote(postal_code).await?;
        self.store(postal_code, &town, now);
        Some(town)
    }

    fn cached(&self, postal_code: &str, now: DateTime<Utc>) -> Option<String> {
        let mut cache = self.cache.write().ok()?;
        match cache.get_mut(postal_code) {
            Some(entry) if now < entry.expires_at => {
                entry.hits += 1;
                Some(entry.town.clone())
            }
            _ => None,
        }
    }

    fn store(&self, postal_code: &str, town: &str, now: DateTime<Utc>) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(
                postal_code.to_string(),
                PostalCodeEntry {
                    country: self.country.clone(),
                    postal_code: postal_code.to_string(),
                    town: town.to_string(),
                    hits: 0,
                    expires_at: now + chrono::Duration::days(CACHE_TTL_DAYS),
                },
            );
        }
    }

    /// Pre-load an entry, bypassing the remote source.
    pub fn seed(&self, postal_code: &str, town: &str, now: DateTime<Utc>) {
        self.store(postal_code, town, now);
    }

    async fn fetch_remote(&self, postal_code: &str) -> Option<String> {
        let url = format!("{}/{}/{}", self.base_url, self.country, postal_code);
        let request = self.client.get(&url).timeout(REMOTE_TIMEOUT).send();

        let response = match request.await {
            Ok(r) => r,
            Err(err) => {
                warn!(postal_code, error = %err, "postal lookup failed");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(postal_code, status = %response.status(), "postal code unknown upstream");
            return None;
        }
        match response.json::<ZippoResponse>().await {
            Ok(body) => body.places.into_iter().next().map(|p| p.place_name),
            Err(err) => {
                warn!(postal_code, error = %err, "postal lookup returned malformed body");
                None
            }
        }
    }
}

impl Default for PostalDirectory {
    fn default() -> Self {
        Self::new()
    }
}
