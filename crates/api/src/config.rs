//! Environment-driven configuration, read once at startup.

use chrono::Duration;

/// Immutable application configuration. Built from the environment in `main`
/// and passed by reference; handlers never read env vars themselves.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secret_key: String,
    pub bind_addr: String,
    /// Public base URL of this API (verification links point here).
    pub public_base_url: String,
    /// Front-end origin (browser redirects and reset links point here).
    pub client_url: String,
    pub email_from: String,
    pub support_email: String,
    pub token_ttl: Duration,
    pub session_ttl: Duration,
    pub reset_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let secret_key = std::env::var("SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("SECRET_KEY not set; using insecure dev default");
            "dev-secret".to_string()
        });

        Self {
            secret_key,
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:5000"),
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:5000"),
            client_url: env_or("CLIENT_URL", "http://localhost:3000"),
            email_from: env_or("EMAIL_FROM", "no-reply@localiz.fr"),
            support_email: env_or("SUPPORT_EMAIL", "contact@localiz.fr"),
            token_ttl: Duration::seconds(env_num("TOKEN_TTL_SECS", 3600)),
            session_ttl: Duration::days(env_num("SESSION_TTL_DAYS", 7)),
            reset_ttl: Duration::seconds(env_num("RESET_TTL_SECS", 3600)),
        }
    }
}

impl Default for AppConfig {
    /// Dev/test defaults, no environment reads.
    fn default() -> Self {
        Self {
            secret_key: "dev-secret".to_string(),
            bind_addr: "127.0.0.1:5000".to_string(),
            public_base_url: "http://localhost:5000".to_string(),
            client_url: "http://localhost:3000".to_string(),
            email_from: "no-reply@localiz.fr".to_string(),
            support_email: "contact@localiz.fr".to_string(),
            token_ttl: Duration::seconds(3600),
            session_ttl: Duration::days(7),
            reset_ttl: Duration::seconds(3600),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_num(key: &str, default: i64) -> i64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
