//! Session auth, the admin guard and a fixed-window rate limiter.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use localiz_auth::TokenCodec;
use localiz_users::ActiveUserStore;

use crate::context::CurrentUser;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenCodec>,
    pub users: Arc<dyn ActiveUserStore>,
}

/// Resolve the session token (cookie first, then `Authorization: Bearer`),
/// decode it and attach the account to the request.
///
/// Never rejects: public handlers run with or without a session, and guarded
/// handlers check for [`CurrentUser`] themselves. The account is loaded fresh
/// so role changes and deletions take effect immediately.
pub async fn attach_session(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(token) = session_token(req.headers()) {
        if let Ok(claims) = state.tokens.decode_session(&token, Utc::now()) {
            if let Ok(Some(user)) = state.users.find_by_id(claims.sub).await {
                if !user.disabled {
                    req.extensions_mut().insert(CurrentUser { user });
                }
            }
        }
    }
    next.run(req).await
}

/// Route layer for the `/admin` subtree: 401 without a session, 403 without
/// the admin role.
pub async fn require_admin(
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let current = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if !current.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }
    Ok(next.run(req).await)
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = cookie_value(headers, SESSION_COOKIE) {
        return Some(token);
    }
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

/// Build the `Set-Cookie` value for a fresh session.
///
/// `SameSite=None; Secure` because the front end lives on a different origin.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=None; Secure; Max-Age={max_age_secs}"
    )
}

pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=None; Secure; Max-Age=0")
}

/// Fixed-window rate limiter keyed by (client IP, path).
///
/// In-memory and per-process, which matches the single-node deployment; a
/// distributed limiter is out of scope.
pub struct RateLimiter {
    window: Duration,
    max_hits: u32,
    hits: Mutex<HashMap<(String, String), (Instant, u32)>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_hits: u32) -> Self {
        Self {
            window,
            max_hits,
            hits: Mutex::new(HashMap::new()),
        }
    }

    /// Count one hit; `false` means the caller is over the limit.
    pub fn allow(&self, key: (String, String), now: Instant) -> bool {
        let mut hits = match self.hits.lock() {
            Ok(guard) => guard,
            // Poisoned lock: fail open, limiting is best-effort.
            Err(_) => return true,
        };
        let entry = hits.entry(key).or_insert((now, 0));
        if now.duration_since(entry.0) >= self.window {
            *entry = (now, 0);
        }
        entry.1 += 1;
        entry.1 <= self.max_hits
    }
}

/// Abuse-prone endpoints; everything else passes through unmetered.
const LIMITED_PATHS: [&str; 3] = ["/user/register", "/user/login", "/contact"];

pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let path = req.uri().path();
    if req.method() != axum::http::Method::POST || !LIMITED_PATHS.contains(&path) {
        return Ok(next.run(req).await);
    }

    let ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());
    let path = path.to_string();

    if !limiter.allow((ip, path), Instant::now()) {
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }
    Ok(next.run(req).await)
}
