//! HTTP application wiring (axum router + service wiring).
//!
//! - `services.rs`: store/orchestrator wiring behind one `AppServices`
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Router};
use tower::ServiceBuilder;

use crate::middleware::{self, RateLimiter};

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{build_services, AppServices};

const RATE_WINDOW: Duration = Duration::from_secs(60);
const RATE_MAX_HITS: u32 = 30;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        tokens: services.tokens.clone(),
        users: services.users.clone(),
    };
    let limiter = Arc::new(RateLimiter::new(RATE_WINDOW, RATE_MAX_HITS));

    // Top to bottom: the limiter runs first, then session resolution, then
    // the handler sees `AppServices` and (maybe) `CurrentUser` as extensions.
    routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn_with_state(
                limiter,
                middleware::rate_limit,
            ))
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::attach_session,
            ))
            .layer(Extension(services)),
    )
}
