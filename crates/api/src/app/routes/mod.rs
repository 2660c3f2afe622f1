use axum::{routing::get, Router};

pub mod admin;
pub mod blog;
pub mod categories;
pub mod common;
pub mod contact;
pub mod deals;
pub mod listings;
pub mod ratings;
pub mod system;
pub mod users;
pub mod utils;

/// The complete route table. Each file owns its paths; `/admin/*` carries the
/// role guard inside `admin::router()`.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(users::router())
        .merge(deals::router())
        .merge(listings::router())
        .merge(blog::router())
        .merge(ratings::router())
        .merge(contact::router())
        .merge(categories::router())
        .merge(admin::router())
        .merge(utils::router())
}
