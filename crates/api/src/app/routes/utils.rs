//! Small helper endpoints for the front end.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/utils/postal-to-town/:code", get(postal_to_town))
}

/// Cache-first lookup; outages and unknown codes yield `{"town": null}`.
pub async fn postal_to_town(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let town = services.postal.town_for(&code, Utc::now()).await;
    Json(serde_json::json!({ "town": town })).into_response()
}
