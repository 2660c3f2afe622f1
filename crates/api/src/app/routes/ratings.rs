//! Profile ratings: one per author→target pair, repeat submissions replace.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use localiz_core::UserId;
use localiz_ratings::Rating;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/ratings/user/:id", post(rate).delete(unrate))
        .route("/ratings/user/:id/stats", get(stats))
}

pub async fn rate(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
    Json(body): Json<dto::RateRequest>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    let target: UserId = match common::parse_id(&id, "user") {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.users.find_by_id(target).await {
        Ok(Some(_)) => {}
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(err) => return errors::store_error_to_response(err),
    }

    let rating = match Rating::new(current.id(), target, body.value, Utc::now()) {
        Ok(r) => r,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.ratings.upsert(rating.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(rating)).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn unrate(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    let target: UserId = match common::parse_id(&id, "user") {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.ratings.delete(current.id(), target).await {
        Ok(true) => Json(serde_json::json!({ "message": "rating removed" })).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "rating not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let target: UserId = match common::parse_id(&id, "user") {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.ratings.stats_for(target).await {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
