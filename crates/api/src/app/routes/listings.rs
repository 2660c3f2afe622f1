//! Listing (swap/donate) CRUD, mirroring the deal rules.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use localiz_core::ListingId;
use localiz_listings::{ListingDraft, ListingPatch};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/listings", get(list).post(create))
        .route("/listings/:id", get(get_one).patch(update).delete(remove))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    match services.listings.list_published(query.request()).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn get_one(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ListingId = match common::parse_id(&id, "listing") {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.listings.find_by_id(id).await {
        Ok(Some(listing)) => Json(listing).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Json(draft): Json<ListingDraft>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    let listing = match draft.into_listing(current.id(), Utc::now()) {
        Ok(l) => l,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.listings.insert(listing.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
    Json(patch): Json<ListingPatch>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    let id: ListingId = match common::parse_id(&id, "listing") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let mut listing = match services.listings.find_by_id(id).await {
        Ok(Some(l)) => l,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found")
        }
        Err(err) => return errors::store_error_to_response(err),
    };
    if !listing.can_modify(current.id(), current.is_admin()) {
        return errors::forbidden();
    }
    if let Err(err) = patch.apply(&mut listing, Utc::now()) {
        return errors::domain_error_to_response(err);
    }
    match services.listings.update(listing.clone()).await {
        Ok(()) => Json(listing).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn remove(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    let id: ListingId = match common::parse_id(&id, "listing") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let listing = match services.listings.find_by_id(id).await {
        Ok(Some(l)) => l,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "listing not found")
        }
        Err(err) => return errors::store_error_to_response(err),
    };
    if !listing.can_modify(current.id(), current.is_admin()) {
        return errors::forbidden();
    }
    match services.listings.delete(id).await {
        Ok(_) => Json(serde_json::json!({ "message": "listing deleted" })).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
