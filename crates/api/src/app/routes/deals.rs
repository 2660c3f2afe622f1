//! Deal CRUD. Reads are public; writes belong to the author or an admin.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use localiz_core::DealId;
use localiz_deals::{DealDraft, DealPatch};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/deals", get(list).post(create))
        .route("/deals/:id", get(get_one).patch(update).delete(remove))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    match services.deals.list(query.request()).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn get_one(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DealId = match common::parse_id(&id, "deal") {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.deals.find_by_id(id).await {
        Ok(Some(deal)) => Json(deal).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "deal not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Json(draft): Json<DealDraft>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    let deal = match draft.into_deal(current.id(), Utc::now()) {
        Ok(d) => d,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.deals.insert(deal.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(deal)).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn update(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
    Json(patch): Json<DealPatch>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    let id: DealId = match common::parse_id(&id, "deal") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let mut deal = match services.deals.find_by_id(id).await {
        Ok(Some(d)) => d,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "deal not found"),
        Err(err) => return errors::store_error_to_response(err),
    };
    if !deal.can_modify(current.id(), current.is_admin()) {
        return errors::forbidden();
    }
    if let Err(err) = patch.apply(&mut deal, Utc::now()) {
        return errors::domain_error_to_response(err);
    }
    match services.deals.update(deal.clone()).await {
        Ok(()) => Json(deal).into_response(),
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
    let id: DealId = match common::parse_id(&id, "deal") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let deal = match services.deals.find_by_id(id).await {
        Ok(Some(d)) => d,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "deal not found"),
        Err(err) => return errors::store_error_to_response(err),
    };
    if !deal.can_modify(current.id(), current.is_admin()) {
        return errors::forbidden();
    }
    match services.deals.delete(id).await {
        Ok(_) => Json(serde_json::json!({ "message": "deal deleted" })).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
