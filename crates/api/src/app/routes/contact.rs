//! Contact form: public submission, admin inbox with an archive flag.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, patch, post},
    Json, Router,
};
use chrono::Utc;

use localiz_contact::ContactDraft;
use localiz_core::{ContactMessageId, PageRequest};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/contact", post(submit).get(list))
        .route("/contact/:id", delete(archive))
        .route("/contact/unarchive/:id", patch(unarchive))
}

pub async fn submit(
    Extension(services): Extension<Arc<AppServices>>,
    Json(draft): Json<ContactDraft>,
) -> axum::response::Response {
    let message = match draft.into_message(Utc::now()) {
        Ok(m) => m,
        Err(err) => return errors::domain_error_to_response(err),
    };
    if let Err(err) = services.contact.insert(message.clone()).await {
        return errors::store_error_to_response(err);
    }
    services.notify_support(&message).await;
    (
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "message received" })),
    )
        .into_response()
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Query(query): Query<dto::ContactListQuery>,
) -> axum::response::Response {
    if let Err(res) = common::admin_user(current) {
        return res;
    }
    let page = PageRequest::clamped(query.page, query.limit);
    match services.contact.list(page, query.archived).await {
        Ok(messages) => Json(messages).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

/// "Delete" from the admin inbox is a soft archive.
pub async fn archive(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    set_archived(services, current, &id, true).await
}

pub async fn unarchive(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    set_archived(services, current, &id, false).await
}

async fn set_archived(
    services: Arc<AppServices>,
    current: Option<Extension<CurrentUser>>,
    id: &str,
    archived: bool,
) -> axum::response::Response {
    if let Err(res) = common::admin_user(current) {
        return res;
    }
    let id: ContactMessageId = match common::parse_id(id, "contact message") {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.contact.set_archived(id, archived).await {
        Ok(()) => Json(serde_json::json!({
            "message": if archived { "message archived" } else { "message restored" }
        }))
        .into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
