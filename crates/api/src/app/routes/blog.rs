//! Blog posts: public reads, authenticated writes.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;

use localiz_blog::BlogPostDraft;
use localiz_core::BlogPostId;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/blog", get(list).post(create))
        .route("/blog/:id", get(get_one).delete(remove))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    match services.blog.list(query.request()).await {
        Ok(page) => Json(page).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn get_one(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: BlogPostId = match common::parse_id(&id, "blog post") {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.blog.find_by_id(id).await {
        Ok(Some(post)) => Json(post).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "blog post not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Json(draft): Json<BlogPostDraft>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    let post = match draft.into_post(current.id(), Utc::now()) {
        Ok(p) => p,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.blog.insert(post.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(post)).into_response(),
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
    let id: BlogPostId = match common::parse_id(&id, "blog post") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let post = match services.blog.find_by_id(id).await {
        Ok(Some(p)) => p,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "blog post not found")
        }
        Err(err) => return errors::store_error_to_response(err),
    };
    if post.author != current.id() && !current.is_admin() {
        return errors::forbidden();
    }
    match services.blog.delete(id).await {
        Ok(_) => Json(serde_json::json!({ "message": "blog post deleted" })).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
