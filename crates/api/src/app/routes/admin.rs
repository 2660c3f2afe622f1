//! Admin surface: stats, user management, category management.
//!
//! The whole subtree sits behind the role guard, so handlers here can assume
//! an admin session exists.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;

use localiz_auth::Role;
use localiz_categories::Category;
use localiz_core::{CategoryId, Page, UserId};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::middleware;

pub fn router() -> Router {
    Router::new()
        .route("/admin/health", get(health))
        .route("/admin/stats", get(stats))
        .route("/admin/users", get(list_users))
        .route("/admin/users/:id", get(get_user).delete(delete_user))
        .route("/admin/users/:id/role", patch(set_role))
        .route("/admin/categories", post(create_category))
        .route("/admin/categories/reorder", patch(reorder_categories))
        .route(
            "/admin/categories/:id",
            patch(update_category).delete(deactivate_category),
        )
        .route_layer(axum::middleware::from_fn(middleware::require_admin))
}

pub async fn health() -> axum::response::Response {
    Json(serde_json::json!({ "status": "ok" })).into_response()
}

pub async fn stats(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let now = Utc::now();
    let counts = tokio::try_join!(
        services.users.count(),
        services.pending.count(now),
        services.deals.count(),
        services.listings.count(),
        services.blog.count(),
        services.ratings.count(),
        services.contact.count(),
        services.categories.count(),
    );
    match counts {
        Ok((users, pending, deals, listings, blog_posts, ratings, contact, categories)) => {
            Json(serde_json::json!({
                "users": users,
                "pendingRegistrations": pending,
                "deals": deals,
                "listings": listings,
                "blogPosts": blog_posts,
                "ratings": ratings,
                "contactMessages": contact,
                "categories": categories,
            }))
            .into_response()
        }
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    match services.users.list(query.request()).await {
        Ok(page) => {
            let users = Page {
                items: page.items.iter().map(|u| u.public()).collect::<Vec<_>>(),
                total: page.total,
                page: page.page,
                pages: page.pages,
            };
            Json(users).into_response()
        }
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UserId = match common::parse_id(&id, "user") {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.users.find_by_id(id).await {
        Ok(Some(user)) => Json(user.public()).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn set_role(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::SetRoleRequest>,
) -> axum::response::Response {
    let id: UserId = match common::parse_id(&id, "user") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let role = match body.role.to_lowercase().as_str() {
        "user" => Role::User,
        "admin" => Role::Admin,
        _ => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_role",
                "role must be one of: user, admin",
            )
        }
    };
    let mut user = match services.users.find_by_id(id).await {
        Ok(Some(u)) => u,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(err) => return errors::store_error_to_response(err),
    };
    user.role = role;
    match services.users.update(user.clone()).await {
        Ok(()) => Json(user.public()).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: UserId = match common::parse_id(&id, "user") {
        Ok(v) => v,
        Err(res) => return res,
    };
    match services.purge_user(id).await {
        Ok(true) => Json(serde_json::json!({ "message": "user deleted" })).into_response(),
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateCategoryRequest>,
) -> axum::response::Response {
    let kind = match dto::parse_category_kind(&body.kind) {
        Ok(k) => k,
        Err(res) => return res,
    };
    // New categories go to the end of the current ordering.
    let order = match services.categories.list_all(kind).await {
        Ok(existing) => existing.len() as u32,
        Err(err) => return errors::store_error_to_response(err),
    };
    let category = match Category::new(kind, &body.name, order, Utc::now()) {
        Ok(c) => c,
        Err(err) => return errors::domain_error_to_response(err),
    };
    match services.categories.insert(category.clone()).await {
        Ok(()) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateCategoryRequest>,
) -> axum::response::Response {
    let id: CategoryId = match common::parse_id(&id, "category") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let mut category = match services.categories.find_by_id(id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "category not found")
        }
        Err(err) => return errors::store_error_to_response(err),
    };
    if let Some(name) = body.name.as_deref() {
        if let Err(err) = category.rename(name) {
            return errors::domain_error_to_response(err);
        }
    }
    if let Some(active) = body.active {
        category.active = active;
    }
    match services.categories.update(category.clone()).await {
        Ok(()) => Json(category).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

/// "Delete" keeps the row so existing content keeps its label; the category
/// just stops being offered.
pub async fn deactivate_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CategoryId = match common::parse_id(&id, "category") {
        Ok(v) => v,
        Err(res) => return res,
    };
    let mut category = match services.categories.find_by_id(id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "category not found")
        }
        Err(err) => return errors::store_error_to_response(err),
    };
    category.active = false;
    match services.categories.update(category).await {
        Ok(()) => Json(serde_json::json!({ "message": "category deactivated" })).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn reorder_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ReorderCategoriesRequest>,
) -> axum::response::Response {
    let kind = match dto::parse_category_kind(&body.kind) {
        Ok(k) => k,
        Err(res) => return res,
    };
    let mut ids = Vec::with_capacity(body.ids.len());
    for raw in &body.ids {
        let id: CategoryId = match common::parse_id(raw, "category") {
            Ok(v) => v,
            Err(res) => return res,
        };
        ids.push(id);
    }
    match services.categories.reorder(kind, &ids).await {
        Ok(()) => match services.categories.list_all(kind).await {
            Ok(categories) => Json(categories).into_response(),
            Err(err) => errors::store_error_to_response(err),
        },
        Err(err) => errors::store_error_to_response(err),
    }
}
