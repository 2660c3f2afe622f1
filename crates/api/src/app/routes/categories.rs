//! Public category listing; management lives under `/admin/categories`.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use localiz_categories::CategoryKind;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/categories", get(list))
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::KindQuery>,
) -> axum::response::Response {
    let kind = match query.kind.as_deref() {
        Some(raw) => match dto::parse_category_kind(raw) {
            Ok(k) => k,
            Err(res) => return res,
        },
        None => CategoryKind::Deal,
    };
    match services.categories.list_active(kind).await {
        Ok(categories) => Json(categories).into_response(),
        Err(err) => errors::store_error_to_response(err),
    }
}
