//! Shared handler helpers: auth guards and id parsing.

use core::str::FromStr;

use axum::http::StatusCode;
use axum::Extension;

use localiz_core::DomainError;

use crate::app::errors;
use crate::context::CurrentUser;

/// Unwrap the session attached by the middleware; 401 when there is none.
pub fn current_user(
    ext: Option<Extension<CurrentUser>>,
) -> Result<CurrentUser, axum::response::Response> {
    match ext {
        Some(Extension(user)) => Ok(user),
        None => Err(errors::unauthorized()),
    }
}

/// Like [`current_user`], but also demands the admin role. Used by the few
/// admin-only methods living on otherwise-public paths (e.g. `GET /contact`).
pub fn admin_user(
    ext: Option<Extension<CurrentUser>>,
) -> Result<CurrentUser, axum::response::Response> {
    let current = current_user(ext)?;
    if !current.is_admin() {
        return Err(errors::forbidden());
    }
    Ok(current)
}

/// Parse a path segment into a typed id; 400 on garbage.
pub fn parse_id<T>(raw: &str, what: &'static str) -> Result<T, axum::response::Response>
where
    T: FromStr<Err = DomainError>,
{
    raw.parse().map_err(|_| {
        errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("invalid {what} id"),
        )
    })
}
