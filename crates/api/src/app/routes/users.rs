//! Registration, email verification, sessions and the password flows.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;

use localiz_users::RegistrationError;

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CurrentUser;
use crate::middleware;

pub fn router() -> Router {
    Router::new()
        .route("/user/register", post(register))
        .route("/user/verifyMail/:token", get(verify_mail))
        .route("/user/confirm-email", post(confirm_email))
        .route("/user/login", post(login))
        .route("/user/logout", post(logout))
        .route("/user/me", get(me).delete(delete_me))
        .route("/user/change-password", put(change_password))
        .route("/user/forgot-password", post(forgot_password))
        .route("/user/reset-password/:token", post(reset_password))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    match services.registration.register(body.into(), Utc::now()).await {
        Ok(receipt) => (
            StatusCode::CREATED,
            Json(serde_json::json!({
                "message": "confirmation email sent",
                "expiresAt": receipt.expires_at,
            })),
        )
            .into_response(),
        Err(err) => errors::registration_error_to_response(err),
    }
}

/// The link from the confirmation email. Lands in a browser, so every
/// outcome is a redirect to the front end; no error detail leaks into the
/// query string.
pub async fn verify_mail(
    Extension(services): Extension<Arc<AppServices>>,
    Path(token): Path<String>,
) -> axum::response::Response {
    let client_url = &services.config.client_url;
    match services.registration.confirm(&token, Utc::now()).await {
        Ok(confirmed) => with_session_cookie(
            Redirect::to(&redirect_target(client_url, "success")).into_response(),
            &confirmed.session_token,
            services.config.session_ttl.num_seconds(),
        ),
        Err(RegistrationError::TokenExpired) => {
            Redirect::to(&redirect_target(client_url, "expired")).into_response()
        }
        Err(_) => Redirect::to(&redirect_target(client_url, "error")).into_response(),
    }
}

/// Same confirmation, JSON flavor, for the front end's own verification page.
/// The token rides in the body or the query string.
pub async fn confirm_email(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ConfirmEmailRequest>,
    body: Option<Json<dto::ConfirmEmailRequest>>,
) -> axum::response::Response {
    let token = body
        .and_then(|Json(b)| b.token)
        .or(query.token)
        .unwrap_or_default();
    if token.is_empty() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "missing_token",
            "a verification token is required",
        );
    }

    match services.registration.confirm(&token, Utc::now()).await {
        Ok(confirmed) => with_session_cookie(
            Json(serde_json::json!({
                "message": "email confirmed",
                "user": confirmed.user.public(),
            }))
            .into_response(),
            &confirmed.session_token,
            services.config.session_ttl.num_seconds(),
        ),
        Err(err) => errors::registration_error_to_response(err),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services
        .accounts
        .login(&body.data, &body.password, Utc::now())
        .await
    {
        Ok((user, session)) => with_session_cookie(
            Json(serde_json::json!({
                "message": "logged in",
                "user": user.public(),
            }))
            .into_response(),
            &session.token,
            services.config.session_ttl.num_seconds(),
        ),
        Err(err) => errors::auth_error_to_response(err),
    }
}

pub async fn logout() -> axum::response::Response {
    let mut res = Json(serde_json::json!({ "message": "logged out" })).into_response();
    if let Ok(value) = HeaderValue::from_str(&middleware::clear_session_cookie()) {
        res.headers_mut().append(SET_COOKIE, value);
    }
    res
}

pub async fn me(current: Option<Extension<CurrentUser>>) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    Json(current.user.public()).into_response()
}

pub async fn delete_me(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    match services.purge_user(current.id()).await {
        Ok(true) => {
            let mut res =
                Json(serde_json::json!({ "message": "account deleted" })).into_response();
            if let Ok(value) = HeaderValue::from_str(&middleware::clear_session_cookie()) {
                res.headers_mut().append(SET_COOKIE, value);
            }
            res
        }
        Ok(false) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "account not found"),
        Err(err) => errors::store_error_to_response(err),
    }
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    current: Option<Extension<CurrentUser>>,
    Json(body): Json<dto::ChangePasswordRequest>,
) -> axum::response::Response {
    let current = match common::current_user(current) {
        Ok(c) => c,
        Err(res) => return res,
    };
    match services
        .accounts
        .change_password(current.id(), &body.current_password, &body.new_password)
        .await
    {
        Ok(()) => Json(serde_json::json!({ "message": "password updated" })).into_response(),
        Err(err) => errors::auth_error_to_response(err),
    }
}

pub async fn forgot_password(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ForgotPasswordRequest>,
) -> axum::response::Response {
    // Uniform answer whether or not the email exists.
    match services.accounts.forgot_password(&body.email, Utc::now()).await {
        Ok(()) => Json(serde_json::json!({
            "message": "if this email is registered, a reset link has been sent"
        }))
        .into_response(),
        Err(err) => errors::auth_error_to_response(err),
    }
}

pub async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    Path(token): Path<String>,
    Json(body): Json<dto::ResetPasswordRequest>,
) -> axum::response::Response {
    match services
        .accounts
        .reset_password(&token, &body.password, Utc::now())
        .await
    {
        Ok(_) => Json(serde_json::json!({ "message": "password reset" })).into_response(),
        Err(err) => errors::auth_error_to_response(err),
    }
}

fn redirect_target(client_url: &str, status: &str) -> String {
    format!("{client_url}/?message={status}&clearRegister=1")
}

fn with_session_cookie(
    mut res: axum::response::Response,
    token: &str,
    max_age_secs: i64,
) -> axum::response::Response {
    if let Ok(value) = HeaderValue::from_str(&middleware::session_cookie(token, max_age_secs)) {
        res.headers_mut().append(SET_COOKIE, value);
    }
    res
}
