//! Consistent JSON error responses and per-layer error mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use localiz_core::{DomainError, StoreError};
use localiz_users::{AuthError, RegistrationError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn unauthorized() -> axum::response::Response {
    json_error(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "authentication required",
    )
}

pub fn forbidden() -> axum::response::Response {
    json_error(
        StatusCode::FORBIDDEN,
        "forbidden",
        "you may not perform this operation",
    )
}

pub fn registration_error_to_response(err: RegistrationError) -> axum::response::Response {
    match err {
        // The front end highlights each missing input, so the field list
        // rides along next to the human-readable message.
        RegistrationError::MissingFields(ref fields) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "error": "missing_fields",
                "message": err.to_string(),
                "missing": fields,
            })),
        )
            .into_response(),
        RegistrationError::ConsentRequired => {
            json_error(StatusCode::BAD_REQUEST, "consent_required", err.to_string())
        }
        RegistrationError::ForbiddenContent { .. } => {
            json_error(StatusCode::BAD_REQUEST, "forbidden_content", err.to_string())
        }
        RegistrationError::InvalidEmail
        | RegistrationError::WeakPassword
        | RegistrationError::InvalidBirthday
        | RegistrationError::UnderageRegistrant => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", err.to_string())
        }
        RegistrationError::AlreadyRegistered => {
            json_error(StatusCode::BAD_REQUEST, "already_registered", err.to_string())
        }
        RegistrationError::ConfirmationPending => json_error(
            StatusCode::BAD_REQUEST,
            "confirmation_pending",
            err.to_string(),
        ),
        RegistrationError::DuplicateKey(_) => {
            json_error(StatusCode::CONFLICT, "duplicate_key", err.to_string())
        }
        RegistrationError::InvalidToken => {
            json_error(StatusCode::BAD_REQUEST, "invalid_token", err.to_string())
        }
        RegistrationError::TokenExpired => {
            json_error(StatusCode::GONE, "token_expired", err.to_string())
        }
        RegistrationError::Store(_) | RegistrationError::Hash(_) | RegistrationError::Signing(_) => {
            tracing::error!(error = %err, "registration failed internally");
            internal_error()
        }
    }
}

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials => {
            json_error(StatusCode::BAD_REQUEST, "invalid_credentials", err.to_string())
        }
        AuthError::AccountDisabled => {
            json_error(StatusCode::FORBIDDEN, "account_disabled", err.to_string())
        }
        AuthError::InvalidResetToken => {
            json_error(StatusCode::BAD_REQUEST, "invalid_reset_token", err.to_string())
        }
        AuthError::WeakPassword => {
            json_error(StatusCode::BAD_REQUEST, "weak_password", err.to_string())
        }
        AuthError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", err.to_string()),
        AuthError::Store(_) | AuthError::Hash(_) | AuthError::Signing(_) => {
            tracing::error!(error = %err, "account operation failed internally");
            internal_error()
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::DuplicateKey(field) => json_error(
            StatusCode::CONFLICT,
            "duplicate_key",
            format!("duplicate value for `{field}`"),
        ),
        DomainError::Forbidden => forbidden(),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::DuplicateKey { field } => json_error(
            StatusCode::CONFLICT,
            "duplicate_key",
            format!("duplicate value for `{field}`"),
        ),
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Backend(msg) => {
            tracing::error!(error = %msg, "store backend failure");
            internal_error()
        }
    }
}

fn internal_error() -> axum::response::Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "something went wrong",
    )
}
