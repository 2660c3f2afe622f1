//! Request DTOs and small JSON mapping helpers.

use axum::http::StatusCode;
use serde::Deserialize;

use localiz_categories::CategoryKind;
use localiz_core::PageRequest;
use localiz_users::RegisterInput;

use crate::app::errors;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub birthday: Option<String>,
    pub agree_to_terms: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub gender: Option<String>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(body: RegisterRequest) -> Self {
        RegisterInput {
            username: body.username,
            email: body.email,
            password: body.password,
            birthday: body.birthday,
            agree_to_terms: body.agree_to_terms,
            first_name: body.first_name,
            last_name: body.last_name,
            phone: body.phone,
            postal_code: body.postal_code,
            city: body.city,
            gender: body.gender,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmEmailRequest {
    pub token: Option<String>,
}

/// `data` is an email or a username; the service tells them apart by shape.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub data: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub value: u8,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderCategoriesRequest {
    pub kind: String,
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl PageQuery {
    pub fn request(&self) -> PageRequest {
        PageRequest::clamped(self.page, self.limit)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
    pub archived: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct KindQuery {
    pub kind: Option<String>,
}

pub fn parse_category_kind(s: &str) -> Result<CategoryKind, axum::response::Response> {
    match s.to_lowercase().as_str() {
        "deal" => Ok(CategoryKind::Deal),
        "listing" => Ok(CategoryKind::Listing),
        _ => Err(errors::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_kind",
            "kind must be one of: deal, listing",
        )),
    }
}
