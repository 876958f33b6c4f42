//! # Custom Extractors
//!
//! Extractor‌های سفارشی برای استخراج داده از request
//!
//! ## مفاهیم Rust + Axum:
//! - **Extractors**: نوع‌هایی که از request داده استخراج میکنن
//! - **FromRequestParts**: trait برای extractor‌هایی که body لازم ندارن
//! - **FromRequest**: برای extractor‌هایی که body رو مصرف میکنن
//! - **Rejection**: نوع خطا برای extractors
//!
//! ## چطور کار میکنه؟
//! وقتی یه extractor به عنوان پارامتر handler تعریف میشه،
//! axum قبل از اجرای handler، extractor رو اجرا میکنه.

use axum::{
    async_trait,
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts},
    http::{header, request::Parts, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::{
    error::AppError,
    services::{AppState, CurrentUser},
};

// =====================================
// Bearer Token Extractor
// =====================================
/// استخراج توکن از header Authorization
///
/// # استفاده در handler:
/// ```rust,ignore
/// async fn handler(BearerToken(token): BearerToken) -> ... {
///     // token حالا یه String هست
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let token = crate::services::extract_token_from_header(auth_header).ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        Ok(BearerToken(token.to_string()))
    }
}

// =====================================
// Auth User Extractor
// =====================================
/// کاربر احراز هویت شده
///
/// توکن رو verify میکنه و شناسه و نقش کاربر رو برمیگردونه.
/// اگه توکن نباشه، نامعتبر باشه یا کاربرش حذف شده باشه، 401.
///
/// # استفاده:
/// ```rust,ignore
/// async fn handler(AuthUser(user): AuthUser) -> ... {
///     // user.id و user.role
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let user = state.auth_service.authenticate(&token).await?;

        Ok(AuthUser(user))
    }
}

// =====================================
// Admin User Extractor
// =====================================
/// مثل `AuthUser` ولی فقط برای نقش ADMIN؛ بقیه 403 میگیرن
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(AppError::admin_required());
        }

        Ok(AdminUser(user))
    }
}

// =====================================
// Request ID Extractor
// =====================================
/// Request ID که middleware `request_id` روی request گذاشته
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl RequestId {
    /// Header name برای request ID
    pub const HEADER_NAME: &'static str = "X-Request-Id";
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = std::convert::Infallible; // هیچوقت fail نمیکنه

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(Self::HEADER_NAME)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .unwrap_or_else(|| nanoid::nanoid!(12));

        Ok(RequestId(request_id))
    }
}

// =====================================
// JSON with Validation
// =====================================
/// استخراج JSON با اعتبارسنجی خودکار
///
/// JSON خراب یا نوع اشتباه → 400 با همون فرمت `ErrorResponse`
///
/// # استفاده:
/// ```rust,ignore
/// async fn handler(ValidatedJson(data): ValidatedJson<CreateVehicleRequest>) -> ... {
///     // data حتما valid هست
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data): Json<T> = Json::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| AppError::BadRequest(format!("Invalid JSON: {}", e.body_text())))?;

        data.validate()?;

        Ok(ValidatedJson(data))
    }
}
