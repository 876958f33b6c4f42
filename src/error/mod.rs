//! # ماژول مدیریت خطاها (Error Handling)
//!
//! این ماژول سیستم مدیریت خطای برنامه رو تعریف میکنه.
//!
//! ## دسته‌بندی خطاها
//!
//! | نوع | کد HTTP |
//! |-----|---------|
//! | ورودی نامعتبر / نقض قوانین رزرو | 400 |
//! | احراز هویت نشده | 401 |
//! | دسترسی ممنوع (نقش یا مالکیت) | 403 |
//! | پیدا نشد | 404 |
//! | تکراری (unique constraint) | 409 |
//! | بقیه | 500 |
//!
//! ## مفاهیم Rust:
//! - **thiserror**: derive macro برای Error trait
//! - **From Trait**: تبدیل خودکار نوع‌ها برای `?`
//! - **Result Type Alias**: alias برای ساده‌تر شدن کد

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// نوع Result سفارشی برنامه
///
/// به جای نوشتن `Result<User, AppError>` میتونیم بنویسیم `Result<User>`
pub type Result<T, E = AppError> = std::result::Result<T, E>;

// =====================================
// Custom Error Enum
// =====================================
/// خطای اصلی برنامه
///
/// هر variant نمایانگر یک نوع خطا با داده‌های متفاوت هست.
#[derive(Debug, Error)]
pub enum AppError {
    // ----------------------------------------
    // خطاهای کاربر (4xx)
    // ----------------------------------------

    /// درخواست نامعتبر یا نقض قوانین کسب‌وکار - 400
    #[error("{0}")]
    BadRequest(String),

    /// خطای اعتبارسنجی ورودی - 400
    #[error("Validation error: {0}")]
    Validation(String),

    /// احراز هویت نشده - 401
    #[error("{0}")]
    Unauthorized(String),

    /// دسترسی ممنوع - 403
    #[error("{0}")]
    Forbidden(String),

    /// پیدا نشد - 404
    #[error("{0}")]
    NotFound(String),

    /// تکراری - 409
    #[error("{0}")]
    Conflict(String),

    // ----------------------------------------
    // خطاهای سرور (5xx)
    // ----------------------------------------

    /// خطای داخلی سرور - 500
    #[error("Internal server error: {0}")]
    Internal(String),

    /// خطای سرور HTTP
    #[error("Server error: {0}")]
    Server(String),

    /// خطای تنظیمات
    #[error("Configuration error: {0}")]
    Config(String),

    /// خطای ارسال ایمیل
    #[error("Mail error: {0}")]
    Mail(String),

    // ----------------------------------------
    // خطاهای تبدیل شده از کتابخانه‌ها
    // ----------------------------------------

    /// خطای دیتابیس
    /// تبدیلش دستی نوشته شده (پایین فایل) چون unique violation باید 409 بشه
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// خطای migration
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// خطای IO
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// خطای JWT
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// گرفتن HTTP status code متناسب با خطا
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,

            // 5xx Server Errors
            Self::Internal(_)
            | Self::Server(_)
            | Self::Config(_)
            | Self::Mail(_)
            | Self::Database(_)
            | Self::Migrate(_)
            | Self::Io(_)
            | Self::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// آیا این یه خطای سرور هست؟
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// پیام قابل نمایش برای کلاینت
    ///
    /// جزئیات خطاهای داخلی (مثل متن خطای SQL) به کلاینت نشون داده نمیشه.
    #[must_use]
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    /// ساخت خطای Not Found برای کاربر
    #[must_use]
    pub fn user_not_found(user_id: &str) -> Self {
        Self::NotFound(format!("User '{}' not found", user_id))
    }

    /// خطای دسترسی مخصوص route‌های ادمین
    #[must_use]
    pub fn admin_required() -> Self {
        Self::Forbidden("Admin access required".to_string())
    }
}

// =====================================
// Error Response DTO
// =====================================
/// ساختار پاسخ خطا در API
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// دلیل خطا (مثلا "Not Found")
    pub error: String,

    /// پیام خطا
    pub message: String,

    /// کد وضعیت HTTP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl ErrorResponse {
    /// ساخت پاسخ خطای جدید
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// اضافه کردن کد وضعیت
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status_code = Some(status.as_u16());
        self
    }
}

// =====================================
// IntoResponse Implementation
// =====================================
/// تبدیل AppError به Response HTTP
///
/// این باعث میشه بتونیم AppError رو مستقیم از handler برگردونیم.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // خطاهای سرور کامل لاگ میشن، ولی فقط پیام عمومی به کلاینت میره
        if self.is_server_error() {
            error!(error = %self, "Server error occurred");
        }

        let status = self.status_code();

        let error_response = ErrorResponse::new(
            status.canonical_reason().unwrap_or("Error"),
            self.public_message(),
        )
        .with_status(status);

        (status, Json(error_response)).into_response()
    }
}

// =====================================
// From Implementations
// =====================================

/// تبدیل خطای sqlx
///
/// نقض unique constraint (ایمیل یا کد جای پارک تکراری) به 409 تبدیل میشه.
/// سرویس رزرو قبل از رسیدن به اینجا خودش unique violation‌ها رو به 400 تبدیل میکنه.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if is_unique_violation(&err) {
            return AppError::Conflict("Resource already exists".to_string());
        }
        AppError::Database(err)
    }
}

/// آیا خطای دیتابیس نقض unique constraint هست؟
#[must_use]
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

// تبدیل validator error
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<lettre::error::Error> for AppError {
    fn from(err: lettre::error::Error) -> Self {
        AppError::Mail(err.to_string())
    }
}

impl From<lettre::address::AddressError> for AppError {
    fn from(err: lettre::address::AddressError) -> Self {
        AppError::Mail(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for AppError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        AppError::Mail(err.to_string())
    }
}

// =====================================
// Result Extensions
// =====================================
/// Extension trait برای Result
///
/// برای خطاهای کتابخانه‌هایی که `From` براشون نداریم (مثل `argon2`).
pub trait ResultExt<T> {
    /// تبدیل خطا به `AppError::Internal`
    fn map_internal(self) -> Result<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn map_internal(self) -> Result<T> {
        self.map_err(|e| AppError::Internal(e.to_string()))
    }
}

// =====================================
// Option Extensions
// =====================================
/// Extension trait برای Option
pub trait OptionExt<T> {
    /// تبدیل None به AppError::NotFound
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, message: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| AppError::NotFound(message.into()))
    }
}
