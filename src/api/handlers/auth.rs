//! # Auth Handlers
//!
//! ثبت‌نام، ورود و بازیابی رمز (بدون نیاز به توکن)

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    api::extractors::ValidatedJson,
    error::Result,
    models::{
        ApiResponse, ForgotPasswordRequest, LoginRequest, LoginResponse, MessageResponse,
        RegisterRequest, ResetPasswordRequest,
    },
    services::{AppState, FORGOT_PASSWORD_MESSAGE},
};

// =====================================
// Register
// =====================================
/// ثبت‌نام کاربر جدید
///
/// # Endpoint
/// `POST /api/users/register`
///
/// # Request Body
/// ```json
/// {
///   "email": "user@example.com",
///   "password": "secret1",
///   "firstName": "Sara",
///   "lastName": "Ahmadi",
///   "phoneNumber": "09120000000"  // optional
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let user = state.auth_service.register(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user).with_message("User registered successfully")),
    ))
}

// =====================================
// Login
// =====================================
/// ورود کاربر
///
/// # Endpoint
/// `POST /api/users/login`
///
/// # Response
/// ```json
/// {
///   "success": true,
///   "data": {
///     "user": { ... },
///     "token": "eyJ...",
///     "expiresAt": "2024-..."
///   }
/// }
/// ```
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let response = state.auth_service.login(request).await?;

    Ok(Json(ApiResponse::success(response)))
}

// =====================================
// Password Reset
// =====================================
/// درخواست کد بازیابی
///
/// # Endpoint
/// `POST /api/users/forgot-password`
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state.auth_service.forgot_password(request).await?;

    Ok(Json(MessageResponse::ok(FORGOT_PASSWORD_MESSAGE)))
}

/// تغییر رمز با کد
///
/// # Endpoint
/// `POST /api/users/reset-password`
///
/// # Request Body
/// ```json
/// { "email": "user@example.com", "otp": "123456", "newPassword": "secret2" }
/// ```
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>> {
    state.auth_service.reset_password(request).await?;

    Ok(Json(MessageResponse::ok("Password has been reset successfully")))
}
