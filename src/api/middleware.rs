//! # Middleware
//!
//! Middleware‌های سفارشی برای پردازش request/response
//!
//! ## مفاهیم:
//! - **Middleware**: کد که قبل/بعد از handler اجرا میشه
//! - **Tower**: کتابخانه middleware در اکوسیستم Rust
//! - **`from_fn`**: ساخت middleware از یک async fn

use axum::{
    body::Body,
    http::{header::HeaderValue, Request},
    middleware::Next,
    response::IntoResponse,
};
use std::time::Instant;
use tracing::{info, warn};

use super::RequestId;

// =====================================
// Request Timing Middleware
// =====================================
/// اندازه‌گیری زمان پردازش request
///
/// # استفاده:
/// ```rust,ignore
/// let app = Router::new()
///     .layer(axum::middleware::from_fn(request_timing));
/// ```
pub async fn request_timing(request: Request<Body>, next: Next) -> impl IntoResponse {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let request_id = request
        .headers()
        .get(RequestId::HEADER_NAME)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    if response.status().is_server_error() {
        warn!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %response.status(),
            duration_ms = %duration.as_millis(),
            "Request failed"
        );
    } else {
        info!(
            request_id = %request_id,
            method = %method,
            uri = %uri,
            status = %response.status(),
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

// =====================================
// Request ID Middleware
// =====================================
/// اضافه کردن Request ID به هر request و response
///
/// اگه کلاینت `X-Request-Id` معتبر فرستاده باشه همون استفاده میشه.
pub async fn request_id(mut request: Request<Body>, next: Next) -> impl IntoResponse {
    let header_value = request
        .headers()
        .get(RequestId::HEADER_NAME)
        .filter(|v| !v.is_empty() && v.len() <= 64)
        .cloned()
        .or_else(|| HeaderValue::from_str(&nanoid::nanoid!(12)).ok());

    if let Some(value) = &header_value {
        request
            .headers_mut()
            .insert(RequestId::HEADER_NAME, value.clone());
    }

    let mut response = next.run(request).await;

    if let Some(value) = header_value {
        response.headers_mut().insert(RequestId::HEADER_NAME, value);
    }

    response
}

// =====================================
// Security Headers Middleware
// =====================================
/// اضافه کردن header‌های امنیتی
pub async fn security_headers(request: Request<Body>, next: Next) -> impl IntoResponse {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // جلوگیری از MIME sniffing
    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));

    // جلوگیری از clickjacking
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));

    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
