//! # لایه API
//!
//! این ماژول HTTP handlers و routing رو مدیریت میکنه.
//!
//! ## مفاهیم Rust + Axum:
//! - **Router**: تعریف مسیرها
//! - **Handler Functions**: پردازش request‌ها
//! - **Extractors**: استخراج داده از request (`AuthUser`, `AdminUser`, `ValidatedJson`)
//! - **State**: اشتراک state بین handlers
//! - **Middleware**: پردازش قبل/بعد از handler
//!
//! ## ساختار URL‌ها:
//! - `/api/users/...` - ثبت‌نام، ورود، بازیابی رمز، پروفایل، مدیریت کاربران
//! - `/api/vehicles/...` - خودروهای کاربر
//! - `/api/parking-slots/...` - جاهای پارک
//! - `/api/reservations/...` - workflow رزرو
//! - `GET /health` - Health check
//!
//! مسیرهای ثابت مثل `/users/me` و `/reservations/pending` کنار `/:id` تعریف شدن؛
//! router در axum مسیر ثابت رو به پارامتر ترجیح میده.

mod handlers;
mod middleware;
mod extractors;

pub use handlers::*;
pub use middleware::*;
pub use extractors::*;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use std::time::Duration;

use crate::services::AppState;

/// حداکثر زمان پردازش هر request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// =====================================
// Router Builder
// =====================================
/// ساخت Router اصلی برنامه
///
/// # مفاهیم:
/// - `.nest()`: گروه‌بندی route‌ها
/// - `.layer()`: اضافه کردن middleware
/// - `.with_state()`: تزریق state
///
/// در `ServiceBuilder` لایه اول بیرونی‌ترین لایه هست، پس request ID قبل از
/// timing و security headers ست میشه.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .route("/health", get(handlers::health::health_check))
        .layer(
            ServiceBuilder::new()
                // Tracing - لاگ کردن request‌ها
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(request_id))
                .layer(axum_middleware::from_fn(request_timing))
                .layer(axum_middleware::from_fn(security_headers))
                .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

/// Route‌های API
fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user_routes())
        .nest("/vehicles", vehicle_routes())
        .nest("/parking-slots", parking_slot_routes())
        .nest("/reservations", reservation_routes())
}

fn user_routes() -> Router<AppState> {
    Router::new()
        // عمومی
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password))
        // نیاز به توکن
        .route(
            "/me",
            get(handlers::user::get_profile).put(handlers::user::update_profile),
        )
        .route("/", get(handlers::user::list_users))
        .route(
            "/:id",
            get(handlers::user::get_user).delete(handlers::user::delete_user),
        )
}

fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::vehicle::create_vehicle).get(handlers::vehicle::list_vehicles),
        )
        .route(
            "/:id",
            get(handlers::vehicle::get_vehicle)
                .put(handlers::vehicle::update_vehicle)
                .delete(handlers::vehicle::delete_vehicle),
        )
}

fn parking_slot_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::parking_slot::list_slots).post(handlers::parking_slot::create_slot),
        )
        .route("/available", get(handlers::parking_slot::list_available_slots))
        .route(
            "/:id",
            get(handlers::parking_slot::get_slot).delete(handlers::parking_slot::delete_slot),
        )
}

fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::reservation::create_reservation)
                .get(handlers::reservation::list_my_reservations),
        )
        .route("/pending", get(handlers::reservation::list_pending_reservations))
        .route("/:id", get(handlers::reservation::get_reservation))
        .route("/:id/approve", put(handlers::reservation::approve_reservation))
        .route("/:id/reject", put(handlers::reservation::reject_reservation))
}
