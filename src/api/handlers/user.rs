//! # User Handlers
//!
//! پروفایل کاربر جاری و مدیریت کاربران توسط ادمین

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    api::extractors::{AdminUser, AuthUser, ValidatedJson},
    error::{AppError, Result},
    models::{ApiResponse, Id, PaginatedResult, Pagination, UpdateProfileRequest, UserResponse},
    services::AppState,
};

/// پروفایل کاربر جاری
///
/// # Endpoint
/// `GET /api/users/me`
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let profile = state.user_service.me(&user).await?;

    Ok(Json(ApiResponse::success(profile)))
}

/// بروزرسانی پروفایل کاربر جاری
///
/// # Endpoint
/// `PUT /api/users/me`
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let profile = state.user_service.update_me(&user, request).await?;

    Ok(Json(ApiResponse::success(profile).with_message("Profile updated successfully")))
}

/// لیست کاربران (ادمین)
///
/// # Endpoint
/// `GET /api/users?page=1&limit=10&search=ali&sortBy=email&order=desc`
///
/// # Response
/// ```json
/// {
///   "success": true,
///   "data": {
///     "data": [ ... ],
///     "pagination": { "total": 35, "page": 1, "limit": 10, "totalPages": 4 }
///   }
/// }
/// ```
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    query: std::result::Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<ApiResponse<PaginatedResult<UserResponse>>>> {
    let Query(pagination) =
        query.map_err(|e| AppError::BadRequest(format!("Invalid query: {}", e.body_text())))?;

    let users = state.user_service.list_users(&pagination).await?;

    Ok(Json(ApiResponse::success(users)))
}

/// گرفتن یک کاربر (ادمین یا خود کاربر)
///
/// # Endpoint
/// `GET /api/users/:id`
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserResponse>>> {
    let id = Id::parse(&id, "user")?;
    let found = state.user_service.get_user(&user, &id).await?;

    Ok(Json(ApiResponse::success(found)))
}

/// حذف کاربر (ادمین)
///
/// # Endpoint
/// `DELETE /api/users/:id`
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = Id::parse(&id, "user")?;
    state.user_service.delete_user(&admin, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
