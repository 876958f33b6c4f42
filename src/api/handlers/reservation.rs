//! # Reservation Handlers
//!
//! ## مسیرها
//! - `POST /api/reservations` - درخواست رزرو (کاربر)
//! - `GET /api/reservations` - رزروهای من
//! - `GET /api/reservations/pending` - رزروهای در انتظار (ادمین)
//! - `GET /api/reservations/:id` - یک رزرو (صاحب یا ادمین)
//! - `PUT /api/reservations/:id/approve` - تایید با جای پارک (ادمین)
//! - `PUT /api/reservations/:id/reject` - رد (ادمین)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    api::extractors::{AdminUser, AuthUser, RequestId, ValidatedJson},
    error::Result,
    models::{
        ApiResponse, ApproveReservationRequest, CreateReservationRequest, Id,
        ReservationResponse,
    },
    services::AppState,
};

/// درخواست رزرو
///
/// # Request Body
/// ```json
/// { "vehicleId": "…uuid…", "date": "2024-06-01" }
/// ```
pub async fn create_reservation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<impl IntoResponse> {
    let reservation = state.reservation_service.create(&user, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation).with_message("Reservation request submitted")),
    ))
}

pub async fn list_my_reservations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<Vec<ReservationResponse>>>> {
    let reservations = state.reservation_service.list_mine(&user).await?;

    Ok(Json(ApiResponse::success(reservations)))
}

pub async fn list_pending_reservations(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<ReservationResponse>>>> {
    let reservations = state.reservation_service.list_pending().await?;

    Ok(Json(ApiResponse::success(reservations)))
}

pub async fn get_reservation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationResponse>>> {
    let id = Id::parse(&id, "reservation")?;
    let reservation = state.reservation_service.get(&user, &id).await?;

    Ok(Json(ApiResponse::success(reservation)))
}

/// تایید رزرو
///
/// # Request Body
/// ```json
/// { "parkingSlotId": "…uuid…" }
/// ```
pub async fn approve_reservation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    RequestId(request_id): RequestId,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<ApproveReservationRequest>,
) -> Result<Json<ApiResponse<ReservationResponse>>> {
    let id = Id::parse(&id, "reservation")?;
    tracing::debug!(request_id = %request_id, "Approve reservation requested");

    let reservation = state.reservation_service.approve(&admin, &id, request).await?;

    Ok(Json(ApiResponse::success(reservation).with_message("Reservation approved")))
}

pub async fn reject_reservation(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    RequestId(request_id): RequestId,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ReservationResponse>>> {
    let id = Id::parse(&id, "reservation")?;
    tracing::debug!(request_id = %request_id, "Reject reservation requested");

    let reservation = state.reservation_service.reject(&admin, &id).await?;

    Ok(Json(ApiResponse::success(reservation).with_message("Reservation rejected")))
}
