//! # Parking Slot Handlers
//!
//! خوندن عمومیه؛ ساخت و حذف فقط برای ادمین.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    api::extractors::{AdminUser, ValidatedJson},
    error::Result,
    models::{ApiResponse, AvailableSlotsQuery, CreateParkingSlotRequest, Id, ParkingSlot},
    services::AppState,
};

/// `GET /api/parking-slots`
pub async fn list_slots(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<ParkingSlot>>>> {
    let slots = state.parking_slot_service.list().await?;

    Ok(Json(ApiResponse::success(slots)))
}

/// جاهای آزاد در یک تاریخ
///
/// # Endpoint
/// `GET /api/parking-slots/available?date=2024-06-01`
pub async fn list_available_slots(
    State(state): State<AppState>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<ApiResponse<Vec<ParkingSlot>>>> {
    let slots = state
        .parking_slot_service
        .list_available(query.date.as_deref())
        .await?;

    Ok(Json(ApiResponse::success(slots)))
}

/// `GET /api/parking-slots/:id`
pub async fn get_slot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ParkingSlot>>> {
    let id = Id::parse(&id, "parking slot")?;
    let slot = state.parking_slot_service.get(&id).await?;

    Ok(Json(ApiResponse::success(slot)))
}

/// ساخت جای پارک (ادمین)
///
/// # Endpoint
/// `POST /api/parking-slots`
///
/// # Request Body
/// ```json
/// { "slotCode": "A-12" }
/// ```
pub async fn create_slot(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    ValidatedJson(request): ValidatedJson<CreateParkingSlotRequest>,
) -> Result<impl IntoResponse> {
    let slot = state.parking_slot_service.create(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(slot).with_message("Parking slot created successfully")),
    ))
}

/// `DELETE /api/parking-slots/:id` (ادمین)
pub async fn delete_slot(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = Id::parse(&id, "parking slot")?;
    state.parking_slot_service.delete(&id).await?;

    Ok(StatusCode::NO_CONTENT)
}
