//! # Vehicle Handlers
//!
//! همه route‌ها نیاز به توکن دارن و فقط روی خودروهای خود کاربر کار میکنن.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    api::extractors::{AuthUser, ValidatedJson},
    error::Result,
    models::{ApiResponse, CreateVehicleRequest, Id, UpdateVehicleRequest, Vehicle},
    services::AppState,
};

/// ثبت خودرو
///
/// # Endpoint
/// `POST /api/vehicles`
///
/// # Request Body
/// ```json
/// { "plate": "12B34511", "model": "Peugeot 206" }
/// ```
pub async fn create_vehicle(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(request): ValidatedJson<CreateVehicleRequest>,
) -> Result<impl IntoResponse> {
    let vehicle = state.vehicle_service.create(&user, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(vehicle).with_message("Vehicle added successfully")),
    ))
}

/// `GET /api/vehicles`
pub async fn list_vehicles(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<Vec<Vehicle>>>> {
    let vehicles = state.vehicle_service.list_mine(&user).await?;

    Ok(Json(ApiResponse::success(vehicles)))
}

/// `GET /api/vehicles/:id`
pub async fn get_vehicle(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vehicle>>> {
    let id = Id::parse(&id, "vehicle")?;
    let vehicle = state.vehicle_service.get_mine(&user, &id).await?;

    Ok(Json(ApiResponse::success(vehicle)))
}

/// `PUT /api/vehicles/:id`
pub async fn update_vehicle(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>> {
    let id = Id::parse(&id, "vehicle")?;
    let vehicle = state.vehicle_service.update_mine(&user, &id, request).await?;

    Ok(Json(ApiResponse::success(vehicle).with_message("Vehicle updated successfully")))
}

/// `DELETE /api/vehicles/:id`
pub async fn delete_vehicle(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = Id::parse(&id, "vehicle")?;
    state.vehicle_service.delete_mine(&user, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
