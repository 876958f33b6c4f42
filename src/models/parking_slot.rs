//! # مدل جای پارک (Parking Slot Model)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// جای پارک
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ParkingSlot {
    pub id: String,
    pub slot_code: String,
    pub created_at: DateTime<Utc>,
}

/// درخواست ساخت جای پارک (فقط ادمین)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateParkingSlotRequest {
    #[validate(length(min = 1, max = 20, message = "Slot code is required (max 20 characters)"))]
    pub slot_code: String,
}

/// query string برای `GET /parking-slots/available`
#[derive(Debug, Clone, Deserialize)]
pub struct AvailableSlotsQuery {
    pub date: Option<String>,
}
