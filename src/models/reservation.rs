//! # مدل رزرو (Reservation Model)
//!
//! ## چرخه وضعیت:
//! ```text
//! PENDING ──approve──▶ APPROVED
//!    │
//!    └────reject────▶ REJECTED
//! ```
//! APPROVED و REJECTED وضعیت نهایی هستن و هیچ انتقالی ازشون وجود نداره.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// =====================================
// Status
// =====================================
/// وضعیت رزرو
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReservationStatus {
    /// وضعیت‌هایی که روز کاربر رو "اشغال" میکنن
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// آیا انتقال از این وضعیت به `next` مجازه؟
    #[must_use]
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

// =====================================
// Reservation Entity
// =====================================
/// سطر جدول reservations
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub parking_slot_id: Option<String>,
    pub date: NaiveDate,
    pub status: ReservationStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// رزرو به همراه اطلاعات خودرو، جای پارک و کاربر (نتیجه JOIN)
///
/// ستون‌های جدول‌های join شده با پیشوند اسم جدول میان.
#[derive(Debug, Clone, FromRow)]
pub struct ReservationDetailsRow {
    pub id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub parking_slot_id: Option<String>,
    pub date: NaiveDate,
    pub status: ReservationStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub vehicle_plate: String,
    pub vehicle_model: String,
    pub slot_code: Option<String>,
    pub user_email: String,
    pub user_first_name: String,
    pub user_last_name: String,
}

// =====================================
// Request DTOs
// =====================================
/// درخواست ساخت رزرو
///
/// تاریخ به صورت رشته `YYYY-MM-DD` میاد و در سرویس parse میشه
/// تا پیام خطای فرمت تاریخ یکدست باشه.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    #[validate(length(min = 1, message = "Vehicle ID is required"))]
    pub vehicle_id: String,

    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
}

/// درخواست تایید رزرو (ادمین)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApproveReservationRequest {
    #[validate(length(min = 1, message = "Parking slot ID is required"))]
    pub parking_slot_id: String,
}

// =====================================
// Response DTOs
// =====================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSummary {
    pub id: String,
    pub plate: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSummary {
    pub id: String,
    pub slot_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// پاسخ رزرو در API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: String,
    pub user_id: String,
    pub vehicle_id: String,
    pub parking_slot_id: Option<String>,
    pub date: NaiveDate,
    pub status: ReservationStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub vehicle: VehicleSummary,
    pub parking_slot: Option<SlotSummary>,
    pub user: UserSummary,
}

impl From<ReservationDetailsRow> for ReservationResponse {
    fn from(row: ReservationDetailsRow) -> Self {
        // جای پارک فقط وقتی معنی داره که هم id و هم کد داشته باشیم
        let parking_slot = match (&row.parking_slot_id, row.slot_code) {
            (Some(id), Some(slot_code)) => Some(SlotSummary {
                id: id.clone(),
                slot_code,
            }),
            _ => None,
        };

        Self {
            vehicle: VehicleSummary {
                id: row.vehicle_id.clone(),
                plate: row.vehicle_plate,
                model: row.vehicle_model,
            },
            user: UserSummary {
                id: row.user_id.clone(),
                email: row.user_email,
                first_name: row.user_first_name,
                last_name: row.user_last_name,
            },
            parking_slot,
            id: row.id,
            user_id: row.user_id,
            vehicle_id: row.vehicle_id,
            parking_slot_id: row.parking_slot_id,
            date: row.date,
            status: row.status,
            approved_by: row.approved_by,
            approved_at: row.approved_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
