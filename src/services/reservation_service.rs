//! # سرویس رزرو (Reservation Workflow)
//!
//! ساخت رزرو، تایید با اختصاص جای پارک، و رد.
//!
//! ## قواعد
//! - هر کاربر در هر تاریخ حداکثر یک رزرو PENDING یا APPROVED داره
//! - هر جای پارک در هر تاریخ حداکثر به یک رزرو APPROVED داده میشه
//! - فقط رزرو PENDING قابل تایید یا رده
//!
//! ## همزمانی
//! هر عملیات (check‌ها + تغییر) داخل یک تراکنش اجرا میشه. دو partial unique index
//! در دیتابیس آخرین مانع double-booking هستن: اگه دو درخواست همزمان هر دو از
//! check‌ها رد بشن، دومی موقع INSERT/UPDATE با unique violation fail میشه و
//! همون خطای 400 دامنه‌ای رو میگیره. تغییر وضعیت هم شرطیه
//! (`WHERE status = 'PENDING'`) پس تایید/رد دوباره هیچ سطری رو تغییر نمیده.
//!
//! ایمیل‌ها بعد از commit فرستاده میشن و خطاشون فقط لاگ میشه.

use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    database::{Database, ParkingSlotRepository, ReservationRepository, VehicleRepository},
    error::{is_unique_violation, AppError, OptionExt, Result},
    models::{
        ApproveReservationRequest, CreateReservationRequest, Id, ReservationResponse,
        ReservationStatus,
    },
    notifications::Notifier,
    utils::parse_calendar_date,
};

use super::{CurrentUser, SLOT_NOT_FOUND_MESSAGE};

pub const DUPLICATE_RESERVATION_MESSAGE: &str =
    "You already have a pending or approved reservation for this date";
pub const VEHICLE_NOT_YOURS_MESSAGE: &str = "Vehicle not found or does not belong to you";
pub const RESERVATION_NOT_FOUND_MESSAGE: &str = "Reservation not found";
pub const NOT_PENDING_MESSAGE: &str = "Reservation is not in pending status";
pub const SLOT_TAKEN_MESSAGE: &str = "This parking slot is already assigned for this date";

#[derive(Debug, Clone)]
pub struct ReservationService {
    db: Database,
    repo: ReservationRepository,
    vehicles: VehicleRepository,
    slots: ParkingSlotRepository,
    notifier: Notifier,
}

impl ReservationService {
    #[must_use]
    pub fn new(
        db: Database,
        repo: ReservationRepository,
        vehicles: VehicleRepository,
        slots: ParkingSlotRepository,
        notifier: Notifier,
    ) -> Self {
        Self {
            db,
            repo,
            vehicles,
            slots,
            notifier,
        }
    }

    /// ساخت درخواست رزرو
    ///
    /// ترتیب check‌ها: فرمت تاریخ، رزرو تکراری در همون روز، مالکیت خودرو.
    #[instrument(skip(self, request), fields(user_id = %caller.id, date = %request.date))]
    pub async fn create(
        &self,
        caller: &CurrentUser,
        request: CreateReservationRequest,
    ) -> Result<ReservationResponse> {
        request.validate()?;
        let date = parse_calendar_date(&request.date)?;

        let mut tx = self.db.begin().await?;

        if self
            .repo
            .has_active_for_date_in(&mut *tx, caller.id.as_str(), date)
            .await?
        {
            return Err(AppError::BadRequest(DUPLICATE_RESERVATION_MESSAGE.to_string()));
        }

        // ID بدفرمت هم یعنی خودرویی با این ID مال کاربر نیست
        let vehicle_id = Id::parse(&request.vehicle_id, "vehicle")
            .map_err(|_| AppError::BadRequest(VEHICLE_NOT_YOURS_MESSAGE.to_string()))?;

        let vehicle = self
            .vehicles
            .find_owned_in(&mut *tx, vehicle_id.as_str(), caller.id.as_str())
            .await?
            .ok_or_else(|| AppError::BadRequest(VEHICLE_NOT_YOURS_MESSAGE.to_string()))?;

        let id = Id::new();
        self.repo
            .insert_in(&mut *tx, id.as_str(), caller.id.as_str(), &vehicle.id, date)
            .await
            .map_err(domain_conflict(DUPLICATE_RESERVATION_MESSAGE))?;

        let row = self
            .repo
            .find_details_in(&mut *tx, id.as_str())
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create reservation".to_string()))?;

        tx.commit().await?;

        info!(reservation_id = %id, "Reservation requested");
        Ok(row.into())
    }

    /// تایید رزرو و اختصاص جای پارک (ادمین)
    #[instrument(skip(self, request), fields(admin_id = %admin.id, reservation_id = %id))]
    pub async fn approve(
        &self,
        admin: &CurrentUser,
        id: &Id,
        request: ApproveReservationRequest,
    ) -> Result<ReservationResponse> {
        request.validate()?;
        let slot_id = Id::parse(&request.parking_slot_id, "parking slot")?;

        let mut tx = self.db.begin().await?;

        let reservation = self
            .repo
            .find_by_id_in(&mut *tx, id.as_str())
            .await?
            .ok_or_not_found(RESERVATION_NOT_FOUND_MESSAGE)?;

        if !reservation.status.can_transition_to(ReservationStatus::Approved) {
            return Err(AppError::BadRequest(NOT_PENDING_MESSAGE.to_string()));
        }

        let slot = self
            .slots
            .find_by_id_in(&mut *tx, slot_id.as_str())
            .await?
            .ok_or_not_found(SLOT_NOT_FOUND_MESSAGE)?;

        if self
            .repo
            .slot_taken_in(&mut *tx, &slot.id, reservation.date, &reservation.id)
            .await?
        {
            return Err(AppError::BadRequest(SLOT_TAKEN_MESSAGE.to_string()));
        }

        let updated = self
            .repo
            .approve_in(&mut *tx, &reservation.id, &slot.id, admin.id.as_str(), Utc::now())
            .await
            .map_err(domain_conflict(SLOT_TAKEN_MESSAGE))?;

        // یه درخواست دیگه بین خوندن و UPDATE وضعیت رو عوض کرده
        if updated == 0 {
            return Err(AppError::BadRequest(NOT_PENDING_MESSAGE.to_string()));
        }

        let row = self
            .repo
            .find_details_in(&mut *tx, &reservation.id)
            .await?
            .ok_or_not_found(RESERVATION_NOT_FOUND_MESSAGE)?;

        tx.commit().await?;
        info!(slot_code = %slot.slot_code, "Reservation approved");

        self.notifier
            .reservation_approved(&row.user_email, row.date, &slot.slot_code)
            .await;

        Ok(row.into())
    }

    /// رد رزرو (ادمین)
    #[instrument(skip(self), fields(admin_id = %admin.id, reservation_id = %id))]
    pub async fn reject(&self, admin: &CurrentUser, id: &Id) -> Result<ReservationResponse> {
        let mut tx = self.db.begin().await?;

        let reservation = self
            .repo
            .find_by_id_in(&mut *tx, id.as_str())
            .await?
            .ok_or_not_found(RESERVATION_NOT_FOUND_MESSAGE)?;

        if !reservation.status.can_transition_to(ReservationStatus::Rejected) {
            return Err(AppError::BadRequest(NOT_PENDING_MESSAGE.to_string()));
        }

        if self.repo.reject_in(&mut *tx, &reservation.id).await? == 0 {
            return Err(AppError::BadRequest(NOT_PENDING_MESSAGE.to_string()));
        }

        let row = self
            .repo
            .find_details_in(&mut *tx, &reservation.id)
            .await?
            .ok_or_not_found(RESERVATION_NOT_FOUND_MESSAGE)?;

        tx.commit().await?;
        info!("Reservation rejected");

        self.notifier.reservation_rejected(&row.user_email, row.date).await;

        Ok(row.into())
    }

    /// یک رزرو؛ فقط صاحبش یا ادمین
    pub async fn get(&self, caller: &CurrentUser, id: &Id) -> Result<ReservationResponse> {
        let row = self
            .repo
            .find_details(id.as_str())
            .await?
            .ok_or_not_found(RESERVATION_NOT_FOUND_MESSAGE)?;

        if !caller.is_admin() && row.user_id != caller.id.as_str() {
            return Err(AppError::Forbidden(
                "You do not have permission to view this reservation".to_string(),
            ));
        }

        Ok(row.into())
    }

    /// رزروهای کاربر جاری
    pub async fn list_mine(&self, caller: &CurrentUser) -> Result<Vec<ReservationResponse>> {
        let rows = self.repo.find_by_user(caller.id.as_str()).await?;
        Ok(rows.into_iter().map(ReservationResponse::from).collect())
    }

    /// همه رزروهای در انتظار (ادمین)
    pub async fn list_pending(&self) -> Result<Vec<ReservationResponse>> {
        let rows = self.repo.find_pending().await?;
        Ok(rows.into_iter().map(ReservationResponse::from).collect())
    }
}

/// تبدیل unique violation به خطای 400 دامنه‌ای
fn domain_conflict(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        if is_unique_violation(&e) {
            AppError::BadRequest(message.to_string())
        } else {
            e.into()
        }
    }
}
