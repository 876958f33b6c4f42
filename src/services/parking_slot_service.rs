//! # سرویس جاهای پارک

use tracing::{info, instrument};
use validator::Validate;

use crate::{
    database::{ParkingSlotRepository, Repository, SLOT_IN_USE_MESSAGE},
    error::{AppError, OptionExt, Result},
    models::{CreateParkingSlotRequest, Id, ParkingSlot},
    utils::parse_calendar_date,
};

pub const SLOT_NOT_FOUND_MESSAGE: &str = "Parking slot not found";

#[derive(Debug, Clone)]
pub struct ParkingSlotService {
    repo: ParkingSlotRepository,
}

impl ParkingSlotService {
    #[must_use]
    pub fn new(repo: ParkingSlotRepository) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<ParkingSlot>> {
        self.repo.find_all().await
    }

    pub async fn get(&self, id: &Id) -> Result<ParkingSlot> {
        self.repo
            .find_by_id(id.as_str())
            .await?
            .ok_or_not_found(SLOT_NOT_FOUND_MESSAGE)
    }

    /// جاهای پارک آزاد در یک تاریخ
    ///
    /// = همه جاها منهای جاهایی که در اون تاریخ به رزرو APPROVED داده شدن.
    pub async fn list_available(&self, raw_date: Option<&str>) -> Result<Vec<ParkingSlot>> {
        let raw_date = raw_date
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| AppError::BadRequest("Date is required".to_string()))?;
        let date = parse_calendar_date(raw_date)?;

        self.repo.find_available(date).await
    }

    #[instrument(skip(self, request))]
    pub async fn create(&self, request: CreateParkingSlotRequest) -> Result<ParkingSlot> {
        request.validate()?;

        let slot_code = request.slot_code.trim();
        if slot_code.is_empty() {
            return Err(AppError::Validation("Slot code is required".to_string()));
        }

        let slot = self.repo.create(Id::new().as_str(), slot_code).await?;
        info!(slot_id = %slot.id, slot_code = %slot.slot_code, "Parking slot created");

        Ok(slot)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &Id) -> Result<()> {
        self.get(id).await?;

        if self.repo.has_reservations(id.as_str()).await? {
            return Err(AppError::BadRequest(SLOT_IN_USE_MESSAGE.to_string()));
        }

        if !self.repo.delete(id.as_str()).await? {
            return Err(AppError::NotFound(SLOT_NOT_FOUND_MESSAGE.to_string()));
        }

        info!(slot_id = %id, "Parking slot deleted");
        Ok(())
    }
}
