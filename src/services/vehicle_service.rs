//! # سرویس خودروها
//!
//! هر کاربر فقط خودروهای خودش رو میبینه و تغییر میده. خودروی کاربر دیگه
//! دقیقا مثل خودروی ناموجود گزارش میشه (404) تا وجودش لو نره.

use tracing::{info, instrument};
use validator::Validate;

use crate::{
    database::{Repository, VehicleRepository},
    error::{AppError, Result},
    models::{CreateVehicleRequest, Id, UpdateVehicleRequest, Vehicle},
};

use super::CurrentUser;

pub const VEHICLE_NOT_OWNED_MESSAGE: &str = "Vehicle not found or does not belong to the user";

#[derive(Debug, Clone)]
pub struct VehicleService {
    repo: VehicleRepository,
}

impl VehicleService {
    #[must_use]
    pub fn new(repo: VehicleRepository) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, request), fields(user_id = %caller.id))]
    pub async fn create(&self, caller: &CurrentUser, request: CreateVehicleRequest) -> Result<Vehicle> {
        request.validate()?;

        let vehicle = self
            .repo
            .create(
                Id::new().as_str(),
                caller.id.as_str(),
                request.plate.trim(),
                request.model.trim(),
            )
            .await?;

        info!(vehicle_id = %vehicle.id, "Vehicle registered");
        Ok(vehicle)
    }

    pub async fn list_mine(&self, caller: &CurrentUser) -> Result<Vec<Vehicle>> {
        self.repo.find_by_user(caller.id.as_str()).await
    }

    pub async fn get_mine(&self, caller: &CurrentUser, id: &Id) -> Result<Vehicle> {
        self.repo
            .find_owned(id.as_str(), caller.id.as_str())
            .await?
            .ok_or_else(not_owned)
    }

    #[instrument(skip(self, request), fields(user_id = %caller.id, vehicle_id = %id))]
    pub async fn update_mine(
        &self,
        caller: &CurrentUser,
        id: &Id,
        request: UpdateVehicleRequest,
    ) -> Result<Vehicle> {
        request.validate()?;

        let mut vehicle = self.get_mine(caller, id).await?;
        request.apply_to(&mut vehicle);

        let vehicle = self.repo.update(&vehicle).await?;
        info!("Vehicle updated");
        Ok(vehicle)
    }

    /// حذف خودرو
    ///
    /// خودرویی که در رزروی استفاده شده قابل حذف نیست تا تاریخچه رزروها از بین نره.
    #[instrument(skip(self), fields(user_id = %caller.id, vehicle_id = %id))]
    pub async fn delete_mine(&self, caller: &CurrentUser, id: &Id) -> Result<()> {
        let vehicle = self.get_mine(caller, id).await?;

        if self.repo.has_reservations(&vehicle.id).await? {
            return Err(AppError::BadRequest(
                "Cannot delete vehicle that has associated reservations".to_string(),
            ));
        }

        if !self.repo.delete(vehicle.id.as_str()).await? {
            return Err(not_owned());
        }

        info!("Vehicle deleted");
        Ok(())
    }
}

fn not_owned() -> AppError {
    AppError::NotFound(VEHICLE_NOT_OWNED_MESSAGE.to_string())
}
