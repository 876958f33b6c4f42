//! # مدل خودرو (Vehicle Model)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

// =====================================
// Vehicle Entity
// =====================================
/// خودروی ثبت شده توسط کاربر
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub user_id: String,
    pub plate: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =====================================
// Request DTOs
// =====================================
/// درخواست ثبت خودرو
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 5, max = 10, message = "Plate must be between 5 and 10 characters"))]
    pub plate: String,

    #[validate(length(min = 2, message = "Model must be at least 2 characters"))]
    pub model: String,
}

/// درخواست ویرایش خودرو (همه فیلدها اختیاری)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 5, max = 10, message = "Plate must be between 5 and 10 characters"))]
    pub plate: Option<String>,

    #[validate(length(min = 2, message = "Model must be at least 2 characters"))]
    pub model: Option<String>,
}

impl UpdateVehicleRequest {
    /// اعمال تغییرات روی خودروی موجود
    pub fn apply_to(self, vehicle: &mut Vehicle) {
        if let Some(plate) = self.plate {
            vehicle.plate = plate.trim().to_string();
        }
        if let Some(model) = self.model {
            vehicle.model = model.trim().to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_length_validation() {
        let short = CreateVehicleRequest {
            plate: "AB1".to_string(),
            model: "Pride".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = CreateVehicleRequest {
            plate: "12B345".to_string(),
            model: "Pride".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_partial_update_keeps_missing_fields() {
        let now = Utc::now();
        let mut vehicle = Vehicle {
            id: "v1".to_string(),
            user_id: "u1".to_string(),
            plate: "12B345".to_string(),
            model: "Pride".to_string(),
            created_at: now,
            updated_at: now,
        };

        UpdateVehicleRequest {
            plate: None,
            model: Some("Peugeot 206".to_string()),
        }
        .apply_to(&mut vehicle);

        assert_eq!(vehicle.plate, "12B345");
        assert_eq!(vehicle.model, "Peugeot 206");
    }
}
