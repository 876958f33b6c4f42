//! # Vehicle Repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqliteConnection;

use super::{Database, Repository};
use crate::error::{AppError, Result};
use crate::models::Vehicle;

/// Repository برای خودروها
#[derive(Debug, Clone)]
pub struct VehicleRepository {
    db: Database,
}

impl VehicleRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// ثبت خودرو برای یک کاربر
    pub async fn create(&self, id: &str, user_id: &str, plate: &str, model: &str) -> Result<Vehicle> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO vehicles (id, user_id, plate, model, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(plate)
        .bind(model)
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            // کاربر بین احراز هویت و insert حذف شده
            let orphaned = matches!(
                &e,
                sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation()
            );
            if orphaned {
                AppError::Unauthorized("User no longer exists".to_string())
            } else {
                e.into()
            }
        })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create vehicle".to_string()))
    }

    /// خودروهای یک کاربر
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, user_id, plate, model, created_at, updated_at
            FROM vehicles
            WHERE user_id = ?
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(vehicles)
    }

    /// پیدا کردن خودرو فقط اگه مال این کاربر باشه
    pub async fn find_owned(&self, id: &str, user_id: &str) -> Result<Option<Vehicle>> {
        let mut conn = self.db.pool().acquire().await?;
        self.find_owned_in(&mut conn, id, user_id).await
    }

    /// نسخه تراکنشی `find_owned`
    pub async fn find_owned_in(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        user_id: &str,
    ) -> Result<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, user_id, plate, model, created_at, updated_at
            FROM vehicles
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(vehicle)
    }

    /// ذخیره تغییرات پلاک و مدل
    pub async fn update(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        sqlx::query("UPDATE vehicles SET plate = ?, model = ?, updated_at = ? WHERE id = ?")
            .bind(&vehicle.plate)
            .bind(&vehicle.model)
            .bind(Utc::now())
            .bind(&vehicle.id)
            .execute(self.db.pool())
            .await?;

        self.find_by_id(vehicle.id.as_str())
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
    }

    /// آیا رزروی به این خودرو اشاره میکنه؟
    pub async fn has_reservations(&self, id: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reservations WHERE vehicle_id = ?",
        )
        .bind(id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(count > 0)
    }
}

#[async_trait]
impl Repository for VehicleRepository {
    type Entity = Vehicle;
    type Id = str;

    async fn find_by_id(&self, id: &str) -> Result<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT id, user_id, plate, model, created_at, updated_at FROM vehicles WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(vehicle)
    }

    async fn find_all(&self) -> Result<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT id, user_id, plate, model, created_at, updated_at FROM vehicles ORDER BY created_at ASC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(vehicles)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM vehicles WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM vehicles")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}
