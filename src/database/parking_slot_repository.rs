//! # Parking Slot Repository

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqliteConnection;

use super::{Database, Repository};
use crate::error::{is_unique_violation, AppError, Result};
use crate::models::ParkingSlot;

pub const SLOT_IN_USE_MESSAGE: &str = "Cannot delete parking slot that has associated reservations";

/// Repository برای جاهای پارک
#[derive(Debug, Clone)]
pub struct ParkingSlotRepository {
    db: Database,
}

impl ParkingSlotRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// ساخت جای پارک
    ///
    /// کد تکراری → `AppError::Conflict`
    pub async fn create(&self, id: &str, slot_code: &str) -> Result<ParkingSlot> {
        sqlx::query("INSERT INTO parking_slots (id, slot_code, created_at) VALUES (?, ?, ?)")
            .bind(id)
            .bind(slot_code)
            .bind(Utc::now())
            .execute(self.db.pool())
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AppError::Conflict("Parking slot with this code already exists".to_string())
                } else {
                    e.into()
                }
            })?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create parking slot".to_string()))
    }

    /// نسخه تراکنشی `find_by_id`
    pub async fn find_by_id_in(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<ParkingSlot>> {
        let slot = sqlx::query_as::<_, ParkingSlot>(
            "SELECT id, slot_code, created_at FROM parking_slots WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(slot)
    }

    /// جاهای پارکی که در این تاریخ به هیچ رزرو APPROVED داده نشدن
    pub async fn find_available(&self, date: NaiveDate) -> Result<Vec<ParkingSlot>> {
        let slots = sqlx::query_as::<_, ParkingSlot>(
            r#"
            SELECT id, slot_code, created_at
            FROM parking_slots
            WHERE id NOT IN (
                SELECT parking_slot_id
                FROM reservations
                WHERE date = ? AND status = 'APPROVED' AND parking_slot_id IS NOT NULL
            )
            ORDER BY slot_code ASC
            "#,
        )
        .bind(date)
        .fetch_all(self.db.pool())
        .await?;

        Ok(slots)
    }

    /// آیا رزروی (با هر وضعیتی) به این جای پارک اشاره میکنه؟
    pub async fn has_reservations(&self, id: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM reservations WHERE parking_slot_id = ?",
        )
        .bind(id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(count > 0)
    }
}

#[async_trait]
impl Repository for ParkingSlotRepository {
    type Entity = ParkingSlot;
    type Id = str;

    async fn find_by_id(&self, id: &str) -> Result<Option<ParkingSlot>> {
        let mut conn = self.db.pool().acquire().await?;
        self.find_by_id_in(&mut conn, id).await
    }

    /// همه جاهای پارک، مرتب بر اساس کد
    async fn find_all(&self) -> Result<Vec<ParkingSlot>> {
        let slots = sqlx::query_as::<_, ParkingSlot>(
            "SELECT id, slot_code, created_at FROM parking_slots ORDER BY slot_code ASC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(slots)
    }

    /// حذف جای پارک
    ///
    /// foreign key با `ON DELETE RESTRICT` جلوی حذف جای پارک رزرو شده رو میگیره،
    /// حتی اگه رزرو بعد از چک `has_reservations` اضافه شده باشه.
    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM parking_slots WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await
            .map_err(|e| {
                let referenced = matches!(
                    &e,
                    sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation()
                );
                if referenced {
                    AppError::BadRequest(SLOT_IN_USE_MESSAGE.to_string())
                } else {
                    e.into()
                }
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM parking_slots")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}
