//! # Reservation Repository
//!
//! همه متدهایی که در workflow تایید/رد رزرو استفاده میشن نسخه `_in` دارن
//! و روی اتصال تراکنش اجرا میشن. متدهای تغییر وضعیت شرطی هستن
//! (`WHERE status = 'PENDING'`) و تعداد سطرهای تغییر کرده رو برمیگردونن؛
//! صفر یعنی یه درخواست دیگه زودتر وضعیت رو عوض کرده.
//!
//! متدهای `insert_in` و `approve_in` خطای خام `sqlx::Error` برمیگردونن تا سرویس
//! بتونه نقض unique index رو به پیام دامنه‌ای خودش تبدیل کنه.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqliteConnection;

use super::Database;
use crate::error::Result;
use crate::models::{Reservation, ReservationDetailsRow};

const RESERVATION_COLUMNS: &str = "id, user_id, vehicle_id, parking_slot_id, date, status, \
     approved_by, approved_at, created_at, updated_at";

/// SELECT پایه برای رزرو به همراه خودرو، کاربر و جای پارک
const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.user_id, r.vehicle_id, r.parking_slot_id, r.date, r.status,
           r.approved_by, r.approved_at, r.created_at, r.updated_at,
           v.plate      AS vehicle_plate,
           v.model      AS vehicle_model,
           s.slot_code  AS slot_code,
           u.email      AS user_email,
           u.first_name AS user_first_name,
           u.last_name  AS user_last_name
    FROM reservations r
    JOIN vehicles v ON v.id = r.vehicle_id
    JOIN users u ON u.id = r.user_id
    LEFT JOIN parking_slots s ON s.id = r.parking_slot_id
"#;

/// Repository برای رزروها
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    db: Database,
}

impl ReservationRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // ----------------------------------------
    // Transactional (روی اتصال تراکنش)
    // ----------------------------------------

    pub async fn find_by_id_in(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(reservation)
    }

    pub async fn find_details_in(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> Result<Option<ReservationDetailsRow>> {
        let row = sqlx::query_as::<_, ReservationDetailsRow>(&format!(
            "{DETAILS_SELECT} WHERE r.id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }

    /// آیا کاربر در این تاریخ رزرو PENDING یا APPROVED داره؟
    pub async fn has_active_for_date_in(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE user_id = ? AND date = ? AND status IN ('PENDING', 'APPROVED')
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count > 0)
    }

    /// آیا این جای پارک در این تاریخ به رزرو APPROVED دیگه‌ای داده شده؟
    pub async fn slot_taken_in(
        &self,
        conn: &mut SqliteConnection,
        slot_id: &str,
        date: NaiveDate,
        excluding_reservation_id: &str,
    ) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM reservations
            WHERE parking_slot_id = ? AND date = ? AND status = 'APPROVED' AND id <> ?
            "#,
        )
        .bind(slot_id)
        .bind(date)
        .bind(excluding_reservation_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(count > 0)
    }

    /// درج رزرو PENDING
    pub async fn insert_in(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        user_id: &str,
        vehicle_id: &str,
        date: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO reservations (id, user_id, vehicle_id, date, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'PENDING', ?, ?)
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(vehicle_id)
        .bind(date)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// PENDING → APPROVED
    pub async fn approve_in(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        slot_id: &str,
        admin_id: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'APPROVED',
                parking_slot_id = ?,
                approved_by = ?,
                approved_at = ?,
                updated_at = ?
            WHERE id = ? AND status = 'PENDING'
            "#,
        )
        .bind(slot_id)
        .bind(admin_id)
        .bind(approved_at)
        .bind(approved_at)
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// PENDING → REJECTED
    pub async fn reject_in(&self, conn: &mut SqliteConnection, id: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE reservations
            SET status = 'REJECTED', updated_at = ?
            WHERE id = ? AND status = 'PENDING'
            "#,
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected())
    }

    // ----------------------------------------
    // Read-only (از pool)
    // ----------------------------------------

    pub async fn find_details(&self, id: &str) -> Result<Option<ReservationDetailsRow>> {
        let mut conn = self.db.pool().acquire().await?;
        self.find_details_in(&mut conn, id).await
    }

    /// رزروهای یک کاربر، مرتب بر اساس تاریخ
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<ReservationDetailsRow>> {
        let rows = sqlx::query_as::<_, ReservationDetailsRow>(&format!(
            "{DETAILS_SELECT} WHERE r.user_id = ? ORDER BY r.date ASC, r.created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }

    /// همه رزروهای در انتظار، مرتب بر اساس تاریخ
    pub async fn find_pending(&self) -> Result<Vec<ReservationDetailsRow>> {
        let rows = sqlx::query_as::<_, ReservationDetailsRow>(&format!(
            "{DETAILS_SELECT} WHERE r.status = 'PENDING' ORDER BY r.date ASC, r.created_at ASC"
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows)
    }
}
