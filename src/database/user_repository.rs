//! # User Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite};

use super::{Database, Repository};
use crate::error::{AppError, Result};
use crate::models::{CreateUser, Pagination, Role, UpdateProfileRequest, User};

const USER_COLUMNS: &str = "id, email, password_hash, role, first_name, last_name, phone_number, \
     reset_token_hash, reset_token_expires_at, created_at, updated_at";

/// Repository برای مدیریت کاربران
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: Database,
}

impl UserRepository {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// پیدا کردن با email
    ///
    /// ایمیل باید از قبل نرمال شده باشه (`normalize_email`).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    /// ایجاد کاربر جدید
    ///
    /// ایمیل تکراری از unique index به `AppError::Conflict` تبدیل میشه.
    pub async fn create(&self, create_user: &CreateUser) -> Result<User> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, first_name, last_name,
                               phone_number, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&create_user.id)
        .bind(&create_user.email)
        .bind(&create_user.password_hash)
        .bind(create_user.role)
        .bind(&create_user.first_name)
        .bind(&create_user.last_name)
        .bind(&create_user.phone_number)
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await
        .map_err(|e| {
            if crate::error::is_unique_violation(&e) {
                AppError::Conflict("User with this email already exists".to_string())
            } else {
                e.into()
            }
        })?;

        self.find_by_id(create_user.id.as_str())
            .await?
            .ok_or_else(|| AppError::Internal("Failed to create user".to_string()))
    }

    /// بررسی وجود email
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(self.db.pool())
            .await?;

        Ok(count > 0)
    }

    /// بروزرسانی پروفایل (فقط فیلدهای ارسال شده)
    pub async fn update_profile(&self, id: &str, update: &UpdateProfileRequest) -> Result<Option<User>> {
        sqlx::query(
            r#"
            UPDATE users
            SET first_name   = COALESCE(?, first_name),
                last_name    = COALESCE(?, last_name),
                phone_number = COALESCE(?, phone_number),
                updated_at   = ?
            WHERE id = ?
            "#,
        )
        .bind(update.first_name.as_deref().map(str::trim))
        .bind(update.last_name.as_deref().map(str::trim))
        .bind(update.phone_number.as_deref().map(str::trim))
        .bind(Utc::now())
        .bind(id)
        .execute(self.db.pool())
        .await?;

        self.find_by_id(id).await
    }

    pub async fn set_role(&self, id: &str, role: Role) -> Result<()> {
        sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role)
            .bind(Utc::now())
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// ذخیره هش کد بازیابی و زمان انقضاش
    pub async fn set_reset_token(
        &self,
        id: &str,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE users SET reset_token_hash = ?, reset_token_expires_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(Utc::now())
        .bind(id)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// تغییر رمز و پاک کردن کد بازیابی
    ///
    /// شرط `reset_token_hash = ?` باعث میشه یه کد فقط یک بار مصرف بشه:
    /// اگه دو درخواست همزمان با یه کد بیان، دومی هیچ سطری رو تغییر نمیده.
    /// کدی که بین verify و این update منقضی شده هم رد میشه.
    pub async fn consume_reset_token(
        &self,
        id: &str,
        expected_token_hash: &str,
        new_password_hash: &str,
    ) -> Result<bool> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?,
                reset_token_hash = NULL,
                reset_token_expires_at = NULL,
                updated_at = ?
            WHERE id = ? AND reset_token_hash = ? AND reset_token_expires_at > ?
            "#,
        )
        .bind(new_password_hash)
        .bind(now)
        .bind(id)
        .bind(expected_token_hash)
        .bind(now)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// لیست صفحه‌بندی شده کاربران
    ///
    /// `sort_by` فقط از یه whitelist به اسم ستون تبدیل میشه، پس هیچوقت
    /// ورودی کاربر مستقیم وارد SQL نمیشه.
    pub async fn list_paginated(&self, pagination: &Pagination) -> Result<(Vec<User>, u64)> {
        let sort_column = match pagination.sort_by.as_deref() {
            Some("email") => "email",
            Some("firstName") => "first_name",
            Some("lastName") => "last_name",
            _ => "created_at",
        };
        let pattern = pagination.search_term().map(|s| format!("%{}%", s));

        // شمارش کل
        let mut count_query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT COUNT(*) FROM users");
        push_search(&mut count_query, pattern.as_deref());
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.db.pool())
            .await?;

        // صفحه فعلی
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_search(&mut query, pattern.as_deref());
        query
            .push(format!(" ORDER BY {} {}", sort_column, pagination.order().as_sql()))
            .push(" LIMIT ")
            .push_bind(i64::from(pagination.limit()))
            .push(" OFFSET ")
            .push_bind(i64::from(pagination.offset()));

        let users = query
            .build_query_as::<User>()
            .fetch_all(self.db.pool())
            .await?;

        Ok((users, u64::try_from(total).unwrap_or_default()))
    }
}

fn push_search(query: &mut QueryBuilder<'_, Sqlite>, pattern: Option<&str>) {
    if let Some(pattern) = pattern {
        query
            .push(" WHERE email LIKE ")
            .push_bind(pattern.to_string())
            .push(" OR first_name LIKE ")
            .push_bind(pattern.to_string())
            .push(" OR last_name LIKE ")
            .push_bind(pattern.to_string());
    }
}

#[async_trait]
impl Repository for UserRepository {
    type Entity = User;
    type Id = str;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC"
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(users)
    }

    /// حذف کاربر؛ خودروها و رزروهاش با `ON DELETE CASCADE` پاک میشن
    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(self.db.pool())
            .await?;

        Ok(count)
    }
}
