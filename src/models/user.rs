//! # مدل کاربر (User Model)
//!
//! Entity، DTO‌ها و JWT claims مربوط به کاربر

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::error::{AppError, Result, ResultExt};

// =====================================
// Role
// =====================================
/// نقش کاربر
///
/// در دیتابیس و JSON به صورت `USER` / `ADMIN` ذخیره میشه.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

// =====================================
// User Entity
// =====================================
/// Entity کاربر
///
/// این struct عمدا `Serialize` نداره؛ فقط از طریق `UserResponse` به کلاینت میره
/// تا هش رمز و کد بازیابی هیچوقت leak نشن.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// بررسی رمز عبور
    ///
    /// # Errors
    /// خطا برمیگردونه اگه هش ذخیره شده قابل parse نباشه
    pub fn verify_password(&self, password: &str) -> Result<bool> {
        verify_secret(password, &self.password_hash)
    }

    /// بررسی کد OTP بازیابی رمز
    ///
    /// کد منقضی یا بدون هش همیشه نامعتبره.
    pub fn verify_reset_token(&self, otp: &str, now: DateTime<Utc>) -> Result<bool> {
        match (&self.reset_token_hash, self.reset_token_expires_at) {
            (Some(hash), Some(expires_at)) if expires_at > now => verify_secret(otp, hash),
            _ => Ok(false),
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            phone_number: user.phone_number,
            created_at: user.created_at,
        }
    }
}

// =====================================
// Password Hashing
// =====================================
/// هش کردن رمز عبور یا کد OTP با Argon2
///
/// Salt برای هر هش جدید تصادفی تولید میشه.
pub fn hash_secret(secret: &str) -> Result<String> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_internal()
}

/// مقایسه یک مقدار با هش Argon2 ذخیره شده
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool> {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = PasswordHash::new(hash).map_internal()?;

    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok())
}

// =====================================
// Create User (داخلی)
// =====================================
/// داده برای ساخت کاربر
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
}

impl CreateUser {
    /// ساخت کاربر جدید با هش کردن رمز عبور
    ///
    /// ایمیل lowercase ذخیره میشه تا یکتا بودنش به حروف بزرگ و کوچک حساس نباشه.
    pub fn new(request: RegisterRequest, role: Role) -> Result<Self> {
        Ok(Self {
            id: super::Id::new().into_string(),
            email: normalize_email(&request.email),
            password_hash: hash_secret(&request.password)?,
            role,
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            phone_number: request.phone_number,
        })
    }
}

/// نرمال کردن ایمیل برای ذخیره و جستجو
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// =====================================
// API Request DTOs
// =====================================
/// درخواست ثبت‌نام
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    #[validate(length(min = 5, max = 20, message = "Phone number must be 5-20 characters"))]
    pub phone_number: Option<String>,
}

/// درخواست ورود
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// درخواست ارسال کد بازیابی رمز
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// درخواست تغییر رمز با کد OTP
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(equal = 6, message = "OTP must be 6 digits"))]
    pub otp: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub new_password: String,
}

/// درخواست بروزرسانی پروفایل خود کاربر
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: Option<String>,

    #[validate(length(min = 5, max = 20, message = "Phone number must be 5-20 characters"))]
    pub phone_number: Option<String>,
}

impl UpdateProfileRequest {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone_number.is_none()
    }
}

// =====================================
// API Response DTOs
// =====================================
/// پاسخ اطلاعات کاربر
///
/// توجه: password_hash و reset token اینجا نیستن!
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// پاسخ ورود موفق
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

// =====================================
// JWT Claims
// =====================================
/// محتویات توکن JWT
///
/// - `sub`: شناسه کاربر
/// - `role`: نقش کاربر برای route‌های ادمین
/// - `exp` / `iat`: Unix timestamp انقضا و صدور
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    ///
    /// # Errors
    /// `AppError::Config` اگه زمان انقضا از بازه `DateTime` بیرون بزنه
    pub fn new(user_id: &str, role: Role, expiration_hours: u64) -> Result<Self> {
        let now = Utc::now();
        let exp = i64::try_from(expiration_hours)
            .ok()
            .and_then(chrono::Duration::try_hours)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::Config("JWT expiration is out of range".to_string()))?;

        Ok(Self {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }

    /// آیا توکن منقضی شده؟
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_reset(hash: Option<String>, expires_at: Option<DateTime<Utc>>) -> User {
        let now = Utc::now();
        User {
            id: "u1".to_string(),
            email: "a@b.com".to_string(),
            password_hash: hash_secret("secret1").unwrap(),
            role: Role::User,
            first_name: "Ali".to_string(),
            last_name: "Rezaei".to_string(),
            phone_number: None,
            reset_token_hash: hash,
            reset_token_expires_at: expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let user = user_with_reset(None, None);
        assert!(user.verify_password("secret1").unwrap());
        assert!(!user.verify_password("wrong").unwrap());
    }

    #[test]
    fn test_reset_token_expiry() {
        let now = Utc::now();
        let hash = Some(hash_secret("123456").unwrap());

        let valid = user_with_reset(hash.clone(), Some(now + chrono::Duration::minutes(5)));
        assert!(valid.verify_reset_token("123456", now).unwrap());
        assert!(!valid.verify_reset_token("654321", now).unwrap());

        let expired = user_with_reset(hash, Some(now - chrono::Duration::minutes(1)));
        assert!(!expired.verify_reset_token("123456", now).unwrap());

        let none = user_with_reset(None, None);
        assert!(!none.verify_reset_token("123456", now).unwrap());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_claims_expiration() {
        let claims = Claims::new("user1", Role::User, 1).unwrap();
        assert!(!claims.is_expired());

        let expired = Claims {
            sub: "user1".to_string(),
            role: Role::User,
            exp: Utc::now().timestamp() - 3600,
            iat: Utc::now().timestamp() - 7200,
        };
        assert!(expired.is_expired());
    }

    #[test]
    fn test_claims_out_of_range_expiration_is_an_error() {
        let result = Claims::new("user1", Role::User, 10_000_000_000);
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
