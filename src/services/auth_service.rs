//! # سرویس احراز هویت (Authentication Service)
//!
//! ثبت‌نام، ورود، JWT و بازیابی رمز با کد OTP
//!
//! ## مفاهیم Rust:
//! - Password Hashing: هش کردن امن رمز عبور (Argon2)
//! - JWT: توکن‌های احراز هویت
//! - کد OTP هم مثل رمز هش میشه و فقط یک بار مصرف میشه

use std::sync::Arc;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::{
    config::{AdminSeed, Config},
    database::{Repository, UserRepository},
    error::{AppError, Result},
    models::{
        hash_secret, normalize_email, Claims, CreateUser, ForgotPasswordRequest, Id,
        LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest, Role, User,
        UserResponse,
    },
    notifications::Notifier,
    services::CurrentUser,
    utils::{expires_at_from_minutes, generate_otp, mask_email},
};

/// پاسخ عمومی forgot-password (چه کاربر وجود داشته باشه چه نه)
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with that email exists, a password reset code has been sent";

pub const INVALID_RESET_TOKEN_MESSAGE: &str = "Invalid or expired reset token";

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials";

const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

// =====================================
// Auth Service
// =====================================
/// سرویس احراز هویت
///
/// # مسئولیت‌ها:
/// - ثبت‌نام کاربر
/// - ورود و صدور توکن
/// - اعتبارسنجی توکن
/// - بازیابی رمز عبور
/// - ساخت حساب ادمین اولیه
#[derive(Debug, Clone)]
pub struct AuthService {
    repo: UserRepository,
    notifier: Notifier,
    config: Arc<Config>,
}

impl AuthService {
    /// ساخت سرویس جدید
    #[must_use]
    pub fn new(repo: UserRepository, notifier: Notifier, config: Arc<Config>) -> Self {
        Self { repo, notifier, config }
    }

    /// ثبت‌نام کاربر جدید
    ///
    /// نقش همیشه `USER` هست؛ ادمین فقط از طریق `ensure_admin` ساخته میشه.
    #[instrument(skip(self, request), fields(email = %mask_email(&request.email)))]
    pub async fn register(&self, request: RegisterRequest) -> Result<UserResponse> {
        request.validate()?;

        if self.repo.email_exists(&normalize_email(&request.email)).await? {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let create_user = CreateUser::new(request, Role::User)?;
        let user = self.repo.create(&create_user).await?;

        info!(user_id = %user.id, "New user registered");

        Ok(user.into())
    }

    /// ورود کاربر
    ///
    /// برای ایمیل ناشناخته و رمز اشتباه پیام یکسان برمیگرده.
    #[instrument(skip(self, request), fields(email = %mask_email(&request.email)))]
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        request.validate()?;

        let user = self
            .repo
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string()))?;

        if !user.verify_password(&request.password)? {
            warn!("Failed login attempt");
            return Err(AppError::Unauthorized(
                INVALID_CREDENTIALS_MESSAGE.to_string(),
            ));
        }

        let (token, claims) = self.generate_token(&user)?;
        let expires_at = chrono::DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::Internal("Invalid token expiration".to_string()))?;

        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            user: user.into(),
            token,
            expires_at,
        })
    }

    /// اعتبارسنجی توکن JWT
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            warn!(error = %e, "Token verification failed");
            AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
        })?;

        if token_data.claims.is_expired() {
            return Err(AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()));
        }

        Ok(token_data.claims)
    }

    /// توکن رو verify میکنه و کاربرش رو از دیتابیس میخونه
    ///
    /// توکن کاربر حذف شده 401 میگیره و نقش همیشه از دیتابیس خونده میشه.
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser> {
        let claims = self.verify_token(token)?;
        let id = Id::parse(&claims.sub, "user")
            .map_err(|_| AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string()))?;

        let user = self.repo.find_by_id(id.as_str()).await?.ok_or_else(|| {
            warn!(user_id = %id, "Token belongs to a deleted user");
            AppError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
        })?;

        Ok(CurrentUser { id, role: user.role })
    }

    /// درخواست کد بازیابی رمز
    ///
    /// همیشه موفق هست تا نشه وجود یه ایمیل رو از روی پاسخ فهمید.
    #[instrument(skip(self, request), fields(email = %mask_email(&request.email)))]
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<()> {
        request.validate()?;

        let Some(user) = self
            .repo
            .find_by_email(&normalize_email(&request.email))
            .await?
        else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };

        let otp = generate_otp();
        let ttl = self.config.password_reset_ttl_minutes;

        self.repo
            .set_reset_token(&user.id, &hash_secret(&otp)?, expires_at_from_minutes(ttl)?)
            .await?;

        self.notifier.password_reset_otp(&user.email, &otp, ttl).await;

        info!(user_id = %user.id, "Password reset code issued");
        Ok(())
    }

    /// تغییر رمز با کد OTP
    #[instrument(skip(self, request), fields(email = %mask_email(&request.email)))]
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<()> {
        request.validate()?;

        let invalid = || AppError::BadRequest(INVALID_RESET_TOKEN_MESSAGE.to_string());

        let user = self
            .repo
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(invalid)?;

        if !user.verify_reset_token(&request.otp, Utc::now())? {
            warn!(user_id = %user.id, "Invalid password reset attempt");
            return Err(invalid());
        }

        // verify_reset_token فقط وقتی true میده که هش وجود داشته باشه
        let token_hash = user.reset_token_hash.as_deref().ok_or_else(invalid)?;

        let consumed = self
            .repo
            .consume_reset_token(&user.id, token_hash, &hash_secret(&request.new_password)?)
            .await?;

        if !consumed {
            return Err(invalid());
        }

        info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }

    /// اطمینان از وجود حساب ادمین اولیه
    ///
    /// idempotent: اگه کاربر با این ایمیل وجود داشته باشه فقط نقشش ADMIN میشه.
    #[instrument(skip(self, seed), fields(email = %mask_email(&seed.email)))]
    pub async fn ensure_admin(&self, seed: &AdminSeed) -> Result<UserResponse> {
        let email = normalize_email(&seed.email);

        if let Some(user) = self.repo.find_by_email(&email).await? {
            if user.role != Role::Admin {
                self.repo.set_role(&user.id, Role::Admin).await?;
                info!(user_id = %user.id, "Existing user promoted to admin");
            }
            let user = self
                .repo
                .find_by_id(user.id.as_str())
                .await?
                .ok_or_else(|| AppError::user_not_found(&user.id))?;
            return Ok(user.into());
        }

        let request = RegisterRequest {
            email,
            password: seed.password.clone(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            phone_number: None,
        };
        request.validate()?;

        let user = self.repo.create(&CreateUser::new(request, Role::Admin)?).await?;
        info!(user_id = %user.id, "Admin account created");

        Ok(user.into())
    }

    /// تولید توکن JWT
    fn generate_token(&self, user: &User) -> Result<(String, Claims)> {
        let claims = Claims::new(&user.id, user.role, self.config.jwt_expiration_hours)?;
        let encoding_key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());

        let token = encode(&Header::new(Algorithm::HS256), &claims, &encoding_key)?;

        Ok((token, claims))
    }
}

// =====================================
// Token Utilities
// =====================================
/// استخراج توکن از header Authorization
///
/// # Format
/// `Authorization: Bearer <token>`
#[must_use]
pub fn extract_token_from_header(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
