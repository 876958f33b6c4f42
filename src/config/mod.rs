//! # ماژول تنظیمات (Configuration)
//!
//! این ماژول مسئول خوندن و مدیریت تنظیمات برنامه هست.
//! همه تنظیمات از متغیرهای محیطی خونده میشن (بعد از لود فایل `.env`).
//!
//! ## مفاهیم Rust:
//! - **Structs**: ساختار داده‌ای برای نگهداری تنظیمات
//! - **Default Trait**: مقادیر پیش‌فرض
//! - **Option<T>**: تنظیمات اختیاری مثل SMTP
//! - **Builder Pattern**: ساخت تدریجی آبجکت (برای تست‌ها)

use std::env;
use serde::{Deserialize, Serialize};
use crate::error::{AppError, Result};

/// secret پیش‌فرض که در production نباید استفاده بشه
pub const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

/// سقف `JWT_EXPIRATION_HOURS` (یک سال)
pub const MAX_JWT_EXPIRATION_HOURS: u64 = 8760;

/// سقف `PASSWORD_RESET_TTL_MINUTES` (یک روز)
pub const MAX_PASSWORD_RESET_TTL_MINUTES: u64 = 1440;

/// تنظیمات اصلی برنامه
///
/// # مثال
/// ```rust
/// use parking_backend::config::Config;
///
/// let config = Config::default();
/// println!("Port: {}", config.port);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// آدرس هاست سرور
    pub host: String,

    /// پورت سرور
    pub port: u16,

    /// آدرس اتصال به دیتابیس
    pub database_url: String,

    /// کلید مخفی JWT
    pub jwt_secret: String,

    /// مدت اعتبار توکن JWT (ساعت)
    pub jwt_expiration_hours: u64,

    /// مدت اعتبار کد OTP بازیابی رمز (دقیقه)
    pub password_reset_ttl_minutes: u64,

    /// آدرس فرستنده ایمیل‌ها
    pub email_from: String,

    /// تنظیمات SMTP - اگه None باشه ایمیل‌ها فقط لاگ میشن
    pub smtp: Option<SmtpSettings>,

    /// حساب ادمین اولیه که موقع استارت ساخته میشه
    pub admin: Option<AdminSeed>,

    /// محیط اجرا (development, production)
    pub environment: Environment,
}

/// تنظیمات سرور SMTP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,

    #[serde(skip_serializing)]
    pub password: Option<String>,
}

/// اطلاعات حساب ادمین اولیه
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSeed {
    pub email: String,

    #[serde(skip_serializing)]
    pub password: String,
}

/// محیط اجرای برنامه
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// محیط توسعه - با قابلیت‌های دیباگ
    #[default]
    Development,

    /// محیط تست
    Testing,

    /// محیط تولید
    Production,
}

impl Environment {
    /// آیا در محیط توسعه هستیم؟
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// آیا در محیط تولید هستیم؟
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// تبدیل String به Environment
impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_url: "sqlite://data/parking.db?mode=rwc".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiration_hours: 6,
            password_reset_ttl_minutes: 60,
            email_from: "parking@example.com".to_string(),
            smtp: None,
            admin: None,
            environment: Environment::Development,
        }
    }
}

impl Config {
    /// ساخت تنظیمات از متغیرهای محیطی
    ///
    /// متغیرهای اختیاری که ست نشدن مقدار پیش‌فرض میگیرن.
    /// SMTP فقط وقتی فعال میشه که `SMTP_HOST` ست شده باشه،
    /// و ادمین اولیه فقط وقتی که هم `ADMIN_EMAIL` و هم `ADMIN_PASSWORD` باشن.
    ///
    /// # Errors
    /// خطا برمیگردونه اگه یه عدد قابل parse نباشه
    ///
    /// # مثال
    /// ```rust,no_run
    /// use parking_backend::config::Config;
    ///
    /// let config = Config::from_env().expect("Failed to load config");
    /// ```
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let get_env = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let optional_env = |key: &str| -> Option<String> {
            env::var(key).ok().filter(|v| !v.trim().is_empty())
        };

        let smtp = match optional_env("SMTP_HOST") {
            Some(host) => Some(SmtpSettings {
                host,
                port: parse_env("SMTP_PORT", 587)?,
                username: optional_env("SMTP_USER"),
                password: optional_env("SMTP_PASSWORD"),
            }),
            None => None,
        };

        let admin = match (optional_env("ADMIN_EMAIL"), optional_env("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed { email, password }),
            _ => None,
        };

        Ok(Self {
            host: get_env("HOST", &defaults.host),
            port: parse_env("PORT", defaults.port)?,
            database_url: get_env("DATABASE_URL", &defaults.database_url),
            jwt_secret: get_env("JWT_SECRET", DEFAULT_JWT_SECRET),
            jwt_expiration_hours: parse_env("JWT_EXPIRATION_HOURS", defaults.jwt_expiration_hours)?,
            password_reset_ttl_minutes: parse_env(
                "PASSWORD_RESET_TTL_MINUTES",
                defaults.password_reset_ttl_minutes,
            )?,
            email_from: get_env("EMAIL_FROM", &defaults.email_from),
            smtp,
            admin,
            environment: get_env("ENVIRONMENT", "development").into(),
        })
    }

    /// اعتبارسنجی تنظیمات
    ///
    /// # Errors
    /// `AppError::Config` اگه تنظیمات با هم سازگار نباشن
    pub fn validate(&self) -> Result<()> {
        // چک کردن که jwt_secret در production تغییر کرده باشه
        if self.environment.is_production() && self.jwt_secret == DEFAULT_JWT_SECRET {
            return Err(AppError::Config(
                "JWT_SECRET must be changed in production".to_string()
            ));
        }

        if self.port == 0 {
            return Err(AppError::Config("PORT cannot be 0".to_string()));
        }

        if !(1..=MAX_JWT_EXPIRATION_HOURS).contains(&self.jwt_expiration_hours) {
            return Err(AppError::Config(format!(
                "JWT_EXPIRATION_HOURS must be between 1 and {MAX_JWT_EXPIRATION_HOURS}"
            )));
        }

        if !(1..=MAX_PASSWORD_RESET_TTL_MINUTES).contains(&self.password_reset_ttl_minutes) {
            return Err(AppError::Config(format!(
                "PASSWORD_RESET_TTL_MINUTES must be between 1 and {MAX_PASSWORD_RESET_TTL_MINUTES}"
            )));
        }

        if let Some(smtp) = &self.smtp {
            if smtp.port == 0 {
                return Err(AppError::Config("SMTP_PORT cannot be 0".to_string()));
            }
        }

        Ok(())
    }

    /// آدرس کامل سرور
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// خوندن و parse کردن یه متغیر محیطی عددی
///
/// اگه متغیر نباشه مقدار پیش‌فرض برمیگرده، ولی اگه باشه و عدد نباشه خطا میده
/// (برخلاف نادیده گرفتن بی‌صدا).
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| {
            AppError::Config(format!("{} must be a number, got '{}'", key, raw))
        }),
        Err(_) => Ok(default),
    }
}

// =====================================
// Builder Pattern
// =====================================
/// ساخت Config با Builder Pattern
///
/// # مثال
/// ```rust
/// use parking_backend::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .port(8080)
///     .host("0.0.0.0")
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// ساخت builder جدید
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    #[must_use]
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.config.database_url = url.into();
        self
    }

    #[must_use]
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = secret.into();
        self
    }

    #[must_use]
    pub fn jwt_expiration_hours(mut self, hours: u64) -> Self {
        self.config.jwt_expiration_hours = hours;
        self
    }

    #[must_use]
    pub fn password_reset_ttl_minutes(mut self, minutes: u64) -> Self {
        self.config.password_reset_ttl_minutes = minutes;
        self
    }

    #[must_use]
    pub fn smtp(mut self, smtp: SmtpSettings) -> Self {
        self.config.smtp = Some(smtp);
        self
    }

    /// تنظیم ادمین اولیه
    #[must_use]
    pub fn admin(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.admin = Some(AdminSeed {
            email: email.into(),
            password: password.into(),
        });
        self
    }

    #[must_use]
    pub fn environment(mut self, env: Environment) -> Self {
        self.config.environment = env;
        self
    }

    /// ساخت Config نهایی
    #[must_use]
    pub fn build(self) -> Config {
        self.config
    }

    /// ساخت Config با اعتبارسنجی
    ///
    /// # Errors
    /// خطا برمیگردونه اگه اعتبارسنجی fail بشه
    pub fn build_validated(self) -> Result<Config> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

// =====================================
// Tests
// =====================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.jwt_expiration_hours, 6);
        assert_eq!(config.password_reset_ttl_minutes, 60);
        assert!(config.smtp.is_none());
        assert!(config.admin.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .port(8080)
            .host("0.0.0.0")
            .admin("admin@parking.com", "admin123")
            .build();

        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.admin.map(|a| a.email).as_deref(), Some("admin@parking.com"));
    }

    #[test]
    fn test_environment_from_string() {
        assert_eq!(Environment::from("production".to_string()), Environment::Production);
        assert_eq!(Environment::from("PROD".to_string()), Environment::Production);
        assert_eq!(Environment::from("test".to_string()), Environment::Testing);
        assert_eq!(Environment::from("unknown".to_string()), Environment::Development);
    }

    #[test]
    fn test_validation_fails_in_production_with_default_secret() {
        let config = ConfigBuilder::new()
            .environment(Environment::Production)
            .build();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_zero_smtp_port() {
        let result = ConfigBuilder::new()
            .smtp(SmtpSettings {
                host: "smtp.example.com".to_string(),
                port: 0,
                username: None,
                password: None,
            })
            .build_validated();

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_validation_bounds_token_lifetimes() {
        let too_long = ConfigBuilder::new()
            .jwt_expiration_hours(10_000_000_000)
            .build_validated();
        assert!(matches!(too_long, Err(AppError::Config(_))));

        let zero_ttl = ConfigBuilder::new()
            .password_reset_ttl_minutes(0)
            .build_validated();
        assert!(matches!(zero_ttl, Err(AppError::Config(_))));

        let huge_ttl = ConfigBuilder::new()
            .password_reset_ttl_minutes(MAX_PASSWORD_RESET_TTL_MINUTES + 1)
            .build_validated();
        assert!(matches!(huge_ttl, Err(AppError::Config(_))));

        let edge = ConfigBuilder::new()
            .jwt_expiration_hours(MAX_JWT_EXPIRATION_HOURS)
            .password_reset_ttl_minutes(MAX_PASSWORD_RESET_TTL_MINUTES)
            .build_validated();
        assert!(edge.is_ok());
    }
}
