//! # Parking Backend Library
//!
//! بک‌اند REST برای مدیریت پارکینگ: کاربران، خودروها، جاهای پارک و
//! workflow تایید رزرو توسط ادمین.
//!
//! ## ساختار پروژه
//!
//! ```text
//! src/
//! ├── lib.rs            # نقطه ورود کتابخانه
//! ├── main.rs           # نقطه ورود باینری
//! ├── config/           # مدیریت تنظیمات
//! ├── error/            # تعریف خطاها
//! ├── database/         # لایه دیتابیس و repository‌ها
//! ├── models/           # مدل‌های داده و DTO‌ها
//! ├── notifications/    # ارسال ایمیل (SMTP / log / memory)
//! ├── services/         # منطق کسب‌وکار
//! ├── api/              # لایه HTTP
//! └── utils/            # توابع کمکی
//! ```
//!
//! ## مثال استفاده
//!
//! ```rust,no_run
//! use parking_backend::{config::Config, database::Database, services::AppState};
//!
//! #[tokio::main]
//! async fn main() -> parking_backend::Result<()> {
//!     let config = Config::from_env()?;
//!     let db = Database::connect(&config.database_url).await?;
//!     db.migrate().await?;
//!     let app = parking_backend::api::create_router(AppState::new(db, config)?);
//!     # let _ = app;
//!     Ok(())
//! }
//! ```

/// ماژول مدیریت تنظیمات برنامه
pub mod config;

/// ماژول تعریف و مدیریت خطاها
pub mod error;

/// ماژول ارتباط با دیتابیس
pub mod database;

/// ماژول مدل‌های داده (Domain Models)
pub mod models;

/// ماژول ارسال اعلان‌ها (ایمیل)
pub mod notifications;

/// ماژول سرویس‌ها (Business Logic)
pub mod services;

/// ماژول API و HTTP Handlers
pub mod api;

/// ماژول توابع کمکی
pub mod utils;

// =====================================
// Re-exports
// =====================================

/// نتیجه عملیات با خطای سفارشی ما
pub use error::Result;

/// خطای اصلی برنامه
pub use error::AppError;

// =====================================
// Prelude Module
// =====================================
/// ماژول prelude برای import راحت‌تر آیتم‌های پرکاربرد
///
/// ```rust
/// use parking_backend::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::database::Database;
    pub use crate::error::{AppError, Result};
    pub use crate::models::*;
    pub use crate::notifications::{Mailer, Notifier};
    pub use crate::services::*;
}
