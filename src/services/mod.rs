//! # ماژول سرویس‌ها (Business Logic Layer)
//!
//! این ماژول منطق کسب‌وکار برنامه رو پیاده‌سازی میکنه.
//!
//! ## لایه‌بندی معماری
//!
//! ```text
//! ┌─────────────────┐
//! │    API Layer    │  <-- HTTP handlers (axum)
//! ├─────────────────┤
//! │  Service Layer  │  <-- Business logic (اینجا!)
//! ├─────────────────┤
//! │ Repository Layer│  <-- Data access
//! ├─────────────────┤
//! │    Database     │  <-- SQLite
//! └─────────────────┘
//! ```
//!
//! ## مفاهیم Rust:
//! - **Dependency Injection**: تزریق وابستگی‌ها
//! - **Arc<T>**: اشتراک امن بین threads
//! - **async/await**: عملیات غیرهمزمان

mod auth_service;
mod user_service;
mod vehicle_service;
mod parking_slot_service;
mod reservation_service;

pub use auth_service::*;
pub use user_service::*;
pub use vehicle_service::*;
pub use parking_slot_service::*;
pub use reservation_service::*;

use std::sync::Arc;
use crate::{
    config::Config,
    database::{
        Database, ParkingSlotRepository, ReservationRepository, UserRepository,
        VehicleRepository,
    },
    error::Result,
    models::{Id, Role},
    notifications::Notifier,
};

// =====================================
// Application State
// =====================================
/// وضعیت برنامه که بین همه handlers اشتراک‌گذاری میشه
///
/// # مفاهیم:
/// - `Arc<T>`: Reference counting برای thread-safe sharing
/// - `Clone`: کپی کردن (فقط Arc clone میشه، نه داده)
///
/// pool دیتابیس فقط یک بار در `main` (یا تست) ساخته میشه و از اینجا
/// به همه repository‌ها میرسه.
#[derive(Clone)]
pub struct AppState {
    /// دیتابیس (برای health check)
    pub db: Database,

    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub vehicle_service: Arc<VehicleService>,
    pub parking_slot_service: Arc<ParkingSlotService>,
    pub reservation_service: Arc<ReservationService>,
}

impl AppState {
    /// ساخت AppState با mailer انتخاب شده از روی تنظیمات
    ///
    /// # Errors
    /// خطا برمیگردونه اگه تنظیمات SMTP نامعتبر باشن
    pub fn new(db: Database, config: Config) -> Result<Self> {
        let notifier = Notifier::from_config(&config)?;
        Ok(Self::with_notifier(db, config, notifier))
    }

    /// ساخت AppState با notifier دلخواه (مثلا `MemoryMailer` در تست‌ها)
    ///
    /// # مفاهیم:
    /// - Factory method: ساخت object پیچیده
    /// - Dependency Injection: همه وابستگی‌ها تزریق میشن
    #[must_use]
    pub fn with_notifier(db: Database, config: Config, notifier: Notifier) -> Self {
        // ساخت repositories
        let user_repo = UserRepository::new(db.clone());
        let vehicle_repo = VehicleRepository::new(db.clone());
        let slot_repo = ParkingSlotRepository::new(db.clone());
        let reservation_repo = ReservationRepository::new(db.clone());

        let config = Arc::new(config);

        // ساخت services
        let auth_service = Arc::new(AuthService::new(
            user_repo.clone(),
            notifier.clone(),
            config,
        ));
        let user_service = Arc::new(UserService::new(user_repo));
        let vehicle_service = Arc::new(VehicleService::new(vehicle_repo.clone()));
        let parking_slot_service = Arc::new(ParkingSlotService::new(slot_repo.clone()));
        let reservation_service = Arc::new(ReservationService::new(
            db.clone(),
            reservation_repo,
            vehicle_repo,
            slot_repo,
            notifier,
        ));

        Self {
            db,
            auth_service,
            user_service,
            vehicle_service,
            parking_slot_service,
            reservation_service,
        }
    }
}

// =====================================
// Caller Identity
// =====================================
/// کاربری که درخواست رو فرستاده (از روی JWT)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Id,
    pub role: Role,
}

impl CurrentUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
