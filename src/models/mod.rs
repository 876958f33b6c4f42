//! # ماژول مدل‌ها (Domain Models)
//!
//! این ماژول مدل‌های داده برنامه رو تعریف میکنه.
//!
//! ## تفاوت انواع مدل:
//! - **Entity**: داده‌ای که در دیتابیس ذخیره میشه (`FromRow`)
//! - **DTO (Data Transfer Object)**: برای ارسال/دریافت از API
//!
//! تمام DTO‌های API با کلیدهای camelCase سریالایز میشن (`vehicleId`, `slotCode`, ...).

mod user;
mod vehicle;
mod parking_slot;
mod reservation;
mod dto;

// Re-export همه مدل‌ها
pub use user::*;
pub use vehicle::*;
pub use parking_slot::*;
pub use reservation::*;
pub use dto::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};

// =====================================
// Common Types (Newtype Pattern)
// =====================================
/// شناسه یکتای entity‌ها (UUID v4 به صورت متن)
///
/// # مثال
/// ```rust
/// use parking_backend::models::Id;
///
/// let id = Id::new();
/// assert_eq!(id.as_str().len(), 36);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    /// ساخت ID جدید
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// parse کردن ID دریافتی از مسیر یا بدنه درخواست
    ///
    /// `entity` فقط برای پیام خطا استفاده میشه، مثلا
    /// `"Invalid reservation ID format"`.
    ///
    /// # Errors
    /// `AppError::BadRequest` اگه رشته UUID معتبر نباشه
    pub fn parse(raw: &str, entity: &str) -> Result<Self> {
        Uuid::parse_str(raw.trim())
            .map(|uuid| Self(uuid.hyphenated().to_string()))
            .map_err(|_| AppError::BadRequest(format!("Invalid {} ID format", entity)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// =====================================
// Pagination
// =====================================
/// پارامترهای صفحه‌بندی و جستجو (query string)
///
/// مقادیر نامعتبر خطا نمیدن، بلکه به بازه مجاز محدود میشن:
/// `page >= 1` و `1 <= limit <= 100`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// شماره صفحه (از 1 شروع میشه)
    pub page: Option<u32>,

    /// تعداد آیتم در صفحه
    pub limit: Option<u32>,

    /// عبارت جستجو
    pub search: Option<String>,

    /// مرتب‌سازی بر اساس
    pub sort_by: Option<String>,

    /// ترتیب مرتب‌سازی
    pub order: Option<SortOrder>,
}

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

impl Pagination {
    /// شماره صفحه نرمال شده
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// تعداد آیتم نرمال شده
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    /// محاسبه offset برای SQL
    #[must_use]
    pub fn offset(&self) -> u32 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    /// عبارت جستجوی غیرخالی
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    #[must_use]
    pub fn order(&self) -> SortOrder {
        self.order.unwrap_or_default()
    }
}

/// نتیجه صفحه‌بندی شده
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    pub data: Vec<T>,
    pub pagination: PaginationInfo,
}

/// اطلاعات صفحه‌بندی
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl PaginationInfo {
    #[must_use]
    pub fn new(pagination: &Pagination, total: u64) -> Self {
        let limit = pagination.limit();
        let total_pages = total.div_ceil(u64::from(limit));

        Self {
            total,
            page: pagination.page(),
            limit,
            total_pages: u32::try_from(total_pages).unwrap_or(u32::MAX),
        }
    }
}

impl<T> PaginatedResult<T> {
    pub fn new(data: Vec<T>, pagination: &Pagination, total: u64) -> Self {
        Self {
            data,
            pagination: PaginationInfo::new(pagination, total),
        }
    }
}

// =====================================
// Sort Order
// =====================================
/// ترتیب مرتب‌سازی
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// تبدیل به SQL
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}
