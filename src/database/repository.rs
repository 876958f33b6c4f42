//! # Repository Pattern
//!
//! این فایل trait پایه همه repository‌ها رو تعریف میکنه.
//!
//! ## Repository Pattern چیه؟
//! یه لایه انتزاعی بین منطق برنامه و دیتابیس.
//! - منطق برنامه نمیدونه داده کجا ذخیره میشه
//! - تست کردن راحت‌تر میشه
//!
//! ## دو نوع متد
//! - متدهایی که با `&self` کار میکنن از pool اتصال میگیرن.
//! - متدهایی با پسوند `_in` یه `&mut SqliteConnection` میگیرن تا داخل
//!   یه تراکنش (`&mut *tx`) اجرا بشن. سرویس رزرو همه check‌ها و تغییرات
//!   یه عملیات رو با همین متدها روی یک تراکنش انجام میده.
//!
//! ## مفاهیم Rust:
//! - **Traits**: تعریف interface
//! - **async_trait**: امکان async در traits
//! - **Associated Types**: نوع‌های مرتبط با trait

use async_trait::async_trait;
use crate::error::Result;

// =====================================
// Base Repository Trait
// =====================================
/// Trait پایه برای همه Repository‌ها
///
/// # مفاهیم:
/// - `#[async_trait]`: macro برای async در traits
/// - `Send + Sync`: امکان ارسال بین threads
/// - Associated Types: `type Entity` و `type Id`
#[async_trait]
pub trait Repository: Send + Sync {
    /// نوع Entity که این repository باهاش کار میکنه
    type Entity: Send + Sync;

    /// نوع شناسه (ID)
    type Id: Send + Sync + ?Sized;

    /// پیدا کردن با ID
    async fn find_by_id(&self, id: &Self::Id) -> Result<Option<Self::Entity>>;

    /// پیدا کردن همه
    async fn find_all(&self) -> Result<Vec<Self::Entity>>;

    /// حذف با ID
    ///
    /// `false` یعنی سطری با این ID وجود نداشت.
    async fn delete(&self, id: &Self::Id) -> Result<bool>;

    /// شمارش کل
    async fn count(&self) -> Result<i64>;
}
