//! # ماژول توابع کمکی (Utilities)
//!
//! این ماژول توابع و ثابت‌های کمکی رو ارائه میده.
//!
//! ## مفاهیم Rust:
//! - **static**: متغیرهای با عمر 'static
//! - **once_cell**: مقداردهی اولیه تنبل
//! - **Regex**: عبارات منظم

use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use crate::error::{AppError, Result};

// =====================================
// Constants
// =====================================
/// تعداد رقم‌های کد OTP بازیابی رمز
pub const OTP_LENGTH: usize = 6;

/// پیام خطای فرمت تاریخ
pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Use YYYY-MM-DD";

// =====================================
// Lazy Statics (Regex patterns)
// =====================================
/// الگوی تاریخ `YYYY-MM-DD`
///
/// `\d` در crate regex ارقام یونیکد (مثل ۱۲۳) رو هم قبول میکنه، برای همین `[0-9]`.
pub static VALID_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid regex pattern")
});

// =====================================
// Date Parsing
// =====================================
/// parse کردن تاریخ تقویمی رزرو
///
/// هم فرمت باید دقیقا `YYYY-MM-DD` باشه و هم تاریخ واقعی باشه
/// (مثلا `2024-02-30` رد میشه).
///
/// # Errors
/// `AppError::BadRequest` برای فرمت یا تاریخ نامعتبر
///
/// # مثال
/// ```rust
/// use parking_backend::utils::parse_calendar_date;
///
/// assert!(parse_calendar_date("2024-06-01").is_ok());
/// assert!(parse_calendar_date("2024-6-1").is_err());
/// ```
pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();

    if !VALID_DATE.is_match(raw) {
        return Err(AppError::BadRequest(INVALID_DATE_MESSAGE.to_string()));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(INVALID_DATE_MESSAGE.to_string()))
}

// =====================================
// OTP Generation
// =====================================
/// تولید کد OTP شش رقمی
///
/// صفرهای اول حفظ میشن (`"004211"` یه کد معتبره).
#[must_use]
pub fn generate_otp() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{:0width$}", code, width = OTP_LENGTH)
}

/// محاسبه زمان انقضا
///
/// # Errors
/// `AppError::Config` اگه نتیجه از بازه `DateTime` بیرون بزنه
pub fn expires_at_from_minutes(minutes: u64) -> Result<DateTime<Utc>> {
    i64::try_from(minutes)
        .ok()
        .and_then(Duration::try_minutes)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .ok_or_else(|| AppError::Config("Expiration is out of range".to_string()))
}

// =====================================
// Security Utilities
// =====================================
/// Mask کردن بخشی از متن (برای لاگ‌ها)
///
/// # مثال
/// ```rust
/// use parking_backend::utils::mask_string;
///
/// assert_eq!(mask_string("secret123", 3), "sec***");
/// ```
#[must_use]
pub fn mask_string(text: &str, visible_chars: usize) -> String {
    if text.chars().count() <= visible_chars {
        return "*".repeat(text.chars().count());
    }

    let visible: String = text.chars().take(visible_chars).collect();
    format!("{}***", visible)
}

/// Mask کردن ایمیل برای لاگ: فقط دو حرف اول قسمت local دیده میشه
#[must_use]
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => format!("{}@{}", mask_string(local, 2), domain),
        None => mask_string(email, 2),
    }
}
