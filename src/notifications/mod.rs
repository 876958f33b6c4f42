//! # ماژول اطلاع‌رسانی (Notifications)
//!
//! ارسال ایمیل تایید/رد رزرو و کد بازیابی رمز.
//!
//! ## Backend‌ها
//! - `SmtpMailer`: ارسال واقعی با lettre (STARTTLS)
//! - `LogMailer`: فقط لاگ میکنه؛ پیش‌فرض وقتی `SMTP_HOST` ست نشده
//! - `MemoryMailer`: ایمیل‌ها رو نگه میداره؛ برای تست‌ها
//!
//! همه متدهای `Notifier` best-effort هستن: خطای ارسال فقط با سطح `warn`
//! لاگ میشه و هیچوقت به caller برنمیگرده. هر ارسال حداکثر `SEND_TIMEOUT`
//! طول میکشه که از `REQUEST_TIMEOUT` روتر کمتره.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info, warn};

use crate::{
    config::{Config, SmtpSettings},
    error::{AppError, Result},
    utils::mask_email,
};

/// حداکثر زمان یک ارسال؛ باید از `api::REQUEST_TIMEOUT` کمتر باشه
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

// =====================================
// Email
// =====================================
/// یک ایمیل متنی ساده
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

// =====================================
// Mailer Trait
// =====================================
/// Backend ارسال ایمیل
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<()>;
}

// =====================================
// SMTP Backend
// =====================================
/// ارسال از طریق سرور SMTP
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// ساخت mailer از تنظیمات
    ///
    /// # Errors
    /// `AppError::Mail` اگه host یا آدرس فرستنده نامعتبر باشه
    pub fn new(settings: &SmtpSettings, from: &str) -> Result<Self> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .timeout(Some(SEND_TIMEOUT));

        if let (Some(username), Some(password)) = (&settings.username, &settings.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: from.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: Email) -> Result<()> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body)?;

        self.transport.send(message).await?;
        Ok(())
    }
}

// =====================================
// Log Backend
// =====================================
/// فقط لاگ میکنه (development)
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<()> {
        // body ممکنه کد OTP داشته باشه، پس فقط در سطح debug
        info!(
            to = %mask_email(&email.to),
            subject = %email.subject,
            "Email (not sent, SMTP disabled)"
        );
        debug!(to = %mask_email(&email.to), body = %email.body, "Email body");
        Ok(())
    }
}

// =====================================
// Memory Backend
// =====================================
/// ایمیل‌ها رو در حافظه نگه میداره
#[derive(Debug, Clone, Default)]
pub struct MemoryMailer {
    sent: Arc<Mutex<Vec<Email>>>,
}

impl MemoryMailer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// کپی ایمیل‌های ارسال شده
    #[must_use]
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// آخرین ایمیل ارسال شده به این آدرس
    #[must_use]
    pub fn last_to(&self, to: &str) -> Option<Email> {
        self.sent().into_iter().rev().find(|email| email.to == to)
    }
}

#[async_trait]
impl Mailer for MemoryMailer {
    async fn send(&self, email: Email) -> Result<()> {
        self.sent
            .lock()
            .map_err(|_| AppError::Mail("mailbox lock poisoned".to_string()))?
            .push(email);
        Ok(())
    }
}

// =====================================
// Notifier
// =====================================
/// ساخت و ارسال پیام‌های سیستم
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    send_timeout: Duration,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").finish_non_exhaustive()
    }
}

impl Notifier {
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer,
            send_timeout: SEND_TIMEOUT,
        }
    }

    /// تغییر سقف زمان ارسال
    #[must_use]
    pub fn with_send_timeout(mut self, send_timeout: Duration) -> Self {
        self.send_timeout = send_timeout;
        self
    }

    /// انتخاب backend بر اساس تنظیمات
    pub fn from_config(config: &Config) -> Result<Self> {
        let mailer: Arc<dyn Mailer> = match &config.smtp {
            Some(settings) => {
                info!(host = %settings.host, port = settings.port, "SMTP mailer enabled");
                Arc::new(SmtpMailer::new(settings, &config.email_from)?)
            }
            None => {
                info!("SMTP_HOST not set, emails will only be logged");
                Arc::new(LogMailer)
            }
        };

        Ok(Self::new(mailer))
    }

    pub async fn reservation_approved(&self, to: &str, date: NaiveDate, slot_code: &str) {
        self.deliver(Email {
            to: to.to_string(),
            subject: "Parking Reservation Approved".to_string(),
            body: format!(
                "Your parking reservation for {} has been approved. Your assigned parking slot is {}.",
                date.format("%Y-%m-%d"),
                slot_code
            ),
        })
        .await;
    }

    pub async fn reservation_rejected(&self, to: &str, date: NaiveDate) {
        self.deliver(Email {
            to: to.to_string(),
            subject: "Parking Reservation Rejected".to_string(),
            body: format!(
                "Your parking reservation for {} has been rejected.",
                date.format("%Y-%m-%d")
            ),
        })
        .await;
    }

    pub async fn password_reset_otp(&self, to: &str, otp: &str, ttl_minutes: u64) {
        self.deliver(Email {
            to: to.to_string(),
            subject: "Password Reset Code".to_string(),
            body: format!(
                "Your password reset code is {}. It expires in {} minutes. \
                 If you did not request a password reset, you can ignore this email.",
                otp, ttl_minutes
            ),
        })
        .await;
    }

    async fn deliver(&self, email: Email) {
        let to = mask_email(&email.to);
        let subject = email.subject.clone();

        match tokio::time::timeout(self.send_timeout, self.mailer.send(email)).await {
            Ok(Ok(())) => info!(to = %to, subject = %subject, "Notification sent"),
            Ok(Err(e)) => warn!(to = %to, subject = %subject, error = %e, "Failed to send notification"),
            Err(_) => warn!(
                to = %to,
                subject = %subject,
                timeout_ms = self.send_timeout.as_millis() as u64,
                "Notification timed out"
            ),
        }
    }
}
