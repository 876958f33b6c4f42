//! # Parking Backend - نقطه ورود برنامه
//!
//! ترتیب راه‌اندازی:
//! 1. لود `.env` و تنظیمات
//! 2. tracing
//! 3. اتصال به دیتابیس و اجرای migration‌ها
//! 4. ساخت ادمین اولیه (اگه تنظیم شده باشه)
//! 5. اجرای سرور HTTP تا دریافت Ctrl+C

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parking_backend::{
    api::create_router,
    config::{Config, Environment},
    database::Database,
    error::{AppError, Result},
    services::AppState,
    utils::mask_email,
};

#[tokio::main]
async fn main() -> Result<()> {
    // اگه فایل .env نباشه اوکیه
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("🚀 Starting Parking Backend ({:?})...", config.environment);

    config.validate()?;
    info!("✅ Configuration loaded successfully");

    let database = Database::connect(&config.database_url).await?;
    info!("✅ Database connected successfully");

    database.migrate().await?;
    info!("✅ Database migrations applied");

    if config.smtp.is_none() {
        warn!("SMTP is not configured, emails will only be logged");
    }

    let addr = config.server_addr();
    let admin_seed = config.admin.clone();

    let state = AppState::new(database, config)?;

    if let Some(seed) = admin_seed {
        state.auth_service.ensure_admin(&seed).await?;
        info!(email = %mask_email(&seed.email), "✅ Admin account ready");
    }

    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("🌐 Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    info!("👋 Server stopped");
    Ok(())
}

/// راه‌اندازی tracing
///
/// در production لاگ‌ها JSON هستن، در بقیه محیط‌ها فرمت pretty.
/// `RUST_LOG` اگه ست شده باشه بر پیش‌فرض اولویت داره.
fn init_tracing(environment: &Environment) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("parking_backend=debug,tower_http=debug"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if environment.is_production() {
        registry
            .with(fmt::layer().json().with_target(true).with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_level(true)
                    .pretty(),
            )
            .init();
    }
}

/// منتظر Ctrl+C میمونه تا سرور graceful خاموش بشه
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        // بدون signal handler سرور تا ابد اجرا میشه
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
