mod web;

use actix_web::web::Data;
use actix_web::{middleware::Logger, App, HttpServer};
use chrono::Utc;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use civicpress::config::Config;
use civicpress::db::{self, Database};
use civicpress::services::{PasswordManager, PromotionScheduler};

use web::middleware::SecurityHeaders;
use web::AppState;

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(fmt::layer())
        .init();
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = Config::from_env()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let db = Database::new(&config.database_url).await.map_err(|e| {
        io::Error::other(format!("Failed to connect to database: {e}"))
    })?;

    if let Some((email, password)) = &config.bootstrap_admin {
        match PasswordManager::check_strength(password) {
            Ok(()) => match db::ensure_admin(&db.pool, email, password).await {
                Ok(true) => log::info!("Created admin account {}", email),
                Ok(false) => {}
                Err(e) => log::error!("Failed to create admin {}: {}", email, e),
            },
            Err(msg) => log::warn!("Skipping admin bootstrap: {}", msg),
        }
    }

    match db::purge_expired_sessions(&db.pool, Utc::now()).await {
        Ok(0) => {}
        Ok(n) => log::info!("Purged {} expired session(s)", n),
        Err(e) => log::warn!("Failed to purge expired sessions: {}", e),
    }

    let scheduler =
        PromotionScheduler::new(Arc::new(db.clone()), config.scheduler_interval)
            .spawn();

    let cookie_secure = config.cookie_secure;
    let state = Data::new(AppState::new(db, cookie_secure));

    log::info!("Listening on {}", config.bind_addr);

    let result = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(web::api::json_config())
            .app_data(web::api::query_config())
            .app_data(web::api::path_config())
            .wrap(SecurityHeaders::new(cookie_secure))
            .wrap(Logger::default())
            .configure(web::handlers::configure)
    })
    .bind(&config.bind_addr)?
    .run()
    .await;

    scheduler.shutdown().await;
    result
}
