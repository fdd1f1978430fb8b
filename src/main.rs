use std::sync::Arc;

use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod reconcile;
mod routes;
mod scheduler;
mod store;

use config::Config;
use db::init_db;

use crate::docs::ApiDoc;
use crate::reconcile::Reconciler;
use crate::store::{AttendanceStore, MySqlStore};
use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "SICA reconciler is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily("logs", "reconciler.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Reconciler starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("failed to connect to database")?;

    if config.run_migrations {
        db::run_migrations(&pool)
            .await
            .context("failed to run migrations")?;
    }

    let store: Arc<dyn AttendanceStore> = Arc::new(MySqlStore::new(pool));
    let reconciler = Reconciler::new(store, config.reconcile.clone());

    if config.reconcile.scheduler_enabled {
        scheduler::spawn_daily(reconciler.clone());
    } else {
        warn!("Daily scheduler disabled, reconciliation only runs on demand");
    }

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(reconciler.clone()))
            .app_data(Data::new(config.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
