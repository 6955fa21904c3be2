use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use backend::adapters::ownership_sea::SeaOwnershipStore;
use backend::config::db::{DbOwner, DbProfile};
use backend::infra::db::connect_db;
use backend::middleware::cors::cors_middleware;
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use backend::services::repair;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    let jwt = match std::env::var("BACKEND_JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("BACKEND_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let security_config = SecurityConfig::new(jwt.as_bytes());

    let db = match connect_db(DbProfile::Prod, DbOwner::App).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    let store = Arc::new(SeaOwnershipStore::new(db.clone()));
    let app_state = AppState::new(store.clone(), db, security_config);

    tracing::info!(host, port, "starting excursion backend");

    // Background reconciliation of the users/excursions link. Interval and
    // grace period can be tuned via env once there is a reason to.
    repair::spawn_periodic(
        store,
        Duration::from_secs(15 * 60),
        repair::DEFAULT_ORPHAN_GRACE,
    );

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
