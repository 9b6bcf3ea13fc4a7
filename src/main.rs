// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, collaborators, and start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{
    AuthProvider, GooglePlacesClient, IndexMonitor, MaintenanceReporter, PgMaintenanceService,
    PlacesProvider, SupabaseAuthClient,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting placelists-web...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Build the external collaborators once; handlers only see the traits
    let http_timeout = Duration::from_secs(config.http_timeout_secs);

    let places: Arc<dyn PlacesProvider> =
        match GooglePlacesClient::new(config.google_places_api_key.clone(), http_timeout) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                log::error!("Failed to build Google Places client: {}", e);
                std::process::exit(1);
            }
        };
    let auth: Arc<dyn AuthProvider> = match SupabaseAuthClient::new(
        &config.supabase_url,
        config.supabase_anon_key.clone(),
        http_timeout,
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            log::error!("Failed to build Supabase auth client: {}", e);
            std::process::exit(1);
        }
    };
    let maintenance = Arc::new(PgMaintenanceService::new(pool));
    let index_monitor: Arc<dyn IndexMonitor> = maintenance.clone();
    let reporter: Arc<dyn MaintenanceReporter> = maintenance;

    // 6. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::from(places.clone()))
            .app_data(web::Data::from(auth.clone()))
            .app_data(web::Data::from(index_monitor.clone()))
            .app_data(web::Data::from(reporter.clone()))
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::places_config)
            .configure(handlers::maintenance_config)
            .configure(handlers::auth_config)
            .default_service(web::to(handlers::not_found))
    })
    .bind(&server_addr)?
    .run()
    .await
}
