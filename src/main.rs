use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portfolio_api::{
    constants::{API_VERSION, START_TIME},
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    routes::configure_routes,
    settings::AppConfig,
    shared_repos::SharedRepositories,
    AppState,
};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().pretty()).init();
    }
}

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .supports_credentials()
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        // Config validation rejects this in production.
        return cors.allow_any_origin();
    }
    origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.is_production());
    once_cell::sync::Lazy::force(&START_TIME);
    tracing::info!("Loaded configuration: {:?}", config);

    let pool = match create_pool(&config.database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to create database connection pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        tracing::error!("Failed to run migrations: {}", e);
        std::process::exit(1);
    }

    let redis = AppState::connect_redis(&config);
    let server_addr = format!("{}:{}", config.host, config.port);
    let workers = config.worker_count;

    let app_state = web::Data::new(AppState::new(config, SharedRepositories::new(pool), redis));

    tracing::info!(
        "Starting {} v{} on {} with {} workers",
        app_state.config.name,
        API_VERSION,
        server_addr,
        workers
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(AuthMiddleware)
            .wrap(build_cors(&app_state.config))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(workers)
    .bind(server_addr)?
    .run();

    let handle = server.handle();

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => {
            handle.stop(true).await;
            Ok(())
        }
    }
}
