use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tpe_matching::config::Settings;
use tpe_matching::core::Matcher;
use tpe_matching::routes::{self, AppState};
use tpe_matching::services::{GhlClient, MatchCache, PostgresClient};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::process::exit(1);
    });

    // Initialize logging; RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match settings.logging.format.as_str() {
        "json" => subscriber.json().init(),
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        // "full"
        _ => subscriber.init(),
    }

    info!("Starting TPE matching service...");

    // Initialize PostgreSQL client
    let postgres = Arc::new(
        PostgresClient::from_settings(&settings.database)
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?,
    );

    info!("PostgreSQL client initialized");

    // Initialize match cache
    let cache = Arc::new(MatchCache::new(
        settings.cache.max_entries,
        settings.cache.ttl_secs,
    ));

    if cache.is_enabled() {
        info!(
            "Match cache enabled ({} entries, TTL: {}s)",
            settings.cache.max_entries, settings.cache.ttl_secs
        );
    } else {
        info!("Match cache disabled");
    }

    // Initialize GHL webhook client (optional - trigger-sync is unavailable without it)
    let ghl = match settings.ghl.webhook_url.clone() {
        Some(url) => {
            let client = GhlClient::new(url, Duration::from_secs(settings.ghl.timeout_secs))
                .map_err(|e| {
                    error!("Failed to create GHL client: {}", e);
                    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
                })?;
            info!("GHL webhook client initialized");
            Some(Arc::new(client))
        }
        None => {
            info!("No GHL webhook configured, trigger-sync disabled");
            None
        }
    };

    // Initialize matcher with configured weights
    let weights = settings.scoring.weights.weights();
    let limits = settings.matching.limits();
    let matcher = Matcher::new(weights, limits);

    info!("Matcher initialized with weights: {:?}, limits: {:?}", weights, limits);

    // Build application state
    let app_state = AppState {
        postgres,
        cache,
        ghl,
        matcher,
        expose_error_details: settings.server.expose_error_details,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(routes::handle_path_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
