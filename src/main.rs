use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use sonder_match::config::Settings;
use sonder_match::core::{Matcher, MatcherHandle};
use sonder_match::routes::{self, matches::AppState};
use sonder_match::services::{AppwriteClient, AppwriteCollections, MentorIndex};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .content_type("application/json")
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Initialize logging
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());

    let subscriber = tracing_subscriber::fmt().with_target(false).with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting Sonder Match service...");

    // Load configuration
    let settings = Settings::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Configuration loaded successfully");

    // Initialize the matcher first: invalid weights must refuse to start
    let weights = settings.scoring.weights.weight_config();
    let matcher = Matcher::new(weights, settings.scoring.engagement_saturation).unwrap_or_else(|e| {
        error!("Invalid scoring configuration: {}", e);
        panic!("Configuration error: {}", e);
    });

    info!("Matcher initialized with weights: {:?}", matcher.weights());
    let matcher = Arc::new(MatcherHandle::new(matcher));

    // Initialize Appwrite client
    let appwrite_collections = AppwriteCollections {
        mentor_profiles: settings.collection.mentor_profiles,
    };

    let appwrite = Arc::new(
        AppwriteClient::new(
            settings.appwrite.endpoint,
            settings.appwrite.api_key,
            settings.appwrite.project_id,
            settings.appwrite.database_id,
            appwrite_collections,
        )
        .unwrap_or_else(|e| {
            error!("Failed to build Appwrite client: {}", e);
            panic!("Appwrite client error: {}", e);
        }),
    );

    info!("Appwrite client initialized");

    // Warm up the mentor index; a failed first refresh is not fatal, the
    // service starts with an empty snapshot and retries on the interval
    let index = Arc::new(MentorIndex::new());
    match index.refresh(appwrite.as_ref()).await {
        Ok(count) => info!("Mentor index warmed up with {} profiles", count),
        Err(e) => warn!("Initial index refresh failed, starting with empty snapshot: {}", e),
    }

    // Background refresh loop; failures keep serving the previous snapshot
    let refresh_interval = settings.index.refresh_interval_secs.unwrap_or(300);
    let bg_index = Arc::clone(&index);
    let bg_appwrite = Arc::clone(&appwrite);
    actix_web::rt::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(refresh_interval));
        // The first tick fires immediately; the warm-up above already ran
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = bg_index.refresh(bg_appwrite.as_ref()).await {
                warn!("Scheduled index refresh failed, previous snapshot retained: {}", e);
            }
        }
    });

    info!("Index refresh scheduled every {}s", refresh_interval);

    // Build application state
    let app_state = AppState {
        appwrite,
        index,
        matcher,
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
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
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
