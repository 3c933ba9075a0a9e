use crate::config::Settings;
use crate::core::{intake, MatcherHandle};
use crate::models::{
    ErrorResponse, FindMatchesRequest, FindMatchesResponse, HealthResponse, RefreshResponse,
    ValidationErrorResponse,
};
use crate::services::{AppwriteClient, MentorIndex};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub index: Arc<MentorIndex>,
    pub matcher: Arc<MatcherHandle>,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/index/refresh", web::post().to(refresh_index))
        .route("/config/reload", web::post().to(reload_config));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let snapshot = state.index.current();

    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mentor_count: snapshot.mentors.len(),
        snapshot_refreshed_at: snapshot.refreshed_at,
        timestamp: chrono::Utc::now(),
    })
}

/// Find mentor matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body: the raw intake answers plus an optional limit:
/// ```json
/// {
///   "goals": ["career-transition"],
///   "careerStage": "early-career",
///   "preferredStyle": "direct",
///   "availability": ["monday-evening"],
///   "story": "free-text narrative answer",
///   "excludedMentorIds": ["..."],
///   "limit": 20
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    let request_id = uuid::Uuid::new_v4();

    if let Err(errors) = req.validate() {
        tracing::info!("[{}] Rejected find request shell: {}", request_id, errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    // An already-spent deadline aborts before the pipeline starts; there is
    // no mid-computation cancellation because partial rankings are not
    // well-defined
    if req.deadline_ms == Some(0) {
        return HttpResponse::GatewayTimeout().json(ErrorResponse {
            error: "Deadline exhausted".to_string(),
            message: "caller deadline expired before matching began".to_string(),
            status_code: 504,
        });
    }

    let intake = match intake::normalize(&req.intake) {
        Ok(intake) => intake,
        Err(err) => {
            tracing::info!("[{}] Intake rejected: {}", request_id, err);
            return HttpResponse::BadRequest().json(ValidationErrorResponse {
                error: "Intake validation failed".to_string(),
                issues: err.issues,
                status_code: 400,
            });
        }
    };

    let limit = req.limit.min(100) as usize;
    let snapshot = state.index.current();

    tracing::info!(
        "[{}] Matching against {} mentors, limit {}",
        request_id,
        snapshot.mentors.len(),
        limit
    );

    let outcome = state
        .matcher
        .current()
        .find_matches(&intake, snapshot.mentors.clone(), limit);

    tracing::info!(
        "[{}] Returning {} matches (from {} candidates)",
        request_id,
        outcome.matches.len(),
        outcome.total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: outcome.matches,
        total_candidates: outcome.total_candidates,
        snapshot_refreshed_at: snapshot.refreshed_at,
    })
}

/// On-demand index refresh endpoint
///
/// POST /api/v1/index/refresh
///
/// Failure leaves the previous snapshot serving and reports 502; in-flight
/// matches are never disturbed either way.
async fn refresh_index(state: web::Data<AppState>) -> impl Responder {
    match state.index.refresh(&state.appwrite).await {
        Ok(count) => {
            let snapshot = state.index.current();
            HttpResponse::Ok().json(RefreshResponse {
                mentor_count: count,
                refreshed_at: snapshot.refreshed_at,
            })
        }
        Err(e) => {
            tracing::error!("Index refresh failed, previous snapshot retained: {}", e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Refresh failed".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

/// Scoring configuration reload endpoint
///
/// POST /api/v1/config/reload
///
/// Re-reads the configuration sources and swaps the scoring setup as a
/// whole. Invalid weights are rejected and the current configuration keeps
/// serving.
async fn reload_config(state: web::Data<AppState>) -> impl Responder {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Configuration reload failed to read sources: {}", e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Reload failed".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let weights = settings.scoring.weights.weight_config();
    match state
        .matcher
        .reload(weights, settings.scoring.engagement_saturation)
    {
        Ok(()) => {
            tracing::info!("Scoring configuration reloaded: {:?}", weights);
            HttpResponse::Ok().json(serde_json::json!({
                "status": "reloaded",
                "weights": weights,
                "engagementSaturation": settings.scoring.engagement_saturation,
            }))
        }
        Err(e) => {
            tracing::error!("Rejected scoring configuration reload: {}", e);
            HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid scoring configuration".to_string(),
                message: e.to_string(),
                status_code: 400,
            })
        }
    }
}
