use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::handlers::companies;
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

/// Full application router
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(company_public_routes())
        // Protected: JWT required
        .merge(company_protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
        .layer(cors_layer(&config));

    let router = if config.api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn company_public_routes() -> Router<AppState> {
    Router::new()
        .route("/companies", get(companies::list))
        .route("/companies/:handle", get(companies::show))
}

fn company_protected_routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, jwt_auth_middleware);

    // Layered per method router, so an unsupported method still answers 405
    // and public GETs on the same paths stay open after the merge.
    Router::new()
        .route("/companies", post(companies::create).route_layer(auth.clone()))
        .route(
            "/companies/:handle",
            patch(companies::update)
                .delete(companies::delete)
                .route_layer(auth),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.security.enable_cors {
        return CorsLayer::new();
    }
    if config.environment == Environment::Development && config.security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Companies API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "GET /health (public)",
            "list": "GET /companies?nameLike=&minEmployees=&maxEmployees= (public)",
            "show": "GET /companies/:handle (public)",
            "create": "POST /companies (JWT)",
            "update": "PATCH /companies/:handle (JWT)",
            "delete": "DELETE /companies/:handle (JWT)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.companies.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
