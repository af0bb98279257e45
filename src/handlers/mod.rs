// handlers/mod.rs - every page and API the café serves
//
// `register_all` is the single list of views; `app` wraps the resulting
// routes with the current-user middleware, CORS and request tracing.

pub mod collections;
pub mod games;
pub mod home;
pub mod reports;
pub mod session;
pub mod users;

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde_json::json;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::middleware::current_user_middleware;
use crate::state::AppState;
use crate::views::ViewRegistry;

pub fn register_all(registry: &mut ViewRegistry) {
    registry
        .register(home::Home)
        .register(session::Login)
        .register(session::Logout)
        .register(session::Register)
        .register(users::Users)
        .register_api(users::UsersApi)
        .register(games::Games)
        .register_api(games::GamesApi)
        .register(games::GameImage)
        .register(collections::ListCollections)
        .register(collections::NewCollection)
        .register(collections::ViewCollection)
        .register(collections::EditCollection)
        .register(reports::ReportForm)
        .register(reports::Reports);
}

pub fn app(state: AppState) -> Router {
    let mut registry = ViewRegistry::new();
    register_all(&mut registry);
    tracing::info!("Registered {} routes", registry.entries().len());

    let cors = cors_layer(&state.config.security);

    registry
        .into_router()
        .route("/health", get(health))
        .layer(axum::middleware::from_fn_with_state(state.clone(), current_user_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new().allow_origin(origins).allow_methods(Any).allow_headers(Any)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = if state.db.pool.is_some() { "postgres" } else { "memory" };

    match state.db.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": backend,
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                    }
                })),
            )
        }
    }
}
