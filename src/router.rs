use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use learnhub_config::RateLimitConfig;
use learnhub_observability::{
    PrometheusHandle, logging_middleware, metrics_middleware, metrics_router,
};

use crate::docs::ApiDoc;
use crate::modules::auth::init_auth_router;
use crate::modules::conversations::init_conversations_router;
use crate::modules::course_modules::init_modules_router;
use crate::modules::courses::init_courses_router;
use crate::modules::payments::init_payments_router;
use crate::modules::reviews::init_reviews_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

/// The full API without rate limiting. Needs no connect info, so it can be
/// driven directly with `oneshot` in tests.
pub fn init_router(state: AppState) -> Router {
    build_router(state, None, None)
}

/// The served application: per-IP rate limits and, when a recorder is
/// installed, `GET /metrics`. Must be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn init_app(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let limits = state.rate_limit_config.clone();
    build_router(state, Some(&limits), metrics_handle)
}

async fn health() -> Json<Value> {
    Json(json!({ "success": true, "status": "ok" }))
}

fn build_router(
    state: AppState,
    limits: Option<&RateLimitConfig>,
    metrics_handle: Option<PrometheusHandle>,
) -> Router {
    let mut auth = init_auth_router();
    let mut api = Router::new()
        .nest("/user", init_users_router())
        .nest("/course", init_courses_router())
        .nest("/module", init_modules_router())
        .nest("/review", init_reviews_router())
        .nest("/conversation", init_conversations_router())
        .nest("/payment", init_payments_router(state.clone()));

    if let Some(limits) = limits {
        auth = auth.layer(GovernorLayer::new(limits.auth_governor_config()));
        api = api.layer(GovernorLayer::new(limits.general_governor_config()));
    }

    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/health", get(health))
        .nest("/api/v1", api.nest("/auth", auth))
        .with_state(state.clone());

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics_router(handle));
    }

    router
        .layer(cors_layer(&state.server_config.allowed_origins))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
