use std::time::Duration;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::auth::{self, ServerState};
use crate::openapi::ApiDoc;

pub mod jwt;
pub mod reviews;
pub mod services;

/// Plain-text liveness probe.
#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "server is running")))]
pub async fn root() -> &'static str {
    "server is running"
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public data routes, the gated
/// "my reviews" route, health/docs, and the tracing/CORS/timeout stack.
pub fn build_router(state: ServerState, cors: CorsLayer, request_timeout: Duration) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/jwt", post(jwt::issue_token))
        .route("/services", post(services::create).get(services::list))
        .route("/service/:id", get(services::get))
        .route("/post-review", post(reviews::create))
        .route("/review/:id", get(reviews::list_for_service))
        .route("/reviewdelete/:id", delete(reviews::delete))
        .route("/mreview/:id", get(reviews::get))
        .route("/review-edit/:id", patch(reviews::update));

    // Only this route passes through the bearer gate
    let gated = Router::new()
        .route("/myreviews", get(reviews::my_reviews))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    public
        .merge(gated)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
