use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use service::{
    auth::TokenService,
    catalog::{CatalogService, ServiceRepository},
    reviews::{ReviewRepository, ReviewService},
    runtime::Repositories,
};

use crate::errors::ApiError;

/// Shared router state. Everything is behind `Arc`; cloning per request is cheap.
#[derive(Clone)]
pub struct ServerState {
    pub tokens: Arc<TokenService>,
    pub catalog: Arc<CatalogService<dyn ServiceRepository>>,
    pub reviews: Arc<ReviewService<dyn ReviewRepository>>,
}

impl ServerState {
    pub fn new(tokens: TokenService, repos: &Repositories) -> Self {
        Self {
            tokens: Arc::new(tokens),
            catalog: Arc::new(CatalogService::new(Arc::clone(&repos.services))),
            reviews: Arc::new(ReviewService::new(Arc::clone(&repos.reviews))),
        }
    }
}

/// Gate for protected routes: `Authorization: Bearer <token>`.
/// Missing header → 401, bad scheme/signature/expiry → 403. On success the
/// decoded `Claims` are stored in the request extensions for the handler.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // a present but non-ASCII header is a bad credential, not a missing one
    let header = req.headers().get(AUTHORIZATION).map(|v| v.to_str().unwrap_or_default());
    let claims = match state.tokens.verify_authorization(header) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(path = %req.uri().path(), "bearer token rejected");
            return Err(e.into());
        }
    };
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
