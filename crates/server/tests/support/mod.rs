#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use service::auth::TokenService;
use service::catalog::repository::mock::MemoryServiceRepository;
use service::catalog::{CatalogService, ServiceRepository};
use service::reviews::repository::mock::MemoryReviewRepository;
use service::reviews::{ReviewRepository, ReviewService};
use tower::ServiceExt;

use server::auth::ServerState;
use server::routes;

pub const SECRET: &str = "test-secret";

/// Router over in-memory stores, with handles kept for read counting.
pub struct TestApp {
    pub router: Router,
    pub tokens: TokenService,
    pub services: Arc<MemoryServiceRepository>,
    pub reviews: Arc<MemoryReviewRepository>,
}

pub fn app() -> TestApp {
    let tokens = TokenService::new(SECRET, chrono::Duration::hours(24)).unwrap();
    let services = Arc::new(MemoryServiceRepository::default());
    let reviews = Arc::new(MemoryReviewRepository::default());
    let services_dyn: Arc<dyn ServiceRepository> = services.clone();
    let reviews_dyn: Arc<dyn ReviewRepository> = reviews.clone();
    let state = ServerState {
        tokens: Arc::new(tokens.clone()),
        catalog: Arc::new(CatalogService::new(services_dyn)),
        reviews: Arc::new(ReviewService::new(reviews_dyn)),
    };
    let cors = tower_http::cors::CorsLayer::very_permissive();
    let router = routes::build_router(state, cors, Duration::from_secs(5));
    TestApp { router, tokens, services, reviews }
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec())
    }

    pub async fn json(&self, req: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(req).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn with_body(&self, method: &str, uri: &str, body: &Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();
        self.json(req).await
    }

    pub async fn get_authorized(&self, uri: &str, authorization: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .uri(uri)
            .header("authorization", authorization)
            .body(Body::empty())
            .unwrap();
        self.json(req).await
    }
}

/// Pull the id out of "Successfully created the <name> with id <id>".
pub fn created_id(body: &Value) -> String {
    let msg = body["message"].as_str().unwrap();
    msg.rsplit(' ').next().unwrap().to_string()
}
