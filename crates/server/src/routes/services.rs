use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use common::ApiResponse;
use models::{NewVisaService, VisaService};

use crate::auth::ServerState;
use crate::errors::ApiError;

/// 创建服务
#[utoipa::path(
    post,
    path = "/services",
    tag = "services",
    request_body = crate::openapi::NewVisaServiceDoc,
    responses((status = 200, description = "Envelope with a confirmation message or error", body = crate::openapi::EnvelopeDoc))
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<NewVisaService>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Json(input) = body?;
    let name = input.name.clone();
    let resp = match state.catalog.create(input).await? {
        Some(id) => ApiResponse::message(format!("Successfully created the {name} with id {id}")),
        None => ApiResponse::error("Couldn't create the service"),
    };
    Ok(Json(resp))
}

/// 列出所有服务（按日期倒序）
#[utoipa::path(
    get,
    path = "/services",
    tag = "services",
    responses((status = 200, description = "All services, newest first", body = crate::openapi::EnvelopeDoc))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<ApiResponse<Vec<VisaService>>>, ApiError> {
    let services = state.catalog.list().await?;
    Ok(Json(ApiResponse::ok(services).with_message("Successfully got the data")))
}

/// 获取单个服务，不存在时 data 为 null
#[utoipa::path(
    get,
    path = "/service/{id}",
    tag = "services",
    params(("id" = String, Path, description = "Service id (24 hex chars)")),
    responses((status = 200, description = "The service or null", body = crate::openapi::EnvelopeDoc))
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Option<VisaService>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.catalog.get(&id).await?)))
}
