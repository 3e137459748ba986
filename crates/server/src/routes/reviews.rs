use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use common::ApiResponse;
use models::{NewReview, Review, ReviewPatch};
use serde::Deserialize;
use service::auth::{ownership::scope_email, Claims};

use crate::auth::ServerState;
use crate::errors::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct MyReviewsQuery {
    pub email: Option<String>,
}

/// 提交评论
#[utoipa::path(
    post,
    path = "/post-review",
    tag = "reviews",
    request_body = crate::openapi::NewReviewDoc,
    responses((status = 200, description = "Envelope with a confirmation message or error", body = crate::openapi::EnvelopeDoc))
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<NewReview>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Json(input) = body?;
    let user_name = input.user_name.clone();
    let resp = match state.reviews.create(input).await? {
        Some(id) => ApiResponse::message(format!("Successfully created the {user_name} with id {id}")),
        None => ApiResponse::error("Couldn't create the review"),
    };
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/review/{id}",
    tag = "reviews",
    params(("id" = String, Path, description = "Id of the reviewed service")),
    responses((status = 200, description = "Reviews for the service, newest first", body = crate::openapi::EnvelopeDoc))
)]
pub async fn list_for_service(
    State(state): State<ServerState>,
    Path(service_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Review>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.reviews.list_for_service(&service_id).await?)))
}

/// 当前用户自己的评论。查询参数中的 email 必须与令牌一致，否则直接 403，不读库
#[utoipa::path(
    get,
    path = "/myreviews",
    tag = "reviews",
    params(("email" = Option<String>, Query, description = "Must equal the token's email when given")),
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The caller's reviews", body = crate::openapi::EnvelopeDoc),
        (status = 401, description = "No bearer token", body = crate::openapi::EnvelopeDoc),
        (status = 403, description = "Invalid token or email mismatch", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn my_reviews(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    query: Result<Query<MyReviewsQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Review>>>, ApiError> {
    let Query(query) = query?;
    let email = scope_email(&claims, query.email.as_deref())?;
    Ok(Json(ApiResponse::ok(state.reviews.list_for_owner(email).await?)))
}

#[utoipa::path(
    delete,
    path = "/reviewdelete/{id}",
    tag = "reviews",
    params(("id" = String, Path, description = "Review id")),
    responses((status = 200, description = "Deleted, or not found", body = crate::openapi::EnvelopeDoc))
)]
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let resp = if state.reviews.delete(&id).await? {
        ApiResponse::message("Successfully deleted")
    } else {
        ApiResponse::error("not found")
    };
    Ok(Json(resp))
}

/// 按 id 获取评论，返回零或一个元素的列表
#[utoipa::path(
    get,
    path = "/mreview/{id}",
    tag = "reviews",
    params(("id" = String, Path, description = "Review id")),
    responses((status = 200, description = "Zero- or one-element list", body = crate::openapi::EnvelopeDoc))
)]
pub async fn get(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Review>>>, ApiError> {
    Ok(Json(ApiResponse::ok(state.reviews.get(&id).await?)))
}

#[utoipa::path(
    patch,
    path = "/review-edit/{id}",
    tag = "reviews",
    params(("id" = String, Path, description = "Review id")),
    request_body = crate::openapi::ReviewPatchDoc,
    responses((status = 200, description = "Updated, or no match", body = crate::openapi::EnvelopeDoc))
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Result<Json<ReviewPatch>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Json(patch) = body?;
    let resp = if state.reviews.update(&id, patch).await? {
        ApiResponse::message(format!("Successfully updated the review with id {id}"))
    } else {
        ApiResponse::error("Couldn't update the review")
    };
    Ok(Json(resp))
}
