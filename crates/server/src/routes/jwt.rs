use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::auth::ServerState;
use crate::errors::ApiError;

#[derive(Serialize, Debug)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// 签发访问令牌：请求体原样作为身份载荷
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "auth",
    request_body = crate::openapi::IdentityPayloadDoc,
    responses(
        (status = 200, description = "Signed token", body = crate::openapi::TokenResponseDoc),
        (status = 500, description = "Signing failed", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn issue_token(
    State(state): State<ServerState>,
    body: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = body?;
    let token = state.tokens.issue(payload)?;
    Ok(Json(TokenResponse { success: true, token }))
}
