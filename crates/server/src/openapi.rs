use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Any JSON object; it becomes the token's identity claims.
#[derive(ToSchema)]
pub struct IdentityPayloadDoc { pub email: Option<String> }

#[derive(ToSchema)]
pub struct TokenResponseDoc { pub success: bool, pub token: String }

#[derive(ToSchema)]
pub struct EnvelopeDoc {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: Option<String>,
    pub message: Option<String>,
    pub error: Option<String>,
}

#[derive(ToSchema)]
pub struct NewVisaServiceDoc {
    pub name: String,
    /// Epoch milliseconds
    pub date: i64,
}

#[derive(ToSchema)]
pub struct NewReviewDoc {
    pub user_name: String,
    pub email: String,
    pub service_id: String,
    pub date: i64,
}

#[derive(ToSchema)]
pub struct ReviewPatchDoc {
    pub user_name: Option<String>,
    pub email: Option<String>,
    pub service_id: Option<String>,
    pub date: Option<i64>,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::root,
        crate::routes::health,
        crate::routes::jwt::issue_token,
        crate::routes::services::create,
        crate::routes::services::list,
        crate::routes::services::get,
        crate::routes::reviews::create,
        crate::routes::reviews::list_for_service,
        crate::routes::reviews::my_reviews,
        crate::routes::reviews::delete,
        crate::routes::reviews::get,
        crate::routes::reviews::update,
    ),
    components(
        schemas(
            HealthResponse,
            IdentityPayloadDoc,
            TokenResponseDoc,
            EnvelopeDoc,
            NewVisaServiceDoc,
            NewReviewDoc,
            ReviewPatchDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "services"),
        (name = "reviews")
    )
)]
pub struct ApiDoc;
