//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::review_handler;
use crate::domain::{PopulatedReviewResponse, ReviewAuthor, ReviewResponse, ServiceProfile};

/// OpenAPI documentation for the Review API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Review API",
        version = "0.1.0",
        description = "Service reviews with ownership-gated updates",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        review_handler::create_review,
        review_handler::list_reviews,
        review_handler::update_review,
        review_handler::get_user_review,
    ),
    components(
        schemas(
            // Domain types
            ReviewResponse,
            PopulatedReviewResponse,
            ReviewAuthor,
            ServiceProfile,
            // Handler types
            review_handler::ReviewRequest,
            review_handler::ReviewEnvelope,
            review_handler::ReviewsEnvelope,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Reviews", description = "Service review operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT bearer token issued by the identity service"))
                        .build(),
                ),
            );
        }
    }
}
