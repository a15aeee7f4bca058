//! Review handlers.
//!
//! Status codes follow the established public contract: successful
//! creates return 200 (not 201), a duplicate review is a 400, and an
//! ownership failure on update is a 401.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{PopulatedReviewResponse, ReviewResponse};
use crate::errors::AppResult;

/// Review create/update request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReviewRequest {
    /// Rating value
    #[schema(example = 4)]
    pub rating: i32,
    /// Review text body
    #[validate(length(min = 1, message = "must not be empty"))]
    #[schema(example = "Good service", min_length = 1)]
    pub review: String,
}

/// Single review response envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewEnvelope {
    pub review: ReviewResponse,
}

/// Review list response envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewsEnvelope {
    pub reviews: Vec<PopulatedReviewResponse>,
}

/// Create review routes
pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/:service_id",
            get(list_reviews).post(create_review).patch(update_review),
        )
        .route("/:service_id/:user_id", get(get_user_review))
}

/// Post a review for a service
#[utoipa::path(
    post,
    path = "/reviews/{service_id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(
        ("service_id" = Uuid, Path, description = "Service ID")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review created", body = ReviewEnvelope),
        (status = 400, description = "Caller already reviewed this service"),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_review(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ReviewRequest>,
) -> AppResult<Json<ReviewEnvelope>> {
    let review = state
        .review_service
        .create_review(service_id, current_user.id, payload.rating, payload.review)
        .await?;

    Ok(Json(ReviewEnvelope {
        review: ReviewResponse::from(review),
    }))
}

/// Get all reviews for a service
#[utoipa::path(
    get,
    path = "/reviews/{service_id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(
        ("service_id" = Uuid, Path, description = "Service ID")
    ),
    responses(
        (status = 200, description = "Reviews for the service", body = ReviewsEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No reviews found")
    )
)]
pub async fn list_reviews(
    Extension(_current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
) -> AppResult<Json<ReviewsEnvelope>> {
    let reviews = state.review_service.list_by_service(service_id).await?;

    Ok(Json(ReviewsEnvelope {
        reviews: reviews
            .into_iter()
            .map(PopulatedReviewResponse::from)
            .collect(),
    }))
}

/// Update the caller's review of a service (author only)
#[utoipa::path(
    patch,
    path = "/reviews/{service_id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(
        ("service_id" = Uuid, Path, description = "Service ID")
    ),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewEnvelope),
        (status = 401, description = "Caller is not the review author"),
        (status = 404, description = "No review found for the service"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_review(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(service_id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ReviewRequest>,
) -> AppResult<Json<ReviewEnvelope>> {
    let review = state
        .review_service
        .update_review(service_id, current_user.id, payload.rating, payload.review)
        .await?;

    Ok(Json(ReviewEnvelope {
        review: ReviewResponse::from(review),
    }))
}

/// Get a particular user's review of a service
#[utoipa::path(
    get,
    path = "/reviews/{service_id}/{user_id}",
    tag = "Reviews",
    security(("bearer_auth" = [])),
    params(
        ("service_id" = Uuid, Path, description = "Service ID"),
        ("user_id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "The user's review", body = ReviewEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No review found")
    )
)]
pub async fn get_user_review(
    Extension(_current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path((service_id, user_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ReviewEnvelope>> {
    let review = state.review_service.get_by_user(service_id, user_id).await?;

    Ok(Json(ReviewEnvelope {
        review: ReviewResponse::from(review),
    }))
}
