//! Shared test fixtures.
//!
//! Provides an in-memory `ReviewRepository` so service and API tests can
//! exercise the real business logic without a database, plus a helper
//! for minting valid bearer tokens.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use review_api::domain::{PopulatedReview, Review, ReviewAuthor, ServiceProfile};
use review_api::errors::{AppError, AppResult};
use review_api::infra::ReviewRepository;
use review_api::services::Claims;

/// Shared secret for test tokens (32+ chars, mirrors the config minimum)
pub const TEST_JWT_SECRET: &str = "test-secret-key-for-testing-only-32chars";

/// Mint a bearer token for the given user id
pub fn token_for(user_id: Uuid) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Token encoding should succeed")
}

/// In-memory review store.
///
/// Enforces the (user, service) uniqueness the real store guarantees via
/// its unique index, and fabricates fixed author/service records for the
/// populated list query.
pub struct InMemoryReviews {
    reviews: Mutex<Vec<Review>>,
}

impl InMemoryReviews {
    pub fn new() -> Self {
        Self {
            reviews: Mutex::new(Vec::new()),
        }
    }

    /// Insert a review directly, bypassing business rules
    pub fn seed(&self, review: Review) {
        self.reviews.lock().unwrap().push(review);
    }
}

pub fn make_review(user_id: Uuid, service_id: Uuid, rating: i32, body: &str) -> Review {
    let now = Utc::now();
    Review {
        id: Uuid::new_v4(),
        user_id,
        service_id,
        rating,
        body: body.to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviews {
    async fn find_by_author_and_service(
        &self,
        user_id: Uuid,
        service_id: Uuid,
    ) -> AppResult<Option<Review>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.service_id == service_id)
            .cloned())
    }

    async fn find_any_by_service(&self, service_id: Uuid) -> AppResult<Option<Review>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.service_id == service_id)
            .cloned())
    }

    async fn list_by_service(&self, service_id: Uuid) -> AppResult<Vec<PopulatedReview>> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.service_id == service_id)
            .map(|r| PopulatedReview {
                id: r.id,
                author: ReviewAuthor {
                    id: r.user_id,
                    name: "Test User".to_string(),
                },
                service: ServiceProfile {
                    id: r.service_id,
                    name: "Test Service".to_string(),
                    description: Some("A service under test".to_string()),
                    created_at: r.created_at,
                },
                rating: r.rating,
                body: r.body.clone(),
                created_at: r.created_at,
                updated_at: r.updated_at,
            })
            .collect())
    }

    async fn create(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review> {
        let mut reviews = self.reviews.lock().unwrap();

        // Mirror the store's unique index on (user_id, service_id)
        if reviews
            .iter()
            .any(|r| r.user_id == user_id && r.service_id == service_id)
        {
            return Err(AppError::conflict("Review"));
        }

        let review = make_review(user_id, service_id, rating, &body);
        reviews.push(review.clone());
        Ok(review)
    }

    async fn update(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review> {
        let mut reviews = self.reviews.lock().unwrap();
        let review = reviews
            .iter_mut()
            .find(|r| r.user_id == user_id && r.service_id == service_id)
            .ok_or(AppError::NotFound)?;

        review.rating = rating;
        review.body = body;
        review.updated_at = Utc::now();
        Ok(review.clone())
    }
}
