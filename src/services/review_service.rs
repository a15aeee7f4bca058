//! Review service - Handles review business logic.
//!
//! Create enforces the one-review-per-(user, service) invariant; update
//! is gated on review ownership.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{PopulatedReview, Review};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::ReviewRepository;

/// Review service trait for dependency injection.
#[async_trait]
pub trait ReviewService: Send + Sync {
    /// Create a review for a service on behalf of the authenticated user
    async fn create_review(
        &self,
        service_id: Uuid,
        author_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review>;

    /// List all reviews for a service, populated with author and service records
    async fn list_by_service(&self, service_id: Uuid) -> AppResult<Vec<PopulatedReview>>;

    /// Update the caller's review of a service (author only)
    async fn update_review(
        &self,
        service_id: Uuid,
        author_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review>;

    /// Get the review a designated user wrote for a service
    async fn get_by_user(&self, service_id: Uuid, user_id: Uuid) -> AppResult<Review>;
}

/// Concrete implementation of ReviewService.
pub struct ReviewManager {
    repo: Arc<dyn ReviewRepository>,
}

impl ReviewManager {
    /// Create new review service instance
    pub fn new(repo: Arc<dyn ReviewRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ReviewService for ReviewManager {
    async fn create_review(
        &self,
        service_id: Uuid,
        author_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review> {
        // The store's unique index backs this check under concurrency.
        if self
            .repo
            .find_by_author_and_service(author_id, service_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Review"));
        }

        self.repo.create(author_id, service_id, rating, body).await
    }

    async fn list_by_service(&self, service_id: Uuid) -> AppResult<Vec<PopulatedReview>> {
        let reviews = self.repo.list_by_service(service_id).await?;

        // An empty result is a 404 in the public contract.
        if reviews.is_empty() {
            return Err(AppError::NotFound);
        }

        Ok(reviews)
    }

    async fn update_review(
        &self,
        service_id: Uuid,
        author_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review> {
        // Ownership is resolved from whichever review the store returns
        // first for this service, not from (service, caller). Part of the
        // established contract, kept deliberately.
        let existing = self
            .repo
            .find_any_by_service(service_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if !existing.is_authored_by(author_id) {
            return Err(AppError::Forbidden);
        }

        self.repo
            .update(existing.user_id, service_id, rating, body)
            .await
    }

    async fn get_by_user(&self, service_id: Uuid, user_id: Uuid) -> AppResult<Review> {
        self.repo
            .find_by_author_and_service(user_id, service_id)
            .await?
            .ok_or_not_found()
    }
}
