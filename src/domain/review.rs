//! Review domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Review domain entity.
///
/// A review is a rating plus a text body, authored by one user about one
/// service. Author and service references are immutable after creation;
/// each (author, service) pair holds at most one review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub rating: i32,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    /// Check whether the given user authored this review.
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Author fields exposed when a review is populated (id and name only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewAuthor {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User display name
    #[schema(example = "John Doe")]
    pub name: String,
}

/// The reviewed service's record, as joined into populated reviews.
///
/// Services are owned by a companion catalog; this is a read-only
/// projection of that record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceProfile {
    /// Unique service identifier
    pub id: Uuid,
    /// Service display name
    #[schema(example = "Plumbing")]
    pub name: String,
    /// Service description
    pub description: Option<String>,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Review with its author and service records joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulatedReview {
    pub id: Uuid,
    pub author: ReviewAuthor,
    pub service: ServiceProfile,
    pub rating: i32,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review response (wire format: author and body keep their legacy
/// field names `user` and `review`)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponse {
    /// Unique review identifier
    #[schema(example = "67e55044-10b1-426f-9247-bb680e5fe0c8")]
    pub id: Uuid,
    /// Author user id
    pub user: Uuid,
    /// Reviewed service id
    pub service: Uuid,
    /// Rating value
    #[schema(example = 4)]
    pub rating: i32,
    /// Review text body
    #[schema(example = "Good service")]
    pub review: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user: review.user_id,
            service: review.service_id,
            rating: review.rating,
            review: review.body,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

/// Populated review response, with the author's id+name and the full
/// service record in place of bare ids.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PopulatedReviewResponse {
    /// Unique review identifier
    pub id: Uuid,
    /// Review author (id and name)
    pub user: ReviewAuthor,
    /// Reviewed service record
    pub service: ServiceProfile,
    /// Rating value
    #[schema(example = 4)]
    pub rating: i32,
    /// Review text body
    #[schema(example = "Good service")]
    pub review: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<PopulatedReview> for PopulatedReviewResponse {
    fn from(review: PopulatedReview) -> Self {
        Self {
            id: review.id,
            user: review.author,
            service: review.service,
            rating: review.rating,
            review: review.body,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}
