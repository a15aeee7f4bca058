//! Review repository implementation.
//!
//! The duplicate-review invariant is enforced twice: callers perform a
//! pre-insert existence check, and the store carries a unique index on
//! (user_id, service_id) that closes the race between concurrent
//! creates. A unique-index violation surfaces as a conflict.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType,
    QueryFilter, QuerySelect, RelationTrait, Set, SqlErr,
};
use uuid::Uuid;

use super::entities::review::{self, ActiveModel, Entity as ReviewEntity};
use super::entities::{service, user};
use crate::domain::{PopulatedReview, Review, ReviewAuthor, ServiceProfile};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Review repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Find the review a given user wrote for a given service
    async fn find_by_author_and_service(
        &self,
        user_id: Uuid,
        service_id: Uuid,
    ) -> AppResult<Option<Review>>;

    /// Find any review for a service, regardless of author
    async fn find_any_by_service(&self, service_id: Uuid) -> AppResult<Option<Review>>;

    /// List all reviews for a service, with author and service records joined in
    async fn list_by_service(&self, service_id: Uuid) -> AppResult<Vec<PopulatedReview>>;

    /// Insert a new review
    async fn create(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review>;

    /// Update the review matching (author, service) with new rating and body
    async fn update(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review>;
}

/// Row shape for the populated list query
#[derive(Debug, FromQueryResult)]
struct PopulatedRow {
    id: Uuid,
    user_id: Uuid,
    service_id: Uuid,
    rating: i32,
    body: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    author_name: String,
    service_name: String,
    service_description: Option<String>,
    service_created_at: chrono::DateTime<chrono::Utc>,
}

impl From<PopulatedRow> for PopulatedReview {
    fn from(row: PopulatedRow) -> Self {
        PopulatedReview {
            id: row.id,
            author: ReviewAuthor {
                id: row.user_id,
                name: row.author_name,
            },
            service: ServiceProfile {
                id: row.service_id,
                name: row.service_name,
                description: row.service_description,
                created_at: row.service_created_at,
            },
            rating: row.rating,
            body: row.body,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Concrete implementation of ReviewRepository backed by SeaORM
pub struct ReviewStore {
    db: DatabaseConnection,
}

impl ReviewStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewRepository for ReviewStore {
    async fn find_by_author_and_service(
        &self,
        user_id: Uuid,
        service_id: Uuid,
    ) -> AppResult<Option<Review>> {
        let result = ReviewEntity::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::ServiceId.eq(service_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Review::from))
    }

    async fn find_any_by_service(&self, service_id: Uuid) -> AppResult<Option<Review>> {
        let result = ReviewEntity::find()
            .filter(review::Column::ServiceId.eq(service_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Review::from))
    }

    async fn list_by_service(&self, service_id: Uuid) -> AppResult<Vec<PopulatedReview>> {
        let rows = ReviewEntity::find()
            .filter(review::Column::ServiceId.eq(service_id))
            .join(JoinType::InnerJoin, review::Relation::User.def())
            .join(JoinType::InnerJoin, review::Relation::Service.def())
            .column_as(user::Column::Name, "author_name")
            .column_as(service::Column::Name, "service_name")
            .column_as(service::Column::Description, "service_description")
            .column_as(service::Column::CreatedAt, "service_created_at")
            .into_model::<PopulatedRow>()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(PopulatedReview::from).collect())
    }

    async fn create(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            service_id: Set(service_id),
            rating: Set(rating),
            body: Set(body),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(|e| {
            match e.sql_err() {
                // Concurrent create slipped past the existence check;
                // the unique index on (user_id, service_id) caught it.
                Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Review"),
                _ => AppError::from(e),
            }
        })?;

        Ok(Review::from(model))
    }

    async fn update(
        &self,
        user_id: Uuid,
        service_id: Uuid,
        rating: i32,
        body: String,
    ) -> AppResult<Review> {
        let existing = ReviewEntity::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::ServiceId.eq(service_id))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: ActiveModel = existing.into();
        active.rating = Set(rating);
        active.body = Set(body);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Review::from(model))
    }
}
