//! Domain layer - Core business entities
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.

pub mod review;

pub use review::{
    PopulatedReview, PopulatedReviewResponse, Review, ReviewAuthor, ReviewResponse, ServiceProfile,
};
