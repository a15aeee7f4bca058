//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! The `user` and `service` tables are owned by companion services;
//! their entities here exist only as join targets.

pub mod review;
pub mod service;
pub mod user;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use review::{ActiveModel as ReviewActiveModel, Entity as ReviewEntity, Model as ReviewModel};
