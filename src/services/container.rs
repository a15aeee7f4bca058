//! Service Container - Centralized service access.
//!
//! Provides a single construction point for all application services,
//! wired against their infrastructure dependencies.

use std::sync::Arc;

use super::{AuthService, ReviewService};
use crate::config::Config;

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get review service
    fn reviews(&self) -> Arc<dyn ReviewService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    review_service: Arc<dyn ReviewService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(auth_service: Arc<dyn AuthService>, review_service: Arc<dyn ReviewService>) -> Self {
        Self {
            auth_service,
            review_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{Authenticator, ReviewManager};
        use crate::infra::ReviewStore;

        let repo = Arc::new(ReviewStore::new(db));
        let auth_service = Arc::new(Authenticator::new(config));
        let review_service = Arc::new(ReviewManager::new(repo));

        Self {
            auth_service,
            review_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn reviews(&self) -> Arc<dyn ReviewService> {
        self.review_service.clone()
    }
}
