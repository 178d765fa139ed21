//! API module
//!
//! HTTP endpoints, middleware and shared router state.

pub mod middleware;
pub mod routes;

pub use routes::create_router;

use std::sync::Arc;

use crate::domain::{BadgeIdSource, RandomBadgeIds};
use crate::store::Stores;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub badges: Arc<dyn BadgeIdSource>,
}

impl AppState {
    pub fn new(stores: Stores, badges: Arc<dyn BadgeIdSource>) -> Self {
        Self { stores, badges }
    }

    /// State with an entropy-seeded badge generator
    pub fn with_default_badges(stores: Stores) -> Self {
        Self::new(stores, Arc::new(RandomBadgeIds::from_entropy()))
    }
}
