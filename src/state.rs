//! Shared application state for all routes.

use crate::config::ServiceConfig;
use crate::store::AccountStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub config: ServiceConfig,
}
