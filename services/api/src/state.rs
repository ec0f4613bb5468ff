//! Application state shared across handlers

use std::sync::Arc;

use community::CommunityService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub community: Arc<dyn CommunityService>,
}

impl AppState {
    pub fn new(community: Arc<dyn CommunityService>) -> Self {
        Self { community }
    }
}
