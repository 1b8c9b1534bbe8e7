use std::sync::Arc;

use vrptw_core::adapter::RoutingEngine;

use crate::session::SessionStore;

pub struct AppState {
    pub sessions: SessionStore,
    pub engine: Arc<dyn RoutingEngine>,
}
