//! Application state.

use std::sync::Arc;

use pingd_core::Automator;

/// State shared across handlers.
#[derive(Clone)]
pub struct ApiState {
    pub automator: Arc<Automator>,
}

impl ApiState {
    pub fn new(automator: Arc<Automator>) -> Self {
        Self { automator }
    }
}
