//! Shared Application State

use crate::config::Config;
use examsense_core::analyzer::Analyzer;
use std::sync::Arc;

/// Created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub config: Arc<Config>,
}
