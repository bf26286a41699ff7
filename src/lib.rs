//! ProWashCare quote service.
//!
//! Prices cleaning services, keeps a per-session quote cart and exports
//! finished quotes as spreadsheet and PDF.

pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use crate::cache::AppCache;
use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub cache: AppCache,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            cache: AppCache::new(config.max_sessions, config.session_idle),
            config: Arc::new(config),
        }
    }
}
