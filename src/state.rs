use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Database;
use crate::views::render::{JsonRenderer, Renderer};

/// Shared by every request; cloning is cheap
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub renderer: Arc<dyn Renderer>,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Self {
        Self {
            config: Arc::new(config),
            db,
            renderer: Arc::new(JsonRenderer),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }
}
