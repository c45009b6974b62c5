use std::sync::Arc;

use crate::config::Config;
use crate::pipeline::{Model, ResizeFilter};

/// Process-wide server state, built once before the HTTP server starts.
///
/// `model` is `None` when loading failed at startup (degraded mode).
#[derive(Clone)]
pub struct AppState {
    model: Option<Arc<Model>>,
    pub resize_filter: ResizeFilter,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(model: Option<Model>, config: &Config) -> Self {
        Self {
            model: model.map(Arc::new),
            resize_filter: config.resize_filter,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_deref()
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }
}
