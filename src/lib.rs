//! image-gallery - A minimal in-memory image hosting API
//!
//! This crate provides JPEG/PNG upload, listing, serving and deletion with:
//! - An injectable in-memory record store with monotonically assigned ids
//! - An upload pipeline that validates at ingress and derives dimensions
//!   asynchronously before an image becomes visible
//! - REST API with multipart upload support

pub mod api;
pub mod config;
pub mod pipeline;
pub mod store;
#[cfg(test)]
pub mod testutil;

use std::sync::Arc;
use std::time::Instant;

use config::Config;
use pipeline::{DimensionProbe, UploadPipeline};
use store::ImageStore;

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub store: ImageStore,
    pub pipeline: UploadPipeline,
    pub started_at: Instant,
}

impl AppState {
    /// Build state around a fresh, empty store.
    pub fn new(config: Config, probe: Arc<dyn DimensionProbe>) -> Self {
        let store = ImageStore::new();
        let pipeline = UploadPipeline::new(store.clone(), probe, config.max_upload_size);

        Self {
            config,
            store,
            pipeline,
            started_at: Instant::now(),
        }
    }
}
