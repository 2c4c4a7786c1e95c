//! Shared test helpers for image-gallery unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use crate::config::Config;
use crate::pipeline::{DimensionProbe, ProbeError};
use crate::store::Dimensions;
use crate::AppState;

/// Reports the same dimensions for every image, without delay.
pub struct FixedProbe(pub Dimensions);

impl Default for FixedProbe {
    fn default() -> Self {
        Self(Dimensions {
            width: 640,
            height: 480,
        })
    }
}

#[async_trait]
impl DimensionProbe for FixedProbe {
    async fn probe(&self, _data: &Bytes) -> Result<Dimensions, ProbeError> {
        Ok(self.0)
    }
}

/// Create a test AppState with an empty store and a fixed probe.
pub fn test_state() -> Arc<AppState> {
    let config = Config {
        bind_address: "127.0.0.1:0".to_string(),
        test_mode: true,
        ..Config::default()
    };

    Arc::new(AppState::new(config, Arc::new(FixedProbe::default())))
}
