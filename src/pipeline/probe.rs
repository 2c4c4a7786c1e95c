use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use thiserror::Error;

use crate::store::Dimensions;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Unreadable image: {0}")]
    Unreadable(String),
}

/// Derives width and height for an uploaded image.
/// Resolves before the image is committed to the store.
#[async_trait]
pub trait DimensionProbe: Send + Sync {
    async fn probe(&self, data: &Bytes) -> Result<Dimensions, ProbeError>;
}

pub const SIMULATED_WIDTH: std::ops::RangeInclusive<u32> = 400..=1199;
pub const SIMULATED_HEIGHT: std::ops::RangeInclusive<u32> = 300..=899;

/// Stand-in for real image introspection: waits a fixed delay, then
/// reports random dimensions in [`SIMULATED_WIDTH`] x [`SIMULATED_HEIGHT`].
pub struct SimulatedProbe {
    delay: Duration,
}

impl SimulatedProbe {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl DimensionProbe for SimulatedProbe {
    async fn probe(&self, _data: &Bytes) -> Result<Dimensions, ProbeError> {
        tokio::time::sleep(self.delay).await;

        let mut rng = rand::thread_rng();
        Ok(Dimensions {
            width: rng.gen_range(SIMULATED_WIDTH),
            height: rng.gen_range(SIMULATED_HEIGHT),
        })
    }
}
