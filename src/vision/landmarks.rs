//! Landmark Provider capability and the lazily initialized detector slot.
//!
//! The hand model itself is opaque. All the core relies on is: it may need a
//! one-time async initialization that can fail, and each detection call can
//! fail on its own.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::camera::VideoFrame;
use crate::kernel::gesture::HandLandmarkSet;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("landmark provider not ready")]
    NotReady,
    #[error("landmark provider initialization failed: {0}")]
    InitFailed(String),
    #[error("detection failed: {0}")]
    DetectFailed(String),
    /// The instance is unusable and must be rebuilt.
    #[error("landmark provider lost: {0}")]
    Lost(String),
}

pub trait LandmarkProvider: Send {
    /// 0-2 hand sets for the frame. `timestamp_ms` must increase call to call.
    fn detect(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: u64,
    ) -> impl Future<Output = Result<Vec<HandLandmarkSet>, ProviderError>> + Send;
}

pub trait ProviderFactory: Send {
    type Provider: LandmarkProvider;

    fn initialize(&mut self) -> impl Future<Output = Result<Self::Provider, ProviderError>> + Send;
}

/// Detector slot shared by every session of the process. Sessions borrow it
/// one at a time; the model inside is initialized once and survives them.
pub type SharedDetector<F> = Arc<Mutex<DetectorSlot<F>>>;

/// Single owned detector instance, built on first use and rebuilt after it
/// reports itself lost.
pub struct DetectorSlot<F: ProviderFactory> {
    factory: F,
    provider: Option<F::Provider>,
    init_failures: u32,
}

impl<F: ProviderFactory> DetectorSlot<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            provider: None,
            init_failures: 0,
        }
    }

    /// Wrap a fresh slot for sharing across sessions.
    pub fn shared(factory: F) -> SharedDetector<F> {
        Arc::new(Mutex::new(Self::new(factory)))
    }

    pub fn is_ready(&self) -> bool {
        self.provider.is_some()
    }

    pub fn init_failures(&self) -> u32 {
        self.init_failures
    }

    /// Initialize if needed. A failure leaves the slot empty so the next
    /// call tries again.
    pub async fn ensure(&mut self) -> Result<&mut F::Provider, ProviderError> {
        if self.provider.is_none() {
            match self.factory.initialize().await {
                Ok(provider) => {
                    info!("Landmark provider ready after {} failed attempt(s)", self.init_failures);
                    self.provider = Some(provider);
                }
                Err(e) => {
                    self.init_failures += 1;
                    if self.init_failures == 1 {
                        warn!("Landmark provider init failed: {}", e);
                    } else {
                        debug!(
                            "Landmark provider init failed again ({}): {}",
                            self.init_failures, e
                        );
                    }
                    return Err(e);
                }
            }
        }
        self.provider.as_mut().ok_or(ProviderError::NotReady)
    }

    pub async fn detect(
        &mut self,
        frame: &VideoFrame,
        timestamp_ms: u64,
    ) -> Result<Vec<HandLandmarkSet>, ProviderError> {
        let provider = self.ensure().await?;
        let result = provider.detect(frame, timestamp_ms).await;

        if let Err(ProviderError::Lost(reason)) = &result {
            warn!("Landmark provider lost ({}); will re-initialize", reason);
            self.provider = None;
        }
        result
    }
}
