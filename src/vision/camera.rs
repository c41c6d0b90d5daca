use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera device available")]
    NoDevice,
    #[error("camera backend error: {0}")]
    Backend(String),
}

/// One captured frame. `timestamp_ms` is the capture time and only moves
/// forward while the stream is healthy.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: Arc<image::RgbImage>,
    pub timestamp_ms: u64,
}

/// Live video source. Frames are polled, not pushed.
pub trait CameraSource: Send {
    fn start(&mut self) -> Result<(), CameraError>;
    fn stop(&mut self);
    /// Latest frame, or None while the stream is not ready yet.
    fn current_frame(&mut self) -> Option<VideoFrame>;
}

/// Exclusive ownership of a started camera. Dropping the lease stops the
/// stream, whatever the teardown path.
pub struct CameraLease<C: CameraSource> {
    camera: C,
    running: bool,
}

impl<C: CameraSource> CameraLease<C> {
    pub fn acquire(mut camera: C) -> Result<Self, CameraError> {
        camera.start()?;
        info!("Camera stream started");
        Ok(Self { camera, running: true })
    }

    pub fn current_frame(&mut self) -> Option<VideoFrame> {
        if !self.running {
            return None;
        }
        self.camera.current_frame()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Idempotent.
    pub fn release(&mut self) {
        if self.running {
            self.camera.stop();
            self.running = false;
            info!("Camera stream released");
        }
    }
}

impl<C: CameraSource> Drop for CameraLease<C> {
    fn drop(&mut self) {
        if self.running {
            debug!("Camera lease dropped while running; stopping stream");
        }
        self.release();
    }
}
