use tracing::{debug, warn};

use super::camera::{CameraError, CameraLease, CameraSource};
use super::landmarks::{ProviderError, ProviderFactory, SharedDetector};
use crate::kernel::gesture::{classify, GestureSample};
use crate::kernel::telemetry::event::TelemetryEvent;
use crate::kernel::telemetry::recorder::TelemetryRecorder;

/// What one sampling attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleOutcome {
    /// Stream not ready yet.
    NoFrame,
    /// Frame timestamp did not advance past the last processed one.
    Duplicate,
    /// Detector not initialized (yet). Degrades to "no gesture".
    Unavailable,
    /// Detection call failed for this frame.
    Failed,
    /// Camera could not be acquired. Permanent for this sampler.
    Blind,
    Sampled(GestureSample),
}

/// Pulls frames from the camera, deduplicates them and classifies each
/// distinct frame exactly once. The detector is borrowed, not owned, so it
/// outlives the sampler.
pub struct FrameSampler<C: CameraSource, F: ProviderFactory> {
    camera: Option<CameraLease<C>>,
    camera_error: Option<CameraError>,
    detector: SharedDetector<F>,
    last_timestamp_ms: Option<u64>,
}

impl<C: CameraSource, F: ProviderFactory> FrameSampler<C, F> {
    /// Acquire the camera. A refused camera is not retried; the sampler
    /// stays blind and reports it through `camera_error`.
    pub fn open(camera: C, detector: SharedDetector<F>) -> Self {
        let (camera, camera_error) = match CameraLease::acquire(camera) {
            Ok(lease) => (Some(lease), None),
            Err(e) => {
                warn!("Camera unavailable: {}", e);
                (None, Some(e))
            }
        };
        Self {
            camera,
            camera_error,
            detector,
            last_timestamp_ms: None,
        }
    }

    pub fn camera_error(&self) -> Option<&CameraError> {
        self.camera_error.as_ref()
    }

    /// False while another sampler holds the detector.
    pub fn detector_ready(&self) -> bool {
        self.detector.try_lock().is_ok_and(|slot| slot.is_ready())
    }

    pub fn last_timestamp_ms(&self) -> Option<u64> {
        self.last_timestamp_ms
    }

    pub fn is_streaming(&self) -> bool {
        self.camera.as_ref().is_some_and(|c| c.is_running())
    }

    /// Stop the stream. Safe to call more than once.
    pub fn release(&mut self) {
        if let Some(mut lease) = self.camera.take() {
            lease.release();
        }
    }

    pub async fn sample(&mut self, telemetry: &mut TelemetryRecorder) -> SampleOutcome {
        let Some(lease) = self.camera.as_mut() else {
            return SampleOutcome::Blind;
        };
        let Some(frame) = lease.current_frame() else {
            return SampleOutcome::NoFrame;
        };

        // Frames are handled in capture order; a timestamp that did not move
        // forward is the same (or an older) frame.
        if self.last_timestamp_ms.is_some_and(|last| frame.timestamp_ms <= last) {
            telemetry.record(TelemetryEvent::FrameSkipped);
            return SampleOutcome::Duplicate;
        }
        self.last_timestamp_ms = Some(frame.timestamp_ms);

        let mut detector = self.detector.lock().await;
        match detector.detect(&frame, frame.timestamp_ms).await {
            Ok(hands) => {
                let gesture = classify(&hands);
                telemetry.record(TelemetryEvent::FrameProcessed);
                if gesture.is_attack() {
                    debug!("Frame {}: {:?} ({} hand(s))", frame.timestamp_ms, gesture, hands.len());
                    telemetry.record(TelemetryEvent::GestureDetected { gesture });
                }
                SampleOutcome::Sampled(GestureSample {
                    gesture,
                    timestamp_ms: frame.timestamp_ms,
                })
            }
            Err(ProviderError::InitFailed(_)) => {
                telemetry.record(TelemetryEvent::ProviderInitFailed);
                SampleOutcome::Unavailable
            }
            Err(ProviderError::NotReady) => SampleOutcome::Unavailable,
            Err(e) => {
                debug!("Detection failed on frame {}: {}", frame.timestamp_ms, e);
                telemetry.record(TelemetryEvent::DetectionFailed);
                SampleOutcome::Failed
            }
        }
    }
}
