pub mod camera;
pub mod landmarks;
pub mod pipeline;
pub mod simulated;

pub use camera::{CameraError, CameraLease, CameraSource, VideoFrame};
pub use landmarks::{DetectorSlot, LandmarkProvider, ProviderError, ProviderFactory, SharedDetector};
pub use pipeline::{FrameSampler, SampleOutcome};
