//! Scripted camera and landmark provider. Used by the headless demo and the
//! integration tests; no device or model required.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::camera::{CameraError, CameraSource, VideoFrame};
use super::landmarks::{LandmarkProvider, ProviderError, ProviderFactory};
use crate::kernel::gesture::{HandLandmarkSet, Landmark, CURL_PAIRS, LANDMARK_COUNT};

/// Build a 21-point hand with the given fingers (index, middle, ring, pinky)
/// curled.
pub fn synthetic_hand(curled: [bool; 4]) -> HandLandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.9); LANDMARK_COUNT];
    for (i, (tip, pip)) in CURL_PAIRS.iter().enumerate() {
        let x = 0.35 + 0.1 * i as f32;
        points[*pip] = Landmark::new(x, 0.6);
        points[*tip] = if curled[i] {
            Landmark::new(x, 0.75)
        } else {
            Landmark::new(x, 0.35)
        };
    }
    HandLandmarkSet::new(points)
}

pub fn open_palm() -> HandLandmarkSet {
    synthetic_hand([false; 4])
}

pub fn fist() -> HandLandmarkSet {
    synthetic_hand([true; 4])
}

#[derive(Debug, Default)]
struct CameraState {
    started: bool,
    stop_calls: u32,
    timestamps: VecDeque<u64>,
    last: Option<u64>,
}

/// Observes a `ScriptedCamera` after it has been moved into a session.
#[derive(Debug, Clone)]
pub struct CameraProbe(Arc<Mutex<CameraState>>);

impl CameraProbe {
    pub fn is_started(&self) -> bool {
        self.0.lock().map(|s| s.started).unwrap_or(false)
    }

    pub fn stop_calls(&self) -> u32 {
        self.0.lock().map(|s| s.stop_calls).unwrap_or(0)
    }

    /// Queue more capture timestamps.
    pub fn feed(&self, timestamps: impl IntoIterator<Item = u64>) {
        if let Ok(mut s) = self.0.lock() {
            s.timestamps.extend(timestamps);
        }
    }
}

/// Hands out one queued timestamp per poll. When the queue runs dry the last
/// frame is repeated, like a camera that stopped advancing.
pub struct ScriptedCamera {
    state: Arc<Mutex<CameraState>>,
    deny: Option<CameraError>,
    image: Arc<image::RgbImage>,
}

impl ScriptedCamera {
    pub fn new(timestamps: impl IntoIterator<Item = u64>) -> (Self, CameraProbe) {
        let state = Arc::new(Mutex::new(CameraState {
            timestamps: timestamps.into_iter().collect(),
            ..CameraState::default()
        }));
        let camera = Self {
            state: state.clone(),
            deny: None,
            image: Arc::new(image::RgbImage::new(4, 4)),
        };
        (camera, CameraProbe(state))
    }

    /// `count` frames `step_ms` apart, then the last one repeats.
    pub fn steady(count: usize, step_ms: u64) -> (Self, CameraProbe) {
        Self::new((1..=count as u64).map(move |i| i * step_ms))
    }

    pub fn denied() -> (Self, CameraProbe) {
        let (mut camera, probe) = Self::new(std::iter::empty());
        camera.deny = Some(CameraError::PermissionDenied);
        (camera, probe)
    }
}

impl CameraSource for ScriptedCamera {
    fn start(&mut self) -> Result<(), CameraError> {
        if let Some(e) = &self.deny {
            return Err(e.clone());
        }
        if let Ok(mut s) = self.state.lock() {
            s.started = true;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Ok(mut s) = self.state.lock() {
            s.started = false;
            s.stop_calls += 1;
        }
    }

    fn current_frame(&mut self) -> Option<VideoFrame> {
        let mut s = self.state.lock().ok()?;
        if !s.started {
            return None;
        }
        if let Some(ts) = s.timestamps.pop_front() {
            s.last = Some(ts);
        }
        let timestamp_ms = s.last?;
        Some(VideoFrame {
            image: self.image.clone(),
            timestamp_ms,
        })
    }
}

#[derive(Debug, Default)]
struct ProviderState {
    frames: VecDeque<Result<Vec<HandLandmarkSet>, ProviderError>>,
    detect_calls: Vec<u64>,
    init_calls: u32,
}

/// Observes a `ScriptedFactory` and the providers it built.
#[derive(Debug, Clone)]
pub struct ProviderProbe(Arc<Mutex<ProviderState>>);

impl ProviderProbe {
    /// Timestamps passed to `detect`, in call order.
    pub fn detect_calls(&self) -> Vec<u64> {
        self.0.lock().map(|s| s.detect_calls.clone()).unwrap_or_default()
    }

    pub fn init_calls(&self) -> u32 {
        self.0.lock().map(|s| s.init_calls).unwrap_or(0)
    }

    /// Queue hands for the next detections (one entry per call).
    pub fn push_hands(&self, hands: Vec<HandLandmarkSet>) {
        if let Ok(mut s) = self.0.lock() {
            s.frames.push_back(Ok(hands));
        }
    }

    pub fn push_error(&self, error: ProviderError) {
        if let Ok(mut s) = self.0.lock() {
            s.frames.push_back(Err(error));
        }
    }
}

/// Fails the first `failing_inits` initializations, then builds providers
/// that replay queued detections. An empty queue means "no hands".
pub struct ScriptedFactory {
    state: Arc<Mutex<ProviderState>>,
    failing_inits: u32,
}

impl ScriptedFactory {
    pub fn new() -> (Self, ProviderProbe) {
        Self::failing(0)
    }

    pub fn failing(failing_inits: u32) -> (Self, ProviderProbe) {
        let state = Arc::new(Mutex::new(ProviderState::default()));
        (Self { state: state.clone(), failing_inits }, ProviderProbe(state))
    }
}

impl ProviderFactory for ScriptedFactory {
    type Provider = ScriptedProvider;

    async fn initialize(&mut self) -> Result<ScriptedProvider, ProviderError> {
        let calls = {
            let mut s = self.state.lock().map_err(|_| ProviderError::NotReady)?;
            s.init_calls += 1;
            s.init_calls
        };
        if calls <= self.failing_inits {
            return Err(ProviderError::InitFailed(format!("scripted failure {}", calls)));
        }
        Ok(ScriptedProvider { state: self.state.clone() })
    }
}

pub struct ScriptedProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl LandmarkProvider for ScriptedProvider {
    async fn detect(
        &mut self,
        _frame: &VideoFrame,
        timestamp_ms: u64,
    ) -> Result<Vec<HandLandmarkSet>, ProviderError> {
        let mut s = self.state.lock().map_err(|_| ProviderError::Lost("poisoned".to_string()))?;
        s.detect_calls.push(timestamp_ms);
        s.frames.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}
