//! Hand landmark geometry and the per-frame gesture classifier.
//!
//! The classifier is a pure function over whatever the landmark provider
//! returned for one frame. It never fails: anything it cannot read is
//! classified as `GestureType::None`.

use serde::{Deserialize, Serialize};

pub use super::rules::GestureType;
use super::rules::{FIST_MIN_CURLED, PALM_MAX_CURLED};

// 21-point hand skeleton indices
pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

pub const LANDMARK_COUNT: usize = 21;

/// (tip, pip) for the four non-thumb fingers.
pub const CURL_PAIRS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance. Depth from the model is too noisy to use here.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One detected hand. Providers should hand over all 21 points but a short
/// set is carried as-is and simply fails classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarkSet {
    points: Vec<Landmark>,
}

impl HandLandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn point(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() >= LANDMARK_COUNT
    }

    /// Curl state of each non-thumb finger, index first.
    /// `None` if any point needed is missing or not finite.
    pub fn curled_fingers(&self) -> Option<[bool; 4]> {
        let wrist = self.point(WRIST).filter(|p| p.is_finite())?;
        let mut curled = [false; 4];
        for (slot, (tip, pip)) in curled.iter_mut().zip(CURL_PAIRS) {
            let tip = self.point(tip).filter(|p| p.is_finite())?;
            let pip = self.point(pip).filter(|p| p.is_finite())?;
            *slot = tip.planar_distance(wrist) < pip.planar_distance(wrist);
        }
        Some(curled)
    }
}

/// One classifier output for one processed frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GestureSample {
    pub gesture: GestureType,
    pub timestamp_ms: u64,
}

/// Classify the hands seen in a single frame.
///
/// Two hands is the special move regardless of their shape. One hand is
/// split by how many fingers are curled, with two curled fingers left
/// unclassified so a half-closed hand never fires.
pub fn classify(hands: &[HandLandmarkSet]) -> GestureType {
    match hands {
        [_, _] => GestureType::Tear,
        [hand] => classify_single(hand),
        _ => GestureType::None,
    }
}

fn classify_single(hand: &HandLandmarkSet) -> GestureType {
    let Some(curled) = hand.curled_fingers() else {
        return GestureType::None;
    };
    let count = curled.iter().filter(|c| **c).count();

    if count >= FIST_MIN_CURLED {
        GestureType::Fist
    } else if count <= PALM_MAX_CURLED {
        GestureType::Palm
    } else {
        GestureType::None
    }
}
