use serde::{Deserialize, Serialize};

use crate::kernel::event::HitId;
use crate::kernel::rules::GestureType;
use crate::services::reaction::ReactionEffect;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TelemetryEvent {
    FrameProcessed,
    /// Frame timestamp did not advance.
    FrameSkipped,
    GestureDetected {
        gesture: GestureType,
    },
    HitTriggered {
        hit: HitId,
        gesture: GestureType,
        damage: u32,
    },
    /// Gesture arrived while a window was open.
    HitSuppressed {
        gesture: GestureType,
    },
    ReactionApplied {
        hit: HitId,
        effect: ReactionEffect,
        latency_ms: u64,
    },
    ReactionFailed {
        hit: HitId,
        latency_ms: u64,
    },
    /// Result for an unknown hit, a finished fight or an older session.
    ReactionDiscarded {
        hit: HitId,
    },
    ProviderInitFailed,
    DetectionFailed,
    Defeated {
        score: u32,
    },
}
