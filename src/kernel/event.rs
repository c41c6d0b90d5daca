use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::gesture::GestureSample;
use crate::services::reaction::ReactionOutcome;

/// Identity of one combat session. Results tagged with an older session
/// are stale and get dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HitId(pub u64);

/// Handed out with every reaction request and echoed back with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HitTicket {
    pub session: SessionId,
    pub hit: HitId,
    pub issued_at_ms: u64,
}

#[derive(Debug, Clone)]
pub enum Event {
    /// Classifier output the sampler decided to forward.
    Gesture(GestureSample),
    ReactionResolved { ticket: HitTicket, outcome: ReactionOutcome },
    ReactionFailed { ticket: HitTicket, reason: String },
}
