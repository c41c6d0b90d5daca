use serde::{Deserialize, Serialize};

/// Top-level game phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen.
    Start,
    /// Roster browsing, custom targets, portrait swaps.
    CharacterSelect,
    /// A combat session owns the camera.
    Playing,
    /// Final score frozen, rank shown.
    Result,
}

impl Default for GamePhase {
    fn default() -> Self {
        Self::Start
    }
}

/// Commands that request a phase transition.
/// These are REQUESTS, not forces. The graph validates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseRequest {
    Begin,
    Back,
    Play,
    Finish { score: u32 },
    Restart,
}

pub struct PhaseGraph;

impl PhaseGraph {
    /// Pure function: (Current Phase, Request) -> New Phase
    /// Returns None if the edge does not exist. Guards that need context
    /// (a selected character for `Play`) are checked by the controller.
    pub fn transition(current: GamePhase, request: PhaseRequest) -> Option<GamePhase> {
        use GamePhase::*;
        use PhaseRequest::*;

        match (current, request) {
            (Start, Begin) => Some(CharacterSelect),
            (CharacterSelect, Back) => Some(Start),
            (CharacterSelect, Play) => Some(Playing),
            (Playing, Finish { .. }) => Some(Result),
            (Result, Restart) => Some(Start),
            // No skips, no other backward edges
            _ => None,
        }
    }
}
