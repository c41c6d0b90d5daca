use serde::{Deserialize, Serialize};

/// Display refresh cadence (~60 Hz).
pub const DEFAULT_REFRESH_MS: u64 = 16;

/// Runtime plumbing for a combat session. Game rules are not in here; they
/// live in `kernel::rules` and are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Sampling cadence. Should track the display refresh.
    pub refresh_interval_ms: u64,
    /// Hard limit on a single reaction request.
    pub resolver_timeout_ms: u64,
    /// Capacity of the channel resolver tasks report back on.
    pub event_capacity: usize,
    /// Capacity of the UI/audio feedback channel. Overflow is dropped.
    pub feedback_capacity: usize,
    /// Use the HTTP resolver at this base URL instead of the local quote bank.
    pub remote_resolver_url: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_MS,
            resolver_timeout_ms: 2_000,
            event_capacity: 64,
            feedback_capacity: 256,
            remote_resolver_url: None,
        }
    }
}

impl SessionConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
