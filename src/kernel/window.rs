use super::rules::ACTION_WINDOW_MS;

/// Debounce interval during which further gesture triggers are suppressed.
///
/// INVARIANT: at most one window is open. `open` refuses while active, so the
/// only way to get a second hit in is to wait for expiry or `close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionWindow {
    pub active: bool,
    pub started_at_ms: u64,
    pub duration_ms: u64,
}

impl Default for ActionWindow {
    fn default() -> Self {
        Self::new(ACTION_WINDOW_MS)
    }
}

impl ActionWindow {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            active: false,
            started_at_ms: 0,
            duration_ms,
        }
    }

    /// Returns false (and leaves the window untouched) if already open.
    pub fn open(&mut self, now_ms: u64) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        self.started_at_ms = now_ms;
        true
    }

    pub fn close(&mut self) {
        self.active = false;
    }

    pub fn closes_at_ms(&self) -> u64 {
        self.started_at_ms.saturating_add(self.duration_ms)
    }

    /// Close the window if its timer ran out. Returns true on the tick that
    /// closed it.
    pub fn expire(&mut self, now_ms: u64) -> bool {
        if self.active && now_ms >= self.closes_at_ms() {
            self.active = false;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
