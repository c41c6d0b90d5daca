use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatPhase {
    /// health > 0
    Active,
    /// health == 0. Terminal for the session.
    Defeated { at_ms: u64 },
}

/// Strict combat delta. This is the ONLY way combat state mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatDelta {
    HitLanded { damage: u32, at_ms: u64 },
    Dodged,
    Reset { max_health: u32 },
}

/// What a reduction changed at the phase level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatTransition {
    Defeated { score: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatState {
    health: u32,
    max_health: u32,
    combo: u32,
    cumulative_damage: u32,
    phase: CombatPhase,
    /// Bumped on every accepted delta.
    pub version: u64,
}

impl CombatState {
    pub fn new(max_health: u32) -> Self {
        let max_health = max_health.max(1);
        Self {
            health: max_health,
            max_health,
            combo: 0,
            cumulative_damage: 0,
            phase: CombatPhase::Active,
            version: 0,
        }
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn cumulative_damage(&self) -> u32 {
        self.cumulative_damage
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn is_defeated(&self) -> bool {
        matches!(self.phase, CombatPhase::Defeated { .. })
    }

    /// Remaining health as a rounded 0-100 percentage.
    pub fn health_percent(&self) -> u8 {
        ((self.health as f64 / self.max_health as f64) * 100.0).round() as u8
    }

    /// Apply a delta. Hits and dodges after defeat are dropped.
    pub fn reduce(&mut self, delta: CombatDelta) -> Option<CombatTransition> {
        match delta {
            CombatDelta::Reset { max_health } => {
                *self = CombatState::new(max_health);
                None
            }
            _ if self.is_defeated() => None,
            CombatDelta::Dodged => {
                self.combo = 0;
                self.version += 1;
                None
            }
            CombatDelta::HitLanded { damage, at_ms } => {
                self.health = self.health.saturating_sub(damage);
                self.cumulative_damage = self.cumulative_damage.saturating_add(damage);
                self.combo += 1;
                self.version += 1;

                if self.health == 0 {
                    self.phase = CombatPhase::Defeated { at_ms };
                    return Some(CombatTransition::Defeated { score: self.cumulative_damage });
                }
                None
            }
        }
    }
}
