//! Fixed game rules. These are static on purpose: damage, window length and
//! curl thresholds must match across every build.

use serde::{Deserialize, Serialize};

/// Discrete classification of a hand pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GestureType {
    None,
    Palm,
    Fist,
    Tear,
}

impl Default for GestureType {
    fn default() -> Self {
        Self::None
    }
}

pub const PALM_DAMAGE: u32 = 10;
pub const FIST_DAMAGE: u32 = 15;
pub const TEAR_DAMAGE: u32 = 25;

/// Inclusive lower / exclusive upper bound of the damage multiplier.
pub const DAMAGE_MULTIPLIER_MIN: f64 = 0.8;
pub const DAMAGE_MULTIPLIER_MAX: f64 = 1.5;

pub const ACTION_WINDOW_MS: u64 = 450;
/// Delay between the knockout and the finish signal (finishing animation).
pub const FINISH_DELAY_MS: u64 = 1200;

pub const FIST_MIN_CURLED: usize = 3;
pub const PALM_MAX_CURLED: usize = 1;

/// Scores strictly above this land in the top rank.
pub const RANK_THRESHOLD: u32 = 500;

/// Paper particles spawned per hit.
pub const PAPER_BURST: usize = 15;

/// Sound cues. Playback is owned by whoever consumes feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sfx {
    Punch,
    Slap,
    Tear,
    Hit,
    Victory,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpec {
    pub action: &'static str,
    pub base_damage: u32,
    pub label: &'static str,
    pub sound: Option<Sfx>,
}

impl GestureType {
    pub fn action(self) -> ActionSpec {
        match self {
            GestureType::Fist => ActionSpec {
                action: "PUNCH",
                base_damage: FIST_DAMAGE,
                label: "PUNCH!",
                sound: Some(Sfx::Punch),
            },
            GestureType::Palm => ActionSpec {
                action: "SLAP",
                base_damage: PALM_DAMAGE,
                label: "SLAP!",
                sound: Some(Sfx::Slap),
            },
            GestureType::Tear => ActionSpec {
                action: "RIP",
                base_damage: TEAR_DAMAGE,
                label: "RIP!",
                sound: Some(Sfx::Tear),
            },
            GestureType::None => ActionSpec {
                action: "IDLE",
                base_damage: 0,
                label: "",
                sound: None,
            },
        }
    }

    pub fn base_damage(self) -> u32 {
        self.action().base_damage
    }

    pub fn is_attack(self) -> bool {
        self != GestureType::None
    }
}

/// Source of the damage multiplier. Tests pin it; the game rolls it.
pub trait DamageRoller: Send {
    fn multiplier(&mut self) -> f64;
}

pub struct RandomRoller {
    rng: rand::rngs::StdRng,
}

impl RandomRoller {
    pub fn new() -> Self {
        use rand::SeedableRng;
        Self { rng: rand::rngs::StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        use rand::SeedableRng;
        Self { rng: rand::rngs::StdRng::seed_from_u64(seed) }
    }
}

impl Default for RandomRoller {
    fn default() -> Self {
        Self::new()
    }
}

impl DamageRoller for RandomRoller {
    fn multiplier(&mut self) -> f64 {
        use rand::Rng;
        self.rng.gen_range(DAMAGE_MULTIPLIER_MIN..DAMAGE_MULTIPLIER_MAX)
    }
}

/// Always returns the same multiplier.
#[derive(Debug, Clone, Copy)]
pub struct FixedRoller(pub f64);

impl DamageRoller for FixedRoller {
    fn multiplier(&mut self) -> f64 {
        self.0
    }
}

/// `round(base * multiplier)`. Multipliers outside the rule range are clamped.
pub fn roll_damage(gesture: GestureType, roller: &mut dyn DamageRoller) -> u32 {
    let m = roller.multiplier().clamp(DAMAGE_MULTIPLIER_MIN, DAMAGE_MULTIPLIER_MAX);
    (gesture.base_damage() as f64 * m).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankTier {
    OfficeWarlord,
    SalaryThief,
}

impl RankTier {
    pub fn for_score(score: u32) -> Self {
        if score > RANK_THRESHOLD {
            RankTier::OfficeWarlord
        } else {
            RankTier::SalaryThief
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            RankTier::OfficeWarlord => "Office Warlord",
            RankTier::SalaryThief => "Salary Thief",
        }
    }
}
