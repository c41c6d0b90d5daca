pub mod controller;
pub mod roster;

pub use controller::{FinalResult, GameController, PhaseChange, PhaseError};
pub use roster::{builtin_roster, Character, Gender};
