pub mod config;
pub mod game;
pub mod kernel;
pub mod services;
pub mod session;
pub mod vision;

// Re-export specific items for convenient access
pub use config::SessionConfig;
pub use game::{Character, GameController};
pub use kernel::gesture::{classify, GestureSample, GestureType, HandLandmarkSet, Landmark};
pub use kernel::reactor::CombatReactor;
pub use session::{CombatSession, SessionOutcome, SessionReport};
