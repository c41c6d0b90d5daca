use thiserror::Error;
use tracing::info;

use super::roster::{builtin_roster, Character, Gender};
use crate::kernel::phase::{GamePhase, PhaseGraph, PhaseRequest};
use crate::kernel::rules::{RankTier, Sfx};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseError {
    #[error("no transition from {from:?} on {request:?}")]
    InvalidTransition { from: GamePhase, request: PhaseRequest },
    #[error("a character must be selected before playing")]
    NoCharacterSelected,
    #[error("unknown character {0}")]
    UnknownCharacter(String),
    #[error("roster can only be changed during character select (now {0:?})")]
    RosterLocked(GamePhase),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalResult {
    pub score: u32,
    pub rank: RankTier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: GamePhase,
    pub to: GamePhase,
    /// Sound to play on entry, if any.
    pub cue: Option<Sfx>,
}

/// Sequences Start -> Select -> Playing -> Result and owns the roster and
/// the selection.
pub struct GameController {
    phase: GamePhase,
    roster: Vec<Character>,
    selected: Option<Character>,
    result: Option<FinalResult>,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new(builtin_roster())
    }
}

impl GameController {
    pub fn new(roster: Vec<Character>) -> Self {
        Self {
            phase: GamePhase::Start,
            roster,
            selected: None,
            result: None,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn roster(&self) -> &[Character] {
        &self.roster
    }

    pub fn selected(&self) -> Option<&Character> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<FinalResult> {
        self.result
    }

    pub fn request(&mut self, request: PhaseRequest) -> Result<PhaseChange, PhaseError> {
        let from = self.phase;
        let to = PhaseGraph::transition(from, request)
            .ok_or(PhaseError::InvalidTransition { from, request })?;

        if request == PhaseRequest::Play && self.selected.is_none() {
            return Err(PhaseError::NoCharacterSelected);
        }

        let mut cue = None;
        match (to, request) {
            (GamePhase::Result, PhaseRequest::Finish { score }) => {
                let rank = RankTier::for_score(score);
                self.result = Some(FinalResult { score, rank });
                cue = Some(Sfx::Finish);
            }
            (GamePhase::Start, _) => {
                self.selected = None;
                self.result = None;
            }
            _ => {}
        }

        info!("Phase {:?} -> {:?}", from, to);
        self.phase = to;
        Ok(PhaseChange { from, to, cue })
    }

    pub fn select(&mut self, id: &str) -> Result<&Character, PhaseError> {
        self.ensure_selecting()?;
        let character = self.roster.iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| PhaseError::UnknownCharacter(id.to_string()))?;
        let selected = self.selected.insert(character);
        Ok(&*selected)
    }

    /// Select and start in one step.
    pub fn select_and_play(&mut self, id: &str) -> Result<PhaseChange, PhaseError> {
        self.select(id)?;
        self.request(PhaseRequest::Play)
    }

    pub fn add_custom(
        &mut self,
        name: &str,
        gender: Gender,
        portrait: &str,
    ) -> Result<&Character, PhaseError> {
        self.ensure_selecting()?;
        self.roster.push(Character::custom(name, gender, portrait));
        let added = self.roster.len() - 1;
        Ok(&self.roster[added])
    }

    /// Swap a portrait (e.g. after a face paste). A stale selection of the
    /// same character is refreshed too.
    pub fn replace_portrait(&mut self, id: &str, portrait: &str) -> Result<(), PhaseError> {
        self.ensure_selecting()?;
        let character = self.roster.iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| PhaseError::UnknownCharacter(id.to_string()))?;
        character.portrait = portrait.to_string();

        if let Some(selected) = self.selected.as_mut().filter(|s| s.id == id) {
            selected.portrait = portrait.to_string();
        }
        Ok(())
    }

    fn ensure_selecting(&self) -> Result<(), PhaseError> {
        if self.phase != GamePhase::CharacterSelect {
            return Err(PhaseError::RosterLocked(self.phase));
        }
        Ok(())
    }
}
