use std::collections::HashMap;

use tracing::{debug, info, warn};

use super::combat::{CombatDelta, CombatState, CombatTransition};
use super::event::{Event, HitId, HitTicket, SessionId};
use super::rules::{DamageRoller, GestureType, Sfx, FINISH_DELAY_MS};
use super::scheduler::{Feedback, HitScheduler, PendingHit, SideEffect};
use super::telemetry::event::TelemetryEvent;
use super::telemetry::recorder::TelemetryRecorder;
use super::window::ActionWindow;
use crate::game::roster::Character;
use crate::services::reaction::ReactionOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinishState {
    Idle,
    Scheduled { due_at_ms: u64, score: u32 },
    Emitted,
}

/// Combat core for one fight. Owns health/combo, the action window and the
/// hits waiting on a reaction.
pub struct CombatReactor {
    pub session: SessionId,
    character: Character,
    pub combat: CombatState,
    pub window: ActionWindow,
    pub scheduler: HitScheduler,
    pub telemetry: TelemetryRecorder,
    roller: Box<dyn DamageRoller>,
    pending: HashMap<HitId, PendingHit>,
    next_hit: u64,
    finish: FinishState,
}

impl CombatReactor {
    pub fn new(character: Character, roller: Box<dyn DamageRoller>) -> Self {
        let combat = CombatState::new(character.max_health);
        Self {
            session: SessionId::new(),
            character,
            combat,
            window: ActionWindow::default(),
            scheduler: HitScheduler,
            telemetry: TelemetryRecorder::new(),
            roller,
            pending: HashMap::new(),
            next_hit: 0,
            finish: FinishState::Idle,
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn window_active(&self) -> bool {
        self.window.is_active()
    }

    /// True while an open window still has time left at `now_ms`.
    pub fn window_blocks(&self, now_ms: u64) -> bool {
        self.window.is_active() && now_ms < self.window.closes_at_ms()
    }

    pub fn pending_hits(&self) -> usize {
        self.pending.len()
    }

    /// Start a fresh fight. Anything still in flight belongs to the old
    /// session id and will be discarded when it lands. Returns the feedback
    /// that settles whatever the old fight left on screen.
    pub fn reset(&mut self, character: Character) -> Vec<SideEffect> {
        info!("Combat reset: {} ({} hp)", character.display_name, character.max_health);
        let mut effects = Vec::new();
        if self.window.is_active() {
            effects.push(SideEffect::Feedback(Feedback::EffectsCleared));
        }
        if !self.pending.is_empty() {
            effects.push(SideEffect::Feedback(Feedback::Processing(false)));
        }

        self.session = SessionId::new();
        self.combat.reduce(CombatDelta::Reset { max_health: character.max_health });
        self.character = character;
        self.window.close();
        self.pending.clear();
        self.finish = FinishState::Idle;
        effects
    }

    /// Pure tick step. Advances combat to `now_ms` and returns the side
    /// effects for the driver to run.
    /// MUST NOT await I/O or timers.
    pub fn tick_step(&mut self, now_ms: u64, events: Vec<Event>) -> Vec<SideEffect> {
        let mut effects = Vec::new();

        // === 1. TIMERS ===
        if self.window.expire(now_ms) {
            effects.push(SideEffect::Feedback(Feedback::EffectsCleared));
        }

        let mut gestures = Vec::new();
        let mut resolutions = Vec::new();
        for event in events {
            match event {
                Event::Gesture(sample) => gestures.push(sample),
                Event::ReactionResolved { ticket, outcome } => {
                    resolutions.push((ticket, Ok(outcome)))
                }
                Event::ReactionFailed { ticket, reason } => resolutions.push((ticket, Err(reason))),
            }
        }

        // === 2. RESOLVE ===
        for (ticket, result) in resolutions {
            effects.extend(self.resolve(ticket, result, now_ms));
        }

        // === 3. TRIGGER ===
        for sample in gestures {
            effects.extend(self.trigger(sample.gesture, now_ms));
        }

        // === 4. FINISH ===
        if let FinishState::Scheduled { due_at_ms, score } = self.finish {
            if now_ms >= due_at_ms {
                self.finish = FinishState::Emitted;
                effects.push(SideEffect::Finish { score });
            }
        }

        effects
    }

    /// Turn one gesture into a hit, unless a window is already open.
    ///
    /// The window is opened before the reaction request is even built, so
    /// nothing that happens while the request is in flight can trigger again.
    pub fn trigger(&mut self, gesture: GestureType, now_ms: u64) -> Vec<SideEffect> {
        if !gesture.is_attack() || self.combat.is_defeated() {
            return Vec::new();
        }
        if !self.window.open(now_ms) {
            self.telemetry.record(TelemetryEvent::HitSuppressed { gesture });
            return Vec::new();
        }

        let hit = HitId(self.next_hit);
        self.next_hit += 1;
        let ticket = HitTicket {
            session: self.session,
            hit,
            issued_at_ms: now_ms,
        };

        let (pending, effects) = self.scheduler.schedule(
            gesture,
            ticket,
            &self.character,
            &self.combat,
            self.roller.as_mut(),
        );
        debug!("Hit {:?}: {:?} rolled {} damage", hit, gesture, pending.damage);
        self.telemetry.record(TelemetryEvent::HitTriggered {
            hit,
            gesture,
            damage: pending.damage,
        });
        self.pending.insert(hit, pending);

        effects
    }

    fn resolve(
        &mut self,
        ticket: HitTicket,
        result: Result<ReactionOutcome, String>,
        now_ms: u64,
    ) -> Vec<SideEffect> {
        let hit = ticket.hit;

        // STALE REJECTION: results from another session never touch this one.
        if ticket.session != self.session {
            debug!("Discarded reaction from stale session {:?}", ticket.session);
            self.telemetry.record(TelemetryEvent::ReactionDiscarded { hit });
            return Vec::new();
        }
        let Some(pending) = self.pending.remove(&hit) else {
            self.telemetry.record(TelemetryEvent::ReactionDiscarded { hit });
            return Vec::new();
        };

        let latency_ms = now_ms.saturating_sub(ticket.issued_at_ms);
        let mut effects = Vec::new();
        if self.pending.is_empty() {
            effects.push(SideEffect::Feedback(Feedback::Processing(false)));
        }

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(reason) => {
                // No-op hit: the window still closes on its own timer.
                warn!("Reaction for hit {:?} failed: {}", hit, reason);
                self.telemetry.record(TelemetryEvent::ReactionFailed { hit, latency_ms });
                return effects;
            }
        };

        if self.combat.is_defeated() {
            self.telemetry.record(TelemetryEvent::ReactionDiscarded { hit });
            return effects;
        }

        self.telemetry.record(TelemetryEvent::ReactionApplied {
            hit,
            effect: outcome.effect,
            latency_ms,
        });
        let dodged = outcome.is_dodge();
        effects.push(SideEffect::Feedback(Feedback::Dialogue(outcome.dialogue)));
        effects.push(SideEffect::Feedback(Feedback::Effect(outcome.effect)));

        let transition = if dodged {
            self.combat.reduce(CombatDelta::Dodged)
        } else {
            effects.push(SideEffect::Feedback(Feedback::Sound(Sfx::Hit)));
            self.combat.reduce(CombatDelta::HitLanded { damage: pending.damage, at_ms: now_ms })
        };

        effects.push(SideEffect::Feedback(Feedback::Vitals {
            health: self.combat.health(),
            max_health: self.combat.max_health(),
            combo: self.combat.combo(),
            cumulative_damage: self.combat.cumulative_damage(),
        }));

        if let Some(CombatTransition::Defeated { score }) = transition {
            info!("{} defeated. Score: {}", self.character.display_name, score);
            self.telemetry.record(TelemetryEvent::Defeated { score });
            effects.push(SideEffect::Feedback(Feedback::Sound(Sfx::Victory)));
            self.finish = FinishState::Scheduled {
                due_at_ms: now_ms + FINISH_DELAY_MS,
                score,
            };
        }

        effects
    }
}
