use super::combat::CombatState;
use super::event::HitTicket;
use super::rules::{roll_damage, DamageRoller, GestureType, Sfx, PAPER_BURST};
use crate::game::roster::Character;
use crate::services::reaction::{ReactionEffect, ReactionRequest};

/// Signals for the UI/audio layer. Fire and forget.
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    ActionShown { gesture: GestureType, label: &'static str },
    ScreenShake,
    PaperBurst { count: usize },
    Sound(Sfx),
    /// A reaction is being resolved ("thinking" indicator).
    Processing(bool),
    Dialogue(String),
    Effect(ReactionEffect),
    Vitals { health: u32, max_health: u32, combo: u32, cumulative_damage: u32 },
    /// Action label, shake and effect tag go away when the window closes.
    EffectsCleared,
    CameraUnavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SideEffect {
    Feedback(Feedback),
    RequestReaction { ticket: HitTicket, request: ReactionRequest },
    Finish { score: u32 },
}

/// A hit that has been triggered but not yet resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingHit {
    pub ticket: HitTicket,
    pub gesture: GestureType,
    pub damage: u32,
}

pub struct HitScheduler;

impl HitScheduler {
    /// Pure projection: gesture + context -> pending hit and the effects to
    /// run right away. Damage is rolled here, before the reaction is known.
    pub fn schedule(
        &self,
        gesture: GestureType,
        ticket: HitTicket,
        character: &Character,
        combat: &CombatState,
        roller: &mut dyn DamageRoller,
    ) -> (PendingHit, Vec<SideEffect>) {
        let spec = gesture.action();
        let damage = roll_damage(gesture, roller);

        let mut effects = vec![
            SideEffect::Feedback(Feedback::ActionShown { gesture, label: spec.label }),
            SideEffect::Feedback(Feedback::ScreenShake),
            SideEffect::Feedback(Feedback::PaperBurst { count: PAPER_BURST }),
        ];
        if let Some(sound) = spec.sound {
            effects.push(SideEffect::Feedback(Feedback::Sound(sound)));
        }
        effects.push(SideEffect::Feedback(Feedback::Processing(true)));
        effects.push(SideEffect::RequestReaction {
            ticket,
            request: ReactionRequest {
                character_name: character.display_name.clone(),
                role: character.role_label.clone(),
                gesture,
                health_percent: combat.health_percent(),
            },
        });

        (PendingHit { ticket, gesture, damage }, effects)
    }
}
