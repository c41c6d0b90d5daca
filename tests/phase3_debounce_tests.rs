use ragedojo::game::roster::{Character, Gender};
use ragedojo::kernel::event::{Event, HitTicket};
use ragedojo::kernel::gesture::{GestureSample, GestureType};
use ragedojo::kernel::reactor::CombatReactor;
use ragedojo::kernel::rules::{FixedRoller, ACTION_WINDOW_MS};
use ragedojo::kernel::scheduler::{Feedback, SideEffect};
use ragedojo::services::reaction::{ReactionEffect, ReactionOutcome};

fn target(max_health: u32) -> Character {
    Character {
        id: "t".into(),
        display_name: "Target".into(),
        role_label: "Micromanager".into(),
        portrait: String::new(),
        max_health,
        gender: Gender::Male,
        is_custom: false,
    }
}

fn reactor(max_health: u32) -> CombatReactor {
    CombatReactor::new(target(max_health), Box::new(FixedRoller(1.0)))
}

fn gesture(g: GestureType, ts: u64) -> Event {
    Event::Gesture(GestureSample { gesture: g, timestamp_ms: ts })
}

fn tickets(effects: &[SideEffect]) -> Vec<HitTicket> {
    effects.iter().filter_map(|e| match e {
        SideEffect::RequestReaction { ticket, .. } => Some(*ticket),
        _ => None,
    }).collect()
}

fn hit(ticket: HitTicket) -> Event {
    Event::ReactionResolved { ticket, outcome: ReactionOutcome::new("ouch", ReactionEffect::Hit) }
}

#[test]
fn test_window_opens_before_any_resolution() {
    let mut r = reactor(100);
    let effects = r.tick_step(0, vec![gesture(GestureType::Fist, 1)]);

    assert_eq!(tickets(&effects).len(), 1);
    assert!(r.window_active(), "window must already be open while the reaction is pending");
    assert_eq!(r.pending_hits(), 1);
    assert_eq!(r.combat.health(), 100, "no damage until the reaction resolves");
}

#[test]
fn test_gestures_during_window_do_not_trigger() {
    let mut r = reactor(100);
    let first = r.tick_step(0, vec![gesture(GestureType::Fist, 1)]);
    let ticket = tickets(&first)[0];

    // Many gestures inside the window, including in the same tick as the resolution
    for t in (16..ACTION_WINDOW_MS).step_by(16) {
        let effects = r.tick_step(t, vec![gesture(GestureType::Palm, t)]);
        assert!(tickets(&effects).is_empty(), "triggered again at {}ms", t);
    }
    r.tick_step(449, vec![hit(ticket), gesture(GestureType::Tear, 449)]);

    assert_eq!(r.combat.health(), 85);
    assert_eq!(r.combat.combo(), 1);
    assert_eq!(r.pending_hits(), 0);
}

#[test]
fn test_two_gestures_in_one_tick_trigger_once() {
    let mut r = reactor(100);
    let effects = r.tick_step(0, vec![gesture(GestureType::Fist, 1), gesture(GestureType::Tear, 2)]);
    assert_eq!(tickets(&effects).len(), 1);
}

#[test]
fn test_window_closes_on_timer_and_reopens() {
    let mut r = reactor(100);
    r.tick_step(0, vec![gesture(GestureType::Fist, 1)]);

    let before = r.tick_step(ACTION_WINDOW_MS - 1, vec![gesture(GestureType::Fist, 2)]);
    assert!(tickets(&before).is_empty());

    let at_close = r.tick_step(ACTION_WINDOW_MS, vec![gesture(GestureType::Fist, 3)]);
    assert!(at_close.contains(&SideEffect::Feedback(Feedback::EffectsCleared)));
    assert_eq!(tickets(&at_close).len(), 1, "a gesture on the closing tick starts the next window");
    assert!(r.window_active());
}

#[test]
fn test_window_closes_even_if_reaction_never_arrives() {
    let mut r = reactor(100);
    r.tick_step(0, vec![gesture(GestureType::Fist, 1)]);
    r.tick_step(ACTION_WINDOW_MS + 10, vec![]);
    assert!(!r.window_active());
    assert_eq!(r.pending_hits(), 1, "still waiting, but not blocking");
}

#[test]
fn test_failed_reaction_is_a_no_op_hit() {
    let mut r = reactor(100);
    let t1 = tickets(&r.tick_step(0, vec![gesture(GestureType::Fist, 1)]))[0];
    r.tick_step(100, vec![hit(t1)]);
    assert_eq!(r.combat.combo(), 1);

    let t2 = tickets(&r.tick_step(500, vec![gesture(GestureType::Fist, 2)]))[0];
    let effects = r.tick_step(600, vec![Event::ReactionFailed { ticket: t2, reason: "503".into() }]);

    assert_eq!(r.combat.health(), 85);
    assert_eq!(r.combat.combo(), 1);
    assert_eq!(r.combat.cumulative_damage(), 15);
    assert!(effects.contains(&SideEffect::Feedback(Feedback::Processing(false))));
    assert!(!effects.iter().any(|e| matches!(e, SideEffect::Feedback(Feedback::Dialogue(_)))), "failures are not shown");

    r.tick_step(950, vec![]);
    assert!(!r.window_active());
}

#[test]
fn test_late_reaction_after_window_still_applies() {
    let mut r = reactor(100);
    let t = tickets(&r.tick_step(0, vec![gesture(GestureType::Palm, 1)]))[0];
    r.tick_step(800, vec![]);
    r.tick_step(900, vec![hit(t)]);
    assert_eq!(r.combat.health(), 90);
}

#[test]
fn test_duplicate_resolution_is_discarded() {
    let mut r = reactor(100);
    let t = tickets(&r.tick_step(0, vec![gesture(GestureType::Fist, 1)]))[0];
    r.tick_step(50, vec![hit(t)]);
    r.tick_step(60, vec![hit(t)]);
    assert_eq!(r.combat.health(), 85);
    assert_eq!(r.telemetry.snapshot().reaction_stats.discarded, 1);
}

#[test]
fn test_reset_closes_window_and_drops_stale_results() {
    let mut r = reactor(100);
    let t = tickets(&r.tick_step(0, vec![gesture(GestureType::Tear, 1)]))[0];
    assert!(r.window_active());

    let settled = r.reset(target(200));
    assert!(!r.window_active());
    assert_eq!(r.pending_hits(), 0);
    assert!(settled.contains(&SideEffect::Feedback(Feedback::Processing(false))), "indicator must not stay on");
    assert!(settled.contains(&SideEffect::Feedback(Feedback::EffectsCleared)));

    r.tick_step(10, vec![hit(t)]);
    assert_eq!(r.combat.health(), 200);
    assert_eq!(r.combat.cumulative_damage(), 0);

    // New session accepts gestures right away
    assert_eq!(tickets(&r.tick_step(20, vec![gesture(GestureType::Palm, 2)])).len(), 1);
}

#[test]
fn test_reset_of_idle_fight_emits_nothing() {
    let mut r = reactor(100);
    assert!(r.reset(target(100)).is_empty());
}

#[test]
fn test_none_gesture_never_triggers() {
    let mut r = reactor(100);
    let effects = r.tick_step(0, vec![gesture(GestureType::None, 1)]);
    assert!(effects.is_empty());
    assert!(!r.window_active());
}

#[test]
fn test_trigger_feedback_is_immediate() {
    let mut r = reactor(100);
    let effects = r.trigger(GestureType::Palm, 0);
    assert!(effects.contains(&SideEffect::Feedback(Feedback::ActionShown { gesture: GestureType::Palm, label: "SLAP!" })));
    assert!(effects.contains(&SideEffect::Feedback(Feedback::ScreenShake)));
    assert!(effects.contains(&SideEffect::Feedback(Feedback::Processing(true))));
    assert!(matches!(
        effects.iter().find(|e| matches!(e, SideEffect::RequestReaction { .. })),
        Some(SideEffect::RequestReaction { request, .. }) if request.health_percent == 100 && request.gesture == GestureType::Palm
    ));
}
