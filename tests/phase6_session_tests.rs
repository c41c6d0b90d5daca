use std::time::Duration;

use ragedojo::config::SessionConfig;
use ragedojo::game::roster::{Character, Gender};
use ragedojo::kernel::rules::FixedRoller;
use ragedojo::kernel::scheduler::Feedback;
use ragedojo::services::reaction::{ReactionEffect, ScriptedReply, ScriptedResolver};
use ragedojo::session::{CombatSession, SessionOutcome, SessionReport};
use ragedojo::vision::camera::CameraError;
use ragedojo::vision::landmarks::{DetectorSlot, SharedDetector};
use ragedojo::vision::simulated::{fist, CameraProbe, ScriptedCamera, ScriptedFactory};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const FRAMES: usize = 1_000;

fn target(max_health: u32) -> Character {
    Character {
        id: "t".into(),
        display_name: "Target".into(),
        role_label: "Dreamer".into(),
        portrait: String::new(),
        max_health,
        gender: Gender::Male,
        is_custom: false,
    }
}

/// A camera at the refresh rate and a provider that sees a fist on every
/// frame.
fn fisting_rig() -> (ScriptedCamera, CameraProbe, SharedDetector<ScriptedFactory>) {
    let (camera, probe) = ScriptedCamera::steady(FRAMES, 16);
    let (factory, hands) = ScriptedFactory::new();
    for _ in 0..FRAMES {
        hands.push_hands(vec![fist()]);
    }
    (camera, probe, DetectorSlot::shared(factory))
}

fn drain(rx: &mut mpsc::Receiver<Feedback>) -> Vec<Feedback> {
    let mut out = Vec::new();
    while let Ok(f) = rx.try_recv() {
        out.push(f);
    }
    out
}

/// Run until the session finishes on its own, or cancel after `limit`.
async fn run_for<S: std::future::Future<Output = SessionReport>>(
    run: impl FnOnce(CancellationToken) -> S,
    limit: Duration,
) -> SessionReport {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    let watchdog = tokio::spawn(async move {
        tokio::time::sleep(limit).await;
        trigger.cancel();
    });
    let report = run(cancel).await;
    watchdog.abort();
    report
}

#[tokio::test(start_paused = true)]
async fn test_full_fight_finishes_with_cumulative_score() {
    let (camera, probe, detector) = fisting_rig();
    let resolver = ScriptedResolver::always(ReactionEffect::Hit);
    let observer = resolver.clone();
    let (tx, mut rx) = mpsc::channel(4096);

    let session = CombatSession::new(
        target(45), camera, detector, resolver, Box::new(FixedRoller(1.0)), SessionConfig::default(), tx,
    );
    let report = run_for(|c| session.run(c), Duration::from_secs(30)).await;

    assert_eq!(report.outcome, SessionOutcome::Finished { score: 45 });
    assert_eq!(report.combat.health(), 0);
    assert_eq!(report.combat.combo(), 3);
    assert_eq!(report.telemetry.hit_stats.triggered, 3);
    assert!(report.telemetry.hit_stats.suppressed > 0, "fists held through the window must be suppressed");

    let percents: Vec<u8> = observer.requests().iter().map(|r| r.health_percent).collect();
    assert_eq!(percents, vec![100, 67, 33]);

    assert!(!probe.is_started(), "camera must be released on finish");
    assert_eq!(probe.stop_calls(), 1);

    let feedback = drain(&mut rx);
    let vitals: Vec<u32> = feedback.iter().filter_map(|f| match f {
        Feedback::Vitals { health, .. } => Some(*health),
        _ => None,
    }).collect();
    assert_eq!(vitals, vec![30, 15, 0]);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_aborts_and_releases_camera() {
    let (camera, probe, detector) = fisting_rig();
    let (tx, _rx) = mpsc::channel(4096);
    let session = CombatSession::new(
        target(1000),
        camera,
        detector,
        ScriptedResolver::always(ReactionEffect::Dodge),
        Box::new(FixedRoller(1.0)),
        SessionConfig::default(),
        tx,
    );
    let report = run_for(|c| session.run(c), Duration::from_millis(700)).await;

    assert_eq!(report.outcome, SessionOutcome::Aborted);
    assert_eq!(report.combat.health(), 1000);
    assert!(!probe.is_started());
    assert_eq!(probe.stop_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_denied_camera_reports_once_and_stays_blind() {
    let (camera, probe) = ScriptedCamera::denied();
    let (factory, provider) = ScriptedFactory::new();
    let (tx, mut rx) = mpsc::channel(4096);
    let session = CombatSession::new(
        target(100),
        camera,
        DetectorSlot::shared(factory),
        ScriptedResolver::always(ReactionEffect::Hit),
        Box::new(FixedRoller(1.0)),
        SessionConfig::default(),
        tx,
    );
    let report = run_for(|c| session.run(c), Duration::from_millis(500)).await;

    assert_eq!(report.outcome, SessionOutcome::Aborted);
    assert_eq!(report.camera_error, Some(CameraError::PermissionDenied));
    assert_eq!(provider.init_calls(), 0);
    assert_eq!(probe.stop_calls(), 0);

    let unavailable = drain(&mut rx).into_iter()
        .filter(|f| matches!(f, Feedback::CameraUnavailable(_)))
        .count();
    assert_eq!(unavailable, 1);
}

#[tokio::test(start_paused = true)]
async fn test_resolver_failures_do_not_damage() {
    let (camera, _probe, detector) = fisting_rig();
    let resolver = ScriptedResolver::always(ReactionEffect::Hit);
    resolver.push(ScriptedReply::Fail("503".into()));
    resolver.push(ScriptedReply::Fail("bad json".into()));
    let (tx, _rx) = mpsc::channel(4096);

    let session = CombatSession::new(
        target(15), camera, detector, resolver, Box::new(FixedRoller(1.0)), SessionConfig::default(), tx,
    );
    let report = run_for(|c| session.run(c), Duration::from_secs(30)).await;

    assert_eq!(report.outcome, SessionOutcome::Finished { score: 15 });
    assert_eq!(report.telemetry.reaction_stats.failed, 2);
    assert_eq!(report.telemetry.hit_stats.triggered, 3);
    assert_eq!(report.combat.combo(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_resolver_times_out_as_failure() {
    let (camera, _probe, detector) = fisting_rig();
    let resolver = ScriptedResolver::always(ReactionEffect::Hit).with_latency(Duration::from_secs(5));
    let (tx, _rx) = mpsc::channel(4096);
    let config = SessionConfig {
        resolver_timeout_ms: 200,
        ..SessionConfig::default()
    };

    let session = CombatSession::new(target(15), camera, detector, resolver, Box::new(FixedRoller(1.0)), config, tx);
    let report = run_for(|c| session.run(c), Duration::from_millis(2_000)).await;

    assert_eq!(report.outcome, SessionOutcome::Aborted);
    assert_eq!(report.combat.health(), 15);
    assert!(report.telemetry.reaction_stats.failed >= 3);
    assert_eq!(report.telemetry.reaction_stats.applied, 0);
}

#[tokio::test(start_paused = true)]
async fn test_results_landing_after_defeat_are_discarded() {
    let (camera, _probe, detector) = fisting_rig();
    // Slower than the window, so more hits are in flight when the first lands
    let resolver = ScriptedResolver::always(ReactionEffect::Hit).with_latency(Duration::from_millis(1_000));
    let (tx, _rx) = mpsc::channel(4096);

    let session = CombatSession::new(
        target(15), camera, detector, resolver, Box::new(FixedRoller(1.0)), SessionConfig::default(), tx,
    );
    let report = run_for(|c| session.run(c), Duration::from_secs(30)).await;

    assert_eq!(report.outcome, SessionOutcome::Finished { score: 15 });
    assert_eq!(report.combat.cumulative_damage(), 15);
    assert!(report.telemetry.hit_stats.triggered >= 2);
    assert!(report.telemetry.reaction_stats.discarded >= 1);
    assert_eq!(report.telemetry.reaction_stats.applied, 1);
}

#[tokio::test(start_paused = true)]
async fn test_second_session_reuses_the_initialized_detector() {
    let (factory, provider) = ScriptedFactory::new();
    let shared = DetectorSlot::shared(factory);

    for _ in 0..2 {
        let (camera, _probe) = ScriptedCamera::steady(FRAMES, 16);
        let (tx, _rx) = mpsc::channel(4096);
        let session = CombatSession::new(
            target(1000),
            camera,
            shared.clone(),
            ScriptedResolver::always(ReactionEffect::Dodge),
            Box::new(FixedRoller(1.0)),
            SessionConfig::default(),
            tx,
        );
        let report = run_for(|c| session.run(c), Duration::from_millis(200)).await;
        assert_eq!(report.outcome, SessionOutcome::Aborted);
    }

    assert_eq!(provider.init_calls(), 1, "a later fight must not load the model again");
    assert!(shared.try_lock().is_ok_and(|slot| slot.is_ready()));
}
