use std::time::Duration;

use anyhow::Context;
use ragedojo::config::SessionConfig;
use ragedojo::game::{GameController, Gender};
use ragedojo::kernel::phase::PhaseRequest;
use ragedojo::kernel::rules::RandomRoller;
use ragedojo::kernel::scheduler::Feedback;
use ragedojo::services::reaction::{QuoteBankResolver, ReactionResolver, RemoteResolver};
use ragedojo::session::{CombatSession, SessionOutcome, SessionReport};
use ragedojo::vision::landmarks::{DetectorSlot, SharedDetector};
use ragedojo::vision::simulated::{fist, open_palm, ScriptedCamera, ScriptedFactory};
use ragedojo::Character;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Scripted frames at ~30 fps.
const DEMO_FRAMES: usize = 3_000;
const DEMO_FRAME_MS: u64 = 33;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging/tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    tracing::info!("Rage Dojo booting (headless demo)...");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            SessionConfig::from_json(&raw).with_context(|| format!("parsing config {}", path))?
        }
        None => SessionConfig::default(),
    };

    let mut game = GameController::default();
    game.request(PhaseRequest::Begin)?;
    let id = game.add_custom("Demo Boss", Gender::Male, "/assets/body_male_1.png")?.id.clone();
    game.select_and_play(&id)?;
    let character = game.selected().cloned().context("no character selected")?;

    // One detector for the whole process. Model "downloads" fail twice
    // before coming up.
    let (factory, hands) = ScriptedFactory::failing(2);
    for i in 0..DEMO_FRAMES {
        hands.push_hands(match i % 40 {
            0..=9 => vec![fist()],
            10..=19 => vec![],
            20..=29 => vec![open_palm()],
            _ => vec![open_palm(), fist()],
        });
    }
    let detector = DetectorSlot::shared(factory);

    let report = match config.remote_resolver_url.clone() {
        Some(url) => {
            let timeout = Duration::from_millis(config.resolver_timeout_ms);
            play(character, detector, RemoteResolver::new(url, timeout), config).await
        }
        None => play(character, detector, QuoteBankResolver::default(), config).await,
    };

    tracing::info!(
        "Fight over: hp {}/{}, combo {}, frames {} processed / {} skipped, {} hits, {} suppressed",
        report.combat.health(),
        report.combat.max_health(),
        report.combat.combo(),
        report.telemetry.frame_stats.processed,
        report.telemetry.frame_stats.skipped,
        report.telemetry.hit_stats.triggered,
        report.telemetry.hit_stats.suppressed,
    );

    match report.outcome {
        SessionOutcome::Finished { score } => {
            game.request(PhaseRequest::Finish { score })?;
            if let Some(result) = game.result() {
                tracing::info!("Final score {} -> rank: {}", result.score, result.rank.title());
            }
        }
        SessionOutcome::Aborted => tracing::info!("Session aborted before a knockout."),
    }

    Ok(())
}

async fn play<R: ReactionResolver>(
    character: Character,
    detector: SharedDetector<ScriptedFactory>,
    resolver: R,
    config: SessionConfig,
) -> SessionReport {
    let (camera, _camera_probe) = ScriptedCamera::steady(DEMO_FRAMES, DEMO_FRAME_MS);

    let (feedback_tx, mut feedback_rx) = mpsc::channel(config.feedback_capacity.max(1));
    tokio::spawn(async move {
        while let Some(feedback) = feedback_rx.recv().await {
            match feedback {
                Feedback::Dialogue(line) => tracing::info!("\"{}\"", line),
                Feedback::Vitals { health, max_health, combo, cumulative_damage } => {
                    tracing::info!(
                        "HP {}/{} | combo x{} | damage {}",
                        health, max_health, combo, cumulative_damage
                    )
                }
                Feedback::CameraUnavailable(reason) => {
                    tracing::error!("Camera unavailable: {}", reason)
                }
                other => tracing::debug!("feedback: {:?}", other),
            }
        }
    });

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let session = CombatSession::new(
        character,
        camera,
        detector,
        resolver,
        Box::new(RandomRoller::new()),
        config,
        feedback_tx,
    );
    session.run(cancel).await
}
