//! Async driver for one combat session.
//!
//! The kernel (`CombatReactor`) never awaits. This loop does the waiting:
//! for the next refresh tick, for the landmark provider, and (through spawned
//! tasks) for the reaction resolver.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::SessionConfig;
use crate::game::roster::Character;
use crate::kernel::combat::CombatState;
use crate::kernel::event::{Event, HitTicket};
use crate::kernel::reactor::CombatReactor;
use crate::kernel::rules::DamageRoller;
use crate::kernel::scheduler::{Feedback, SideEffect};
use crate::kernel::telemetry::event::TelemetryEvent;
use crate::kernel::telemetry::metrics::TelemetrySnapshot;
use crate::services::reaction::{ReactionRequest, ReactionResolver};
use crate::vision::camera::{CameraError, CameraSource};
use crate::vision::landmarks::{ProviderFactory, SharedDetector};
use crate::vision::pipeline::{FrameSampler, SampleOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Target knocked out; score is the cumulative damage.
    Finished { score: u32 },
    /// Torn down before a finish (player left, app closing).
    Aborted,
}

#[derive(Debug, Clone)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub combat: CombatState,
    pub telemetry: TelemetrySnapshot,
    pub camera_error: Option<CameraError>,
}

pub struct CombatSession<C: CameraSource, F: ProviderFactory, R: ReactionResolver> {
    sampler: FrameSampler<C, F>,
    reactor: CombatReactor,
    resolver: Arc<R>,
    config: SessionConfig,
    feedback: mpsc::Sender<Feedback>,
}

impl<C: CameraSource, F: ProviderFactory, R: ReactionResolver> CombatSession<C, F, R> {
    /// Acquires the camera right away. The session owns it until `run`
    /// returns or the session is dropped. The detector is only borrowed and
    /// stays initialized for the next fight.
    pub fn new(
        character: Character,
        camera: C,
        detector: SharedDetector<F>,
        resolver: R,
        roller: Box<dyn DamageRoller>,
        config: SessionConfig,
        feedback: mpsc::Sender<Feedback>,
    ) -> Self {
        Self {
            sampler: FrameSampler::open(camera, detector),
            reactor: CombatReactor::new(character, roller),
            resolver: Arc::new(resolver),
            config,
            feedback,
        }
    }

    pub fn reactor(&self) -> &CombatReactor {
        &self.reactor
    }

    /// Drive the fight until the finish signal or cancellation. The camera
    /// is released before this returns.
    pub async fn run(mut self, cancel: CancellationToken) -> SessionReport {
        info!(
            "Combat session started vs {} ({} hp). Tick: {}ms",
            self.reactor.character().display_name,
            self.reactor.combat.max_health(),
            self.config.refresh_interval_ms
        );

        let (tx, mut rx) = mpsc::channel::<Event>(self.config.event_capacity.max(1));
        let started = Instant::now();
        let mut cadence = interval(Duration::from_millis(self.config.refresh_interval_ms.max(1)));
        cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Surfaced once; a refused camera is never retried.
        if let Some(e) = self.sampler.camera_error() {
            self.emit(Feedback::CameraUnavailable(e.to_string()));
        }

        let outcome = loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break SessionOutcome::Aborted,
                _ = cadence.tick() => {}
            }
            let now_ms = started.elapsed().as_millis() as u64;

            // 1. Sample (at most one classification per distinct frame)
            let mut events = Vec::new();
            let sampled = self.sampler.sample(&mut self.reactor.telemetry).await;
            if let SampleOutcome::Sampled(sample) = sampled {
                if sample.gesture.is_attack() {
                    if self.reactor.window_blocks(now_ms) {
                        let gesture = sample.gesture;
                        self.reactor.telemetry.record(TelemetryEvent::HitSuppressed { gesture });
                    } else {
                        events.push(Event::Gesture(sample));
                    }
                }
            }

            // 2. Drain resolver results
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }

            // 3. Kernel step
            let effects = self.reactor.tick_step(now_ms, events);

            // 4. Side effects
            let mut finished = None;
            for effect in effects {
                match effect {
                    SideEffect::Feedback(f) => self.emit(f),
                    SideEffect::RequestReaction { ticket, request } => {
                        self.dispatch(ticket, request, tx.clone())
                    }
                    SideEffect::Finish { score } => finished = Some(score),
                }
            }
            if let Some(score) = finished {
                break SessionOutcome::Finished { score };
            }
        };

        // Late resolver results go to a closed channel and are dropped.
        drop(rx);
        self.sampler.release();
        info!("Combat session ended: {:?}", outcome);

        SessionReport {
            outcome,
            combat: self.reactor.combat.clone(),
            telemetry: self.reactor.telemetry.snapshot(),
            camera_error: self.sampler.camera_error().cloned(),
        }
    }

    fn emit(&self, feedback: Feedback) {
        // UI/audio must never stall the loop
        if let Err(e) = self.feedback.try_send(feedback) {
            debug!("Feedback dropped: {}", e);
        }
    }

    fn dispatch(&self, ticket: HitTicket, request: ReactionRequest, tx: mpsc::Sender<Event>) {
        let resolver = self.resolver.clone();
        let timeout = Duration::from_millis(self.config.resolver_timeout_ms);

        tokio::spawn(async move {
            let event = match tokio::time::timeout(timeout, resolver.resolve(request)).await {
                Ok(Ok(outcome)) => Event::ReactionResolved { ticket, outcome },
                Ok(Err(e)) => Event::ReactionFailed { ticket, reason: e.to_string() },
                Err(_) => Event::ReactionFailed {
                    ticket,
                    reason: format!("timed out after {:?}", timeout),
                },
            };
            let _ = tx.send(event).await;
        });
    }
}
