use std::collections::VecDeque;
use super::event::TelemetryEvent;
use crate::kernel::rules::GestureType;
use crate::services::reaction::ReactionEffect;

#[derive(Debug, Clone, Default)]
pub struct TelemetrySnapshot {
    pub frame_stats: FrameStats,
    pub gesture_stats: GestureStats,
    pub hit_stats: HitStats,
    pub reaction_stats: ReactionStats,
    pub provider_stats: ProviderStats,
    pub final_score: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct FrameStats {
    pub processed: u64,
    pub skipped: u64,
}

#[derive(Debug, Clone, Default)]
pub struct GestureStats {
    pub palms: u64,
    pub fists: u64,
    pub tears: u64,
}

#[derive(Debug, Clone, Default)]
pub struct HitStats {
    pub triggered: u64,
    pub suppressed: u64,
    pub total_rolled_damage: u64,
}

#[derive(Debug, Clone, Default)]
pub struct ReactionStats {
    pub applied: u64,
    pub dodged: u64,
    pub failed: u64,
    pub discarded: u64,
    pub total_latency_ms: u64,
    pub avg_latency_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct ProviderStats {
    pub init_failures: u64,
    pub detection_failures: u64,
}

pub fn compute_snapshot(events: &VecDeque<TelemetryEvent>) -> TelemetrySnapshot {
    let mut snap = TelemetrySnapshot::default();
    let mut latency_samples = 0u64;

    for event in events {
        match event {
            TelemetryEvent::FrameProcessed => snap.frame_stats.processed += 1,
            TelemetryEvent::FrameSkipped => snap.frame_stats.skipped += 1,
            TelemetryEvent::GestureDetected { gesture } => match gesture {
                GestureType::Palm => snap.gesture_stats.palms += 1,
                GestureType::Fist => snap.gesture_stats.fists += 1,
                GestureType::Tear => snap.gesture_stats.tears += 1,
                GestureType::None => {}
            },
            TelemetryEvent::HitTriggered { damage, .. } => {
                snap.hit_stats.triggered += 1;
                snap.hit_stats.total_rolled_damage += *damage as u64;
            }
            TelemetryEvent::HitSuppressed { .. } => snap.hit_stats.suppressed += 1,
            TelemetryEvent::ReactionApplied { effect, latency_ms, .. } => {
                if *effect == ReactionEffect::Dodge {
                    snap.reaction_stats.dodged += 1;
                } else {
                    snap.reaction_stats.applied += 1;
                }
                snap.reaction_stats.total_latency_ms += latency_ms;
                latency_samples += 1;
            }
            TelemetryEvent::ReactionFailed { latency_ms, .. } => {
                snap.reaction_stats.failed += 1;
                snap.reaction_stats.total_latency_ms += latency_ms;
                latency_samples += 1;
            }
            TelemetryEvent::ReactionDiscarded { .. } => snap.reaction_stats.discarded += 1,
            TelemetryEvent::ProviderInitFailed => snap.provider_stats.init_failures += 1,
            TelemetryEvent::DetectionFailed => snap.provider_stats.detection_failures += 1,
            TelemetryEvent::Defeated { score } => snap.final_score = Some(*score),
        }
    }

    if latency_samples > 0 {
        snap.reaction_stats.avg_latency_ms =
            snap.reaction_stats.total_latency_ms as f64 / latency_samples as f64;
    }

    snap
}
