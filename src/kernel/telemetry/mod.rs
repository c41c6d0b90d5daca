//! Combat telemetry.
//!
//! # SAFETY INVARIANT
//! Telemetry is a READ-ONLY side-effect layer.
//! It must **NEVER** be read inside decision logic (reactor, sampler, controller).
//!
//! # PRIVACY INVARIANT
//! Events carry no frames, landmarks or dialogue text. Only ids, enums,
//! counts and durations.

pub mod event;
pub mod metrics;
pub mod recorder;
