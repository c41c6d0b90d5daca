pub mod combat;
pub mod event;
pub mod gesture;
pub mod phase;
pub mod reactor;
pub mod rules;
pub mod scheduler;
pub mod telemetry;
pub mod window;
