//! # refrax-telemetry
//!
//! Event bus for refinement telemetry. The refinement loop emits
//! structured events (round boundaries, height changes, convergence,
//! ray-trace residuals) that pluggable sinks consume.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, RefinementEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
