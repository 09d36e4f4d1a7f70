//! Pluggable event sinks.

use std::sync::{Arc, Mutex};

use crate::events::{EventKind, RefinementEvent};

/// Trait for event consumers.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &RefinementEvent);

    /// Called when the run ends.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events into a shared `Vec` for tests and inspection.
///
/// Clones share the same storage, so a clone kept by the caller sees
/// everything the copy registered on the bus receives.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<RefinementEvent>>>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected events.
    pub fn events(&self) -> Vec<RefinementEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of collected events.
    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &RefinementEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// Forwards events to `tracing`.
///
/// Round boundaries go to `debug`; convergence and termination go to `info`.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &RefinementEvent) {
        match &event.kind {
            EventKind::RoundEnd {
                max_height_change,
                wall_time,
            } => tracing::info!(
                round = event.round,
                max_height_change,
                wall_time,
                "refinement round complete"
            ),
            EventKind::Converged {
                rounds,
                max_height_change,
            } => tracing::info!(rounds, max_height_change, "refinement converged"),
            EventKind::Terminated { rounds } => {
                tracing::info!(rounds, "refinement reached round cap")
            }
            EventKind::TraceResidual { mean, max, missed } => {
                tracing::info!(mean, max, missed, "ray-trace residual")
            }
            other => tracing::debug!(round = event.round, event = ?other, "refinement_event"),
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
