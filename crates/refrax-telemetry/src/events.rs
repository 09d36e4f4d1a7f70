//! Refinement event types.
//!
//! Events are small value types emitted once or twice per refinement
//! round, carrying just enough data to follow convergence.

use serde::{Deserialize, Serialize};

/// An event emitted by the refinement loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementEvent {
    /// Refinement round (0-indexed). Events emitted before the loop use 0.
    pub round: u32,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Ray targets are fixed and the loop is about to start.
    TargetsReady {
        /// Number of surface samples.
        samples: usize,
    },

    /// Round started.
    RoundBegin,

    /// Normal field computed for the round.
    NormalField {
        /// Largest deviation of any normal from unit length.
        max_unit_error: f64,
    },

    /// Round completed.
    RoundEnd {
        /// Largest absolute per-sample height change in this round.
        max_height_change: f64,
        /// Wall-clock time for the round (seconds).
        wall_time: f64,
    },

    /// Height change fell below tolerance; the loop stopped early.
    Converged {
        /// Rounds actually run.
        rounds: u32,
        /// Final height change.
        max_height_change: f64,
    },

    /// The round cap was reached.
    Terminated {
        /// Rounds actually run.
        rounds: u32,
    },

    /// Distance between traced rays and their assigned targets.
    TraceResidual {
        /// Mean distance over traced samples.
        mean: f64,
        /// Largest distance.
        max: f64,
        /// Samples lost to total internal reflection or a parallel ray.
        missed: usize,
    },
}

impl RefinementEvent {
    /// Creates a new event for the given round.
    pub fn new(round: u32, kind: EventKind) -> Self {
        Self { round, kind }
    }
}
