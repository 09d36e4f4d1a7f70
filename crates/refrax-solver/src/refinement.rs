//! Surface refinement loop.
//!
//! Fixed-point iteration between the desired normal field and a height
//! field that can actually carry it. Each round:
//!
//! 1. re-anchor: subtract the maximum height so the top of the surface
//!    sits at z = 0,
//! 2. compute the Fresnel normal field from the re-anchored surface,
//! 3. integrate the normals into new heights.
//!
//! The loop stops at `max_rounds` (Terminated), or earlier once the largest
//! per-sample height change falls below `tolerance` (Converged).

use std::time::Instant;

use serde::{Deserialize, Serialize};
use refrax_math::DVec3;
use refrax_mesh::{Topology, TriangleMesh};
use refrax_telemetry::{EventBus, EventKind, RefinementEvent};
use refrax_types::constants::UNIT_LENGTH_TOLERANCE;
use refrax_types::{RefraxError, RefraxResult};

use crate::config::RefinementConfig;
use crate::fresnel::normal_field;
use crate::integration::NormalIntegrator;
use crate::trace::{trace_residual, TraceReport};

/// Lifecycle of a refinement run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefinementState {
    /// Targets fixed, integrator not yet set up.
    Initializing,
    /// Rounds in progress; `round` rounds have completed.
    Iterating { round: u32 },
    /// Stopped early below tolerance.
    Converged,
    /// Stopped at the round cap.
    Terminated,
}

impl RefinementState {
    pub fn is_finished(&self) -> bool {
        matches!(self, RefinementState::Converged | RefinementState::Terminated)
    }
}

/// Outcome of a completed refinement run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementReport {
    /// Rounds actually run.
    pub rounds: u32,
    /// Final state (`Converged` or `Terminated`).
    pub state: RefinementState,
    /// Largest absolute per-sample height change, one entry per round.
    pub height_changes: Vec<f64>,
    /// Ray-trace check of the final surface.
    pub trace: TraceReport,
}

impl RefinementReport {
    /// Height change of the last round (`None` before any round).
    pub fn final_height_change(&self) -> Option<f64> {
        self.height_changes.last().copied()
    }
}

/// Subtracts the maximum height from every height; returns the amount removed.
pub fn reanchor_heights(mesh: &mut TriangleMesh) -> f64 {
    let max = mesh.max_height();
    if !max.is_finite() {
        return 0.0;
    }
    for z in &mut mesh.pos_z {
        *z -= max;
    }
    max
}

/// The refinement loop and the data it owns.
///
/// The surface mesh is exclusively owned; targets are fixed at
/// construction and never change.
pub struct Refinement {
    mesh: TriangleMesh,
    targets: Vec<DVec3>,
    config: RefinementConfig,
    state: RefinementState,
    height_changes: Vec<f64>,
}

impl Refinement {
    /// Takes ownership of the surface and its per-sample targets.
    pub fn new(
        mesh: TriangleMesh,
        targets: Vec<DVec3>,
        config: RefinementConfig,
    ) -> RefraxResult<Self> {
        config.validate()?;
        if targets.len() != mesh.vertex_count() {
            return Err(RefraxError::InvalidConfig(format!(
                "{} targets for {} surface samples",
                targets.len(),
                mesh.vertex_count()
            )));
        }
        Ok(Self {
            mesh,
            targets,
            config,
            state: RefinementState::Initializing,
            height_changes: Vec::new(),
        })
    }

    pub fn state(&self) -> RefinementState {
        self.state
    }

    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    pub fn targets(&self) -> &[DVec3] {
        &self.targets
    }

    pub fn config(&self) -> &RefinementConfig {
        &self.config
    }

    /// Releases the refined surface and the targets.
    pub fn into_parts(self) -> (TriangleMesh, Vec<DVec3>) {
        (self.mesh, self.targets)
    }

    /// Sets up `integrator` and moves to `Iterating`.
    pub fn initialize(
        &mut self,
        topology: &Topology,
        integrator: &mut dyn NormalIntegrator,
    ) -> RefraxResult<()> {
        if self.state != RefinementState::Initializing {
            return Err(RefraxError::Solver(format!(
                "Refinement already initialized (state {:?})",
                self.state
            )));
        }
        integrator.initialize(&self.mesh, topology)?;
        self.state = RefinementState::Iterating { round: 0 };
        Ok(())
    }

    /// Runs one round and returns its largest height change.
    pub fn step(
        &mut self,
        integrator: &mut dyn NormalIntegrator,
        bus: &EventBus,
    ) -> RefraxResult<f64> {
        let RefinementState::Iterating { round } = self.state else {
            return Err(RefraxError::Solver(format!(
                "Refinement round requested in state {:?}",
                self.state
            )));
        };
        let start = Instant::now();
        bus.emit(RefinementEvent::new(round, EventKind::RoundBegin));

        reanchor_heights(&mut self.mesh);
        let before = self.mesh.pos_z.clone();

        let normals = normal_field(&self.mesh.points(), &self.targets, &self.config)?;
        let max_unit_error = normals
            .iter()
            .map(|n| (n.length() - 1.0).abs())
            .fold(0.0, f64::max);
        if max_unit_error > UNIT_LENGTH_TOLERANCE {
            return Err(RefraxError::Solver(format!(
                "Normal field lost unit length (error {max_unit_error:.3e})"
            )));
        }
        bus.emit(RefinementEvent::new(round, EventKind::NormalField { max_unit_error }));

        integrator.integrate(&mut self.mesh, &normals)?;

        // Compare re-anchored shapes; a uniform shift is not a change.
        let top = self.mesh.max_height();
        let max_height_change = self
            .mesh
            .pos_z
            .iter()
            .zip(&before)
            .map(|(z, z0)| ((z - top) - z0).abs())
            .fold(0.0, f64::max);
        if !max_height_change.is_finite() {
            return Err(RefraxError::Solver(format!(
                "Round {round} produced non-finite heights"
            )));
        }

        self.height_changes.push(max_height_change);
        self.state = RefinementState::Iterating { round: round + 1 };

        bus.emit(RefinementEvent::new(
            round,
            EventKind::RoundEnd {
                max_height_change,
                wall_time: start.elapsed().as_secs_f64(),
            },
        ));
        tracing::debug!(round, max_height_change, "refinement round");
        Ok(max_height_change)
    }

    /// Initializes if needed, then iterates until converged or capped.
    ///
    /// A finished refinement cannot be run again.
    pub fn run(
        &mut self,
        topology: &Topology,
        integrator: &mut dyn NormalIntegrator,
        bus: &mut EventBus,
    ) -> RefraxResult<RefinementReport> {
        if self.state.is_finished() {
            return Err(RefraxError::Solver(format!(
                "Refinement already finished (state {:?})",
                self.state
            )));
        }
        if self.state == RefinementState::Initializing {
            self.initialize(topology, integrator)?;
        }
        bus.emit(RefinementEvent::new(
            0,
            EventKind::TargetsReady {
                samples: self.targets.len(),
            },
        ));

        tracing::info!(
            samples = self.targets.len(),
            max_rounds = self.config.max_rounds,
            integrator = integrator.name(),
            "starting surface refinement"
        );

        while let RefinementState::Iterating { round } = self.state {
            if round >= self.config.max_rounds {
                self.state = RefinementState::Terminated;
                bus.emit(RefinementEvent::new(round, EventKind::Terminated { rounds: round }));
                break;
            }

            let change = self.step(integrator, bus)?;
            bus.flush();

            if self.config.early_stop() && change < self.config.tolerance {
                self.state = RefinementState::Converged;
                bus.emit(RefinementEvent::new(
                    round,
                    EventKind::Converged {
                        rounds: round + 1,
                        max_height_change: change,
                    },
                ));
            }
        }

        reanchor_heights(&mut self.mesh);

        let trace = trace_residual(&self.mesh, &self.targets, &self.config)?;
        bus.emit(RefinementEvent::new(
            self.rounds(),
            EventKind::TraceResidual {
                mean: trace.mean,
                max: trace.max,
                missed: trace.missed,
            },
        ));
        bus.flush();

        Ok(RefinementReport {
            rounds: self.rounds(),
            state: self.state,
            height_changes: self.height_changes.clone(),
            trace,
        })
    }

    /// Rounds completed so far.
    pub fn rounds(&self) -> u32 {
        self.height_changes.len() as u32
    }
}
