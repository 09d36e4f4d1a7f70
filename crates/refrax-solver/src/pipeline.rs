//! End-to-end design pipeline.
//!
//! ```text
//! load source density ─┐
//! load target density ─┴─► solve both maps ─► surface grid + margin
//!   ─► compose correspondence ─► frame transform ─► refinement loop
//! ```
//!
//! Both images are loaded before either transport solve runs, so a bad
//! input path fails without any solver work. Nothing is written to disk.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use refrax_math::{DVec2, DVec3};
use refrax_mesh::generators::{inset, surface_grid};
use refrax_mesh::{Topology, TriangleMesh};
use refrax_telemetry::EventBus;
use refrax_transport::{Density, TransportOptions, TransportSolver};
use refrax_types::constants::DEFAULT_SURFACE_RESOLUTION;
use refrax_types::{RefraxError, RefraxResult};

use crate::config::RefinementConfig;
use crate::correspondence::compose_correspondence;
use crate::frame::FrameTransform;
use crate::integration::NormalIntegrator;
use crate::refinement::{Refinement, RefinementReport};

/// Everything a design run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Density image of the incoming light.
    pub source: PathBuf,
    /// Density image the caustic should reproduce.
    pub target: PathBuf,
    /// Surface samples per side.
    pub resolution: usize,
    /// Surface extent along x.
    pub width: f64,
    /// Surface extent along y.
    pub height: f64,
    pub transport: TransportOptions,
    pub frame: FrameTransform,
    pub refinement: RefinementConfig,
}

impl PipelineConfig {
    /// A unit-square design with default optics.
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            resolution: DEFAULT_SURFACE_RESOLUTION,
            width: 1.0,
            height: 1.0,
            transport: TransportOptions::default(),
            frame: FrameTransform::default(),
            refinement: RefinementConfig::default(),
        }
    }

    pub fn validate(&self) -> RefraxResult<()> {
        if self.source.as_os_str().is_empty() || self.target.as_os_str().is_empty() {
            return Err(RefraxError::InvalidConfig(
                "Both source and target density images are required".into(),
            ));
        }
        if self.resolution < 3 {
            return Err(RefraxError::InvalidConfig(format!(
                "Surface resolution must be >= 3, got {}",
                self.resolution
            )));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(RefraxError::InvalidConfig(format!(
                "Surface extent must be positive, got {}×{}",
                self.width, self.height
            )));
        }
        self.frame.validate()?;
        self.refinement.validate()
    }

    /// Inset applied to the sample grid on every side.
    pub fn margin(&self) -> f64 {
        self.width.min(self.height) / self.resolution as f64
    }
}

/// Result of a design run, ready for export.
#[derive(Debug, Clone)]
pub struct DesignOutput {
    /// Refined lens surface.
    pub mesh: TriangleMesh,
    pub topology: Topology,
    /// Fixed 3D ray targets, one per surface sample.
    pub targets: Vec<DVec3>,
    pub report: RefinementReport,
}

/// Runs a design from density images to refined surface.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> RefraxResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads both densities, solves both maps and refines the surface.
    pub fn run(
        &self,
        transport: &mut dyn TransportSolver,
        integrator: &mut dyn NormalIntegrator,
        bus: &mut EventBus,
    ) -> RefraxResult<DesignOutput> {
        let cfg = &self.config;

        let source_density = Density::load(&cfg.source)?;
        let target_density = Density::load(&cfg.target)?;

        tracing::info!(
            source = %cfg.source.display(),
            target = %cfg.target.display(),
            solver = transport.name(),
            "solving transport maps"
        );
        transport.init(cfg.resolution - 1)?;
        let source_map = transport.solve(&source_density, &cfg.transport)?;
        let target_map = transport.solve(&target_density, &cfg.transport)?;

        let mut mesh = surface_grid(cfg.resolution, cfg.resolution, cfg.width, cfg.height)?;
        let topology = Topology::build(&mesh);
        inset(&mut mesh, cfg.width, cfg.height, cfg.margin())?;

        let scale = DVec2::new(cfg.width, cfg.height);
        let samples: Vec<DVec2> = (0..mesh.vertex_count())
            .map(|i| DVec2::new(mesh.pos_x[i], mesh.pos_y[i]) / scale)
            .collect();
        let corresponded: Vec<DVec2> = compose_correspondence(&source_map, &target_map, samples)?
            .into_iter()
            .map(|p| p * scale)
            .collect();
        let targets = cfg.frame.place(&corresponded);

        let mut refinement = Refinement::new(mesh, targets, cfg.refinement.clone())?;
        let report = refinement.run(&topology, integrator, bus)?;
        let (mesh, targets) = refinement.into_parts();

        tracing::info!(
            rounds = report.rounds,
            state = ?report.state,
            trace_mean = report.trace.mean,
            "design complete"
        );

        Ok(DesignOutput {
            mesh,
            topology,
            targets,
            report,
        })
    }
}
