//! Refinement configuration.
//!
//! Parameters that control the refinement loop: round cap, early-stop
//! tolerance, normalization guard, refractive index, the light and
//! surface models, and the normal integrator's weighting.

use refrax_mesh::laplacian::EdgeWeighting;
use serde::{Deserialize, Serialize};
use refrax_types::constants::{
    DEFAULT_ANCHOR_WEIGHT, DEFAULT_NORM_EPSILON, DEFAULT_POINT_LIGHT, DEFAULT_REFINEMENT_ROUNDS,
    DEFAULT_REFRACTIVE_INDEX,
};
use refrax_types::{RefraxError, RefraxResult};

/// Incident illumination.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LightModel {
    /// Collimated light travelling along −z.
    #[default]
    Parallel,
    /// Light radiating from a single point.
    PointSource {
        /// Light position in the optical frame.
        position: [f64; 3],
    },
}

impl LightModel {
    /// A point source at the default position.
    pub fn default_point_source() -> Self {
        LightModel::PointSource {
            position: DEFAULT_POINT_LIGHT,
        }
    }
}

/// How the surface redirects light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceModel {
    /// Snell refraction through the surface.
    #[default]
    Refractive,
    /// Mirror reflection off the surface.
    Reflective,
}

/// Configuration for the surface refinement loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    /// Maximum refinement rounds.
    pub max_rounds: u32,

    /// Early-stop threshold on the largest per-sample height change.
    /// `0.0` disables early stopping and always runs `max_rounds`.
    pub tolerance: f64,

    /// Vectors shorter than this fail normalization.
    pub norm_epsilon: f64,

    /// Refractive index ratio of the lens material.
    pub refractive_index: f64,

    pub light: LightModel,

    pub surface: SurfaceModel,

    /// Edge weighting of the normal integration system.
    pub weighting: EdgeWeighting,

    /// Pull of each height toward its value at the start of the round.
    pub anchor_weight: f64,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_REFINEMENT_ROUNDS,
            tolerance: 0.0,
            norm_epsilon: DEFAULT_NORM_EPSILON,
            refractive_index: DEFAULT_REFRACTIVE_INDEX,
            light: LightModel::Parallel,
            surface: SurfaceModel::Refractive,
            weighting: EdgeWeighting::Uniform,
            anchor_weight: DEFAULT_ANCHOR_WEIGHT,
        }
    }
}

impl RefinementConfig {
    /// Creates a config for debugging (few rounds, loose tolerance).
    pub fn debug() -> Self {
        Self {
            max_rounds: 3,
            tolerance: 1e-3,
            ..Default::default()
        }
    }

    /// Creates a high-quality config (more rounds, tight tolerance).
    pub fn high_quality() -> Self {
        Self {
            max_rounds: 50,
            tolerance: 1e-7,
            ..Default::default()
        }
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> RefraxResult<()> {
        if self.max_rounds == 0 {
            return Err(RefraxError::InvalidConfig(
                "max_rounds must be >= 1".into(),
            ));
        }
        if !(self.tolerance >= 0.0) {
            return Err(RefraxError::InvalidConfig(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        if !(self.norm_epsilon > 0.0 && self.norm_epsilon.is_finite()) {
            return Err(RefraxError::InvalidConfig(format!(
                "norm_epsilon must be positive, got {}",
                self.norm_epsilon
            )));
        }
        if !(self.refractive_index > 0.0 && self.refractive_index.is_finite()) {
            return Err(RefraxError::InvalidConfig(format!(
                "refractive_index must be positive, got {}",
                self.refractive_index
            )));
        }
        if !(self.anchor_weight > 0.0 && self.anchor_weight.is_finite()) {
            return Err(RefraxError::InvalidConfig(format!(
                "anchor_weight must be positive, got {}",
                self.anchor_weight
            )));
        }
        if let LightModel::PointSource { position } = self.light {
            if position.iter().any(|c| !c.is_finite()) {
                return Err(RefraxError::InvalidConfig(
                    "Point light position must be finite".into(),
                ));
            }
        }
        Ok(())
    }

    /// Whether early stopping is enabled.
    pub fn early_stop(&self) -> bool {
        self.tolerance > 0.0
    }
}
