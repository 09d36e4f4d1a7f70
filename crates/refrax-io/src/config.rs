//! TOML design configuration.
//!
//! ```toml
//! [input]
//! source = "light.png"
//! target = "caustic.png"
//!
//! [surface]
//! resolution = 100
//!
//! [optics.frame]
//! focal_length = 1.0
//!
//! [optics.refinement]
//! max_rounds = 10
//! light = { kind = "point_source", position = [0.5, 0.5, 0.5] }
//!
//! [output]
//! obj = "lens.obj"
//! thickness = 0.2
//! ```
//!
//! Every section except `[input]` is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use refrax_solver::{FrameTransform, PipelineConfig, RefinementConfig};
use refrax_transport::TransportOptions;
use refrax_types::constants::{DEFAULT_SOLID_THICKNESS, DEFAULT_SURFACE_RESOLUTION};
use refrax_types::{RefraxError, RefraxResult};

/// Top-level design file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub transport: TransportOptions,
    #[serde(default)]
    pub optics: OpticsConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Density images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Incoming light distribution.
    #[serde(default)]
    pub source: PathBuf,
    /// Desired caustic.
    #[serde(default)]
    pub target: PathBuf,
}

/// Lens sampling grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    /// Samples per side.
    #[serde(default = "default_resolution")]
    pub resolution: usize,
    #[serde(default = "default_extent")]
    pub width: f64,
    #[serde(default = "default_extent")]
    pub height: f64,
}

fn default_resolution() -> usize {
    DEFAULT_SURFACE_RESOLUTION
}

fn default_extent() -> f64 {
    1.0
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            resolution: default_resolution(),
            width: default_extent(),
            height: default_extent(),
        }
    }
}

/// Target plane placement and refinement parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpticsConfig {
    #[serde(default)]
    pub frame: FrameTransform,
    #[serde(default)]
    pub refinement: RefinementConfig,
}

/// Where results go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Solid lens mesh.
    #[serde(default = "default_obj")]
    pub obj: PathBuf,
    /// Base thickness below the lowest surface point.
    #[serde(default = "default_thickness")]
    pub thickness: f64,
    /// Optional drawing of the target grid.
    #[serde(default)]
    pub svg: Option<PathBuf>,
    /// Optional drawing of the refined surface triangulation.
    #[serde(default)]
    pub mesh_svg: Option<PathBuf>,
}

fn default_obj() -> PathBuf {
    PathBuf::from("caustic.obj")
}

fn default_thickness() -> f64 {
    DEFAULT_SOLID_THICKNESS
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            obj: default_obj(),
            thickness: default_thickness(),
            svg: None,
            mesh_svg: None,
        }
    }
}

impl DesignConfig {
    /// A default design for the given density images.
    pub fn with_inputs(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            input: InputConfig {
                source: source.into(),
                target: target.into(),
            },
            surface: SurfaceConfig::default(),
            transport: TransportOptions::default(),
            optics: OpticsConfig::default(),
            output: OutputConfig::default(),
        }
    }

    /// Parses a design from TOML text.
    pub fn from_toml_str(text: &str) -> RefraxResult<Self> {
        toml::from_str(text).map_err(|e| RefraxError::Serialization(e.to_string()))
    }

    /// Reads and parses a design file.
    pub fn load(path: &Path) -> RefraxResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded design config");
        Ok(config)
    }

    /// Serializes the design back to TOML.
    pub fn to_toml_string(&self) -> RefraxResult<String> {
        toml::to_string_pretty(self).map_err(|e| RefraxError::Serialization(e.to_string()))
    }

    /// The pipeline settings this design describes.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            source: self.input.source.clone(),
            target: self.input.target.clone(),
            resolution: self.surface.resolution,
            width: self.surface.width,
            height: self.surface.height,
            transport: self.transport,
            frame: self.optics.frame,
            refinement: self.optics.refinement.clone(),
        }
    }
}
