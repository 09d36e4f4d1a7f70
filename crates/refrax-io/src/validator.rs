//! Design validation.
//!
//! Rejects unusable designs before any image is read or any solver runs.

use refrax_types::{RefraxError, RefraxResult};

use crate::config::DesignConfig;

/// Validates a complete design.
///
/// Checks:
/// - Both density image paths are given
/// - Surface resolution and extent are usable
/// - Transport, optics and output parameters are in range
pub fn validate_config(config: &DesignConfig) -> RefraxResult<()> {
    if config.input.source.as_os_str().is_empty() {
        return Err(RefraxError::InvalidConfig(
            "Missing source density image ([input] source)".into(),
        ));
    }
    if config.input.target.as_os_str().is_empty() {
        return Err(RefraxError::InvalidConfig(
            "Missing target density image ([input] target)".into(),
        ));
    }

    let surface = &config.surface;
    if surface.resolution < 3 {
        return Err(RefraxError::InvalidConfig(format!(
            "Surface resolution must be >= 3, got {}",
            surface.resolution
        )));
    }
    if !(surface.width > 0.0 && surface.height > 0.0)
        || !surface.width.is_finite()
        || !surface.height.is_finite()
    {
        return Err(RefraxError::InvalidConfig(format!(
            "Surface extent must be positive, got {}×{}",
            surface.width, surface.height
        )));
    }

    let floor = config.transport.density_floor;
    if !(floor >= 0.0 && floor.is_finite()) {
        return Err(RefraxError::InvalidConfig(format!(
            "density_floor must be non-negative, got {floor}"
        )));
    }

    config.optics.frame.validate()?;
    config.optics.refinement.validate()?;

    let thickness = config.output.thickness;
    if !(thickness > 0.0 && thickness.is_finite()) {
        return Err(RefraxError::InvalidConfig(format!(
            "Solid thickness must be positive, got {thickness}"
        )));
    }
    if config.output.obj.as_os_str().is_empty() {
        return Err(RefraxError::InvalidConfig("Missing output OBJ path".into()));
    }

    Ok(())
}
