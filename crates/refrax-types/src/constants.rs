//! Optical constants and design defaults.

/// Default refractive index of the lens material (acrylic / crown glass).
pub const DEFAULT_REFRACTIVE_INDEX: f64 = 1.55;

/// Default distance between the lens surface and the target image plane.
pub const DEFAULT_FOCAL_LENGTH: f64 = 1.0;

/// Default number of refinement rounds (normal field → integration).
pub const DEFAULT_REFINEMENT_ROUNDS: u32 = 10;

/// Default number of surface samples per side of the grid.
pub const DEFAULT_SURFACE_RESOLUTION: usize = 100;

/// Default base thickness of the exported solid (same units as the grid).
pub const DEFAULT_SOLID_THICKNESS: f64 = 0.2;

/// Default point-light position used by the point-source light model.
pub const DEFAULT_POINT_LIGHT: [f64; 3] = [0.5, 0.5, 0.5];

/// Minimum vector magnitude accepted by normalization.
pub const DEFAULT_NORM_EPSILON: f64 = 1.0e-12;

/// Tolerance for unit-length checks on normal fields.
pub const UNIT_LENGTH_TOLERANCE: f64 = 1.0e-9;

/// Weight of the anchoring term in the normal-integration system.
pub const DEFAULT_ANCHOR_WEIGHT: f64 = 1.0e-4;

/// Floor applied to normalized densities so no image cell is empty.
pub const DEFAULT_DENSITY_FLOOR: f64 = 1.0e-3;
