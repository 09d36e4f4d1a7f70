//! Fresnel normal field.
//!
//! For each surface sample, the unit normal that sends the incident ray
//! through the sample onto its assigned target:
//!
//! ```text
//! t = normalize(target − surface)
//! i = normalize(surface − light)      (point source)
//!   = (0, 0, −1)                      (parallel light)
//! reflective:  n ∝ t + i
//! refractive:  n ∝ −(t − η·i)
//! ```
//!
//! When the combination vanishes (matching indices and coinciding rays, or
//! a ray reflected straight back) the normal is taken along the ray axis.
//! Every other normalization is guarded; a near-zero transmitted or incident
//! vector fails the whole field with [`RefraxError::DegenerateGeometry`]
//! naming the lowest bad sample.

use rayon::prelude::*;
use refrax_math::{normalize_or_degenerate, DVec3};
use refrax_types::{RefraxError, RefraxResult};

use crate::config::{LightModel, RefinementConfig, SurfaceModel};

/// Incident direction of parallel light.
pub const PARALLEL_INCIDENT: DVec3 = DVec3::new(0.0, 0.0, -1.0);

/// Unit incident direction at `surface` for sample `index`.
pub fn incident_direction(
    surface: DVec3,
    light: &LightModel,
    epsilon: f64,
    index: usize,
) -> RefraxResult<DVec3> {
    match *light {
        LightModel::Parallel => Ok(PARALLEL_INCIDENT),
        LightModel::PointSource { position } => normalize_or_degenerate(
            surface - DVec3::from_array(position),
            epsilon,
            index,
            "incident ray (sample coincides with the light)",
        ),
    }
}

/// Normal steering unit incident `i` into unit transmitted `t`.
pub fn surface_normal(
    incident: DVec3,
    transmitted: DVec3,
    surface: SurfaceModel,
    refractive_index: f64,
    epsilon: f64,
    index: usize,
) -> RefraxResult<DVec3> {
    let raw = match surface {
        SurfaceModel::Reflective => transmitted + incident,
        SurfaceModel::Refractive => -(transmitted - incident * refractive_index),
    };
    if raw.length() < epsilon {
        // Undeviated ray: any normal along the ray axis works.
        return normalize_or_degenerate(-incident, epsilon, index, "incident ray");
    }
    normalize_or_degenerate(raw, epsilon, index, "surface normal")
}

/// Normal for one sample.
pub fn fresnel_normal(
    surface: DVec3,
    target: DVec3,
    config: &RefinementConfig,
    index: usize,
) -> RefraxResult<DVec3> {
    let transmitted = normalize_or_degenerate(
        target - surface,
        config.norm_epsilon,
        index,
        "transmitted ray (sample coincides with its target)",
    )?;
    let incident = incident_direction(surface, &config.light, config.norm_epsilon, index)?;
    surface_normal(
        incident,
        transmitted,
        config.surface,
        config.refractive_index,
        config.norm_epsilon,
        index,
    )
}

/// Computes one unit normal per sample, in parallel.
pub fn normal_field(
    surface: &[DVec3],
    targets: &[DVec3],
    config: &RefinementConfig,
) -> RefraxResult<Vec<DVec3>> {
    if surface.len() != targets.len() {
        return Err(RefraxError::InvalidConfig(format!(
            "{} surface samples but {} targets",
            surface.len(),
            targets.len()
        )));
    }

    let normals: Vec<RefraxResult<DVec3>> = surface
        .par_iter()
        .zip(targets.par_iter())
        .enumerate()
        .map(|(i, (&s, &t))| fresnel_normal(s, t, config, i))
        .collect();

    // Sequential collect reports the lowest failing index.
    normals.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_light_on_sample_is_degenerate() {
        let light = LightModel::PointSource {
            position: [1.0, 2.0, 3.0],
        };
        let err = incident_direction(DVec3::new(1.0, 2.0, 3.0), &light, 1e-12, 7).unwrap_err();
        assert!(matches!(err, RefraxError::DegenerateGeometry { index: 7, .. }));
    }

    #[test]
    fn reflective_normal_is_normalized_sum() {
        let n = surface_normal(
            PARALLEL_INCIDENT,
            DVec3::X,
            SurfaceModel::Reflective,
            1.0,
            1e-12,
            0,
        )
        .unwrap();
        let s = std::f64::consts::FRAC_1_SQRT_2;
        assert!((n - DVec3::new(s, 0.0, -s)).length() < 1e-12);
    }

    #[test]
    fn retro_reflection_uses_ray_axis() {
        let n = surface_normal(
            PARALLEL_INCIDENT,
            DVec3::Z,
            SurfaceModel::Reflective,
            1.0,
            1e-12,
            3,
        )
        .unwrap();
        assert_eq!(n, DVec3::Z);
    }

    #[test]
    fn target_on_sample_is_degenerate() {
        let config = RefinementConfig::default();
        let p = DVec3::new(0.5, 0.5, 0.0);
        let err = fresnel_normal(p, p, &config, 11).unwrap_err();
        assert!(matches!(err, RefraxError::DegenerateGeometry { index: 11, .. }));
    }
}
