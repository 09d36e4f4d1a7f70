//! Ray-trace diagnostic.
//!
//! Checks the reconstructed surface against its targets: rays are bent by
//! the actual vertex normals of the mesh (not the desired Fresnel normals),
//! intersected with the horizontal plane through each target, and the miss
//! distance is measured.

use serde::{Deserialize, Serialize};
use refrax_math::DVec3;
use refrax_mesh::normals::compute_vertex_normals;
use refrax_mesh::TriangleMesh;
use refrax_types::{RefraxError, RefraxResult};

use crate::config::{RefinementConfig, SurfaceModel};
use crate::fresnel::incident_direction;

/// Summary of traced miss distances.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TraceReport {
    /// Rays that reached their target plane.
    pub traced: usize,
    /// Rays lost to total internal reflection or running parallel to the plane.
    pub missed: usize,
    /// Mean distance between hit point and target.
    pub mean: f64,
    /// Largest distance between hit point and target.
    pub max: f64,
}

/// Refracts unit `d` through a surface with unit normal `n`.
///
/// `eta` is the index ratio of the incident medium over the exit medium.
/// The normal may face either way. Returns `None` on total internal
/// reflection.
pub fn refract(d: DVec3, n: DVec3, eta: f64) -> Option<DVec3> {
    let n = if n.dot(d) > 0.0 { -n } else { n };
    let cos_i = -n.dot(d);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(d * eta + n * (eta * cos_i - cos_t))
}

/// Mirrors unit `d` about unit normal `n`.
pub fn reflect(d: DVec3, n: DVec3) -> DVec3 {
    d - n * (2.0 * d.dot(n))
}

/// Traces every sample of `mesh` toward its target.
pub fn trace_residual(
    mesh: &TriangleMesh,
    targets: &[DVec3],
    config: &RefinementConfig,
) -> RefraxResult<TraceReport> {
    if targets.len() != mesh.vertex_count() {
        return Err(RefraxError::InvalidConfig(format!(
            "{} targets for {} surface samples",
            targets.len(),
            mesh.vertex_count()
        )));
    }

    let normals = compute_vertex_normals(mesh);
    let mut report = TraceReport::default();
    let mut total = 0.0;

    for (i, (normal, target)) in normals.iter().zip(targets).enumerate() {
        let origin = mesh.position_dvec3(i);
        let incident = incident_direction(origin, &config.light, config.norm_epsilon, i)?;

        let outgoing = match config.surface {
            SurfaceModel::Refractive => refract(incident, *normal, config.refractive_index),
            SurfaceModel::Reflective => Some(reflect(incident, *normal)),
        };
        let Some(ray) = outgoing else {
            report.missed += 1;
            continue;
        };
        if ray.z.abs() < config.norm_epsilon {
            report.missed += 1;
            continue;
        }
        let s = (target.z - origin.z) / ray.z;
        if s < 0.0 {
            report.missed += 1;
            continue;
        }

        let distance = (origin + ray * s).distance(*target);
        total += distance;
        report.max = report.max.max(distance);
        report.traced += 1;
    }

    if report.traced > 0 {
        report.mean = total / report.traced as f64;
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refraction_at_normal_incidence_is_straight() {
        let d = DVec3::new(0.0, 0.0, -1.0);
        let t = refract(d, DVec3::Z, 1.55).unwrap();
        assert!((t - d).length() < 1e-12);
    }

    #[test]
    fn grazing_exit_from_dense_medium_is_total_internal_reflection() {
        let d = DVec3::new(0.8, 0.0, -0.6);
        assert!(refract(d, DVec3::Z, 1.55).is_none());
    }

    #[test]
    fn refraction_obeys_snell() {
        let d = DVec3::new(0.3, 0.0, -(1.0f64 - 0.09).sqrt());
        let eta = 1.2;
        let t = refract(d, DVec3::Z, eta).unwrap();
        assert!((t.length() - 1.0).abs() < 1e-12);
        // sin θt = η sin θi
        assert!((t.x - eta * d.x).abs() < 1e-12);
    }

    #[test]
    fn reflection_flips_normal_component() {
        let r = reflect(DVec3::new(1.0, 0.0, -1.0), DVec3::Z);
        assert_eq!(r, DVec3::new(1.0, 0.0, 1.0));
    }
}
