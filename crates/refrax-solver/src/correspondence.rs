//! Correspondence composer.
//!
//! Chains the source map (source density → uniform square) with the
//! inverse of the target map (uniform square → target density), so that
//! samples distributed like the source land distributed like the target.

use refrax_math::DVec2;
use refrax_transport::TransportMap;
use refrax_types::{RefraxError, RefraxResult};

/// Maps every point through `target⁻¹ ∘ source`.
///
/// Both maps must share one resolution whose node count equals the number
/// of points; anything else is a configuration error. The composition is
/// built as a map of its own (target inverse of the source's uniform nodes,
/// paired with the source's density nodes) and then evaluated at `points`.
pub fn compose_correspondence(
    source: &TransportMap,
    target: &TransportMap,
    points: Vec<DVec2>,
) -> RefraxResult<Vec<DVec2>> {
    if source.resolution() != target.resolution() {
        return Err(RefraxError::InvalidConfig(format!(
            "Transport maps were solved at different resolutions ({} vs {})",
            source.resolution(),
            target.resolution()
        )));
    }
    let nodes = source.origin_nodes().len();
    if nodes != points.len() {
        return Err(RefraxError::InvalidConfig(format!(
            "Transport maps have {nodes} nodes but {} samples were given",
            points.len()
        )));
    }

    let composed_origin = target.apply_inverse_map(source.forward_nodes().to_vec());
    let composed = TransportMap::new(
        source.resolution(),
        composed_origin,
        source.origin_nodes().to_vec(),
    )?;

    tracing::debug!(samples = points.len(), "composing correspondence");
    Ok(composed.apply_inverse_map(points))
}
