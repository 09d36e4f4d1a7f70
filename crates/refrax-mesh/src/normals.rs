//! Vertex normal computation from triangle mesh data.
//!
//! Computes area-weighted vertex normals by accumulating
//! face normals from each adjacent triangle.

use refrax_math::DVec3;

use crate::mesh::TriangleMesh;

/// Computes the area-weighted vertex normals of the current surface.
///
/// Each triangle's face normal (weighted by its area) is accumulated
/// at each vertex and the sum is normalized. Vertices without any
/// triangle get `DVec3::ZERO`.
pub fn compute_vertex_normals(mesh: &TriangleMesh) -> Vec<DVec3> {
    let mut normals = vec![DVec3::ZERO; mesh.vertex_count()];

    for t in 0..mesh.triangle_count() {
        let [a, b, c] = mesh.triangle(t).map(|v| v as usize);
        let pa = mesh.position_dvec3(a);
        let e1 = mesh.position_dvec3(b) - pa;
        let e2 = mesh.position_dvec3(c) - pa;

        // Magnitude = 2 × triangle area
        let face = e1.cross(e2);

        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    for n in &mut normals {
        let len = n.length();
        if len > 1e-15 {
            *n /= len;
        }
    }

    normals
}
