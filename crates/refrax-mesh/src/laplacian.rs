//! Edge weights and Laplacian matrix assembly.
//!
//! The normal integrator fits heights to per-edge height differences;
//! each edge contributes `w (z_b - z_a)²`, which assembles into the
//! weighted graph Laplacian `L`. A diagonal shift makes the system SPD.

use refrax_math::sparse::CsrMatrix;
use serde::{Deserialize, Serialize};

use crate::mesh::TriangleMesh;
use crate::topology::Topology;

/// How edges are weighted in the Laplacian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeWeighting {
    /// Every edge has weight 1 (graph Laplacian).
    #[default]
    Uniform,
    /// Cotangent weights `(cot α + cot β) / 2` from the planar (x, y) layout,
    /// clamped at zero.
    Cotangent,
}

/// Computes one weight per entry of `topology.edges`.
pub fn edge_weights(mesh: &TriangleMesh, topology: &Topology, weighting: EdgeWeighting) -> Vec<f64> {
    match weighting {
        EdgeWeighting::Uniform => vec![1.0; topology.edges.len()],
        EdgeWeighting::Cotangent => topology
            .edges
            .iter()
            .zip(&topology.edge_triangles)
            .map(|(&[a, b], tris)| {
                let sum: f64 = tris
                    .iter()
                    .map(|&t| cotangent_opposite(mesh, t as usize, a, b))
                    .sum();
                (0.5 * sum).max(0.0)
            })
            .collect(),
    }
}

/// Cotangent of the angle opposite edge (a, b) in triangle `t`, in the XY plane.
fn cotangent_opposite(mesh: &TriangleMesh, t: usize, a: u32, b: u32) -> f64 {
    let [i, j, k] = mesh.triangle(t);
    let wing = [i, j, k]
        .into_iter()
        .find(|&v| v != a && v != b)
        .unwrap_or(k) as usize;

    let (wx, wy) = (mesh.pos_x[wing], mesh.pos_y[wing]);
    let (ux, uy) = (mesh.pos_x[a as usize] - wx, mesh.pos_y[a as usize] - wy);
    let (vx, vy) = (mesh.pos_x[b as usize] - wx, mesh.pos_y[b as usize] - wy);

    let dot = ux * vx + uy * vy;
    let cross = (ux * vy - uy * vx).abs();
    if cross < 1e-300 {
        0.0
    } else {
        dot / cross
    }
}

/// Assembles `L + shift·I` for `n` vertices.
///
/// Returns an N×N CSR matrix.
pub fn assemble_laplacian(n: usize, edges: &[[u32; 2]], weights: &[f64], shift: f64) -> CsrMatrix {
    // Capacity estimate: N diagonal + 4 entries per edge
    let mut triplets: Vec<(usize, usize, f64)> = Vec::with_capacity(n + edges.len() * 4);

    for i in 0..n {
        triplets.push((i, i, shift));
    }

    for (&[a, b], &w) in edges.iter().zip(weights) {
        let (a, b) = (a as usize, b as usize);
        triplets.push((a, a, w));
        triplets.push((b, b, w));
        triplets.push((a, b, -w));
        triplets.push((b, a, -w));
    }

    CsrMatrix::from_triplets(n, n, &triplets)
}
