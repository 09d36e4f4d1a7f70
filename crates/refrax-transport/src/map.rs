//! Transport maps between the uniform sample domain and the
//! density-weighted image domain.
//!
//! A [`TransportMap`] stores one node grid of `(res+1)²` vertices in each
//! domain, sharing a single triangulation. Nodes with the same index
//! correspond, and points between nodes are mapped by barycentric
//! interpolation inside the containing triangle.

use rayon::prelude::*;
use refrax_math::DVec2;
use refrax_mesh::TriangleMesh;
use refrax_types::{RefraxError, RefraxResult};

use crate::locate::TriangleLocator;

/// A piecewise-linear, measure-preserving correspondence.
#[derive(Debug, Clone)]
pub struct TransportMap {
    /// Cells per side of the node grid.
    resolution: usize,
    /// Node positions in the density-weighted image domain.
    origin: Vec<DVec2>,
    /// Node positions in the uniform sample domain.
    forward: Vec<DVec2>,
    /// Shared triangulation of both node sets.
    triangles: Vec<[u32; 3]>,
    origin_locator: TriangleLocator,
    forward_locator: TriangleLocator,
}

impl TransportMap {
    /// Builds a map from matching node grids of `(resolution + 1)²` nodes.
    pub fn new(resolution: usize, origin: Vec<DVec2>, forward: Vec<DVec2>) -> RefraxResult<Self> {
        if resolution == 0 {
            return Err(RefraxError::InvalidConfig(
                "Transport map resolution must be at least 1".into(),
            ));
        }
        let expected = (resolution + 1) * (resolution + 1);
        if origin.len() != expected || forward.len() != expected {
            return Err(RefraxError::InvalidMesh(format!(
                "Transport map at resolution {resolution} needs {expected} nodes, \
                 got {} origin / {} forward",
                origin.len(),
                forward.len()
            )));
        }
        if let Some(bad) = origin.iter().chain(&forward).position(|p| !p.is_finite()) {
            return Err(RefraxError::InvalidMesh(format!(
                "Transport map node {} is not finite",
                bad % expected
            )));
        }

        let triangles = grid_triangles(resolution);
        let bins = resolution.max(1);
        let origin_locator = TriangleLocator::build(&origin, &triangles, bins);
        let forward_locator = TriangleLocator::build(&forward, &triangles, bins);

        Ok(Self {
            resolution,
            origin,
            forward,
            triangles,
            origin_locator,
            forward_locator,
        })
    }

    /// The identity map on the unit square.
    pub fn identity(resolution: usize) -> RefraxResult<Self> {
        let nodes = unit_grid_nodes(resolution.max(1));
        Self::new(resolution, nodes.clone(), nodes)
    }

    /// Cells per side of the node grid.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Node positions in the density-weighted domain.
    pub fn origin_nodes(&self) -> &[DVec2] {
        &self.origin
    }

    /// Node positions in the uniform domain.
    pub fn forward_nodes(&self) -> &[DVec2] {
        &self.forward
    }

    /// Shared triangulation of both node grids.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// The origin node grid as a flat mesh at z = 0.
    pub fn origin_mesh(&self) -> TriangleMesh {
        self.as_mesh(&self.origin)
    }

    /// The forward node grid as a flat mesh at z = 0.
    pub fn forward_mesh(&self) -> TriangleMesh {
        self.as_mesh(&self.forward)
    }

    fn as_mesh(&self, nodes: &[DVec2]) -> TriangleMesh {
        let mut mesh = TriangleMesh::with_capacity(nodes.len(), self.triangles.len());
        for p in nodes {
            mesh.pos_x.push(p.x);
            mesh.pos_y.push(p.y);
            mesh.pos_z.push(0.0);
        }
        mesh.indices = self.triangles.iter().flatten().copied().collect();
        mesh
    }

    /// Maps a point from the density-weighted domain to the uniform domain.
    pub fn forward(&self, p: DVec2) -> DVec2 {
        interpolate(
            &self.origin_locator,
            &self.origin,
            &self.forward,
            &self.triangles,
            p,
        )
    }

    /// Maps a point from the uniform domain to the density-weighted domain.
    pub fn inverse(&self, p: DVec2) -> DVec2 {
        interpolate(
            &self.forward_locator,
            &self.forward,
            &self.origin,
            &self.triangles,
            p,
        )
    }

    /// Maps every point through [`inverse`](Self::inverse).
    pub fn apply_inverse_map(&self, points: Vec<DVec2>) -> Vec<DVec2> {
        points.into_par_iter().map(|p| self.inverse(p)).collect()
    }
}

/// Locates `p` among `from` nodes and interpolates the matching `to` nodes.
fn interpolate(
    locator: &TriangleLocator,
    from: &[DVec2],
    to: &[DVec2],
    triangles: &[[u32; 3]],
    p: DVec2,
) -> DVec2 {
    match locator.locate(from, triangles, p) {
        Some(loc) => {
            let [a, b, c] = triangles[loc.triangle];
            to[a as usize] * loc.weights[0]
                + to[b as usize] * loc.weights[1]
                + to[c as usize] * loc.weights[2]
        }
        // Every node collapsed onto a line: nothing to interpolate.
        None => p,
    }
}

/// Node `i + j·(res+1)` at `(i/res, j/res)`.
pub fn unit_grid_nodes(resolution: usize) -> Vec<DVec2> {
    let n = resolution + 1;
    let step = 1.0 / resolution as f64;
    (0..n)
        .flat_map(|j| (0..n).map(move |i| DVec2::new(i as f64 * step, j as f64 * step)))
        .collect()
}

/// Triangulates an `(res+1)²` node grid with the surface grid's winding.
pub fn grid_triangles(resolution: usize) -> Vec<[u32; 3]> {
    let n = (resolution + 1) as u32;
    let mut triangles = Vec::with_capacity(resolution * resolution * 2);
    for j in 0..resolution as u32 {
        for i in 0..resolution as u32 {
            let low_left = j * n + i;
            let low_right = low_left + 1;
            let up_left = low_left + n;
            let up_right = up_left + 1;
            triangles.push([low_left, low_right, up_left]);
            triangles.push([low_right, up_right, up_left]);
        }
    }
    triangles
}
