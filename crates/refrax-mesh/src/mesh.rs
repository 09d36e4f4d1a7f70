//! Core triangle mesh type with SoA (Structure of Arrays) layout.
//!
//! The SoA layout stores each coordinate channel contiguously:
//! - `pos_x: [x0, x1, x2, ...]`
//! - `pos_y: [y0, y1, y2, ...]`
//! - `pos_z: [z0, z1, z2, ...]`
//!
//! The refinement loop only ever rewrites `pos_z`; x and y are fixed by
//! the sampling grid, so vertex `i` keeps its (x, y) for the whole run.

use refrax_math::DVec3;
use refrax_types::{RefraxError, RefraxResult};
use serde::{Deserialize, Serialize};

/// A triangle mesh stored in Structure-of-Arrays layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    // --- Vertex data (SoA) ---
    /// X coordinates of all vertices.
    pub pos_x: Vec<f64>,
    /// Y coordinates of all vertices.
    pub pos_y: Vec<f64>,
    /// Z coordinates (heights) of all vertices.
    pub pos_z: Vec<f64>,

    // --- Triangle data ---
    /// Triangle indices — each triangle is [v0, v1, v2].
    /// Stored flat: `[t0v0, t0v1, t0v2, t1v0, t1v1, t1v2, ...]`
    pub indices: Vec<u32>,
}

impl TriangleMesh {
    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos_x.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns the position of vertex `i` as `[x, y, z]`.
    #[inline]
    pub fn position(&self, i: usize) -> [f64; 3] {
        [self.pos_x[i], self.pos_y[i], self.pos_z[i]]
    }

    /// Returns the position as a `glam::DVec3`.
    #[inline]
    pub fn position_dvec3(&self, i: usize) -> DVec3 {
        DVec3::new(self.pos_x[i], self.pos_y[i], self.pos_z[i])
    }

    /// Returns all vertex positions as `DVec3`s, in vertex order.
    pub fn points(&self) -> Vec<DVec3> {
        (0..self.vertex_count()).map(|i| self.position_dvec3(i)).collect()
    }

    /// Returns the three vertex indices of triangle `t`.
    #[inline]
    pub fn triangle(&self, t: usize) -> [u32; 3] {
        let base = t * 3;
        [self.indices[base], self.indices[base + 1], self.indices[base + 2]]
    }

    /// Replaces every height with `heights`.
    pub fn set_heights(&mut self, heights: &[f64]) -> RefraxResult<()> {
        if heights.len() != self.vertex_count() {
            return Err(RefraxError::InvalidMesh(format!(
                "Height count ({}) != vertex count ({})",
                heights.len(),
                self.vertex_count()
            )));
        }
        self.pos_z.copy_from_slice(heights);
        Ok(())
    }

    /// Returns the highest z over all vertices (`-inf` for an empty mesh).
    pub fn max_height(&self) -> f64 {
        self.pos_z.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Returns the lowest z over all vertices (`+inf` for an empty mesh).
    pub fn min_height(&self) -> f64 {
        self.pos_z.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Creates an empty mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_capacity: usize, triangle_capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(vertex_capacity),
            pos_y: Vec::with_capacity(vertex_capacity),
            pos_z: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(triangle_capacity * 3),
        }
    }

    /// Validates mesh integrity.
    ///
    /// Checks:
    /// - All SoA arrays have the same length
    /// - Triangle indices are within bounds
    /// - No degenerate triangles (repeated vertex indices)
    /// - All coordinates are finite
    pub fn validate(&self) -> RefraxResult<()> {
        let n = self.pos_x.len();

        if self.pos_y.len() != n || self.pos_z.len() != n {
            return Err(RefraxError::InvalidMesh(
                "Position arrays have inconsistent lengths".into(),
            ));
        }

        if self.indices.len() % 3 != 0 {
            return Err(RefraxError::InvalidMesh(
                "Index count is not divisible by 3".into(),
            ));
        }

        for (i, &idx) in self.indices.iter().enumerate() {
            if idx as usize >= n {
                return Err(RefraxError::InvalidMesh(format!(
                    "Index {} at position {} is out of range (vertex count: {})",
                    idx, i, n
                )));
            }
        }

        for t in 0..self.triangle_count() {
            let [a, b, c] = self.triangle(t);
            if a == b || b == c || a == c {
                return Err(RefraxError::InvalidMesh(format!(
                    "Triangle {} has repeated vertex indices: [{}, {}, {}]",
                    t, a, b, c
                )));
            }
        }

        let finite = |v: &Vec<f64>| v.iter().all(|c| c.is_finite());
        if !(finite(&self.pos_x) && finite(&self.pos_y) && finite(&self.pos_z)) {
            return Err(RefraxError::InvalidMesh(
                "Mesh contains non-finite coordinates".into(),
            ));
        }

        Ok(())
    }

    /// Constructs a mesh from interleaved AoS position data
    /// `[x0, y0, z0, x1, y1, z1, ...]`.
    pub fn from_interleaved(positions: &[f64], indices: &[u32]) -> RefraxResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(RefraxError::InvalidMesh(
                "Interleaved positions length not divisible by 3".into(),
            ));
        }

        let n = positions.len() / 3;
        let mut mesh = Self::with_capacity(n, indices.len() / 3);

        for p in positions.chunks_exact(3) {
            mesh.pos_x.push(p[0]);
            mesh.pos_y.push(p[1]);
            mesh.pos_z.push(p[2]);
        }
        mesh.indices = indices.to_vec();

        mesh.validate()?;
        Ok(mesh)
    }
}
