//! Mesh topology queries.
//!
//! Builds adjacency data structures from the triangle index buffer:
//! vertex-to-triangle fans, unique edges, and boundary detection used by
//! normal integration and solid export.

use std::collections::{BTreeSet, HashMap};

use crate::mesh::TriangleMesh;

/// Precomputed topology information for a triangle mesh.
///
/// Built once after mesh construction and immutable for the whole run.
#[derive(Debug, Clone)]
pub struct Topology {
    /// For each vertex, the list of triangles that contain it.
    pub vertex_triangles: Vec<Vec<u32>>,

    /// Unique edges as `[v_min, v_max]` pairs, sorted.
    pub edges: Vec<[u32; 2]>,

    /// For each edge, the one or two adjacent triangles.
    /// Boundary edges have exactly 1 adjacent triangle.
    pub edge_triangles: Vec<Vec<u32>>,
}

impl Topology {
    /// Build topology from a triangle mesh.
    pub fn build(mesh: &TriangleMesh) -> Self {
        let vertex_count = mesh.vertex_count();
        let tri_count = mesh.triangle_count();

        let mut vertex_triangles: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];
        for t in 0..tri_count {
            for v in mesh.triangle(t) {
                vertex_triangles[v as usize].push(t as u32);
            }
        }

        // Key: (min_vertex, max_vertex) to canonicalize edge direction
        let mut edge_map: HashMap<(u32, u32), Vec<u32>> = HashMap::new();
        for t in 0..tri_count {
            let [a, b, c] = mesh.triangle(t);
            for (v0, v1) in [(a, b), (b, c), (c, a)] {
                let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
                edge_map.entry(key).or_default().push(t as u32);
            }
        }

        let mut sorted: Vec<((u32, u32), Vec<u32>)> = edge_map.into_iter().collect();
        sorted.sort_unstable_by_key(|(key, _)| *key);

        let mut edges = Vec::with_capacity(sorted.len());
        let mut edge_triangles = Vec::with_capacity(sorted.len());
        for ((v0, v1), tris) in sorted {
            edges.push([v0, v1]);
            edge_triangles.push(tris);
        }

        Self {
            vertex_triangles,
            edges,
            edge_triangles,
        }
    }

    /// Returns the 1-ring vertex neighborhood of vertex `v`, sorted.
    pub fn one_ring(&self, v: u32, mesh: &TriangleMesh) -> Vec<u32> {
        let mut neighbors = BTreeSet::new();
        for &tri in &self.vertex_triangles[v as usize] {
            for w in mesh.triangle(tri as usize) {
                if w != v {
                    neighbors.insert(w);
                }
            }
        }
        neighbors.into_iter().collect()
    }

    /// Returns the edges with exactly one adjacent triangle.
    pub fn boundary_edges(&self) -> Vec<[u32; 2]> {
        self.edges
            .iter()
            .zip(&self.edge_triangles)
            .filter(|(_, tris)| tris.len() == 1)
            .map(|(edge, _)| *edge)
            .collect()
    }

    /// Returns the number of boundary edges (edges with only 1 adjacent triangle).
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_triangles
            .iter()
            .filter(|tris| tris.len() == 1)
            .count()
    }

    /// Flags every vertex that lies on a boundary edge.
    pub fn boundary_vertices(&self) -> Vec<bool> {
        let mut flags = vec![false; self.vertex_triangles.len()];
        for [a, b] in self.boundary_edges() {
            flags[a as usize] = true;
            flags[b as usize] = true;
        }
        flags
    }

    /// Returns true if the mesh is closed (no boundary edges).
    pub fn is_closed(&self) -> bool {
        self.boundary_edge_count() == 0
    }
}
