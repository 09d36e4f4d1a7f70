//! # refrax-mesh
//!
//! Triangle mesh representation with Structure-of-Arrays (SoA) layout
//! for the lens surface.
//!
//! ## Key Types
//!
//! - [`TriangleMesh`] — The surface sample set. Stores positions and
//!   triangle indices in contiguous SoA buffers.
//! - [`Topology`] — Adjacency queries (vertex-to-triangle, edges, boundary).
//! - Grid generator for the rectangular sampling grid.
//! - Laplacian edge weights and matrix assembly for normal integration.

pub mod generators;
pub mod laplacian;
pub mod mesh;
pub mod normals;
pub mod topology;

pub use mesh::TriangleMesh;
pub use topology::Topology;
