//! # refrax-math
//!
//! Linear algebra primitives for refrax.
//!
//! Provides:
//! - Re-exports of `glam` double-precision types (`DVec2`, `DVec3`, `DMat3`)
//! - Guarded normalization that reports degenerate vectors instead of NaNs
//! - Sparse matrix representation (CSR) and Cholesky solver interface

pub mod faer_solver;
pub mod sparse;
pub mod vector;

// Re-export glam types as the canonical math types for refrax.
pub use glam::{DMat3, DVec2, DVec3};
pub use vector::normalize_or_degenerate;
