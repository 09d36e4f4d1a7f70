//! # refrax-transport
//!
//! The transport collaborator of the caustic designer: turns a 2D density
//! image into a measure-preserving map between the uniform unit square and
//! the density-weighted image domain.
//!
//! ## Key Types
//!
//! - [`Density`] — non-negative scalar matrix loaded from a grayscale image.
//! - [`TransportMap`] — node meshes in both domains with forward and inverse
//!   evaluation.
//! - [`TransportSolver`] — `init(resolution)` / `solve(density, options)`;
//!   [`GridTransportSolver`] is the built-in implementation.

pub mod density;
pub mod locate;
pub mod map;
pub mod solver;

pub use density::Density;
pub use map::TransportMap;
pub use solver::{GridTransportSolver, TransportOptions, TransportSolver};
