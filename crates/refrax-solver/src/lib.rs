//! # refrax-solver
//!
//! The caustic design core: turns two transport maps into fixed 3D ray
//! targets and refines a lens height field until its normals steer every
//! ray onto its target.
//!
//! ## Key Types
//!
//! - [`RefinementConfig`] — round cap, tolerance, light and surface model
//! - [`FrameTransform`] — places the target image plane in optical space
//! - [`NormalIntegrator`] — pluggable normal-to-height reconstruction
//! - [`PoissonIntegrator`] — sparse least-squares integrator (faer LLᵀ)
//! - [`Refinement`] — the refinement loop state machine
//! - [`Pipeline`] — density images in, refined surface out

pub mod config;
pub mod correspondence;
pub mod frame;
pub mod fresnel;
pub mod integration;
pub mod pipeline;
pub mod refinement;
pub mod trace;

pub use config::{LightModel, RefinementConfig, SurfaceModel};
pub use correspondence::compose_correspondence;
pub use frame::FrameTransform;
pub use fresnel::normal_field;
pub use integration::{NormalIntegrator, PoissonIntegrator};
pub use pipeline::{DesignOutput, Pipeline, PipelineConfig};
pub use refinement::{Refinement, RefinementReport, RefinementState};
pub use trace::{trace_residual, TraceReport};
