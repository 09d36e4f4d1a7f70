//! # refrax-types
//!
//! Shared types, error types, and optical constants
//! for the refrax caustic lens designer.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other refrax crates share.

pub mod constants;
pub mod error;

pub use error::{RefraxError, RefraxResult};
