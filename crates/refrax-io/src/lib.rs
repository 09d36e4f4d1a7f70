//! # refrax-io
//!
//! The file boundary of the caustic designer: TOML design configs and
//! their validation, and export of the refined lens as a solid OBJ plus
//! SVG drawings of the target grid.

pub mod config;
pub mod export;
pub mod svg;
pub mod validator;

pub use config::DesignConfig;
pub use export::export_solid_obj;
pub use validator::validate_config;
