// src/config/mod.rs

//! Sweep file loading and validation for gridrun.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a sweep file from disk and apply CLI overrides (`loader.rs`).
//! - Validate settings and build the grid (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    load_and_validate, load_from_path, load_with_overrides,
    parse_and_validate, DEFAULT_CONFIG_FILE,
};
pub use model::{AxisConfig, ConfigOverrides, RawConfigFile, SweepConfig, SweepSection};
