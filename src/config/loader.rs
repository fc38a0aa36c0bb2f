// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{ConfigOverrides, RawConfigFile, SweepConfig};
use crate::errors::Result;

/// Load a sweep file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** build or check
/// the grid. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a sweep file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` default functions).
/// - Builds the grid, checking:
///   - every `{placeholder}` in `cmd` names an axis,
///   - every varying or referenced axis is part of the naming key,
///   - `concurrency >= 1`.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SweepConfig> {
    load_with_overrides(path, &ConfigOverrides::default())
}

/// Like [`load_and_validate`], with command-line overrides applied before
/// validation.
pub fn load_with_overrides(
    path: impl AsRef<Path>,
    overrides: &ConfigOverrides,
) -> Result<SweepConfig> {
    let mut raw_config = load_from_path(&path)?;
    overrides.apply(&mut raw_config);
    let config = SweepConfig::try_from(raw_config)?;
    Ok(config)
}

/// Parse and validate a sweep definition held in memory.
pub fn parse_and_validate(contents: &str) -> Result<SweepConfig> {
    let raw: RawConfigFile = toml::from_str(contents)?;
    SweepConfig::try_from(raw)
}

/// Sweep file looked up in the current working directory by default.
pub const DEFAULT_CONFIG_FILE: &str = "Gridrun.toml";
