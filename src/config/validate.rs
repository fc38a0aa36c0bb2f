// src/config/validate.rs

use crate::config::model::{RawConfigFile, SweepConfig};
use crate::errors::{GridrunError, Result};
use crate::grid::{GridExpander, NamingScheme, ParameterAxis, PlaceholderTemplate};

impl TryFrom<RawConfigFile> for SweepConfig {
    type Error = crate::errors::GridrunError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_sweep_section(&raw)?;
        let grid = build_grid(&raw)?;
        Ok(SweepConfig::new_unchecked(raw.sweep, raw.axis, grid))
    }
}

fn validate_sweep_section(cfg: &RawConfigFile) -> Result<()> {
    // launch_mode is strongly typed and validated during deserialization.

    if cfg.sweep.concurrency == 0 {
        return Err(GridrunError::ConfigError(
            "[sweep].concurrency must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.sweep.cmd.trim().is_empty() {
        return Err(GridrunError::ConfigError(
            "[sweep].cmd must not be empty".to_string(),
        ));
    }

    if cfg.sweep.output_dir.as_os_str().is_empty() {
        return Err(GridrunError::ConfigError(
            "[sweep].output_dir must not be empty (use \".\" for the working directory)"
                .to_string(),
        ));
    }

    Ok(())
}

/// Turn the raw axes, template and naming settings into a validated grid.
///
/// Axis, template and naming-key mismatches are reported here, so a bad
/// sweep file never launches anything.
fn build_grid(cfg: &RawConfigFile) -> Result<GridExpander> {
    let axes = cfg
        .axis
        .iter()
        .map(|a| ParameterAxis::new(a.name.clone(), a.values.iter().cloned()))
        .collect::<Result<Vec<_>>>()?;

    let template = PlaceholderTemplate::parse(cfg.sweep.cmd.clone())?;

    let mut naming = NamingScheme::new()
        .with_suffix(cfg.sweep.suffix.clone())
        .with_output_dir(cfg.sweep.output_dir.clone());
    if let Some(ref key) = cfg.sweep.name_key {
        naming = naming.with_key(key.iter().cloned());
    }

    GridExpander::new(axes, template, naming)
}
