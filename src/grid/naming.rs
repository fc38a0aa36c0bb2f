// src/grid/naming.rs

//! Output file naming.
//!
//! A job's output file is `<output_dir>/<v1>.<v2>...<vn>.<suffix>` where
//! `v1..vn` are the values of the naming-key axes, in key order.

use std::path::PathBuf;

use crate::grid::axis::{GridPoint, ParameterAxis};
use crate::errors::{GridrunError, Result};

/// Suffix appended to every output file name unless configured otherwise.
pub const DEFAULT_SUFFIX: &str = "sched.out";

/// How output paths are derived from grid points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingScheme {
    /// Axis names forming the identity key. `None` means "every axis,
    /// innermost first", resolved against the grid by [`NamingScheme::resolve_key`].
    key: Option<Vec<String>>,
    suffix: String,
    output_dir: PathBuf,
}

impl Default for NamingScheme {
    fn default() -> Self {
        Self {
            key: None,
            suffix: DEFAULT_SUFFIX.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl NamingScheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit key instead of the default (all axes, innermost first).
    pub fn with_key<I, S>(mut self, key: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key = Some(key.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// The effective key for a given set of axes.
    pub fn resolve_key(&self, axes: &[ParameterAxis]) -> Vec<String> {
        match &self.key {
            Some(key) => key.clone(),
            None => axes.iter().rev().map(|a| a.name().to_string()).collect(),
        }
    }

    /// Check that names built from `key` are usable and pairwise distinct
    /// over the whole grid.
    ///
    /// Joining with `.` stays injective as long as at most one component may
    /// itself contain a `.`: the other components are then recovered by
    /// counting separators from either end.
    pub(crate) fn validate(&self, axes: &[ParameterAxis], key: &[String]) -> Result<()> {
        if self.suffix.contains(['/', '\\']) {
            return Err(GridrunError::config(format!(
                "output suffix '{}' must not contain a path separator",
                self.suffix
            )));
        }
        if key.is_empty() && self.suffix.is_empty() {
            return Err(GridrunError::config(
                "naming key and output suffix are both empty; output files would have no name",
            ));
        }

        let mut dotted_axes = Vec::new();
        for (i, name) in key.iter().enumerate() {
            if key[..i].contains(name) {
                return Err(GridrunError::config(format!(
                    "axis '{name}' appears more than once in the naming key"
                )));
            }
            let axis = axes.iter().find(|a| a.name() == name).ok_or_else(|| {
                GridrunError::config(format!("naming key references unknown axis '{name}'"))
            })?;

            let mut dotted = false;
            for value in axis.values() {
                let rendered = value.to_string();
                if rendered.is_empty() {
                    return Err(GridrunError::config(format!(
                        "axis '{name}' has an empty value, which cannot be part of a file name"
                    )));
                }
                if rendered.contains(['/', '\\']) || rendered == "." || rendered == ".." {
                    return Err(GridrunError::config(format!(
                        "axis '{name}' value '{rendered}' cannot be part of a file name"
                    )));
                }
                dotted |= rendered.contains('.');
            }
            if dotted {
                dotted_axes.push(name.as_str());
            }
        }

        if dotted_axes.len() > 1 {
            return Err(GridrunError::config(format!(
                "naming key axes {dotted_axes:?} all have values containing '.'; \
                 output names would be ambiguous (at most one such axis is allowed)"
            )));
        }

        Ok(())
    }

    /// File name for a point. `point` must expose every key axis.
    pub(crate) fn file_name(&self, key: &[String], point: &GridPoint<'_>) -> String {
        let mut parts: Vec<String> = key
            .iter()
            .filter_map(|name| point.get(name).map(|v| v.to_string()))
            .collect();
        if !self.suffix.is_empty() {
            parts.push(self.suffix.clone());
        }
        parts.join(".")
    }

    pub(crate) fn output_path(&self, key: &[String], point: &GridPoint<'_>) -> PathBuf {
        self.output_dir.join(self.file_name(key, point))
    }
}
