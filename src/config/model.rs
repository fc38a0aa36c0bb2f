// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::grid::{GridExpander, DEFAULT_SUFFIX};
use crate::types::{AxisValue, LaunchMode};

/// Top-level sweep file as read from TOML, before validation.
///
/// ```toml
/// [sweep]
/// cmd = "./gcn_sim -hash-table-size={buffer_size} -graph-name={graph} -short-large-divider={divider}"
/// concurrency = 10
///
/// [[axis]]
/// name = "divider"
/// values = [1, 2, 4, 8, 16]
///
/// [[axis]]
/// name = "buffer_size"
/// values = [32, 64, 128, 256, 512]
///
/// [[axis]]
/// name = "graph"
/// values = ["g1", "g2"]
/// ```
///
/// Axis order in the file is the loop nesting order: the first `[[axis]]`
/// is the outermost loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    pub sweep: SweepSection,

    #[serde(default)]
    pub axis: Vec<AxisConfig>,
}

/// `[sweep]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepSection {
    /// Command template with `{axis}` placeholders.
    pub cmd: String,

    /// Maximum number of processes running at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Directory receiving the output files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Literal tag appended to every output file name.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// `"shell"` (default) or `"direct"`.
    #[serde(default)]
    pub launch_mode: LaunchMode,

    /// Axes whose values form output names, in order.
    ///
    /// If `None`, every axis is used, innermost first.
    #[serde(default)]
    pub name_key: Option<Vec<String>>,
}

fn default_concurrency() -> usize {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

/// `[[axis]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisConfig {
    pub name: String,
    pub values: Vec<AxisValue>,
}

/// Settings supplied on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub concurrency: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub launch_mode: Option<LaunchMode>,
}

impl ConfigOverrides {
    pub fn apply(&self, raw: &mut RawConfigFile) {
        if let Some(concurrency) = self.concurrency {
            raw.sweep.concurrency = concurrency;
        }
        if let Some(ref dir) = self.output_dir {
            raw.sweep.output_dir = dir.clone();
        }
        if let Some(mode) = self.launch_mode {
            raw.sweep.launch_mode = mode;
        }
    }
}

/// Validated sweep: settings plus the grid built from them.
///
/// Only obtainable through `TryFrom<RawConfigFile>`, so holding one means
/// the grid is consistent with the template and naming key.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    sweep: SweepSection,
    axis: Vec<AxisConfig>,
    grid: GridExpander,
}

impl SweepConfig {
    pub(crate) fn new_unchecked(sweep: SweepSection, axis: Vec<AxisConfig>, grid: GridExpander) -> Self {
        Self { sweep, axis, grid }
    }

    pub fn sweep(&self) -> &SweepSection {
        &self.sweep
    }

    pub fn axes(&self) -> &[AxisConfig] {
        &self.axis
    }

    pub fn grid(&self) -> &GridExpander {
        &self.grid
    }

    pub fn concurrency(&self) -> usize {
        self.sweep.concurrency
    }

    pub fn launch_mode(&self) -> LaunchMode {
        self.sweep.launch_mode
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.sweep.output_dir
    }
}
