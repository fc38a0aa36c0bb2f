#![allow(dead_code)]

use std::path::PathBuf;

use gridrun::config::{AxisConfig, RawConfigFile, SweepConfig, SweepSection};
use gridrun::errors::Result;
use gridrun::grid::DEFAULT_SUFFIX;
use gridrun::types::{AxisValue, LaunchMode};

/// Builder for `SweepConfig` to simplify test setup.
pub struct SweepConfigBuilder {
    config: RawConfigFile,
}

impl SweepConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            config: RawConfigFile {
                sweep: SweepSection {
                    cmd: cmd.to_string(),
                    concurrency: 1,
                    output_dir: PathBuf::from("."),
                    suffix: DEFAULT_SUFFIX.to_string(),
                    launch_mode: LaunchMode::Shell,
                    name_key: None,
                },
                axis: Vec::new(),
            },
        }
    }

    pub fn axis<V: Into<AxisValue>>(mut self, name: &str, values: impl IntoIterator<Item = V>) -> Self {
        self.config.axis.push(AxisConfig {
            name: name.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn concurrency(mut self, k: usize) -> Self {
        self.config.sweep.concurrency = k;
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.sweep.output_dir = dir.into();
        self
    }

    pub fn suffix(mut self, suffix: &str) -> Self {
        self.config.sweep.suffix = suffix.to_string();
        self
    }

    pub fn launch_mode(mut self, mode: LaunchMode) -> Self {
        self.config.sweep.launch_mode = mode;
        self
    }

    pub fn name_key(mut self, key: &[&str]) -> Self {
        self.config.sweep.name_key = Some(key.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn try_build(self) -> Result<SweepConfig> {
        SweepConfig::try_from(self.config)
    }

    pub fn build(self) -> SweepConfig {
        self.try_build()
            .expect("Failed to build valid sweep config from builder")
    }
}

/// The sweep from the original launcher script, with the workload list
/// reduced to the given names.
pub fn gcn_sweep(workloads: &[&str]) -> SweepConfigBuilder {
    SweepConfigBuilder::new(
        "echo {graph};./gcn_sim -hash-table-size={buffer_size} -graph-name={graph} \
         -short-large-divider={divider} -enable-fast-sched",
    )
    .axis("divider", [1, 2, 4, 8, 16])
    .axis("buffer_size", [32, 64, 128, 256, 512])
    .axis("graph", workloads.iter().copied())
    .concurrency(10)
}
