use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// One value on a sweep axis, as written in the TOML file.
///
/// Values are only ever rendered as text (into commands and file names), so
/// the variants exist to accept natural TOML literals like `values = [32, 64]`
/// or `values = ["g1", "g2"]` without forcing everything to be quoted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AxisValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl fmt::Display for AxisValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisValue::Integer(v) => write!(f, "{v}"),
            AxisValue::Float(v) => write!(f, "{v}"),
            AxisValue::Bool(v) => write!(f, "{v}"),
            AxisValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for AxisValue {
    fn from(v: i64) -> Self {
        AxisValue::Integer(v)
    }
}

impl From<i32> for AxisValue {
    fn from(v: i32) -> Self {
        AxisValue::Integer(i64::from(v))
    }
}

impl From<f64> for AxisValue {
    fn from(v: f64) -> Self {
        AxisValue::Float(v)
    }
}

impl From<bool> for AxisValue {
    fn from(v: bool) -> Self {
        AxisValue::Bool(v)
    }
}

impl From<&str> for AxisValue {
    fn from(v: &str) -> Self {
        AxisValue::Text(v.to_string())
    }
}

impl From<String> for AxisValue {
    fn from(v: String) -> Self {
        AxisValue::Text(v)
    }
}

/// How a command string is turned into a process.
///
/// - `Shell`: hand the string to `sh -c` (`cmd /C` on Windows). Redirections,
///   `;` and environment expansion work, but a missing binary shows up as the
///   shell's exit status (127) rather than a launch error.
/// - `Direct`: split the string with POSIX shell-word rules and exec the
///   program directly. A missing binary is a launch error.
///
/// Only `Direct` reports an unstartable program as a per-job launch error;
/// under `Shell` the shell itself always starts, so the same job completes
/// with exit code 127 and is counted as a non-zero exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    Shell,
    Direct,
}

impl Default for LaunchMode {
    fn default() -> Self {
        LaunchMode::Shell
    }
}

impl FromStr for LaunchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "shell" => Ok(LaunchMode::Shell),
            "direct" => Ok(LaunchMode::Direct),
            other => Err(format!(
                "invalid launch_mode: {other} (expected \"shell\" or \"direct\")"
            )),
        }
    }
}
