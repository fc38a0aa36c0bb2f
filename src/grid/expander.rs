// src/grid/expander.rs

//! Cartesian expansion of axes into `JobSpec`s.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::errors::{GridrunError, Result};
use crate::grid::axis::{GridPoint, ParameterAxis};
use crate::grid::naming::NamingScheme;
use crate::grid::template::CommandTemplate;
use crate::types::AxisValue;

/// One fully resolved point of the grid.
///
/// Immutable: the assignment, the rendered command and the output path are
/// all fixed when the spec is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    index: usize,
    assignment: Vec<(String, AxisValue)>,
    command: String,
    output_path: PathBuf,
}

impl JobSpec {
    /// Position of this spec in expansion order (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    /// `(axis, value)` pairs in axis declaration order.
    pub fn assignment(&self) -> &[(String, AxisValue)] {
        &self.assignment
    }

    pub fn value(&self, axis: &str) -> Option<&AxisValue> {
        self.assignment
            .iter()
            .find(|(name, _)| name == axis)
            .map(|(_, value)| value)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
}

impl fmt::Display for JobSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)?;
        for (name, value) in &self.assignment {
            write!(f, " {name}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
struct Grid {
    axes: Vec<ParameterAxis>,
    template: Box<dyn CommandTemplate>,
    inputs: Vec<String>,
    naming: NamingScheme,
    key: Vec<String>,
    len: usize,
}

impl Grid {
    fn job_at(&self, index: usize) -> JobSpec {
        let mut picks = vec![0usize; self.axes.len()];
        let mut rest = index;
        for (slot, axis) in picks.iter_mut().zip(&self.axes).rev() {
            *slot = rest % axis.len();
            rest /= axis.len();
        }

        let entries: Vec<(&str, &AxisValue)> = self
            .axes
            .iter()
            .zip(&picks)
            .map(|(axis, &i)| (axis.name(), &axis.values()[i]))
            .collect();
        let point = GridPoint::new(entries);

        let inputs: Vec<&str> = self.inputs.iter().map(String::as_str).collect();
        let command = self.template.render(&point.restricted_to(&inputs));
        let output_path = self.naming.output_path(&self.key, &point);

        JobSpec {
            index,
            assignment: point
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
            command,
            output_path,
        }
    }
}

/// Validated grid definition that can be expanded any number of times.
///
/// Cloning is cheap; clones share the same definition.
#[derive(Debug, Clone)]
pub struct GridExpander {
    grid: Arc<Grid>,
}

impl GridExpander {
    /// Validate axes, template and naming scheme together.
    ///
    /// All configuration errors surface here, before any job exists:
    /// duplicate axis names, placeholders no axis binds, naming-key problems,
    /// and varying or referenced axes missing from the naming key.
    pub fn new<T>(axes: Vec<ParameterAxis>, template: T, naming: NamingScheme) -> Result<Self>
    where
        T: CommandTemplate + 'static,
    {
        Self::from_boxed(axes, Box::new(template), naming)
    }

    pub fn from_boxed(
        axes: Vec<ParameterAxis>,
        template: Box<dyn CommandTemplate>,
        naming: NamingScheme,
    ) -> Result<Self> {
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].iter().any(|a| a.name() == axis.name()) {
                return Err(GridrunError::config(format!(
                    "axis '{}' is declared more than once",
                    axis.name()
                )));
            }
        }

        let inputs: Vec<String> = template
            .placeholders()
            .into_iter()
            .map(str::to_string)
            .collect();
        for input in &inputs {
            if !axes.iter().any(|a| a.name() == input) {
                return Err(GridrunError::config(format!(
                    "command template references '{input}', which is not a declared axis"
                )));
            }
        }

        let key = naming.resolve_key(&axes);
        naming.validate(&axes, &key)?;

        for input in &inputs {
            if !key.contains(input) {
                return Err(GridrunError::config(format!(
                    "axis '{input}' is used by the command template but missing from the \
                     naming key; outputs would overwrite each other"
                )));
            }
        }
        for axis in axes.iter().filter(|a| a.len() > 1) {
            if !key.iter().any(|k| k == axis.name()) {
                return Err(GridrunError::config(format!(
                    "axis '{}' has {} values but is missing from the naming key; \
                     outputs would overwrite each other",
                    axis.name(),
                    axis.len()
                )));
            }
        }

        let len = if axes.is_empty() {
            0
        } else {
            axes.iter()
                .try_fold(1usize, |acc, a| acc.checked_mul(a.len()))
                .ok_or_else(|| GridrunError::config("grid size overflows usize"))?
        };

        debug!(
            axes = axes.len(),
            jobs = len,
            key = ?key,
            "grid validated"
        );

        Ok(Self {
            grid: Arc::new(Grid {
                axes,
                template,
                inputs,
                naming,
                key,
                len,
            }),
        })
    }

    /// Number of jobs: the product of axis lengths (0 for no axes).
    pub fn len(&self) -> usize {
        self.grid.len
    }

    pub fn is_empty(&self) -> bool {
        self.grid.len == 0
    }

    pub fn axes(&self) -> &[ParameterAxis] {
        &self.grid.axes
    }

    /// The axes, in order, whose values form output file names.
    pub fn naming_key(&self) -> &[String] {
        &self.grid.key
    }

    /// Lazily produce every job in nested-loop order: the first axis varies
    /// slowest, the last axis fastest. Each call starts from the beginning.
    pub fn expand(&self) -> JobSpecs {
        JobSpecs {
            grid: Arc::clone(&self.grid),
            next: 0,
        }
    }
}

/// Lazy, owned iterator over a grid's jobs.
#[derive(Debug, Clone)]
pub struct JobSpecs {
    grid: Arc<Grid>,
    next: usize,
}

impl Iterator for JobSpecs {
    type Item = JobSpec;

    fn next(&mut self) -> Option<JobSpec> {
        if self.next >= self.grid.len {
            return None;
        }
        let job = self.grid.job_at(self.next);
        self.next += 1;
        Some(job)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len - self.next;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<JobSpec> {
        self.next = self.next.saturating_add(n).min(self.grid.len);
        self.next()
    }
}

impl ExactSizeIterator for JobSpecs {}

impl std::iter::FusedIterator for JobSpecs {}
