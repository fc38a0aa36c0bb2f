// src/grid/axis.rs

//! Sweep axes and the borrowed per-point view handed to templates.

use std::collections::HashSet;

use crate::errors::{GridrunError, Result};
use crate::types::AxisValue;

/// Canonical axis name type.
pub type AxisName = String;

/// One independent sweep dimension: a name plus an ordered, non-empty list of
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterAxis {
    name: AxisName,
    values: Vec<AxisValue>,
}

impl ParameterAxis {
    /// Build an axis, rejecting empty value lists, invalid names and values
    /// that render to the same text (they would produce identical jobs).
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<AxisValue>,
    {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(GridrunError::config(format!(
                "axis name '{name}' must match [A-Za-z_][A-Za-z0-9_]*"
            )));
        }

        let values: Vec<AxisValue> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Err(GridrunError::config(format!(
                "axis '{name}' must have at least one value"
            )));
        }

        let mut seen = HashSet::new();
        for value in &values {
            let rendered = value.to_string();
            if !seen.insert(rendered.clone()) {
                return Err(GridrunError::config(format!(
                    "axis '{name}' lists value '{rendered}' more than once"
                )));
            }
        }

        Ok(Self { name, values })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[AxisValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed axis; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Borrowed view of one axis-value assignment.
///
/// Templates receive a point restricted to the axes they declared, so a
/// lookup of anything else returns `None`.
#[derive(Debug, Clone)]
pub struct GridPoint<'a> {
    entries: Vec<(&'a str, &'a AxisValue)>,
}

impl<'a> GridPoint<'a> {
    pub(crate) fn new(entries: Vec<(&'a str, &'a AxisValue)>) -> Self {
        Self { entries }
    }

    /// Value bound to `axis`, if visible at this point.
    pub fn get(&self, axis: &str) -> Option<&'a AxisValue> {
        self.entries
            .iter()
            .find(|(name, _)| *name == axis)
            .map(|(_, value)| *value)
    }

    /// Iterate `(axis, value)` pairs in axis order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a AxisValue)> + '_ {
        self.entries.iter().copied()
    }

    /// Narrow this point to the given axes, keeping axis order.
    pub(crate) fn restricted_to(&self, axes: &[&str]) -> GridPoint<'a> {
        GridPoint::new(
            self.entries
                .iter()
                .copied()
                .filter(|(name, _)| axes.contains(name))
                .collect(),
        )
    }
}

pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
