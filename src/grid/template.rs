// src/grid/template.rs

//! Command templates: pure functions from a grid point to a command string.
//!
//! Every template declares the axes it reads. The expander checks those
//! declarations against the grid before producing a single job, so a
//! placeholder that no axis binds is a configuration error instead of a
//! half-substituted command at launch time.

use std::fmt;
use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{GridrunError, Result};
use crate::grid::axis::{is_identifier, GridPoint};

/// A pure mapping from a parameter assignment to an (opaque) command line.
pub trait CommandTemplate: Send + Sync + fmt::Debug {
    /// Axis names this template reads, without duplicates.
    fn placeholders(&self) -> Vec<&str>;

    /// Render the command. `point` only exposes the declared placeholders.
    fn render(&self, point: &GridPoint<'_>) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

// `{{` / `}}` escapes, `{...}` groups, and stray braces, in that priority.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{([^{}]*)\}|[{}]").expect("static regex"));

/// Template parsed from a string with `{axis}` placeholders.
///
/// ```text
/// ./gcn_sim -hash-table-size={buffer_size} -graph-name={graph}
/// ```
///
/// `{{` and `}}` produce literal braces. Any other brace usage (`{}`,
/// `{a b}`, an unmatched `{`) is rejected when parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PlaceholderTemplate {
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in TOKEN_RE.captures_iter(&source) {
            let Some(whole) = caps.get(0) else { continue };
            literal.push_str(&source[last..whole.start()]);
            last = whole.end();

            match (whole.as_str(), caps.get(1)) {
                ("{{", _) => literal.push('{'),
                ("}}", _) => literal.push('}'),
                (_, Some(name)) => {
                    let name = name.as_str();
                    if !is_identifier(name) {
                        return Err(GridrunError::config(format!(
                            "invalid placeholder '{{{name}}}' in command template \
                             (write '{{{{' / '}}}}' for literal braces)"
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(name.to_string()));
                }
                (brace, None) => {
                    return Err(GridrunError::config(format!(
                        "unmatched '{brace}' at byte {} in command template",
                        whole.start()
                    )));
                }
            }
        }

        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { source, segments })
    }
}

impl CommandTemplate for PlaceholderTemplate {
    fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    fn render(&self, point: &GridPoint<'_>) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => match point.get(name) {
                    Some(value) => {
                        let _ = write!(out, "{value}");
                    }
                    // Unreachable through the expander, which validates bindings.
                    None => {
                        let _ = write!(out, "{{{name}}}");
                    }
                },
            }
        }
        out
    }
}

type RenderFn = dyn for<'a> Fn(&GridPoint<'a>) -> String + Send + Sync;

/// Template backed by a closure with an explicit list of inputs.
///
/// The closure only sees the declared inputs; reading any other axis yields
/// `None` from [`GridPoint::get`].
pub struct FnTemplate {
    inputs: Vec<String>,
    render: Box<RenderFn>,
}

impl FnTemplate {
    pub fn new<I, S, F>(inputs: I, render: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: for<'a> Fn(&GridPoint<'a>) -> String + Send + Sync + 'static,
    {
        let mut declared: Vec<String> = Vec::new();
        for input in inputs {
            let input = input.into();
            if !declared.contains(&input) {
                declared.push(input);
            }
        }
        Self {
            inputs: declared,
            render: Box::new(render),
        }
    }
}

impl fmt::Debug for FnTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTemplate")
            .field("inputs", &self.inputs)
            .finish_non_exhaustive()
    }
}

impl CommandTemplate for FnTemplate {
    fn placeholders(&self) -> Vec<&str> {
        self.inputs.iter().map(String::as_str).collect()
    }

    fn render(&self, point: &GridPoint<'_>) -> String {
        (self.render)(point)
    }
}
