// src/grid/mod.rs

//! Grid expansion: axes + command template + naming scheme -> jobs.
//!
//! - [`axis`] defines sweep axes and the per-point view templates read from.
//! - [`template`] holds the `CommandTemplate` trait and its implementations.
//! - [`naming`] derives output paths and checks that they cannot collide.
//! - [`expander`] validates all of the above and lazily yields `JobSpec`s.
//!
//! Nothing here touches the filesystem or spawns processes.

pub mod axis;
pub mod expander;
pub mod naming;
pub mod template;

pub use axis::{AxisName, GridPoint, ParameterAxis};
pub use expander::{GridExpander, JobSpec, JobSpecs};
pub use naming::{NamingScheme, DEFAULT_SUFFIX};
pub use template::{CommandTemplate, FnTemplate, PlaceholderTemplate};
