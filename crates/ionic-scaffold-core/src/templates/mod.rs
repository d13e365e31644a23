//! Template package lookup, placeholder substitution and materialization
//!
//! This module provides:
//! - [`TemplateResolver`] to locate the bundled template package
//! - [`substitute`] for `{{ key }}` placeholders
//! - [`Materializer`] to copy template trees into a project

pub mod materializer;
pub mod resolver;
pub mod substitute;

pub use materializer::{MaterializeOptions, Materializer};
pub use resolver::TemplateResolver;
pub use substitute::{substitute, SubstitutionMap};
