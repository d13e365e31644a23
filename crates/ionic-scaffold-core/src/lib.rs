//! Ionic Scaffold Core - Library for scaffolding SvelteKit projects with Ionic UI
//!
//! This library creates a new SvelteKit project and overlays the Ionic starter
//! files from a bundled template package. The binary supplies a
//! [`ProductConfig`]; everything else lives here.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Template resolution, `{{ key }}` substitution,
//!   type stripping, materialization, package-manager invocation
//! - **Layer 2: Workflow Orchestration** - The staged [`pipeline`] and
//!   [`create_project`], which rolls the destination back on failure
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use ionic_scaffold_core::{create_project, ProjectSpec, TypesMode};
//! use ionic_scaffold_core::pipeline::ConsoleReporter;
//! use ionic_scaffold_core::runtime::ProcessRunner;
//! use ionic_scaffold_core::templates::{Materializer, TemplateResolver};
//!
//! let spec = ProjectSpec::builder("demo-app").types(TypesMode::CheckJs).build();
//! let resolver = TemplateResolver::from_config(&MyConfig, &std::env::current_dir()?);
//! let path = create_project(
//!     &spec,
//!     &Materializer::new(resolver),
//!     &ProcessRunner::new(false),
//!     &ConsoleReporter,
//! )
//! .await?;
//! ```

pub mod cleanup;
pub mod config;
pub mod create;
pub mod error;
pub mod pipeline;
pub mod product;
pub mod project;
pub mod runtime;
pub mod strip;
pub mod summary;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use cleanup::{cleanup_handler, report_failure};
pub use create::create_project;
pub use error::{CreateError, ErrorKind, RollbackOutcome, ScaffoldError};
pub use product::ProductConfig;
pub use project::{Features, ProjectOptions, ProjectSpec, TypesMode};
pub use runtime::PackageManager;
pub use summary::print_summary;
pub use templates::{substitute, Materializer, SubstitutionMap, TemplateResolver};

#[cfg(feature = "tui")]
pub use tui::run;
