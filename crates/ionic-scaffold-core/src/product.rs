//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to tell the core which template package
//! to materialize, where to look for overrides and which links to print.

use crate::project::ProjectSpec;

/// Configuration trait for the scaffolding product
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Logical name of the bundled template package, e.g. `@scope/example`
    fn template_package(&self) -> &'static str;

    /// Directory name of the copy of the template package shipped with the CLI
    fn bundled_template_dir(&self) -> &'static str;

    /// Environment variable name for overriding the template package location
    fn template_dir_env(&self) -> &'static str;

    /// Issue tracker URL printed under every error report
    fn issues_url(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, spec: &ProjectSpec) -> Vec<String>;
}
