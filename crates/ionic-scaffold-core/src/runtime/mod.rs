//! Runtime detection and package manager invocation
//!
//! This module provides:
//! - Node.js detection with a minimum-version advisory
//! - Package manager detection and command construction
//! - A subprocess runner behind the [`CommandRunner`] seam

pub mod check;
pub mod package_manager;
pub mod runner;

pub use check::{check_node, check_node_compatibility, RuntimeInfo};
pub use package_manager::{Invocation, PackageManager, PmAction};
pub use runner::{CommandRunner, ProcessRunner};
