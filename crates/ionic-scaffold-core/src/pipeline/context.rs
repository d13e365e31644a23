//! Shared state passed between pipeline stages

use crate::error::{Result, ScaffoldError};
use crate::runtime::PackageManager;
use std::path::{Path, PathBuf};

/// Written by earlier stages, read by later ones
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    project_dir: PathBuf,
    working_dir: PathBuf,
    package_manager: Option<PackageManager>,
}

impl ExecutionContext {
    /// Start in `working_dir` (where the project folder lives)
    pub fn new(project_dir: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            working_dir: working_dir.into(),
            package_manager: None,
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Base directory for subprocesses and relative file operations
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Later stages operate inside the project
    pub fn enter_project(&mut self) {
        self.working_dir = self.project_dir.clone();
    }

    pub fn set_package_manager(&mut self, pm: PackageManager) {
        self.package_manager = Some(pm);
    }

    /// The package manager resolved by an earlier stage
    pub fn package_manager(&self) -> Result<PackageManager> {
        self.package_manager.ok_or_else(|| {
            ScaffoldError::validation("Package manager has not been resolved yet")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_project_moves_working_dir() {
        let mut ctx = ExecutionContext::new("/work/demo-app", "/work");
        assert_eq!(ctx.working_dir(), Path::new("/work"));
        ctx.enter_project();
        assert_eq!(ctx.working_dir(), Path::new("/work/demo-app"));
    }

    #[test]
    fn test_package_manager_must_be_resolved() {
        let mut ctx = ExecutionContext::new("/work/demo-app", "/work");
        assert!(ctx.package_manager().is_err());
        ctx.set_package_manager(PackageManager::Pnpm);
        assert_eq!(ctx.package_manager().unwrap(), PackageManager::Pnpm);
    }
}
