//! Error taxonomy for project creation
//!
//! Every fallible core operation returns [`ScaffoldError`]. The project-creation
//! entry point wraps it in [`CreateError`], which carries the path of the
//! partially created project so the caller can report what was rolled back.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the core
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Kind tag for a [`ScaffoldError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationFailure,
    FileSystemFailure,
    PackageManagerFailure,
    TemplateNotFound,
    SourceNotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ValidationFailure => "ValidationFailure",
            ErrorKind::FileSystemFailure => "FileSystemFailure",
            ErrorKind::PackageManagerFailure => "PackageManagerFailure",
            ErrorKind::TemplateNotFound => "TemplateNotFound",
            ErrorKind::SourceNotFound => "SourceNotFound",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ScaffoldError {
    /// Bad project name, non-empty target directory, malformed option value
    #[error("{0}")]
    Validation(String),

    /// Create/read/write/copy/delete failure on a specific path
    #[error("{message}: {}", .path.display())]
    FileSystem {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<io::Error>,
    },

    /// Non-zero exit (or failed spawn) of a package manager command
    #[error("Failed to execute package manager command: {command}")]
    PackageManager { command: String, stderr: String },

    /// The bundled template package could not be located
    #[error("Could not find the {package} package. Make sure it is installed.")]
    TemplateNotFound {
        package: String,
        searched: Vec<PathBuf>,
    },

    /// A path requested from the template package does not exist
    #[error("Source path does not exist in template package: {}", .path.display())]
    SourceNotFound { path: PathBuf },
}

impl ScaffoldError {
    pub fn validation(message: impl Into<String>) -> Self {
        ScaffoldError::Validation(message.into())
    }

    /// Wrap an io error with the path it happened on
    pub fn fs(message: impl Into<String>, path: impl AsRef<Path>, source: io::Error) -> Self {
        ScaffoldError::FileSystem {
            message: message.into(),
            path: path.as_ref().to_path_buf(),
            source: Some(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScaffoldError::Validation(_) => ErrorKind::ValidationFailure,
            ScaffoldError::FileSystem { .. } => ErrorKind::FileSystemFailure,
            ScaffoldError::PackageManager { .. } => ErrorKind::PackageManagerFailure,
            ScaffoldError::TemplateNotFound { .. } => ErrorKind::TemplateNotFound,
            ScaffoldError::SourceNotFound { .. } => ErrorKind::SourceNotFound,
        }
    }

    /// Remediation lines shown to the user under the error message
    pub fn hints(&self) -> Vec<String> {
        match self {
            ScaffoldError::Validation(_) => {
                vec!["Please check your input and try again.".to_string()]
            }
            ScaffoldError::FileSystem { path, .. } => vec![
                format!("Path: {}", path.display()),
                "Check file permissions".to_string(),
                "Use a different path with --path option".to_string(),
                "Make sure the directory is empty or doesn't exist".to_string(),
            ],
            ScaffoldError::PackageManager { command, stderr } => {
                let mut hints = vec![format!("Command: {}", command)];
                if !stderr.trim().is_empty() {
                    hints.push(format!("Error output: {}", stderr.trim()));
                }
                hints.push("Check your internet connection".to_string());
                hints.push("Run with --verbose flag for more details".to_string());
                hints.push(
                    "Try a different package manager with --package-manager option".to_string(),
                );
                hints
            }
            ScaffoldError::TemplateNotFound { searched, .. } => {
                let mut hints: Vec<String> = searched
                    .iter()
                    .map(|p| format!("Searched: {}", p.display()))
                    .collect();
                hints.push("Reinstall the CLI or point IONIC_SVELTEKIT_TEMPLATE_DIR at a template package".to_string());
                hints
            }
            ScaffoldError::SourceNotFound { path } => vec![
                format!("Missing: {}", path.display()),
                "The installed template package may be incomplete; reinstall it".to_string(),
            ],
        }
    }
}

/// What happened to the partially created project after a failure
#[derive(Debug)]
pub enum RollbackOutcome {
    /// No project directory was created, or rollback has not been attempted
    NotAttempted,
    /// The directory no longer exists
    RolledBack,
    /// Deleting the directory failed; nothing was retried
    Failed(io::Error),
}

/// Failure of the project-creation entry point
#[derive(Error, Debug)]
#[error("{error}")]
pub struct CreateError {
    #[source]
    pub error: ScaffoldError,
    /// Set once the project directory has been created
    pub project_path: Option<PathBuf>,
    pub rollback: RollbackOutcome,
}

impl CreateError {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// Best-effort removal of the recorded project directory
    pub async fn rollback(&mut self) -> &RollbackOutcome {
        if let Some(path) = &self.project_path {
            self.rollback = match tokio::fs::remove_dir_all(path).await {
                Ok(()) => RollbackOutcome::RolledBack,
                Err(e) if e.kind() == io::ErrorKind::NotFound => RollbackOutcome::RolledBack,
                Err(e) => RollbackOutcome::Failed(e),
            };
        }
        &self.rollback
    }
}

impl From<ScaffoldError> for CreateError {
    fn from(error: ScaffoldError) -> Self {
        CreateError {
            error,
            project_path: None,
            rollback: RollbackOutcome::NotAttempted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_package_manager_hints_include_stderr() {
        let err = ScaffoldError::PackageManager {
            command: "npm install --save-dev foo".to_string(),
            stderr: "npm ERR! 404\n".to_string(),
        };
        let hints = err.hints();
        assert_eq!(err.kind(), ErrorKind::PackageManagerFailure);
        assert!(hints[0].contains("npm install --save-dev foo"));
        assert!(hints[1].contains("npm ERR! 404"));
    }

    #[test]
    fn test_fs_error_display_carries_path() {
        let err = ScaffoldError::fs(
            "Failed to write file",
            "/tmp/x/y.txt",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "Failed to write file: /tmp/x/y.txt");
        assert_eq!(err.kind(), ErrorKind::FileSystemFailure);
    }

    #[tokio::test]
    async fn test_rollback_removes_directory() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("demo");
        std::fs::create_dir_all(project.join("src")).unwrap();

        let mut err = CreateError {
            error: ScaffoldError::validation("boom"),
            project_path: Some(project.clone()),
            rollback: RollbackOutcome::NotAttempted,
        };
        assert!(matches!(err.rollback().await, RollbackOutcome::RolledBack));
        assert!(!project.exists());

        // Already gone counts as rolled back
        assert!(matches!(err.rollback().await, RollbackOutcome::RolledBack));
    }

    #[tokio::test]
    async fn test_rollback_without_path_is_not_attempted() {
        let mut err = CreateError::from(ScaffoldError::validation("bad name"));
        assert!(matches!(err.rollback().await, RollbackOutcome::NotAttempted));
    }
}
