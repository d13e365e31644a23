//! Rollback of partially created projects and the final error report

use crate::error::{CreateError, ErrorKind, RollbackOutcome, ScaffoldError};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Attach `project_path` to every failure passed through the returned closure
pub fn cleanup_handler(project_path: &Path) -> impl Fn(ScaffoldError) -> CreateError {
    let project_path: PathBuf = project_path.to_path_buf();
    move |error| CreateError {
        error,
        project_path: Some(project_path.clone()),
        rollback: RollbackOutcome::NotAttempted,
    }
}

/// Lines describing what happened to the destination directory
pub fn rollback_lines(err: &CreateError) -> Vec<String> {
    let Some(path) = &err.project_path else {
        return Vec::new();
    };
    match &err.rollback {
        RollbackOutcome::NotAttempted => vec![format!(
            "Partially created project left at {}",
            path.display()
        )],
        RollbackOutcome::RolledBack => vec![
            format!("Cleaning up partially created project at {}...", path.display()),
            "Cleanup completed.".to_string(),
        ],
        RollbackOutcome::Failed(e) => vec![format!("Failed to clean up directory: {}", e)],
    }
}

/// Print a failed creation to stderr
pub fn report_failure(err: &CreateError, issues_url: &str) {
    eprintln!();
    eprintln!("{} {}", "Error:".red().bold(), err);

    let hints = err.error.hints();
    if !hints.is_empty() {
        eprintln!();
        let heading = match err.kind() {
            ErrorKind::ValidationFailure => None,
            ErrorKind::PackageManagerFailure => Some("Package manager error details:"),
            ErrorKind::FileSystemFailure => Some("File system error details:"),
            ErrorKind::TemplateNotFound | ErrorKind::SourceNotFound => {
                Some("Template package error details:")
            }
        };
        if let Some(heading) = heading {
            eprintln!("{}", heading.yellow());
        }
        for hint in hints {
            eprintln!("  {}", hint.dimmed());
        }
    }

    let rollback = rollback_lines(err);
    if !rollback.is_empty() {
        eprintln!();
        for line in rollback {
            match err.rollback {
                RollbackOutcome::Failed(_) => eprintln!("{}", line.red()),
                _ => eprintln!("{}", line.yellow()),
            }
        }
    }

    eprintln!();
    eprintln!("{}", "If the problem persists, please report this issue at:".yellow());
    eprintln!("{}", issues_url.cyan());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    #[test]
    fn test_handler_attaches_path() {
        let handler = cleanup_handler(Path::new("/work/demo-app"));
        let err = handler(ScaffoldError::validation("boom"));
        assert_eq!(err.project_path.as_deref(), Some(Path::new("/work/demo-app")));
        assert!(matches!(err.rollback, RollbackOutcome::NotAttempted));
        assert_eq!(err.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_rollback_lines() {
        let temp = TempDir::new().unwrap();
        let project = temp.path().join("demo-app");
        std::fs::create_dir_all(&project).unwrap();

        let mut err = cleanup_handler(&project)(ScaffoldError::PackageManager {
            command: "npm install".to_string(),
            stderr: String::new(),
        });
        assert!(rollback_lines(&err)[0].starts_with("Partially created project left at"));

        err.rollback().await;
        let lines = rollback_lines(&err);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Cleanup completed.");
        assert!(!project.exists());

        err.rollback = RollbackOutcome::Failed(io::Error::new(io::ErrorKind::Other, "busy"));
        assert_eq!(rollback_lines(&err), vec!["Failed to clean up directory: busy"]);
    }

    #[test]
    fn test_no_path_no_rollback_lines() {
        let err = CreateError::from(ScaffoldError::validation("bad name"));
        assert!(rollback_lines(&err).is_empty());
    }
}
