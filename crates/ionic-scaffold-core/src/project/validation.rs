//! Pre-flight validation, run once before any file is written

use crate::error::{Result, ScaffoldError};
use std::path::Path;

const MAX_NAME_LENGTH: usize = 214;

const BLACKLISTED_NAMES: &[&str] = &["node_modules", "favicon.ico"];

const CORE_MODULES: &[&str] = &[
    "assert", "async_hooks", "buffer", "child_process", "cluster", "console", "constants",
    "crypto", "dgram", "diagnostics_channel", "dns", "domain", "events", "fs", "http", "http2",
    "https", "inspector", "module", "net", "os", "path", "perf_hooks", "process", "punycode",
    "querystring", "readline", "repl", "stream", "string_decoder", "sys", "timers", "tls",
    "trace_events", "tty", "url", "util", "v8", "vm", "wasi", "worker_threads", "zlib",
];

/// Characters `encodeURIComponent` leaves untouched
fn is_url_friendly(segment: &str) -> bool {
    !segment.is_empty()
        && segment.chars().all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '!' | '~' | '*' | '\'' | '(' | ')')
        })
}

/// Check a project name against the npm rules for new packages
pub fn validate_project_name(name: &str) -> Result<()> {
    let mut problems: Vec<String> = Vec::new();

    if name.is_empty() {
        problems.push("name length must be greater than zero".to_string());
    }
    if name.starts_with('.') {
        problems.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        problems.push("name cannot start with an underscore".to_string());
    }
    if name.trim() != name {
        problems.push("name cannot contain leading or trailing spaces".to_string());
    }
    let lowered = name.to_lowercase();
    if BLACKLISTED_NAMES.contains(&lowered.as_str()) {
        problems.push(format!("{} is a blacklisted name", lowered));
    }
    if CORE_MODULES.contains(&lowered.as_str()) {
        problems.push(format!("{} is a core module name", lowered));
    }
    if name.len() > MAX_NAME_LENGTH {
        problems.push(format!(
            "name can no longer contain more than {} characters",
            MAX_NAME_LENGTH
        ));
    }
    if lowered != name {
        problems.push("name can no longer contain capital letters".to_string());
    }

    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.chars().any(|c| "~'!()*".contains(c)) {
        problems.push("name can no longer contain special characters (\"~'!()*\")".to_string());
    }

    if !name.is_empty() && !is_url_friendly(name) {
        let scoped_ok = name
            .strip_prefix('@')
            .and_then(|rest| rest.split_once('/'))
            .map(|(scope, pkg)| is_url_friendly(scope) && is_url_friendly(pkg))
            .unwrap_or(false);
        if !scoped_ok {
            problems.push("name can only contain URL-friendly characters".to_string());
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ScaffoldError::validation(format!(
            "Invalid project name: \"{}\"\n{}",
            name,
            problems
                .iter()
                .map(|p| format!("  - {}", p))
                .collect::<Vec<_>>()
                .join("\n")
        )))
    }
}

/// The destination must not exist or hold only hidden entries
pub fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    let entries = std::fs::read_dir(dir)
        .map_err(|e| ScaffoldError::fs("Failed to read directory", dir, e))?;

    let visible = entries
        .filter_map(|entry| entry.ok())
        .any(|entry| !entry.file_name().to_string_lossy().starts_with('.'));

    if visible {
        return Err(ScaffoldError::validation(format!(
            "Directory is not empty: \"{}\"\nPlease choose an empty directory or create a new one.",
            dir.display()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_names() {
        assert!(validate_project_name("demo-app").is_ok());
        assert!(validate_project_name("my.app_2").is_ok());
        assert!(validate_project_name("@scope/demo").is_ok());
    }

    #[test]
    fn test_invalid_names_collect_every_problem() {
        let err = validate_project_name("_Bad Name").unwrap_err().to_string();
        assert!(err.contains("cannot start with an underscore"));
        assert!(err.contains("capital letters"));
        assert!(err.contains("URL-friendly"));
    }

    #[test]
    fn test_reserved_names() {
        assert!(validate_project_name("node_modules").is_err());
        assert!(validate_project_name("fs").is_err());
        assert!(validate_project_name("").is_err());
        assert!(validate_project_name(".hidden").is_err());
        assert!(validate_project_name("wow!").is_err());
    }

    #[test]
    fn test_directory_missing_is_ok() {
        let temp = TempDir::new().unwrap();
        assert!(validate_directory(&temp.path().join("nope")).is_ok());
    }

    #[test]
    fn test_directory_with_only_hidden_entries_is_ok() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        std::fs::write(temp.path().join(".env"), "A=1").unwrap();
        assert!(validate_directory(temp.path()).is_ok());
    }

    #[test]
    fn test_directory_with_visible_entries_fails() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("README.md"), "hi").unwrap();
        let err = validate_directory(temp.path()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::ValidationFailure);
    }
}
