//! Node.js runtime detection and version compatibility

use semver::Version;
use std::process::Command;

/// Oldest Node.js release the generated SvelteKit project supports
pub const MIN_NODE_VERSION: &str = "18.13.0";

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    let output = Command::new("node").arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name: "Node.js",
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: "Node.js",
            version: None,
            available: false,
        },
    }
}

/// Parse version string, handling a leading `v`
pub fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    Version::parse(cleaned).ok()
}

/// Returns a warning message if the installed runtime is too old or missing
pub fn check_node_compatibility(runtime: &RuntimeInfo) -> Option<String> {
    if !runtime.available {
        return Some(format!(
            "{} was not found. Install it from https://nodejs.org before running the project.",
            runtime.name
        ));
    }

    let installed = runtime.version.as_deref().and_then(parse_version)?;
    let minimum = parse_version(MIN_NODE_VERSION)?;

    if installed < minimum {
        Some(format!(
            "{} {} is older than the supported minimum {}. Consider upgrading.",
            runtime.name, installed, MIN_NODE_VERSION
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(version: &str) -> RuntimeInfo {
        RuntimeInfo {
            name: "Node.js",
            version: Some(version.to_string()),
            available: true,
        }
    }

    #[test]
    fn test_old_node_warns() {
        let warning = check_node_compatibility(&node("v16.20.2"));
        assert!(warning.unwrap().contains("16.20.2"));
    }

    #[test]
    fn test_current_node_passes() {
        assert!(check_node_compatibility(&node("v20.11.0")).is_none());
        assert!(check_node_compatibility(&node("18.13.0")).is_none());
    }

    #[test]
    fn test_unparseable_version_is_ignored() {
        assert!(check_node_compatibility(&node("nightly")).is_none());
    }

    #[test]
    fn test_missing_node_warns() {
        let missing = RuntimeInfo {
            name: "Node.js",
            version: None,
            available: false,
        };
        assert!(check_node_compatibility(&missing).is_some());
    }
}
