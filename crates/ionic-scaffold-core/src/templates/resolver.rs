//! Locating the template package on disk
//!
//! Lookup order: the override directory, `node_modules` next to the working
//! directory and its ancestors, the CLI's own installation, then the global
//! npm prefix. The first candidate holding a `package.json` wins.

use crate::error::{Result, ScaffoldError};
use crate::product::ProductConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct TemplateResolver {
    package: String,
    candidates: Vec<PathBuf>,
}

impl TemplateResolver {
    /// A resolver with no search locations yet
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            candidates: Vec::new(),
        }
    }

    /// Append a candidate package root
    pub fn candidate(mut self, root: impl Into<PathBuf>) -> Self {
        self.candidates.push(root.into());
        self
    }

    /// Build the default search order for a product, starting from `cwd`
    pub fn from_config<C: ProductConfig>(config: &C, cwd: &Path) -> Self {
        let package = config.template_package();
        let bundled = config.bundled_template_dir();
        let mut resolver = Self::new(package);

        if let Ok(dir) = std::env::var(config.template_dir_env()) {
            resolver = resolver.candidate(dir);
        }

        // Module resolution: node_modules in the working directory and upwards
        for ancestor in cwd.ancestors() {
            resolver = resolver.candidate(node_modules_path(&ancestor.join("node_modules"), package));
        }

        // The CLI's own installation
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            resolver = resolver
                .candidate(exe_dir.join("templates").join(bundled))
                .candidate(node_modules_path(&exe_dir.join("node_modules"), package));
            if let Some(prefix) = exe_dir.parent() {
                resolver = resolver
                    .candidate(node_modules_path(&prefix.join("node_modules"), package))
                    .candidate(prefix.join("share").join(config.name()).join("templates").join(bundled));
            }
        }
        resolver = resolver.candidate(
            Path::new(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join("templates")
                .join(bundled),
        );

        // Global installs
        if let Ok(prefix) = std::env::var("NPM_CONFIG_PREFIX") {
            resolver = resolver.candidate(node_modules_path(
                &Path::new(&prefix).join("lib").join("node_modules"),
                package,
            ));
        }
        if let Some(node_dir) = which::which("node")
            .ok()
            .and_then(|node| node.parent().map(Path::to_path_buf))
        {
            resolver = resolver.candidate(node_modules_path(
                &node_dir.join("..").join("lib").join("node_modules"),
                package,
            ));
        }

        resolver
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Absolute root of the first candidate that holds the package
    pub fn resolve(&self) -> Result<PathBuf> {
        for candidate in &self.candidates {
            if candidate.join("package.json").is_file() {
                debug!(root = %candidate.display(), "resolved template package");
                return candidate
                    .canonicalize()
                    .map_err(|e| ScaffoldError::fs("Failed to resolve template package", candidate, e));
            }
        }

        Err(ScaffoldError::TemplateNotFound {
            package: self.package.clone(),
            searched: self.candidates.clone(),
        })
    }
}

/// `@scope/name` maps to `node_modules/@scope/name`
fn node_modules_path(node_modules: &Path, package: &str) -> PathBuf {
    package
        .split('/')
        .fold(node_modules.to_path_buf(), |path, segment| path.join(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_package(root: &Path) {
        std::fs::create_dir_all(root).unwrap();
        std::fs::write(root.join("package.json"), "{}").unwrap();
    }

    #[test]
    fn test_first_existing_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing");
        let local = temp.path().join("local");
        let global = temp.path().join("global");
        make_package(&local);
        make_package(&global);

        let resolver = TemplateResolver::new("@ionic-sveltekit/example")
            .candidate(&missing)
            .candidate(&local)
            .candidate(&global);

        let root = resolver.resolve().unwrap();
        assert_eq!(root, local.canonicalize().unwrap());
        assert!(root.is_absolute());
    }

    #[test]
    fn test_directory_without_manifest_is_skipped() {
        let temp = TempDir::new().unwrap();
        let empty = temp.path().join("empty");
        std::fs::create_dir_all(&empty).unwrap();
        let fallback = temp.path().join("fallback");
        make_package(&fallback);

        let resolver = TemplateResolver::new("pkg").candidate(&empty).candidate(&fallback);
        assert_eq!(resolver.resolve().unwrap(), fallback.canonicalize().unwrap());
    }

    #[test]
    fn test_not_found_lists_searched_paths() {
        let temp = TempDir::new().unwrap();
        let resolver = TemplateResolver::new("@ionic-sveltekit/example")
            .candidate(temp.path().join("a"))
            .candidate(temp.path().join("b"));

        match resolver.resolve().unwrap_err() {
            ScaffoldError::TemplateNotFound { package, searched } => {
                assert_eq!(package, "@ionic-sveltekit/example");
                assert_eq!(searched.len(), 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_scoped_node_modules_path() {
        let path = node_modules_path(Path::new("/x/node_modules"), "@scope/pkg");
        assert_eq!(path, PathBuf::from("/x/node_modules/@scope/pkg"));
    }
}
