//! Project description: the immutable record every stage reads
//!
//! A [`ProjectSpec`] is built once from merged CLI flags and prompt answers
//! ([`ProjectOptions`]) and never mutated after the pipeline starts.

pub mod validation;

use crate::error::{Result, ScaffoldError};
use crate::runtime::PackageManager;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use validation::{validate_directory, validate_project_name};

pub const DEFAULT_PROJECT_NAME: &str = "ionic-sveltekit-project";

/// Static typing flavour of the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypesMode {
    /// `<script lang="ts">` and `.ts` sources
    TypeScript,
    /// Plain JavaScript type-checked through JSDoc comments
    CheckJs,
    /// Plain JavaScript
    None,
}

impl TypesMode {
    pub fn uses_typescript(&self) -> bool {
        matches!(self, TypesMode::TypeScript)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            TypesMode::TypeScript => "TypeScript",
            TypesMode::CheckJs => "Type-checked JavaScript",
            TypesMode::None => "JavaScript",
        }
    }
}

impl FromStr for TypesMode {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "typescript" | "ts" => Ok(TypesMode::TypeScript),
            "checkjs" | "jsdoc" => Ok(TypesMode::CheckJs),
            "false" | "none" | "no" => Ok(TypesMode::None),
            _ => Err(ScaffoldError::validation(format!(
                "Invalid TypeScript option: \"{}\"\nPlease use 'typescript', 'checkjs', or false.",
                s
            ))),
        }
    }
}

impl fmt::Display for TypesMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TypesMode::TypeScript => "typescript",
            TypesMode::CheckJs => "checkjs",
            TypesMode::None => "none",
        };
        f.write_str(value)
    }
}

/// Optional tooling toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// Lint (ESLint)
    pub eslint: bool,
    /// Format (Prettier); also triggers the final formatting pass
    pub prettier: bool,
    /// End-to-end tests (Playwright)
    pub playwright: bool,
    /// Unit tests (Vitest)
    pub vitest: bool,
    /// Icon library (ionicons)
    pub ionicons: bool,
    /// Native mobile wrapper (Capacitor)
    pub capacitor: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            eslint: true,
            prettier: true,
            playwright: false,
            vitest: false,
            ionicons: true,
            capacitor: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProjectSpec {
    pub name: String,
    /// Directory the project folder is created in
    pub path: PathBuf,
    pub types: TypesMode,
    pub features: Features,
    /// Forced package manager; detected during the pipeline when absent
    pub package_manager: Option<PackageManager>,
    /// Stream subprocess output instead of capturing it
    pub verbose: bool,
}

impl ProjectSpec {
    pub fn builder(name: impl Into<String>) -> ProjectSpecBuilder {
        ProjectSpecBuilder {
            spec: ProjectSpec {
                name: name.into(),
                path: PathBuf::from("."),
                types: TypesMode::TypeScript,
                features: Features::default(),
                package_manager: None,
                verbose: false,
            },
        }
    }

    /// Folder name derived from the project name
    pub fn dir_name(&self) -> String {
        self.name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase()
    }

    /// Absolute destination of the generated project
    pub fn destination(&self) -> Result<PathBuf> {
        let joined = self.path.join(self.dir_name());
        std::path::absolute(&joined)
            .map_err(|e| ScaffoldError::fs("Failed to resolve project path", &joined, e))
    }

    pub fn uses_typescript(&self) -> bool {
        self.types.uses_typescript()
    }

    /// Add-ons handed to the base project generator
    pub fn add_ons(&self) -> Vec<&'static str> {
        let mut add_ons = Vec::new();
        if self.features.prettier {
            add_ons.push("prettier");
        }
        if self.features.eslint {
            add_ons.push("eslint");
        }
        if self.features.vitest {
            add_ons.push("vitest");
        }
        if self.features.playwright {
            add_ons.push("playwright");
        }
        add_ons
    }
}

pub struct ProjectSpecBuilder {
    spec: ProjectSpec,
}

impl ProjectSpecBuilder {
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.spec.path = path.as_ref().to_path_buf();
        self
    }

    pub fn types(mut self, types: TypesMode) -> Self {
        self.spec.types = types;
        self
    }

    pub fn features(mut self, features: Features) -> Self {
        self.spec.features = features;
        self
    }

    pub fn capacitor(mut self, enabled: bool) -> Self {
        self.spec.features.capacitor = enabled;
        self
    }

    pub fn prettier(mut self, enabled: bool) -> Self {
        self.spec.features.prettier = enabled;
        self
    }

    pub fn package_manager(mut self, pm: PackageManager) -> Self {
        self.spec.package_manager = Some(pm);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.spec.verbose = verbose;
        self
    }

    pub fn build(self) -> ProjectSpec {
        self.spec
    }
}

/// Partially known project options, as collected from flags and prompts
#[derive(Debug, Clone, Default)]
pub struct ProjectOptions {
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    pub types: Option<TypesMode>,
    pub eslint: Option<bool>,
    pub prettier: Option<bool>,
    pub playwright: Option<bool>,
    pub vitest: Option<bool>,
    pub ionicons: Option<bool>,
    pub capacitor: Option<bool>,
    pub package_manager: Option<PackageManager>,
    pub verbose: bool,
}

impl ProjectOptions {
    /// Fill every missing option with its default
    pub fn resolve(self) -> ProjectSpec {
        let defaults = Features::default();
        ProjectSpec {
            name: self.name.unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string()),
            path: self.path.unwrap_or_else(|| PathBuf::from(".")),
            types: self.types.unwrap_or(TypesMode::TypeScript),
            features: Features {
                eslint: self.eslint.unwrap_or(defaults.eslint),
                prettier: self.prettier.unwrap_or(defaults.prettier),
                playwright: self.playwright.unwrap_or(defaults.playwright),
                vitest: self.vitest.unwrap_or(defaults.vitest),
                ionicons: self.ionicons.unwrap_or(defaults.ionicons),
                capacitor: self.capacitor.unwrap_or(defaults.capacitor),
            },
            package_manager: self.package_manager,
            verbose: self.verbose,
        }
    }
}

/// Parse a boolean option value given on the command line
pub fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" => Ok(false),
        _ => Err(ScaffoldError::validation(format!(
            "Invalid boolean value: \"{}\"\nPlease use true/false, yes/no, y/n, or 1/0.",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dir_name_slugifies_whitespace() {
        let spec = ProjectSpec::builder("My  Cool App").build();
        assert_eq!(spec.dir_name(), "my-cool-app");
    }

    #[test]
    fn test_destination_is_absolute() {
        let spec = ProjectSpec::builder("demo-app").path(".").build();
        let dest = spec.destination().unwrap();
        assert!(dest.is_absolute());
        assert!(dest.ends_with("demo-app"));
    }

    #[test]
    fn test_types_mode_parsing() {
        assert_eq!("typescript".parse::<TypesMode>().unwrap(), TypesMode::TypeScript);
        assert_eq!("checkjs".parse::<TypesMode>().unwrap(), TypesMode::CheckJs);
        assert_eq!("false".parse::<TypesMode>().unwrap(), TypesMode::None);
        assert!("flow".parse::<TypesMode>().is_err());
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("yes").unwrap());
        assert!(parse_bool("Y").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn test_options_resolve_defaults() {
        let spec = ProjectOptions {
            name: Some("demo".to_string()),
            capacitor: Some(true),
            ..Default::default()
        }
        .resolve();

        assert_eq!(spec.name, "demo");
        assert_eq!(spec.types, TypesMode::TypeScript);
        assert!(spec.features.capacitor);
        assert!(spec.features.eslint);
        assert!(!spec.features.vitest);
    }

    #[test]
    fn test_add_ons_follow_features() {
        let spec = ProjectSpec::builder("demo")
            .features(Features {
                eslint: false,
                prettier: true,
                playwright: true,
                vitest: false,
                ionicons: false,
                capacitor: false,
            })
            .build();
        assert_eq!(spec.add_ons(), vec!["prettier", "playwright"]);
    }
}
