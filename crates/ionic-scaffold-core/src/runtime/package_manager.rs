//! Package manager identification and command construction

use crate::error::{Result, ScaffoldError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported package managers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
    Bun,
}

/// Lock files that reveal which package manager owns a directory
const LOCK_FILES: &[(&str, PackageManager)] = &[
    ("yarn.lock", PackageManager::Yarn),
    ("pnpm-lock.yaml", PackageManager::Pnpm),
    ("bun.lockb", PackageManager::Bun),
    ("bun.lock", PackageManager::Bun),
    ("package-lock.json", PackageManager::Npm),
];

/// What a package manager command should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PmAction {
    InstallDev(Vec<String>),
    InstallProd(Vec<String>),
    Remove(Vec<String>),
    RunScript(String),
    /// Download-and-run a package binary (`npx`, `pnpm dlx`, `bunx`)
    Exec(Vec<String>),
}

impl PackageManager {
    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Bun => "bun",
        }
    }

    /// Detect the package manager from the invoking user agent, then from lock
    /// files in `base_dir`, defaulting to npm
    pub fn detect(base_dir: &Path) -> Self {
        let user_agent = std::env::var("npm_config_user_agent").ok();
        Self::detect_from(user_agent.as_deref(), base_dir)
    }

    pub fn detect_from(user_agent: Option<&str>, base_dir: &Path) -> Self {
        if let Some(agent) = user_agent {
            // pnpm's agent also contains "npm", so order matters
            if agent.contains("yarn") {
                return PackageManager::Yarn;
            }
            if agent.contains("pnpm") {
                return PackageManager::Pnpm;
            }
            if agent.contains("bun") {
                return PackageManager::Bun;
            }
            if agent.contains("npm") {
                return PackageManager::Npm;
            }
        }

        for (lock_file, pm) in LOCK_FILES {
            if base_dir.join(lock_file).exists() {
                return *pm;
            }
        }

        PackageManager::Npm
    }

    /// Build the command line for `action`, to be run in `cwd`
    pub fn command(&self, action: &PmAction, cwd: &Path) -> Invocation {
        let (program, mut args): (&str, Vec<String>) = match (self, action) {
            (PackageManager::Npm, PmAction::InstallDev(_)) => {
                ("npm", vec!["install".into(), "--save-dev".into()])
            }
            (PackageManager::Npm, PmAction::InstallProd(_)) => ("npm", vec!["install".into()]),
            (PackageManager::Bun, PmAction::InstallDev(_)) => {
                ("bun", vec!["add".into(), "-d".into()])
            }
            (pm, PmAction::InstallDev(_)) => (pm.name(), vec!["add".into(), "-D".into()]),
            (pm, PmAction::InstallProd(_)) => (pm.name(), vec!["add".into()]),
            (pm, PmAction::Remove(_)) => (pm.name(), vec!["remove".into()]),
            (PackageManager::Yarn, PmAction::RunScript(_)) => ("yarn", Vec::new()),
            (pm, PmAction::RunScript(_)) => (pm.name(), vec!["run".into()]),
            (PackageManager::Pnpm, PmAction::Exec(_)) => ("pnpm", vec!["dlx".into()]),
            (PackageManager::Bun, PmAction::Exec(_)) => ("bunx", Vec::new()),
            (_, PmAction::Exec(_)) => ("npx", vec!["--yes".into()]),
        };

        match action {
            PmAction::InstallDev(packages)
            | PmAction::InstallProd(packages)
            | PmAction::Remove(packages)
            | PmAction::Exec(packages) => args.extend(packages.iter().cloned()),
            PmAction::RunScript(script) => args.push(script.clone()),
        }

        Invocation {
            program: program.to_string(),
            args,
            cwd: cwd.to_path_buf(),
        }
    }
}

impl FromStr for PackageManager {
    type Err = ScaffoldError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "npm" => Ok(PackageManager::Npm),
            "pnpm" => Ok(PackageManager::Pnpm),
            "yarn" => Ok(PackageManager::Yarn),
            "bun" => Ok(PackageManager::Bun),
            other => Err(ScaffoldError::validation(format!(
                "Unknown package manager: \"{}\"\nPlease use npm, pnpm, yarn or bun.",
                other
            ))),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A fully resolved subprocess command with an explicit working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn packages(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_user_agent_detection_order() {
        let dir = TempDir::new().unwrap();
        let agent = "pnpm/9.1.0 npm/? node/v20.11.0 linux x64";
        assert_eq!(
            PackageManager::detect_from(Some(agent), dir.path()),
            PackageManager::Pnpm
        );
        assert_eq!(
            PackageManager::detect_from(Some("yarn/1.22.19 npm/? node/v18"), dir.path()),
            PackageManager::Yarn
        );
        assert_eq!(
            PackageManager::detect_from(Some("npm/10.2.4 node/v20.11.0"), dir.path()),
            PackageManager::Npm
        );
    }

    #[test]
    fn test_lock_file_detection() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pnpm-lock.yaml"), "").unwrap();
        assert_eq!(
            PackageManager::detect_from(None, dir.path()),
            PackageManager::Pnpm
        );
    }

    #[test]
    fn test_defaults_to_npm() {
        let dir = TempDir::new().unwrap();
        assert_eq!(PackageManager::detect_from(None, dir.path()), PackageManager::Npm);
    }

    #[test]
    fn test_install_commands() {
        let cwd = Path::new("/tmp/demo");
        let dev = PmAction::InstallDev(packages(&["@sveltejs/adapter-static"]));

        let npm = PackageManager::Npm.command(&dev, cwd);
        assert_eq!(npm.to_string(), "npm install --save-dev @sveltejs/adapter-static");
        assert_eq!(npm.cwd, cwd);

        let pnpm = PackageManager::Pnpm.command(&dev, cwd);
        assert_eq!(pnpm.to_string(), "pnpm add -D @sveltejs/adapter-static");

        let prod = PmAction::InstallProd(packages(&["ionic-svelte"]));
        assert_eq!(
            PackageManager::Yarn.command(&prod, cwd).to_string(),
            "yarn add ionic-svelte"
        );
    }

    #[test]
    fn test_run_script_commands() {
        let cwd = Path::new(".");
        let action = PmAction::RunScript("format".to_string());
        assert_eq!(PackageManager::Npm.command(&action, cwd).to_string(), "npm run format");
        assert_eq!(PackageManager::Yarn.command(&action, cwd).to_string(), "yarn format");
    }

    #[test]
    fn test_exec_commands() {
        let cwd = Path::new(".");
        let action = PmAction::Exec(packages(&["sv", "create", "app"]));
        assert_eq!(
            PackageManager::Npm.command(&action, cwd).to_string(),
            "npx --yes sv create app"
        );
        assert_eq!(
            PackageManager::Pnpm.command(&action, cwd).to_string(),
            "pnpm dlx sv create app"
        );
        assert_eq!(
            PackageManager::Bun.command(&action, cwd).to_string(),
            "bunx sv create app"
        );
    }

    #[test]
    fn test_parse_package_manager() {
        assert_eq!("PNPM".parse::<PackageManager>().unwrap(), PackageManager::Pnpm);
        assert!("cargo".parse::<PackageManager>().is_err());
    }
}
