//! create-ionic-sveltekit - Scaffold SvelteKit projects with Ionic UI components

use anyhow::Result;
use clap::Parser;
use ionic_scaffold_core::project::parse_bool;
use ionic_scaffold_core::tui::CreateArgs;
use ionic_scaffold_core::{
    report_failure, CreateError, PackageManager, ProductConfig, ProjectOptions, ProjectSpec,
    TypesMode,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Ionic SvelteKit product configuration
#[derive(Clone)]
pub struct IonicSvelteKit;

impl ProductConfig for IonicSvelteKit {
    fn name(&self) -> &'static str {
        "create-ionic-sveltekit"
    }

    fn display_name(&self) -> &'static str {
        "Ionic SvelteKit Project Creator"
    }

    fn template_package(&self) -> &'static str {
        "@ionic-sveltekit/example"
    }

    fn bundled_template_dir(&self) -> &'static str {
        "ionic-sveltekit-example"
    }

    fn template_dir_env(&self) -> &'static str {
        "IONIC_SVELTEKIT_TEMPLATE_DIR"
    }

    fn issues_url(&self) -> &'static str {
        "https://github.com/ionic-sveltekit/create/issues"
    }

    fn next_steps(&self, spec: &ProjectSpec) -> Vec<String> {
        let pm = spec.package_manager.unwrap_or(PackageManager::Npm);
        let exec = match pm {
            PackageManager::Pnpm => "pnpm dlx",
            PackageManager::Bun => "bunx",
            _ => "npx",
        };
        let mut steps = vec![format!("cd {}", spec.path.join(spec.dir_name()).display())];

        if spec.features.capacitor {
            let add = match pm {
                PackageManager::Npm => "npm i",
                PackageManager::Pnpm => "pnpm add",
                PackageManager::Yarn => "yarn add",
                PackageManager::Bun => "bun add",
            };
            steps.push(format!("{} @capacitor/android and/or @capacitor/ios", add));
            steps.push(format!("{} cap add android and/or ios", exec));
            steps.push(format!("{} run build to fill the build directory", pm));
            steps.push(format!("{} cap sync to sync the build into the target folder", exec));
            steps.push(format!(
                "{} cap open android or ios to open the project and mark as trusted",
                exec
            ));
        }

        steps.push(format!("{} run dev -- --open", pm));
        steps
    }
}

fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    parse_bool(value).map_err(|e| e.to_string())
}

#[derive(Parser, Debug)]
#[command(name = "create-ionic-sveltekit")]
#[command(about = "Create a new SvelteKit project with Ionic UI components")]
#[command(version)]
pub struct Args {
    /// Name of the directory for the project
    pub name: Option<String>,

    /// Location to install, name is appended
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Add type checking: typescript, checkjs or false
    #[arg(short, long)]
    pub types: Option<TypesMode>,

    /// Add ESLint for code linting
    #[arg(long, value_parser = parse_flag)]
    pub eslint: Option<bool>,

    /// Add Prettier for code formatting
    #[arg(long, value_parser = parse_flag)]
    pub prettier: Option<bool>,

    /// Add Playwright for browser testing
    #[arg(long, value_parser = parse_flag)]
    pub playwright: Option<bool>,

    /// Add Vitest for unit testing
    #[arg(long, value_parser = parse_flag)]
    pub vitest: Option<bool>,

    /// Include Ionic icon library
    #[arg(long, value_parser = parse_flag)]
    pub ionicons: Option<bool>,

    /// Install dependencies for Capacitor
    #[arg(long, value_parser = parse_flag)]
    pub capacitor: Option<bool>,

    /// Package manager to use: npm, pnpm, yarn or bun
    #[arg(long = "package-manager")]
    pub package_manager: Option<PackageManager>,

    /// Show detailed output for troubleshooting
    #[arg(short, long)]
    pub verbose: bool,

    /// Skip all prompts and use default values
    #[arg(short, long)]
    pub defaults: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            options: ProjectOptions {
                name: args.name,
                path: args.path,
                types: args.types,
                eslint: args.eslint,
                prettier: args.prettier,
                playwright: args.playwright,
                vitest: args.vitest,
                ionicons: args.ionicons,
                capacitor: args.capacitor,
                package_manager: args.package_manager,
                verbose: args.verbose,
            },
            defaults: args.defaults,
        }
    }
}

fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_logging(args.verbose);
    tracing::debug!("Parsed CLI arguments: {:?}", args);

    let config = IonicSvelteKit;
    let result = ionic_scaffold_core::run(&config, args.into(), CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(e) = result {
        match e.downcast_ref::<CreateError>() {
            Some(err) => report_failure(err, config.issues_url()),
            None => eprintln!("Error: {:#}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_accept_yes_no() {
        let args = Args::try_parse_from([
            "create-ionic-sveltekit",
            "demo-app",
            "--types",
            "checkjs",
            "--capacitor",
            "yes",
            "--eslint",
            "n",
        ])
        .unwrap();
        assert_eq!(args.name.as_deref(), Some("demo-app"));
        assert_eq!(args.types, Some(TypesMode::CheckJs));
        assert_eq!(args.capacitor, Some(true));
        assert_eq!(args.eslint, Some(false));
        assert_eq!(args.prettier, None);
    }

    #[test]
    fn test_invalid_flag_value_rejected() {
        assert!(Args::try_parse_from(["create-ionic-sveltekit", "--vitest", "maybe"]).is_err());
        assert!(Args::try_parse_from(["create-ionic-sveltekit", "--types", "flow"]).is_err());
    }

    #[test]
    fn test_next_steps_for_capacitor() {
        let spec = ProjectSpec::builder("demo-app").capacitor(true).build();
        let steps = IonicSvelteKit.next_steps(&spec);
        assert!(steps[0].starts_with("cd "));
        assert!(steps[0].ends_with("demo-app"));
        assert!(steps.iter().any(|s| s == "npx cap sync to sync the build into the target folder"));
        assert_eq!(steps.last().unwrap(), "npm run dev -- --open");

        let plain = ProjectSpec::builder("demo-app").build();
        assert_eq!(IonicSvelteKit.next_steps(&plain).len(), 2);
    }
}
