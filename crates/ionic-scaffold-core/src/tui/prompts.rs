//! Charm-style CLI prompts using cliclack

use crate::create::create_project;
use crate::error::CreateError;
use crate::pipeline::Reporter;
use crate::product::ProductConfig;
use crate::project::{
    validate_project_name, Features, ProjectOptions, ProjectSpec, TypesMode, DEFAULT_PROJECT_NAME,
};
use crate::runtime::{check_node, check_node_compatibility, ProcessRunner};
use crate::summary::print_summary;
use crate::templates::{Materializer, TemplateResolver};
use anyhow::Result;
use std::path::PathBuf;

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Options given on the command line; missing ones are prompted for
    pub options: ProjectOptions,

    /// Fill missing options with defaults instead of prompting
    pub defaults: bool,
}

/// Stage progress rendered as cliclack log lines
struct ClackReporter;

impl Reporter for ClackReporter {
    fn stage_started(&self, title: &str, depth: usize) {
        let _ = if depth == 0 {
            cliclack::log::step(title)
        } else {
            cliclack::log::remark(format!("{}{}", "  ".repeat(depth - 1), title))
        };
    }

    fn stage_completed(&self, title: &str, depth: usize) {
        if depth == 0 {
            let _ = cliclack::log::success(format!("{} done", title));
        }
    }

    fn stage_failed(&self, title: &str, _depth: usize) {
        let _ = cliclack::log::error(format!("{} failed", title));
    }

    fn warn(&self, message: &str) {
        let _ = cliclack::log::warning(message);
    }

    fn info(&self, message: &str) {
        let _ = cliclack::log::info(message);
    }
}

/// Run the CLI with interactive prompts
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<PathBuf> {
    cliclack::intro(format!("{} v{}", config.display_name(), cli_version))?;

    // Step 1: Check the Node.js runtime the generated project needs
    check_runtime()?;

    // Step 2: Collect options
    let spec = collect_options(args)?;

    // Step 3: Locate the template package
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let resolver = TemplateResolver::from_config(config, &cwd);
    let template_root = resolver.resolve().map_err(CreateError::from)?;
    cliclack::log::info(format!("Using templates from {}", template_root.display()))?;

    // Step 4: Create project
    let runner = ProcessRunner::new(spec.verbose);
    let project_dir = create_project(&spec, &Materializer::new(resolver), &runner, &ClackReporter).await?;

    // Step 5: Show next steps
    print_summary(config, &spec, &project_dir);
    cliclack::outro("Happy coding!")?;

    Ok(project_dir)
}

fn check_runtime() -> Result<()> {
    let node = check_node();
    match check_node_compatibility(&node) {
        Some(warning) => cliclack::log::warning(warning)?,
        None => cliclack::log::success(format!(
            "{} installed ({})",
            node.name,
            node.version.as_deref().unwrap_or("unknown")
        ))?,
    }
    Ok(())
}

fn collect_options(args: CreateArgs) -> Result<ProjectSpec> {
    let mut options = args.options;

    if args.defaults {
        cliclack::log::info("Using defaults for options not given on the command line")?;
        return Ok(options.resolve());
    }

    if options.name.is_none() {
        let name: String = cliclack::input("Name for your new project")
            .placeholder(DEFAULT_PROJECT_NAME)
            .default_input(DEFAULT_PROJECT_NAME)
            .validate(|input: &String| validate_project_name(input).map_err(|e| e.to_string()))
            .interact()?;
        options.name = Some(name);
    }

    if options.types.is_none() {
        let types: TypesMode = cliclack::select("Add type checking with TypeScript?")
            .item(TypesMode::TypeScript, "Yes, using TypeScript syntax", "")
            .item(TypesMode::CheckJs, "Yes, using JavaScript with JSDoc comments", "")
            .item(TypesMode::None, "No", "")
            .initial_value(TypesMode::TypeScript)
            .interact()?;
        options.types = Some(types);
    }

    let defaults = Features::default();
    let questions: [(&mut Option<bool>, &str, bool); 6] = [
        (&mut options.eslint, "Add ESLint for code linting?", defaults.eslint),
        (&mut options.prettier, "Add Prettier for code formatting?", defaults.prettier),
        (&mut options.playwright, "Add Playwright for browser testing?", defaults.playwright),
        (&mut options.vitest, "Add Vitest for unit testing?", defaults.vitest),
        (&mut options.ionicons, "Include Ionic icon library?", defaults.ionicons),
        (
            &mut options.capacitor,
            "Add Capacitor for native (mobile) deployments?",
            defaults.capacitor,
        ),
    ];
    for (answer, prompt, initial) in questions {
        if answer.is_none() {
            *answer = Some(cliclack::confirm(prompt).initial_value(initial).interact()?);
        }
    }

    Ok(options.resolve())
}
