//! Project creation
//!
//! [`create_project`] validates the project name and directory, creates the
//! destination and runs the setup stages against it. Any stage failure rolls the destination back
//! before the error is returned.

use crate::cleanup::cleanup_handler;
use crate::config::{self, CapacitorSettings};
use crate::error::{CreateError, Result, ScaffoldError};
use crate::pipeline::{ExecutionContext, Pipeline, Reporter, Stage, StageExecutor};
use crate::project::{validate_directory, validate_project_name, ProjectSpec, TypesMode};
use crate::runtime::{CommandRunner, PackageManager, PmAction};
use crate::templates::{MaterializeOptions, Materializer, SubstitutionMap};
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Pinned to the version ionic-svelte is built against
const IONIC_CORE: &str = "@ionic/core@8.2.2";

const SSR_DISABLED: &str = "export const ssr = false;\n";

/// Units of work behind the setup stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    CreateBase,
    EnterProject,
    CreateDirectories,
    CopyTemplates,
    InstallDevDependencies,
    InstallDependencies,
    RemoveUnusedDependencies,
    Finalize,
}

/// The stage tree every project goes through
pub fn setup_stages() -> Pipeline<SetupStage> {
    Pipeline::new(vec![
        Stage::task("Creating base SvelteKit project", SetupStage::CreateBase),
        Stage::with_children(
            "Setting up project structure",
            SetupStage::EnterProject,
            vec![
                Stage::task("Creating directories", SetupStage::CreateDirectories),
                Stage::task("Copying template files", SetupStage::CopyTemplates),
            ],
        ),
        Stage::group(
            "Installing dependencies",
            vec![
                Stage::task(
                    "Installing development dependencies",
                    SetupStage::InstallDevDependencies,
                ),
                Stage::task(
                    "Installing production dependencies",
                    SetupStage::InstallDependencies,
                ),
                Stage::task(
                    "Removing unused dependencies",
                    SetupStage::RemoveUnusedDependencies,
                ),
            ],
        ),
        Stage::task("Finalizing project", SetupStage::Finalize),
    ])
}

/// Arguments for `sv create`
pub fn base_project_args(spec: &ProjectSpec, dest: &Path) -> Vec<String> {
    let mut args = vec![
        "sv".to_string(),
        "create".to_string(),
        dest.to_string_lossy().into_owned(),
        "--template".to_string(),
        "minimal".to_string(),
    ];

    match spec.types {
        TypesMode::TypeScript => args.extend(["--types".to_string(), "ts".to_string()]),
        TypesMode::CheckJs => args.extend(["--types".to_string(), "jsdoc".to_string()]),
        TypesMode::None => args.push("--no-types".to_string()),
    }

    let add_ons = spec.add_ons();
    if add_ons.is_empty() {
        args.push("--no-add-ons".to_string());
    } else {
        args.push("--add".to_string());
        args.extend(add_ons.iter().map(|a| a.to_string()));
    }

    args.push("--no-install".to_string());
    args
}

pub fn dev_dependencies(spec: &ProjectSpec) -> Vec<String> {
    let mut deps = vec!["@sveltejs/adapter-static".to_string()];
    if spec.features.capacitor {
        deps.push("@capacitor/cli".to_string());
    }
    deps
}

pub fn dependencies(spec: &ProjectSpec) -> Vec<String> {
    let mut deps = vec![IONIC_CORE.to_string(), "ionic-svelte".to_string()];
    if spec.features.capacitor {
        deps.push("@capacitor/core".to_string());
    }
    if spec.features.ionicons {
        deps.push("ionicons".to_string());
    }
    deps
}

pub fn unused_dependencies() -> Vec<String> {
    vec!["@sveltejs/adapter-auto".to_string()]
}

/// Executes [`SetupStage`]s for one project
struct ProjectSetup<'a, R> {
    spec: &'a ProjectSpec,
    materializer: &'a Materializer,
    runner: &'a R,
    capacitor_host: Ipv4Addr,
}

impl<R: CommandRunner> StageExecutor<SetupStage> for ProjectSetup<'_, R> {
    async fn execute(
        &self,
        stage: &SetupStage,
        ctx: &mut ExecutionContext,
        reporter: &dyn Reporter,
    ) -> Result<()> {
        match stage {
            SetupStage::CreateBase => self.create_base(ctx).await,
            SetupStage::EnterProject => {
                ctx.enter_project();
                Ok(())
            }
            SetupStage::CreateDirectories => self.create_directories(ctx).await,
            SetupStage::CopyTemplates => self.copy_templates(ctx, reporter).await,
            SetupStage::InstallDevDependencies => {
                self.package_manager(ctx, PmAction::InstallDev(dev_dependencies(self.spec)))
                    .await
            }
            SetupStage::InstallDependencies => {
                self.package_manager(ctx, PmAction::InstallProd(dependencies(self.spec)))
                    .await
            }
            SetupStage::RemoveUnusedDependencies => {
                self.package_manager(ctx, PmAction::Remove(unused_dependencies()))
                    .await
            }
            SetupStage::Finalize => {
                if self.spec.features.prettier {
                    let format = PmAction::RunScript("format".to_string());
                    if let Err(e) = self.package_manager(ctx, format).await {
                        reporter.warn(&format!("Failed to run Prettier - {}", e));
                    }
                }
                Ok(())
            }
        }
    }
}

impl<R: CommandRunner> ProjectSetup<'_, R> {
    async fn package_manager(&self, ctx: &ExecutionContext, action: PmAction) -> Result<()> {
        let invocation = ctx.package_manager()?.command(&action, ctx.working_dir());
        self.runner.run(&invocation).await
    }

    async fn create_base(&self, ctx: &mut ExecutionContext) -> Result<()> {
        let pm = self
            .spec
            .package_manager
            .unwrap_or_else(|| PackageManager::detect(ctx.working_dir()));
        debug!(package_manager = %pm, "resolved package manager");
        ctx.set_package_manager(pm);

        let args = base_project_args(self.spec, ctx.project_dir());
        self.package_manager(ctx, PmAction::Exec(args)).await
    }

    async fn create_directories(&self, ctx: &ExecutionContext) -> Result<()> {
        let root = ctx.working_dir();
        let mut dirs = vec![root.join("src/lib/components"), root.join("src/theme")];
        if self.spec.features.capacitor {
            dirs.push(root.join("capacitor"));
        }
        for dir in dirs {
            fs::create_dir_all(&dir)
                .await
                .map_err(|e| ScaffoldError::fs("Failed to create directory", &dir, e))?;
        }
        Ok(())
    }

    async fn copy_templates(&self, ctx: &ExecutionContext, reporter: &dyn Reporter) -> Result<()> {
        let root = ctx.working_dir();
        let use_typescript = self.spec.uses_typescript();
        let strip = !use_typescript;
        let verbatim = MaterializeOptions::new();

        self.materializer.materialize("src/theme", root, &verbatim).await?;
        self.materializer
            .materialize("src/lib/components", root, &MaterializeOptions::new().strip_types(strip))
            .await?;
        self.materializer.materialize("static", root, &verbatim).await?;

        let route_vars = SubstitutionMap::new()
            .with("projectName", self.spec.name.as_str())?
            .with("useTypescript", use_typescript.to_string())?;
        self.materializer
            .materialize(
                "src/routes",
                root,
                &MaterializeOptions::new().strip_types(strip).variables(route_vars),
            )
            .await?;

        self.materializer.materialize("svelte.config.js", root, &verbatim).await?;

        let env_vars = SubstitutionMap::new().with("projectName", self.spec.name.as_str())?;
        self.materializer
            .materialize(".env", root, &MaterializeOptions::new().variables(env_vars))
            .await?;

        let layout = root
            .join("src/routes")
            .join(if use_typescript { "+layout.ts" } else { "+layout.js" });
        fs::write(&layout, SSR_DISABLED)
            .await
            .map_err(|e| ScaffoldError::fs("Failed to write file", &layout, e))?;

        if use_typescript {
            let tsconfig = root.join("tsconfig.json");
            if let Err(e) = config::rewrite_file(&tsconfig, config::patch_tsconfig).await {
                reporter.warn(&format!("Unable to update tsconfig.json - {}", e));
            }
        }

        if self.spec.features.capacitor {
            self.setup_capacitor(root, reporter).await?;
        }

        Ok(())
    }

    async fn setup_capacitor(&self, root: &Path, reporter: &dyn Reporter) -> Result<()> {
        let package_json = root.join("package.json");
        if let Err(e) = config::rewrite_file(&package_json, config::patch_dev_host).await {
            reporter.warn(&format!("Unable to update package.json - {}", e));
        }

        let settings = CapacitorSettings::for_project(&self.spec.name, self.capacitor_host);
        if self.spec.uses_typescript() {
            self.materializer
                .materialize(
                    "capacitor.config.ts",
                    root,
                    &MaterializeOptions::new().variables(settings.variables()?),
                )
                .await?;
        } else {
            settings.write_json(root).await?;
        }
        Ok(())
    }
}

/// Create a new project as described by `spec`.
///
/// Returns the absolute project path. On failure after the destination was
/// created, the destination is removed and the outcome recorded in the error.
pub async fn create_project<R: CommandRunner>(
    spec: &ProjectSpec,
    materializer: &Materializer,
    runner: &R,
    reporter: &dyn Reporter,
) -> std::result::Result<PathBuf, CreateError> {
    validate_project_name(&spec.name)?;
    let project_dir = spec.destination()?;
    validate_directory(&project_dir)?;

    fs::create_dir_all(&project_dir)
        .await
        .map_err(|e| ScaffoldError::fs("Failed to create directory", &project_dir, e))?;
    info!(path = %project_dir.display(), "creating project");

    let cleanup = cleanup_handler(&project_dir);
    let working_dir = project_dir
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| project_dir.clone());
    let mut ctx = ExecutionContext::new(&project_dir, working_dir);

    let setup = ProjectSetup {
        spec,
        materializer,
        runner,
        capacitor_host: if spec.features.capacitor {
            config::lan_address()
        } else {
            Ipv4Addr::LOCALHOST
        },
    };

    match setup_stages().run(&setup, &mut ctx, reporter).await {
        Ok(()) => Ok(project_dir),
        Err(e) => {
            let mut err = cleanup(e);
            err.rollback().await;
            Err(err)
        }
    }
}
