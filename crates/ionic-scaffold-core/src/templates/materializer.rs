//! Copying template trees into the generated project

use crate::error::{Result, ScaffoldError};
use crate::strip::FileTransform;
use crate::templates::resolver::TemplateResolver;
use crate::templates::substitute::{substitute, SubstitutionMap};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Per-call materialization options
#[derive(Debug, Clone, Default)]
pub struct MaterializeOptions {
    /// Destination relative to the project root; defaults to the source subpath
    pub dest_path: Option<PathBuf>,
    /// Enables stripping and substitution after the verbatim copy
    pub process_templates: bool,
    /// Strip TypeScript from `.ts` and `.svelte` files (directories only)
    pub strip_types: bool,
    pub variables: Option<SubstitutionMap>,
}

impl MaterializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dest(mut self, path: impl Into<PathBuf>) -> Self {
        self.dest_path = Some(path.into());
        self
    }

    pub fn strip_types(mut self, strip: bool) -> Self {
        self.process_templates = true;
        self.strip_types = strip;
        self
    }

    pub fn variables(mut self, variables: SubstitutionMap) -> Self {
        self.process_templates = true;
        self.variables = Some(variables);
        self
    }

    fn processes_directories(&self) -> bool {
        self.process_templates && (self.strip_types || self.variables.is_some())
    }
}

/// Copies parts of the template package into a project
#[derive(Debug, Clone)]
pub struct Materializer {
    resolver: TemplateResolver,
}

impl Materializer {
    pub fn new(resolver: TemplateResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    /// Copy `source` from the template package to `project_root`, returning
    /// the destination path
    pub async fn materialize(
        &self,
        source: impl AsRef<Path>,
        project_root: &Path,
        options: &MaterializeOptions,
    ) -> Result<PathBuf> {
        let source = source.as_ref();
        let template_root = self.resolver.resolve()?;
        let full_source = template_root.join(source);
        let dest = project_root.join(options.dest_path.as_deref().unwrap_or(source));

        let metadata = fs::metadata(&full_source)
            .await
            .map_err(|_| ScaffoldError::SourceNotFound {
                path: full_source.clone(),
            })?;

        debug!(
            source = %full_source.display(),
            dest = %dest.display(),
            directory = metadata.is_dir(),
            "materializing template"
        );

        if metadata.is_dir() {
            copy_tree(&full_source, &dest).await?;
            if options.processes_directories() {
                process_tree(&dest, options).await?;
            }
        } else {
            copy_file(&full_source, &dest).await?;
            if let (true, Some(variables)) = (options.process_templates, &options.variables) {
                process_file(&dest, None, Some(variables)).await?;
            }
        }

        Ok(dest)
    }
}

async fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| ScaffoldError::fs("Failed to create directory", parent, e))?;
    }
    fs::copy(from, to)
        .await
        .map_err(|e| ScaffoldError::fs("Failed to copy file", to, e))?;
    Ok(())
}

/// Byte-for-byte recursive copy
async fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir_all(to)
        .await
        .map_err(|e| ScaffoldError::fs("Failed to create directory", to, e))?;

    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(from).to_path_buf();
            ScaffoldError::fs("Failed to read template directory", path, e.into())
        })?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .await
                .map_err(|e| ScaffoldError::fs("Failed to create directory", &target, e))?;
        } else {
            copy_file(entry.path(), &target).await?;
        }
    }
    Ok(())
}

async fn process_tree(dest: &Path, options: &MaterializeOptions) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(dest)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect();

    for file in files {
        let transform = if options.strip_types {
            FileTransform::for_path(&file)
        } else {
            None
        };
        process_file(&file, transform, options.variables.as_ref()).await?;
    }
    Ok(())
}

/// Strip, then substitute; writes only when something changed
async fn process_file(
    path: &Path,
    transform: Option<FileTransform>,
    variables: Option<&SubstitutionMap>,
) -> Result<()> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), "skipping unreadable file: {}", e);
            return Ok(());
        }
    };
    let Ok(content) = String::from_utf8(bytes) else {
        debug!(path = %path.display(), "skipping non-text file");
        return Ok(());
    };

    let mut processed = match transform {
        Some(transform) => transform.apply(&content),
        None => content.clone(),
    };
    if let Some(variables) = variables {
        processed = substitute(&processed, variables);
    }

    let target = match transform {
        Some(transform) => transform.target_path(path),
        None => path.to_path_buf(),
    };
    if processed == content && target == path {
        return Ok(());
    }

    fs::write(&target, processed)
        .await
        .map_err(|e| ScaffoldError::fs("Failed to write file", &target, e))?;
    if target != path {
        if let Err(e) = fs::remove_file(path).await {
            warn!(path = %path.display(), "could not remove original typed file: {}", e);
            return Err(ScaffoldError::fs("Failed to remove file", path, e));
        }
    }
    Ok(())
}
