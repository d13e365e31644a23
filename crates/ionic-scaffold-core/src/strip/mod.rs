//! TypeScript removal for projects that opt out of static typing
//!
//! - `.ts` sources lose their type syntax and become `.js`
//! - `.svelte` components lose typed script attributes, script-block types
//!   and the typed markup constructs

mod lexer;
pub mod svelte;
pub mod typescript;

use std::path::{Path, PathBuf};

pub use svelte::strip_svelte;
pub use typescript::strip_types;

/// How a file is rewritten when types are stripped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTransform {
    /// Typed source: strip and rename to `.js`
    TypedSource,
    /// Component with script blocks: strip in place
    Component,
}

impl FileTransform {
    pub fn for_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("ts") => Some(FileTransform::TypedSource),
            Some("svelte") => Some(FileTransform::Component),
            _ => None,
        }
    }

    pub fn apply(&self, content: &str) -> String {
        match self {
            FileTransform::TypedSource => strip_types(content),
            FileTransform::Component => strip_svelte(content),
        }
    }

    /// Where the transformed file is written
    pub fn target_path(&self, path: &Path) -> PathBuf {
        match self {
            FileTransform::TypedSource => path.with_extension("js"),
            FileTransform::Component => path.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_selection() {
        assert_eq!(
            FileTransform::for_path(Path::new("src/routes/+page.ts")),
            Some(FileTransform::TypedSource)
        );
        assert_eq!(
            FileTransform::for_path(Path::new("Tabs.svelte")),
            Some(FileTransform::Component)
        );
        assert_eq!(FileTransform::for_path(Path::new("variables.css")), None);
    }

    #[test]
    fn test_typed_source_renamed() {
        let target = FileTransform::TypedSource.target_path(Path::new("lib/helper.ts"));
        assert_eq!(target, PathBuf::from("lib/helper.js"));
        let same = FileTransform::Component.target_path(Path::new("lib/Tabs.svelte"));
        assert_eq!(same, PathBuf::from("lib/Tabs.svelte"));
    }
}
