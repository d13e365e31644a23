//! Completion message shown after a successful run

use crate::config::generator::DEV_SERVER_PORT;
use crate::product::ProductConfig;
use crate::project::{ProjectSpec, TypesMode};
use colored::Colorize;
use std::path::Path;

pub const TYPESCRIPT_DOCS: &str = "https://www.typescriptlang.org/tsconfig#checkJs";
pub const ESLINT_DOCS: &str = "https://sveltejs.github.io/eslint-plugin-svelte/";
pub const PRETTIER_DOCS: &str = "https://prettier.io/docs/en/options.html";
pub const PLAYWRIGHT_DOCS: &str = "https://playwright.dev";
pub const VITEST_DOCS: &str = "https://vitest.dev";
pub const CAPACITOR_DOCS: &str = "https://capacitorjs.com/docs/getting-started";
pub const IONICONS_DOCS: &str = "https://ionic.io/ionicons";
pub const PWA_DOCS: &str = "https://github.com/vite-pwa/sveltekit";

/// A selected feature and where to read about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureNote {
    pub name: &'static str,
    pub docs: &'static str,
    pub detail: Option<String>,
}

impl FeatureNote {
    fn new(name: &'static str, docs: &'static str) -> Self {
        Self {
            name,
            docs,
            detail: None,
        }
    }

    fn detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub fn feature_notes(spec: &ProjectSpec) -> Vec<FeatureNote> {
    let mut notes = Vec::new();
    match spec.types {
        TypesMode::TypeScript => notes.push(
            FeatureNote::new("TypeScript", TYPESCRIPT_DOCS)
                .detail("Inside Svelte components, use <script lang=\"ts\">"),
        ),
        TypesMode::CheckJs => notes.push(FeatureNote::new("Type-checked JavaScript", TYPESCRIPT_DOCS)),
        TypesMode::None => {}
    }

    let features = &spec.features;
    if features.eslint {
        notes.push(FeatureNote::new("ESLint", ESLINT_DOCS));
    }
    if features.prettier {
        notes.push(FeatureNote::new("Prettier", PRETTIER_DOCS));
    }
    if features.playwright {
        notes.push(FeatureNote::new("Playwright", PLAYWRIGHT_DOCS));
    }
    if features.vitest {
        notes.push(FeatureNote::new("Vitest", VITEST_DOCS));
    }
    if features.capacitor {
        let config = if spec.uses_typescript() {
            "capacitor.config.ts"
        } else {
            "capacitor.config.json"
        };
        notes.push(FeatureNote::new("Capacitor", CAPACITOR_DOCS).detail(format!(
            "The project is configured for live reload; remove the server entry in {} for the final build",
            config
        )));
    }
    if features.ionicons {
        notes.push(FeatureNote::new("Ionicons", IONICONS_DOCS));
    }
    notes
}

/// Hint printed under the next steps when a native wrapper is configured
pub fn live_reload_hint(spec: &ProjectSpec) -> Option<String> {
    if !spec.features.capacitor {
        return None;
    }
    Some(if spec.uses_typescript() {
        "Use the -hmr flag after your npx cap run/open/sync commands to use HMR together with npm run dev".to_string()
    } else {
        "Want HMR in Capacitor dev mode? Rename _server to server in capacitor.config.json".to_string()
    })
}

/// Print the features, the Capacitor settings and the numbered next steps
pub fn print_summary<C: ProductConfig>(config: &C, spec: &ProjectSpec, project_dir: &Path) {
    println!();
    println!("{}", "Your project is ready!".green().bold());
    println!("  {}", project_dir.display().to_string().dimmed());

    for note in feature_notes(spec) {
        println!("{} {}", "✓".green(), note.name.bold());
        if let Some(detail) = &note.detail {
            println!("  {}", detail);
        }
        println!("  {}", note.docs.cyan());
    }

    if spec.features.capacitor {
        println!();
        println!("Capacitor configuration");
        println!("  App name {}", spec.name.cyan().bold());
        println!("  Package name {}", format!("{}.ionic.io", spec.name).cyan().bold());
        println!("  Vite dev server port {}", DEV_SERVER_PORT.to_string().cyan().bold());
    }

    println!();
    println!("  Next steps");
    println!();
    for (i, step) in config.next_steps(spec).iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }
    println!();
    println!("To close the dev server, hit {}", "Ctrl-C".cyan().bold());

    if let Some(hint) = live_reload_hint(spec) {
        println!();
        println!("{}", hint);
    }

    println!();
    println!(
        "Hint: Make your app offline and near native by turning it into a progressive web app - see {}",
        PWA_DOCS.cyan()
    );
    println!();
    println!(
        "{}",
        format!(
            "Need some help or found an issue with this installer? Visit us at {}",
            config.issues_url()
        )
        .dimmed()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Features;

    #[test]
    fn test_default_notes() {
        let spec = ProjectSpec::builder("demo-app").build();
        let names: Vec<&str> = feature_notes(&spec).iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["TypeScript", "ESLint", "Prettier", "Ionicons"]);
    }

    #[test]
    fn test_capacitor_note_names_config_file() {
        let spec = ProjectSpec::builder("demo-app")
            .types(TypesMode::None)
            .features(Features {
                eslint: false,
                prettier: false,
                playwright: false,
                vitest: false,
                ionicons: false,
                capacitor: true,
            })
            .build();
        let notes = feature_notes(&spec);
        assert_eq!(notes.len(), 1);
        assert!(notes[0].detail.as_deref().unwrap().contains("capacitor.config.json"));
        assert!(live_reload_hint(&spec).unwrap().contains("Rename _server"));
    }

    #[test]
    fn test_no_hint_without_capacitor() {
        let spec = ProjectSpec::builder("demo-app").build();
        assert!(live_reload_hint(&spec).is_none());
    }
}
