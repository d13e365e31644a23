//! Edits to files produced by the base generator, and the Capacitor config

use crate::error::{Result, ScaffoldError};
use crate::templates::SubstitutionMap;
use serde::Serialize;
use std::net::{Ipv4Addr, UdpSocket};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Vite's default dev server port
pub const DEV_SERVER_PORT: u16 = 5173;

const COMPILER_OPTIONS_ANCHOR: &str = r#""compilerOptions": {"#;

const IONIC_COMPILER_OPTIONS: &str = r#""compilerOptions": {
    "verbatimModuleSyntax": true,
    "typeRoots": [
      "./node_modules/ionic-svelte"
    ],
    "types": [
      "ionic-svelte"
    ],"#;

const DEV_SCRIPT: &str = r#""dev": "vite dev""#;
const DEV_SCRIPT_HOST: &str = r#""dev": "vite dev --host""#;

/// Register the ionic-svelte type roots right after `"compilerOptions": {`
pub fn patch_tsconfig(content: &str) -> String {
    content.replacen(COMPILER_OPTIONS_ANCHOR, IONIC_COMPILER_OPTIONS, 1)
}

/// Expose the dev server on the network so a device can reach it
pub fn patch_dev_host(content: &str) -> String {
    content.replacen(DEV_SCRIPT, DEV_SCRIPT_HOST, 1)
}

/// Apply `edit` to a text file in place. Returns whether the content changed.
pub async fn rewrite_file(path: &Path, edit: impl FnOnce(&str) -> String) -> Result<bool> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| ScaffoldError::fs("Failed to read file", path, e))?;
    let updated = edit(&content);
    if updated == content {
        debug!(path = %path.display(), "edit left file unchanged");
        return Ok(false);
    }
    fs::write(path, updated)
        .await
        .map_err(|e| ScaffoldError::fs("Failed to write file", path, e))?;
    Ok(true)
}

/// Best-effort LAN address of this machine.
///
/// Connecting a UDP socket sends nothing; it only asks the OS which local
/// interface would route to the target.
pub fn lan_address() -> Ipv4Addr {
    let probe = || -> std::io::Result<Ipv4Addr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9))?;
        match socket.local_addr()?.ip() {
            std::net::IpAddr::V4(ip) if !ip.is_unspecified() => Ok(ip),
            _ => Err(std::io::Error::other("no IPv4 route")),
        }
    };
    probe().unwrap_or_else(|e| {
        debug!("falling back to loopback for dev server url: {}", e);
        Ipv4Addr::LOCALHOST
    })
}

pub fn server_url(host: Ipv4Addr) -> String {
    format!("http://{}:{}/", host, DEV_SERVER_PORT)
}

/// Values written into the Capacitor config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapacitorSettings {
    pub app_id: String,
    pub app_name: String,
    pub server_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CapacitorJson<'a> {
    web_dir: &'a str,
    app_id: &'a str,
    app_name: &'a str,
    // Renamed to `server` by the user to turn on live reload
    #[serde(rename = "_server")]
    server: ServerJson<'a>,
}

#[derive(Serialize)]
struct ServerJson<'a> {
    url: &'a str,
    cleartext: bool,
}

impl CapacitorSettings {
    pub fn for_project(name: &str, host: Ipv4Addr) -> Self {
        Self {
            app_id: format!("{}.ionic.io", name),
            app_name: name.to_string(),
            server_url: server_url(host),
        }
    }

    /// Placeholders used by the typed `capacitor.config.ts` template
    pub fn variables(&self) -> Result<SubstitutionMap> {
        SubstitutionMap::new()
            .with("appId", self.app_id.as_str())?
            .with("appName", self.app_name.as_str())?
            .with("serverUrl", self.server_url.as_str())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&CapacitorJson {
            web_dir: "build",
            app_id: &self.app_id,
            app_name: &self.app_name,
            server: ServerJson {
                url: &self.server_url,
                cleartext: true,
            },
        })
    }

    /// Write `capacitor.config.json` into `project_dir`
    pub async fn write_json(&self, project_dir: &Path) -> Result<()> {
        let path = project_dir.join("capacitor.config.json");
        let json = self
            .to_json()
            .map_err(|e| ScaffoldError::fs("Failed to serialize Capacitor config", &path, e.into()))?;
        fs::write(&path, json)
            .await
            .map_err(|e| ScaffoldError::fs("Failed to write file", &path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TSCONFIG: &str = r#"{
	"extends": "./.svelte-kit/tsconfig.json",
	"compilerOptions": {
		"strict": true
	}
}
"#;

    #[test]
    fn test_tsconfig_patch_inserts_type_roots() {
        let patched = patch_tsconfig(TSCONFIG);
        assert!(patched.contains("\"compilerOptions\": {\n    \"verbatimModuleSyntax\": true,"));
        assert!(patched.contains("\"./node_modules/ionic-svelte\""));
        assert!(patched.contains("\"types\": [\n      \"ionic-svelte\"\n    ],\n\t\t\"strict\": true"));
    }

    #[test]
    fn test_tsconfig_without_anchor_unchanged() {
        assert_eq!(patch_tsconfig("{}"), "{}");
    }

    #[test]
    fn test_dev_host_patch() {
        let pkg = r#"{"scripts": {"dev": "vite dev", "build": "vite build"}}"#;
        assert_eq!(
            patch_dev_host(pkg),
            r#"{"scripts": {"dev": "vite dev --host", "build": "vite build"}}"#
        );
    }

    #[test]
    fn test_capacitor_settings() {
        let settings = CapacitorSettings::for_project("demo-app", Ipv4Addr::new(192, 168, 1, 20));
        assert_eq!(settings.app_id, "demo-app.ionic.io");
        assert_eq!(settings.app_name, "demo-app");
        assert_eq!(settings.server_url, "http://192.168.1.20:5173/");

        let vars = settings.variables().unwrap();
        assert_eq!(vars.get("appId"), Some("demo-app.ionic.io"));
        assert_eq!(vars.get("serverUrl"), Some("http://192.168.1.20:5173/"));
    }

    #[test]
    fn test_capacitor_json_layout() {
        let settings = CapacitorSettings::for_project("demo-app", Ipv4Addr::LOCALHOST);
        assert_eq!(
            settings.to_json().unwrap(),
            r#"{
  "webDir": "build",
  "appId": "demo-app.ionic.io",
  "appName": "demo-app",
  "_server": {
    "url": "http://127.0.0.1:5173/",
    "cleartext": true
  }
}"#
        );
    }

    #[tokio::test]
    async fn test_rewrite_file_reports_changes() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tsconfig.json");
        std::fs::write(&path, TSCONFIG).unwrap();

        assert!(rewrite_file(&path, patch_tsconfig).await.unwrap());
        let once = std::fs::read_to_string(&path).unwrap();
        assert!(once.contains("verbatimModuleSyntax"));

        let err = rewrite_file(&temp.path().join("missing.json"), patch_tsconfig)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::FileSystemFailure);
    }

    #[test]
    fn test_lan_address_is_usable() {
        assert!(!lan_address().is_unspecified());
    }
}
