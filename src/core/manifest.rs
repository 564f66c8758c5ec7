//! Typed read-only manifest view.
//!
//! Where the tool only needs to *read* a manifest — the root's member list,
//! or a dependency's declared package name — it goes through this serde
//! model rather than the editable document. Rewrites always go through
//! [`crate::core::document::ManifestDocument`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Package metadata from the `[package]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    /// Package name
    pub name: String,
}

/// Workspace configuration from the `[workspace]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceConfig {
    /// Member directory paths or glob patterns.
    #[serde(default)]
    pub members: Vec<String>,

    /// Directories to exclude from the member list.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// A parsed manifest, reduced to the fields the tool reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    package: Option<PackageMetadata>,

    #[serde(default)]
    workspace: Option<WorkspaceConfig>,
}

impl Manifest {
    /// Load a manifest from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        Self::parse(&content, path)
    }

    /// Parse manifest content.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))
    }

    /// The declared package name, if this manifest has a `[package]` section.
    pub fn package_name(&self) -> Option<&str> {
        self.package.as_ref().map(|p| p.name.as_str())
    }

    /// The workspace configuration, if this manifest has a `[workspace]` section.
    pub fn workspace(&self) -> Option<&WorkspaceConfig> {
        self.workspace.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_package_name() {
        let content = r#"
[package]
name = "alpha"
version = "0.1.0"
"#;
        let manifest = Manifest::parse(content, Path::new("Cargo.toml")).unwrap();
        assert_eq!(manifest.package_name(), Some("alpha"));
        assert!(manifest.workspace().is_none());
    }

    #[test]
    fn test_parse_workspace_members() {
        let content = r#"
[workspace]
members = ["crates/*", "tools/xtask"]
exclude = ["crates/experimental"]
"#;
        let manifest = Manifest::parse(content, Path::new("Cargo.toml")).unwrap();
        let workspace = manifest.workspace().unwrap();
        assert_eq!(workspace.members.len(), 2);
        assert_eq!(workspace.exclude, vec!["crates/experimental".to_string()]);
        assert!(manifest.package_name().is_none());
    }

    #[test]
    fn test_parse_failure_carries_path() {
        let result = Manifest::parse("not = [valid", Path::new("bad/Cargo.toml"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("bad/Cargo.toml"));
    }
}
