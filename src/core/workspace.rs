//! Workspace member discovery.
//!
//! A [`Workspace`] is the root manifest plus the expanded list of member
//! directories. Member entries follow Cargo semantics: literal paths or
//! glob patterns, filtered by `workspace.exclude`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::glob;

use crate::core::manifest::{Manifest, WorkspaceConfig};

/// File name of the manifest at every workspace level.
pub const MANIFEST_NAME: &str = "Cargo.toml";

/// A workspace root and its member directories.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    manifest_path: PathBuf,
    members: Vec<PathBuf>,
}

impl Workspace {
    /// Open a workspace rooted at `root_dir`.
    ///
    /// Fails if the root manifest is missing a `[workspace]` section or if
    /// any member directory lacks its own manifest.
    pub fn open(root_dir: &Path) -> Result<Self> {
        let manifest_path = root_dir.join(MANIFEST_NAME);
        let manifest = Manifest::load(&manifest_path)?;
        let config = manifest.workspace().with_context(|| {
            format!("{} has no [workspace] section", manifest_path.display())
        })?;

        let members = expand_members(root_dir, config)?;
        tracing::debug!("discovered {} workspace member(s)", members.len());

        Ok(Workspace {
            root: root_dir.to_path_buf(),
            manifest_path,
            members,
        })
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the root manifest.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Member directories, sorted for a deterministic processing order.
    pub fn members(&self) -> &[PathBuf] {
        &self.members
    }

    /// Manifest path for a member directory.
    pub fn member_manifest_path(&self, member_dir: &Path) -> PathBuf {
        member_dir.join(MANIFEST_NAME)
    }
}

fn expand_members(root: &Path, config: &WorkspaceConfig) -> Result<Vec<PathBuf>> {
    let excluded: Vec<PathBuf> = config.exclude.iter().map(|e| root.join(e)).collect();

    let mut dirs = Vec::new();
    for pattern in &config.members {
        let full_pattern = root.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        let mut matched = 0usize;
        for entry in glob(&pattern_str)
            .with_context(|| format!("invalid workspace member pattern: {pattern}"))?
        {
            let path = entry?;
            if !path.is_dir() {
                continue;
            }
            matched += 1;

            if excluded.iter().any(|e| path.starts_with(e)) {
                tracing::debug!("excluding workspace member {}", path.display());
                continue;
            }
            dirs.push(path);
        }

        if matched == 0 {
            bail!("workspace member `{pattern}` did not match any directory");
        }
    }

    dirs.sort();
    dirs.dedup();

    for dir in &dirs {
        if !dir.join(MANIFEST_NAME).is_file() {
            bail!(
                "workspace member {} has no {}",
                dir.display(),
                MANIFEST_NAME
            );
        }
    }

    Ok(dirs)
}
