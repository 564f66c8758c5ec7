//! Resolution of aliased dependency keys.
//!
//! A dependency can be registered under a key that is not the target
//! package's declared name: a stale key left over from a rename, or an
//! explicit `package = "..."` rename-on-import. After consolidation both
//! forms point at the shared table, so the aliased keys collapse to the
//! canonical package name. This pass is independent of the hoist pass and
//! runs top-down from the root's member list.

use std::path::Path;

use anyhow::{Context, Result};
use toml_edit::{InlineTable, Item, Table, Value};

use crate::core::document::{DepKind, DocumentRole, ManifestDocument};
use crate::core::manifest::Manifest;
use crate::core::workspace::{Workspace, MANIFEST_NAME};

/// Drop shared-table entries whose key is an alias for a path dependency
/// that is already registered under its declared name.
///
/// Returns whether anything was removed.
pub fn collapse_root_aliases(shared: &mut Table, workspace_root: &Path) -> Result<bool> {
    let mut aliased = Vec::new();

    for (name, item) in shared.iter() {
        let Some(entry) = item.as_table_like() else {
            continue;
        };
        let Some(path) = entry.get("path").and_then(|i| i.as_str()) else {
            continue;
        };

        let manifest_path = workspace_root.join(path).join(MANIFEST_NAME);
        let manifest = Manifest::load(&manifest_path)?;
        let real_name = manifest.package_name().with_context(|| {
            format!("{} has no `package.name`", manifest_path.display())
        })?;

        if real_name != name && shared.contains_key(real_name) {
            aliased.push(name.to_string());
        }
    }

    for name in &aliased {
        tracing::info!("removing aliased shared entry `{name}`");
        shared.remove(name);
    }
    Ok(!aliased.is_empty())
}

/// Re-key member entries whose `package` field names a different package.
///
/// The aliased key is removed and the entry re-registered under the real
/// name as a workspace delegation. Returns whether anything changed.
pub fn rekey_member_aliases(deps: &mut Table) -> bool {
    let renames: Vec<(String, String)> = deps
        .iter()
        .filter_map(|(name, item)| {
            let entry = item.as_table_like()?;
            let real = entry.get("package")?.as_str()?;
            (real != name).then(|| (name.to_string(), real.to_string()))
        })
        .collect();

    for (alias, real) in &renames {
        deps.remove(alias);
        let mut inline = InlineTable::new();
        inline.insert("workspace", Value::from(true));
        deps.insert(real, Item::Value(Value::InlineTable(inline)));
        tracing::info!("re-keyed `{alias}` to its declared package name `{real}`");
    }

    !renames.is_empty()
}

/// Run the alias-resolution pass over the workspace rooted at `root_dir`.
pub fn resolve_aliases(root_dir: &Path) -> Result<()> {
    let workspace = Workspace::open(root_dir)?;

    let mut root = ManifestDocument::load(workspace.manifest_path(), DocumentRole::Root)
        .context("failed to load workspace root manifest")?;
    let mut shared = root.dependencies(DepKind::Normal);
    if collapse_root_aliases(&mut shared, workspace.root())? {
        root.set_dependencies(DepKind::Normal, shared)?;
        root.save()?;
    }

    for member_dir in workspace.members() {
        let manifest_path = workspace.member_manifest_path(member_dir);
        let mut member = ManifestDocument::load(&manifest_path, DocumentRole::Member)?;

        let mut changed = false;
        for kind in [DepKind::Normal, DepKind::Dev] {
            if !member.has_dependencies(kind) {
                continue;
            }
            let mut deps = member.dependencies(kind);
            if rekey_member_aliases(&mut deps) {
                member.set_dependencies(kind, deps)?;
                changed = true;
            }
        }
        if changed {
            member.save()?;
        }
    }

    Ok(())
}
