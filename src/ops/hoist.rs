//! Implementation of the hoist pass.
//!
//! One linear batch over the workspace: load the root manifest, fold every
//! member's dependency declarations into the shared
//! `[workspace.dependencies]` table, rewrite the members to
//! `workspace = true` delegations, normalize member `[package]` metadata,
//! and write everything back. Any load or write failure aborts the run.

use std::path::Path;

use anyhow::{bail, Context, Result};
use toml_edit::{InlineTable, Item, Table, Value};

use crate::core::document::{DepKind, DocumentRole, ManifestDocument};
use crate::core::workspace::Workspace;

/// `[package]` fields rewritten to workspace inheritance on every member.
const INHERITED_PACKAGE_FIELDS: [&str; 7] = [
    "authors",
    "edition",
    "homepage",
    "license",
    "publish",
    "repository",
    "rust-version",
];

/// Extract the entries of a member dependency table that should migrate to
/// the shared table.
///
/// Entries already marked `workspace = true` contribute nothing. `path`
/// fields are rebased by stripping the leading `../` segments: the shared
/// table is resolved relative to the workspace root, not the member
/// directory.
pub fn origin_dependencies(deps: &Table) -> Table {
    let mut origin = Table::new();

    for (name, item) in deps.iter() {
        let Some(entry) = item.as_table_like() else {
            // Bare version string, migrates verbatim.
            origin.insert(name, item.clone());
            continue;
        };

        if entry.contains_key("workspace") {
            tracing::debug!("`{name}` already delegates to the workspace");
            continue;
        }

        let mut inline = to_inline_table(item);
        if let Some(path) = inline.get("path").and_then(Value::as_str) {
            let rebased = strip_parent_segments(path).to_string();
            inline.insert("path", rebased.into());
        }
        origin.insert(name, Item::Value(Value::InlineTable(inline)));
    }

    origin
}

/// Merge an origin set into the shared table.
///
/// Existing keys win: a later member's differing entry for the same name is
/// dropped, not merged.
pub fn combine_dependencies(shared: &mut Table, origin: &Table) {
    for (name, item) in origin.iter() {
        if shared.contains_key(name) {
            tracing::debug!("`{name}` already in the shared table, keeping the existing entry");
            continue;
        }
        shared.insert(name, item.clone());
    }
}

/// Rewrite a member dependency table to workspace delegations.
///
/// Pinning fields (`path`, `version`, `git`, `rev`) are dropped and
/// `workspace = true` added; other fields such as `features` and `optional`
/// stay. Bare version strings collapse to `{ workspace = true }`.
pub fn replace_dependencies(deps: &mut Table) {
    for (name, item) in deps.iter_mut() {
        if let Some(entry) = item.as_table_like() {
            if entry.contains_key("workspace") {
                continue;
            }
        }

        let mut inline = to_inline_table(item);
        for field in ["path", "version", "git", "rev"] {
            inline.remove(field);
        }
        inline.insert("workspace", Value::from(true));
        *item = Item::Value(Value::InlineTable(inline));
        tracing::debug!("`{}` rewritten to a workspace delegation", name.get());
    }
}

/// Rewrite a member's inheritable `[package]` fields to `{ workspace = true }`.
///
/// Blanket policy: previous values are discarded unconditionally.
pub fn replace_package(member: &mut ManifestDocument) -> Result<()> {
    let path = member.path().to_path_buf();
    let Some(package) = member.package_table_mut() else {
        bail!("{} has no [package] section", path.display());
    };

    for field in INHERITED_PACKAGE_FIELDS {
        let mut inline = InlineTable::new();
        inline.insert("workspace", Value::from(true));
        package.insert(field, Item::Value(Value::InlineTable(inline)));
    }
    Ok(())
}

/// Run the hoist pass over the workspace rooted at `root_dir`.
pub fn hoist_workspace(root_dir: &Path) -> Result<()> {
    let workspace = Workspace::open(root_dir)?;
    let mut root = ManifestDocument::load(workspace.manifest_path(), DocumentRole::Root)
        .context("failed to load workspace root manifest")?;
    let mut shared = root.dependencies(DepKind::Normal);

    for member_dir in workspace.members() {
        let manifest_path = workspace.member_manifest_path(member_dir);
        let mut member = ManifestDocument::load(&manifest_path, DocumentRole::Member)?;

        let mut hoisted = 0;
        for kind in [DepKind::Normal, DepKind::Dev] {
            if !member.has_dependencies(kind) {
                continue;
            }
            let mut deps = member.dependencies(kind);
            let origin = origin_dependencies(&deps);
            hoisted += origin.len();
            combine_dependencies(&mut shared, &origin);
            replace_dependencies(&mut deps);
            member.set_dependencies(kind, deps)?;
        }
        replace_package(&mut member)?;
        member.save()?;
        tracing::info!(
            "{}: hoisted {} dependency entr{}",
            manifest_path.display(),
            hoisted,
            if hoisted == 1 { "y" } else { "ies" }
        );
    }

    if root.has_dependencies(DepKind::Normal) || !shared.is_empty() {
        root.set_dependencies(DepKind::Normal, shared)?;
    }
    root.save()?;
    tracing::info!("{}: shared dependency table updated", root.path().display());

    Ok(())
}

fn to_inline_table(item: &Item) -> InlineTable {
    match item {
        Item::Value(Value::InlineTable(table)) => table.clone(),
        Item::Table(table) => table.clone().into_inline_table(),
        _ => InlineTable::new(),
    }
}

fn strip_parent_segments(path: &str) -> &str {
    let mut rest = path;
    while let Some(stripped) = rest.strip_prefix("../") {
        rest = stripped;
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml_edit::TableLike;

    fn dep_table(content: &str) -> Table {
        let doc = ManifestDocument::parse(content, "Cargo.toml", DocumentRole::Member).unwrap();
        doc.dependencies(DepKind::Normal)
    }

    fn entry<'t>(table: &'t Table, name: &str) -> &'t dyn TableLike {
        table.get(name).and_then(Item::as_table_like).unwrap()
    }

    #[test]
    fn test_origin_skips_delegated_entries() {
        let deps = dep_table(
            r#"
[dependencies]
serde = { workspace = true }
anyhow = "1.0"
"#,
        );

        let origin = origin_dependencies(&deps);
        assert_eq!(origin.len(), 1);
        assert!(origin.contains_key("anyhow"));
    }

    #[test]
    fn test_origin_rebases_paths_to_workspace_root() {
        let deps = dep_table(
            r#"
[dependencies]
common = { path = "../../common" }
sibling = { path = "../sibling", features = ["full"] }
"#,
        );

        let origin = origin_dependencies(&deps);
        assert_eq!(
            entry(&origin, "common").get("path").and_then(|i| i.as_str()),
            Some("common")
        );
        assert_eq!(
            entry(&origin, "sibling").get("path").and_then(|i| i.as_str()),
            Some("sibling")
        );
    }

    #[test]
    fn test_origin_keeps_interior_parent_segments() {
        let deps = dep_table(
            r#"
[dependencies]
odd = { path = "../vendor/../common" }
"#,
        );

        let origin = origin_dependencies(&deps);
        assert_eq!(
            entry(&origin, "odd").get("path").and_then(|i| i.as_str()),
            Some("vendor/../common")
        );
    }

    #[test]
    fn test_combine_is_first_writer_wins() {
        let first = dep_table(
            r#"
[dependencies]
foo = { version = "1.0" }
"#,
        );
        let second = dep_table(
            r#"
[dependencies]
foo = { version = "2.0" }
bar = "0.3"
"#,
        );

        let mut shared = Table::new();
        combine_dependencies(&mut shared, &first);
        combine_dependencies(&mut shared, &second);

        assert_eq!(
            entry(&shared, "foo").get("version").and_then(|i| i.as_str()),
            Some("1.0")
        );
        assert!(shared.contains_key("bar"));
    }

    #[test]
    fn test_replace_strips_pins_and_keeps_the_rest() {
        let mut deps = dep_table(
            r#"
[dependencies]
serde = { version = "1.0", features = ["derive"], optional = true }
vendored = { git = "https://github.com/user/vendored", rev = "abc123" }
"#,
        );

        replace_dependencies(&mut deps);

        let serde = entry(&deps, "serde");
        assert!(serde.get("version").is_none());
        assert_eq!(serde.get("workspace").and_then(|i| i.as_bool()), Some(true));
        assert!(serde.get("features").is_some());
        assert_eq!(serde.get("optional").and_then(|i| i.as_bool()), Some(true));

        let vendored = entry(&deps, "vendored");
        assert!(vendored.get("git").is_none());
        assert!(vendored.get("rev").is_none());
        assert_eq!(
            vendored.get("workspace").and_then(|i| i.as_bool()),
            Some(true)
        );
    }

    #[test]
    fn test_replace_collapses_bare_versions() {
        let mut deps = dep_table(
            r#"
[dependencies]
anyhow = "1.0"
"#,
        );

        replace_dependencies(&mut deps);

        let anyhow_dep = entry(&deps, "anyhow");
        assert_eq!(
            anyhow_dep.get("workspace").and_then(|i| i.as_bool()),
            Some(true)
        );
        assert!(anyhow_dep.get("version").is_none());
    }

    #[test]
    fn test_replace_leaves_delegated_entries_untouched() {
        let mut deps = dep_table(
            r#"
[dependencies]
serde = { workspace = true, features = ["derive"] }
"#,
        );

        let before = deps.to_string();
        replace_dependencies(&mut deps);
        assert_eq!(deps.to_string(), before);
    }

    #[test]
    fn test_replace_package_overwrites_inheritable_fields() {
        let mut member = ManifestDocument::parse(
            r#"
[package]
name = "alpha"
version = "0.1.0"
authors = ["Someone <someone@example.com>"]
edition = "2018"
license = "Apache-2.0"
publish = false
"#,
            "Cargo.toml",
            DocumentRole::Member,
        )
        .unwrap();

        replace_package(&mut member).unwrap();

        let package = member.package_table_mut().unwrap();
        for field in INHERITED_PACKAGE_FIELDS {
            let value = package.get(field).and_then(Item::as_table_like).unwrap();
            assert_eq!(
                value.get("workspace").and_then(|i| i.as_bool()),
                Some(true),
                "field {field} not delegated"
            );
        }
        // Non-inheritable fields stay.
        assert_eq!(package.get("name").and_then(|i| i.as_str()), Some("alpha"));
        assert_eq!(
            package.get("version").and_then(|i| i.as_str()),
            Some("0.1.0")
        );
    }

    #[test]
    fn test_replace_package_requires_package_section() {
        let mut member = ManifestDocument::parse(
            "[dependencies]\nserde = \"1.0\"\n",
            "Cargo.toml",
            DocumentRole::Member,
        )
        .unwrap();

        assert!(replace_package(&mut member).is_err());
    }
}
