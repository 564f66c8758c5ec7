//! Format-preserving manifest documents.
//!
//! A [`ManifestDocument`] wraps a `toml_edit` document so dependency tables
//! can be rewritten without disturbing the rest of the file. The root
//! workspace manifest and member manifests keep their dependency tables in
//! different places (`[workspace.dependencies]` vs `[dependencies]`), so
//! every document carries a [`DocumentRole`] that selects the lookup path.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item, Table};

/// Errors from loading, editing, or saving a manifest document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: `{key}` is not a table")]
    NotATable { path: PathBuf, key: &'static str },
}

/// Where a document sits in the workspace tree.
///
/// The root manifest keeps its shared dependency tables nested under
/// `[workspace]`; member manifests keep theirs at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentRole {
    Root,
    Member,
}

/// Which dependency table an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepKind {
    Normal,
    Dev,
}

impl DepKind {
    /// The TOML key for this table.
    pub fn table_name(&self) -> &'static str {
        match self {
            DepKind::Normal => "dependencies",
            DepKind::Dev => "dev-dependencies",
        }
    }
}

/// A manifest held in memory for editing and write-back.
#[derive(Debug)]
pub struct ManifestDocument {
    role: DocumentRole,
    path: PathBuf,
    doc: DocumentMut,
}

impl ManifestDocument {
    /// Load a document from a file path.
    pub fn load(path: impl Into<PathBuf>, role: DocumentRole) -> Result<Self, DocumentError> {
        let path = path.into();
        let content = fs::read_to_string(&path).map_err(|source| DocumentError::Read {
            path: path.clone(),
            source,
        })?;
        Self::parse(&content, path, role)
    }

    /// Parse document content.
    pub fn parse(
        content: &str,
        path: impl Into<PathBuf>,
        role: DocumentRole,
    ) -> Result<Self, DocumentError> {
        let path = path.into();
        let doc: DocumentMut = content.parse().map_err(|source| DocumentError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok(ManifestDocument { role, path, doc })
    }

    /// Write the document back to its source path.
    ///
    /// Top-level keys are sorted lexicographically before writing. The file
    /// is overwritten in place; callers run against scratch checkouts, so no
    /// backup is taken.
    pub fn save(&mut self) -> Result<(), DocumentError> {
        self.sort_top_level();
        fs::write(&self.path, self.doc.to_string()).map_err(|source| DocumentError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// The path this document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// This document's role in the workspace.
    pub fn role(&self) -> DocumentRole {
        self.role
    }

    /// Whether the given dependency table is present in this document.
    pub fn has_dependencies(&self, kind: DepKind) -> bool {
        self.dep_item(kind)
            .and_then(Item::as_table_like)
            .is_some()
    }

    /// A deep copy of the given dependency table.
    ///
    /// An absent table yields an empty one; a member without
    /// `dev-dependencies` is a common, valid state.
    pub fn dependencies(&self, kind: DepKind) -> Table {
        let mut out = Table::new();
        if let Some(table) = self.dep_item(kind).and_then(Item::as_table_like) {
            for (name, item) in table.iter() {
                out.insert(name, item.clone());
            }
        }
        out
    }

    /// Replace the given dependency table wholesale.
    ///
    /// The document takes ownership of `table`; callers keep no handle into
    /// the stored state.
    pub fn set_dependencies(&mut self, kind: DepKind, table: Table) -> Result<(), DocumentError> {
        match self.role {
            DocumentRole::Member => {
                self.doc
                    .as_table_mut()
                    .insert(kind.table_name(), Item::Table(table));
            }
            DocumentRole::Root => {
                let top = self.doc.as_table_mut();
                if top.get("workspace").is_none() {
                    let mut workspace = Table::new();
                    workspace.set_implicit(true);
                    top.insert("workspace", Item::Table(workspace));
                }
                let workspace = top
                    .get_mut("workspace")
                    .and_then(Item::as_table_mut)
                    .ok_or_else(|| DocumentError::NotATable {
                        path: self.path.clone(),
                        key: "workspace",
                    })?;
                workspace.insert(kind.table_name(), Item::Table(table));
            }
        }
        Ok(())
    }

    /// The `[package]` table, if present.
    pub fn package_table_mut(&mut self) -> Option<&mut dyn toml_edit::TableLike> {
        self.doc
            .as_table_mut()
            .get_mut("package")
            .and_then(Item::as_table_like_mut)
    }

    fn dep_item(&self, kind: DepKind) -> Option<&Item> {
        match self.role {
            DocumentRole::Member => self.doc.as_table().get(kind.table_name()),
            DocumentRole::Root => self
                .doc
                .as_table()
                .get("workspace")
                .and_then(Item::as_table_like)
                .and_then(|workspace| workspace.get(kind.table_name())),
        }
    }

    fn sort_top_level(&mut self) {
        let top = self.doc.as_table_mut();
        top.sort_values();

        // Render order for sub-tables follows their doc position, not map
        // order, so positions must be reassigned after the sort.
        let mut position = 0;
        for (_, item) in top.iter_mut() {
            match item {
                Item::Table(table) => {
                    table.set_position(position);
                    position += 1;
                }
                Item::ArrayOfTables(array) => {
                    for table in array.iter_mut() {
                        table.set_position(position);
                        position += 1;
                    }
                }
                _ => {}
            }
        }
    }
}
