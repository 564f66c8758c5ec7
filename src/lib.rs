//! Hoist - consolidate workspace dependency declarations.
//!
//! This crate provides the library functionality behind the `hoist` binary:
//! loading workspace and member manifests, lifting per-member dependency
//! declarations into the root `[workspace.dependencies]` table, rewriting
//! members to `workspace = true` delegations, and collapsing dependency
//! keys that do not match their target package's declared name.

pub mod core;
pub mod ops;

pub use crate::core::document::{DepKind, DocumentRole, ManifestDocument};
pub use crate::core::manifest::Manifest;
pub use crate::core::workspace::{Workspace, MANIFEST_NAME};
pub use crate::ops::{hoist_workspace, resolve_aliases};
