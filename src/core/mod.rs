//! Core data structures for Hoist.
//!
//! This module contains the foundational types used throughout Hoist:
//! - Format-preserving manifest documents (toml_edit backed)
//! - A typed read-only manifest view for metadata lookups
//! - Workspace member discovery

pub mod document;
pub mod manifest;
pub mod workspace;

pub use document::{DepKind, DocumentRole, ManifestDocument};
pub use manifest::Manifest;
pub use workspace::{Workspace, MANIFEST_NAME};
