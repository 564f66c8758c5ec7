//! High-level operations.
//!
//! This module contains the two passes the `hoist` binary runs: the
//! consolidation pass and the alias-resolution pass.

pub mod alias;
pub mod hoist;

pub use alias::{collapse_root_aliases, rekey_member_aliases, resolve_aliases};
pub use hoist::{
    combine_dependencies, hoist_workspace, origin_dependencies, replace_dependencies,
    replace_package,
};
