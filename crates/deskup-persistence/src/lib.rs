//! Workspace storage for DeskUp.
//!
//! A *workspace* is a named directory under the DeskUp base directory
//! holding one snapshot file per saved window. This crate provides the
//! directory layout and name rules ([`WorkspaceStore`]), the
//! save/restore flows orchestrating a window backend
//! ([`save_workspace`], [`restore_workspace`]), and the plain-text
//! [`LookupTable`] mapping workspace entries to directory slots.

mod lookup;
mod ops;
mod workspace;

pub use lookup::{Line, LookupTable};
pub use ops::{restore_workspace, save_workspace};
pub use workspace::{NAME_BLACKLIST, WorkspaceStore};
