//! Core types shared by every DeskUp crate.
//!
//! This crate defines the unified error taxonomy ([`Error`], [`Level`],
//! [`ErrType`]), the window descriptor model ([`WindowDesc`]) and the
//! on-disk snapshot format used to save and restore window layouts.
//!
//! # Error handling
//!
//! All fallible DeskUp operations return [`Result`] or [`Status`]. An
//! [`Error`] carries a severity ([`Level`]) that drives propagation
//! policy: fatal errors abort a whole operation, while skip/retry/
//! warning level errors let multi-window operations continue. It also
//! carries a category ([`ErrType`]) identifying where the failure
//! came from.

mod error;
mod snapshot;
mod window;

pub use error::{ErrType, Error, Level, Result, Status};
pub use snapshot::SnapshotError;
pub use window::WindowDesc;
