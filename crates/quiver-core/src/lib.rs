//! # quiver-core
//!
//! Core types, errors, and events for the Quiver workflow/skill catalog.
//! This crate defines the shared vocabulary used by every other crate in
//! the workspace.

pub mod error;
pub mod event;
pub mod types;

pub use error::{QuiverError, Result};
pub use event::{EventBus, SearchEvent};
pub use types::*;
