//! Shared types: the snapshot version counter and the on-disk layout.
//!
//! # Invariants
//! - A `Version` is never negative and renders as plain decimal.
//! - Archive names are derived from the layout, never assembled ad hoc.

pub mod layout;
pub mod types;

pub use layout::SnapshotLayout;
pub use types::{ParseVersionError, Version};
