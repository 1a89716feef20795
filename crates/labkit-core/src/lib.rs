//! # LabKit Core
//!
//! Core types and traits shared across the LabKit workspace.
//! Provides the error taxonomy used by the layout model, the sequence
//! generator and the controller channel, plus the persistence port that
//! keeps those components storage-agnostic.

pub mod error;
pub mod store;

pub use error::{CommandError, Error, LayoutError, Result, SequenceError, StoreError};
pub use store::SnapshotStore;

/// Longest timed wash the fluidics controller accepts, in seconds
pub const MAX_WASH_SECS: u64 = 300;
