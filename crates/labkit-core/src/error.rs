//! Error handling for LabKit
//!
//! Provides the error taxonomy shared by every crate in the workspace:
//! - Layout errors (labware collection, bed area, well lookups)
//! - Sequence errors (movement program building and the saved library)
//! - Store errors (snapshot persistence)
//! - Command errors (controller channel and fluidics timing)
//!
//! All error types use `thiserror` for ergonomic error handling. Every
//! operation validates before it mutates, so an `Err` never leaves a model
//! partially updated.

use thiserror::Error;

/// Layout error type
///
/// Raised by the labware layout model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Invalid user input (bed dimensions, grid sizes, spacing)
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// The offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// No object with the given name or index
    #[error("Object not found: {0}")]
    NotFound(String),

    /// An operation needed a selected object but nothing is selected
    #[error("No object selected")]
    NoSelection,

    /// Requested well lies outside the object's grid
    #[error("Well ({row}, {column}) out of bounds: object has {rows} rows and {columns} columns")]
    OutOfBounds {
        /// Requested row (1-based).
        row: u32,
        /// Requested column (1-based).
        column: u32,
        /// Configured rows.
        rows: u32,
        /// Configured columns.
        columns: u32,
    },
}

impl LayoutError {
    /// Shorthand for a validation error
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Sequence error type
///
/// Raised while building movement programs or managing saved sequences.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// Invalid user input (row/column numbers, names, empty content)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Requested well lies outside the object's grid
    #[error("Array position out of bounds. Object has {rows} rows and {columns} columns")]
    OutOfBounds {
        /// Requested row (1-based).
        row: u32,
        /// Requested column (1-based).
        column: u32,
        /// Configured rows.
        rows: u32,
        /// Configured columns.
        columns: u32,
    },

    /// No object with the given name
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Saved sequence index does not exist
    #[error("Sequence index {index} out of range (library holds {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of stored sequences.
        len: usize,
    },

    /// Not enough sequences selected for the operation
    #[error("Select at least {required} sequence(s); {given} selected")]
    InsufficientSelection {
        /// Minimum number of entries required.
        required: usize,
        /// Number of entries given.
        given: usize,
    },
}

impl From<LayoutError> for SequenceError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::OutOfBounds {
                row,
                column,
                rows,
                columns,
            } => SequenceError::OutOfBounds {
                row,
                column,
                rows,
                columns,
            },
            LayoutError::NotFound(name) => SequenceError::NotFound(name),
            other => SequenceError::Validation(other.to_string()),
        }
    }
}

/// Store error type
///
/// Represents failures of the persistence port.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying storage I/O failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be encoded or decoded
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Stored data is structurally invalid
    #[error("Corrupted snapshot: {0}")]
    Corrupted(String),
}

/// Command error type
///
/// Represents failures sending text commands to the motion controller.
#[derive(Error, Debug, Clone)]
pub enum CommandError {
    /// Command parameters rejected before sending
    #[error("Invalid command input: {0}")]
    Validation(String),

    /// Could not reach the controller endpoint
    #[error("Failed to connect to {url}: {reason}")]
    Connection {
        /// Endpoint URL.
        url: String,
        /// The reason reported by the transport.
        reason: String,
    },

    /// Connection opened but the command could not be written
    #[error("Failed to send command: {0}")]
    Send(String),

    /// Command name not recognised
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Main error type for LabKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Layout error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Sequence error
    #[error(transparent)]
    Sequence(#[from] SequenceError),

    /// Store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

}

impl Error {
    /// Check if this error stems from rejected user input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Layout(LayoutError::Validation { .. })
                | Error::Sequence(SequenceError::Validation(_))
                | Error::Command(CommandError::Validation(_))
        )
    }

    /// Check if this is an out-of-bounds well request
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Error::Layout(LayoutError::OutOfBounds { .. })
                | Error::Sequence(SequenceError::OutOfBounds { .. })
        )
    }

    /// Check if this is a failed lookup
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::Layout(LayoutError::NotFound(_))
                | Error::Sequence(SequenceError::NotFound(_))
                | Error::Sequence(SequenceError::IndexOutOfRange { .. })
        )
    }

    /// Check if this is a store error
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
