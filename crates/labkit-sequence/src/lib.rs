//! # LabKit Sequence
//!
//! Builds line-oriented movement programs from labware positions and keeps
//! a library of named, saved programs.
//!
//! ## Features
//!
//! - Rope-backed editor buffer with an `Empty → Building → Saved` lifecycle
//! - Object and well move blocks with configurable feeds and dwell
//! - Ordered library: save with overwrite confirmation, reorder, combine, delete
//! - Export to `.gcode` files
//!
//! ```rust
//! use labkit_layout::LabObject;
//! use labkit_sequence::{SequenceBuffer, SequenceGenerator};
//!
//! let generator = SequenceGenerator::default();
//! let mut buffer = SequenceBuffer::named("demo");
//! let well = generator
//!     .append_array_move(&mut buffer, &LabObject::new("plate1"), 1, 3)
//!     .unwrap();
//! assert_eq!(well.name, "A3");
//! assert!(buffer.content().contains("G1 X120.00 Y110.00 F3000"));
//! ```

pub mod buffer;
pub mod export;
pub mod generator;
pub mod library;
pub mod text_buffer;

pub use buffer::{EditorState, SequenceBuffer, DEFAULT_SEQUENCE_NAME};
pub use export::{export_file_name, export_to_dir, sanitize_name};
pub use generator::{combined_header, header, MoveProfile, MoveTarget, SequenceGenerator};
pub use library::{
    Direction, SaveOutcome, Sequence, SequenceLibrary, SequenceStore, COMBINED_SEQUENCE_NAME,
};
pub use text_buffer::TextBuffer;
