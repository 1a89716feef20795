//! # LabKit Layout
//!
//! Labware layout model: named rectangular objects placed on the printer bed,
//! each with an optional grid of wells.
//!
//! ## Core Components
//!
//! - **LabObject**: geometry, well grid, display attributes
//! - **LabLayout**: the owning collection, bed area and active selection
//! - **Well**: derived per-well coordinates (never stored)
//! - **LayoutSnapshot**: lossless JSON snapshot for export/import/auto-save
//! - **Coordinate report**: commented listing of every active well
//!
//! ## Usage
//!
//! ```rust
//! use labkit_layout::LabLayout;
//!
//! let mut layout = LabLayout::new();
//! layout.create_object("plate1");
//! let wells = layout.get_well_coordinates("plate1");
//! assert_eq!(wells[2].name, "A3");
//! assert_eq!((wells[2].x, wells[2].y), (120.0, 110.0));
//! ```

pub mod layout;
pub mod model;
pub mod report;
pub mod serialization;
pub mod well;

pub use layout::{BedArea, LabLayout, CLONE_OFFSET, MIN_BED_DIMENSION};
pub use model::{
    LabObject, ObjectSize, ObjectStatus, Rgb, Vec2, WellGrid, WellShape, WellSize, WellSpacing,
    MAX_ROWS,
};
pub use report::timestamp;
pub use serialization::{LayoutSnapshot, FORMAT_VERSION};
pub use well::{row_letter, well_name, Well};
