//! Well coordinate derivation.
//!
//! Wells grow away from the object's reference corner: the margin and the
//! row/column pitch are *added* to the object position. This is the only
//! place the formula lives; previews, reports and sequence generation all go
//! through [`LabObject::well`].

use crate::model::LabObject;
use labkit_core::LayoutError;
use serde::{Deserialize, Serialize};

/// One addressable position inside an object's grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    /// Spreadsheet-style name, e.g. `B3`
    pub name: String,
    pub x: f64,
    pub y: f64,
    /// Zero-based row index
    pub row: u32,
    /// Zero-based column index
    pub col: u32,
}

/// Letter for a zero-based row index (`0 -> 'A'`)
pub fn row_letter(row: u32) -> char {
    char::from_u32('A' as u32 + row).unwrap_or('?')
}

/// Spreadsheet-style well name for zero-based indices
pub fn well_name(row: u32, col: u32) -> String {
    format!("{}{}", row_letter(row), col + 1)
}

impl LabObject {
    /// Well at zero-based `(row, col)`, `None` outside the grid
    pub fn well(&self, row: u32, col: u32) -> Option<Well> {
        if row >= self.well_grid.rows || col >= self.well_grid.columns {
            return None;
        }
        Some(Well {
            name: well_name(row, col),
            x: self.position.x + self.margin.x + f64::from(col) * self.well_spacing.column,
            y: self.position.y + self.margin.y + f64::from(row) * self.well_spacing.row,
            row,
            col,
        })
    }

    /// Well addressed by 1-based row and column as typed by an operator
    pub fn well_at(&self, row: u32, column: u32) -> Result<Well, LayoutError> {
        if row == 0 || column == 0 {
            return Err(LayoutError::validation(
                "well position",
                "row and column numbers start from 1",
            ));
        }
        self.well(row - 1, column - 1)
            .ok_or(LayoutError::OutOfBounds {
                row,
                column,
                rows: self.well_grid.rows,
                columns: self.well_grid.columns,
            })
    }

    /// All wells in row-major order
    pub fn wells(&self) -> Vec<Well> {
        let grid = self.well_grid;
        (0..grid.rows)
            .flat_map(|row| (0..grid.columns).map(move |col| (row, col)))
            .filter_map(|(row, col)| self.well(row, col))
            .collect()
    }
}
