//! Coordinate report for the active labware.
//!
//! Produces a `;`-commented listing that can be pasted into a console or
//! kept next to a movement program as a reference of where every well is.

use crate::layout::LabLayout;
use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 timestamp (millisecond precision, `Z` suffix) used in generated headers
pub fn timestamp(generated: DateTime<Utc>) -> String {
    generated.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl LabLayout {
    /// Report generated now
    pub fn coordinate_report(&self) -> String {
        self.coordinate_report_at(Utc::now())
    }

    /// Report with an explicit generation timestamp
    pub fn coordinate_report_at(&self, generated: DateTime<Utc>) -> String {
        let mut out = String::new();

        out.push_str("; Object Coordinates for Lab Automation\n");
        out.push_str(&format!(
            "; Total active objects: {}\n",
            self.active_objects().count()
        ));
        out.push_str(&format!("; Generated: {}\n\n", timestamp(generated)));

        for (index, obj) in self.objects().iter().enumerate() {
            if !obj.is_active() {
                continue;
            }
            out.push_str(&format!("; Object {}: {}\n", index + 1, obj.name));
            out.push_str(&format!(
                "; Position: X{} Y{} Z{}\n",
                obj.position.x, obj.position.y, obj.size.z
            ));
            out.push_str(&format!(
                "; Size: {} x {} x {}mm\n",
                obj.size.width, obj.size.height, obj.size.z
            ));

            let grid = obj.well_grid;
            if grid.is_array() {
                out.push_str(&format!(
                    "; Wells: {} rows x {} columns ({} total)\n",
                    grid.rows,
                    grid.columns,
                    grid.well_count()
                ));
                out.push_str(&format!(
                    "; Well spacing: {} x {}mm\n",
                    obj.well_spacing.row, obj.well_spacing.column
                ));
                for well in obj.wells() {
                    out.push_str(&format!(
                        ";   Well {}: X{:.2} Y{:.2}\n",
                        well.name, well.x, well.y
                    ));
                }
            } else {
                out.push_str(&format!(
                    ";   Center point: X{} Y{}\n",
                    obj.position.x, obj.position.y
                ));
            }

            out.push_str(&format!("; Color: RGB({})\n", obj.color));
            out.push_str(&format!(
                "; Well shape: {} ({} x {})\n",
                obj.well_shape, obj.well_size.width, obj.well_size.height
            ));
            if obj.has_z_travel() {
                out.push_str(&format!("; Z-travel: {}mm\n", obj.z_travel));
            }
            out.push('\n');
        }

        out
    }
}
