//! Serialization and deserialization for layout snapshots.
//!
//! A snapshot carries the whole labware collection and bed area as JSON so
//! configurations can be exported, re-imported and auto-saved without losing
//! any field.

use crate::layout::BedArea;
use crate::model::LabObject;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use labkit_core::LayoutError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Snapshot format version
pub const FORMAT_VERSION: &str = "2.1";

/// Complete layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSnapshot {
    pub objects: Vec<LabObject>,
    pub bed_area: BedArea,
    pub timestamp: DateTime<Utc>,
    #[serde(default = "default_format_version")]
    pub format_version: String,
}

fn default_format_version() -> String {
    FORMAT_VERSION.to_string()
}

impl LayoutSnapshot {
    pub fn new(objects: Vec<LabObject>, bed_area: BedArea) -> Self {
        Self {
            objects,
            bed_area,
            timestamp: Utc::now(),
            format_version: FORMAT_VERSION.to_string(),
        }
    }

    /// Checks run before a snapshot replaces the live layout; the bed must
    /// meet the same `min_bed` dimension as [`LabLayout::update_area`]
    ///
    /// [`LabLayout::update_area`]: crate::LabLayout::update_area
    pub fn validate(&self, min_bed: f64) -> Result<(), LayoutError> {
        self.bed_area.validate(min_bed)?;
        for obj in &self.objects {
            obj.validate().map_err(|err| match err {
                LayoutError::Validation { field, reason } => LayoutError::Validation {
                    field: format!("{} of '{}'", field, obj.name),
                    reason,
                },
                other => other,
            })?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize layout")
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse layout snapshot")
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).context("Failed to write layout file")?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read layout file")?;
        Self::from_json(&content)
    }
}

/// File name offered when exporting a layout on `date`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("labware_layout_{}.json", date.format("%Y-%m-%d"))
}
