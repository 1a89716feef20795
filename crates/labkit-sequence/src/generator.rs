//! Movement-program generation.
//!
//! Each move is a self-contained block: absolute positioning, an XY move, an
//! optional Z approach and a settling dwell. Blocks are only ever appended to
//! a [`SequenceBuffer`]; the first block written into a blank buffer is
//! preceded by a header naming the sequence.

use crate::buffer::SequenceBuffer;
use chrono::{DateTime, Utc};
use labkit_core::SequenceError;
use labkit_layout::{timestamp, LabLayout, LabObject, Well};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Feed rates and dwell used for every generated move
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveProfile {
    /// XY feed in mm/min
    pub feed_xy: f64,
    /// Z feed in mm/min
    pub feed_z: f64,
    /// Settling pause after each move
    pub dwell_ms: u64,
}

impl Default for MoveProfile {
    fn default() -> Self {
        Self {
            feed_xy: 3000.0,
            feed_z: 1500.0,
            dwell_ms: 500,
        }
    }
}

/// Header written at the top of a fresh sequence
pub fn header(name: &str, generated: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&format!("; G-code Sequence: {}\n", name));
    out.push_str(&format!("; Generated: {}\n", timestamp(generated)));
    out.push_str("; Ready to execute in Mainsail console\n\n");
    out
}

/// Header written at the top of a combined sequence
pub fn combined_header(names: &[&str], generated: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str("; Combined G-code Sequence\n");
    out.push_str(&format!("; Generated: {}\n", timestamp(generated)));
    out.push_str(&format!("; Combined from: {}\n", names.join(", ")));
    out.push_str("; Ready to execute in Mainsail console\n\n");
    out
}

/// Builds move blocks into sequence buffers
#[derive(Debug, Clone, Default)]
pub struct SequenceGenerator {
    profile: MoveProfile,
}

impl SequenceGenerator {
    pub fn new(profile: MoveProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> MoveProfile {
        self.profile
    }

    /// Move to the object's reference point
    pub fn append_object_move(&self, buffer: &mut SequenceBuffer, object: &LabObject) {
        let mut block = self.preamble(buffer);
        block.push_str(&format!("; Move to {}\n", object.name));
        self.push_move(
            &mut block,
            object.position.x,
            object.position.y,
            "object position",
            object,
        );
        buffer.append(&block);
        debug!("Added object move to '{}'", object.name);
    }

    /// Move to a well addressed by 1-based row and column.
    ///
    /// The buffer is left untouched when the well does not exist.
    pub fn append_array_move(
        &self,
        buffer: &mut SequenceBuffer,
        object: &LabObject,
        row: u32,
        column: u32,
    ) -> Result<Well, SequenceError> {
        let well = object.well_at(row, column)?;

        let mut block = self.preamble(buffer);
        block.push_str(&format!("; Move to {} well {}\n", object.name, well.name));
        self.push_move(&mut block, well.x, well.y, "well position", object);
        buffer.append(&block);
        debug!(
            "Added well move to '{}' {} ({:.2}, {:.2})",
            object.name, well.name, well.x, well.y
        );
        Ok(well)
    }

    /// Resolve `target` against the layout and append the matching move
    pub fn append_target(
        &self,
        buffer: &mut SequenceBuffer,
        layout: &LabLayout,
        target: &MoveTarget,
    ) -> Result<(), SequenceError> {
        let object = layout.require(target.object())?;
        match *target {
            MoveTarget::Object(_) => self.append_object_move(buffer, object),
            MoveTarget::Well { row, column, .. } => {
                self.append_array_move(buffer, object, row, column)?;
            }
        }
        Ok(())
    }

    fn preamble(&self, buffer: &SequenceBuffer) -> String {
        if buffer.is_blank() {
            header(buffer.name(), Utc::now())
        } else {
            String::new()
        }
    }

    fn push_move(&self, out: &mut String, x: f64, y: f64, what: &str, object: &LabObject) {
        let profile = self.profile;
        out.push_str("G90  ; Absolute positioning\n");
        out.push_str(&format!(
            "G1 X{:.2} Y{:.2} F{}  ; Move to {}\n",
            x, y, profile.feed_xy, what
        ));
        if object.has_z_travel() {
            out.push_str(&format!(
                "G1 Z{} F{}  ; Move to Z height\n",
                object.z_travel, profile.feed_z
            ));
        }
        out.push_str(&format!(
            "G4 P{}  ; Pause {}ms for stabilization\n",
            profile.dwell_ms, profile.dwell_ms
        ));
        out.push('\n');
    }
}

/// A move step as typed on the command line: `plate1` or `plate1:2,3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveTarget {
    /// Whole-object reference point
    Object(String),
    /// Well by 1-based row and column
    Well {
        object: String,
        row: u32,
        column: u32,
    },
}

impl MoveTarget {
    pub fn object(&self) -> &str {
        match self {
            MoveTarget::Object(name) => name,
            MoveTarget::Well { object, .. } => object,
        }
    }
}

impl FromStr for MoveTarget {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SequenceError::Validation("empty move target".into()));
        }

        // Only a trailing `:ROW,COLUMN` addresses a well; other colons belong to the name.
        let Some((object, row, column)) = split_well_suffix(s) else {
            return Ok(MoveTarget::Object(s.to_string()));
        };
        if object.is_empty() || row == 0 || column == 0 {
            return Err(SequenceError::Validation(format!(
                "'{s}': expected OBJECT or OBJECT:ROW,COLUMN with numbers starting from 1"
            )));
        }
        Ok(MoveTarget::Well {
            object: object.to_string(),
            row,
            column,
        })
    }
}

fn split_well_suffix(s: &str) -> Option<(&str, u32, u32)> {
    let (object, position) = s.rsplit_once(':')?;
    let (row, column) = position.split_once(',')?;
    Some((object, row.trim().parse().ok()?, column.trim().parse().ok()?))
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveTarget::Object(name) => write!(f, "{name}"),
            MoveTarget::Well {
                object,
                row,
                column,
            } => write!(f, "{object}:{row},{column}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lines() {
        let when = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            header("wash_run", when),
            "; G-code Sequence: wash_run\n\
             ; Generated: 2026-01-02T03:04:05.000Z\n\
             ; Ready to execute in Mainsail console\n\n"
        );
        let combined = combined_header(&["a", "b"], when);
        assert!(combined.starts_with("; Combined G-code Sequence\n"));
        assert!(combined.contains("; Combined from: a, b\n"));
    }

    #[test]
    fn test_object_move_block() {
        let generator = SequenceGenerator::default();
        let mut buffer = SequenceBuffer::named("seq");
        let obj = LabObject::new("plate1");

        generator.append_object_move(&mut buffer, &obj);
        let text = buffer.content();
        assert!(text.starts_with("; G-code Sequence: seq\n"));
        assert!(text.contains(
            "; Move to plate1\n\
             G90  ; Absolute positioning\n\
             G1 X100.00 Y100.00 F3000  ; Move to object position\n\
             G4 P500  ; Pause 500ms for stabilization\n\n"
        ));
        assert!(!text.contains("G1 Z"));
    }

    #[test]
    fn test_header_only_on_blank_buffer() {
        let generator = SequenceGenerator::default();
        let mut buffer = SequenceBuffer::named("seq");
        let obj = LabObject::new("plate1");

        generator.append_object_move(&mut buffer, &obj);
        generator.append_object_move(&mut buffer, &obj);
        assert_eq!(buffer.content().matches("; G-code Sequence:").count(), 1);
        assert_eq!(buffer.content().matches("; Move to plate1\n").count(), 2);
    }

    #[test]
    fn test_z_travel_and_custom_profile() {
        let generator = SequenceGenerator::new(MoveProfile {
            feed_xy: 6000.0,
            feed_z: 800.0,
            dwell_ms: 250,
        });
        let mut buffer = SequenceBuffer::named("seq");
        let mut obj = LabObject::new("tube");
        obj.z_travel = 12.5;

        generator.append_object_move(&mut buffer, &obj);
        let text = buffer.content();
        assert!(text.contains("F6000  ; Move to object position\n"));
        assert!(text.contains("G1 Z12.5 F800  ; Move to Z height\n"));
        assert!(text.contains("G4 P250  ; Pause 250ms for stabilization\n"));
    }

    #[test]
    fn test_array_move_rejects_zero() {
        let generator = SequenceGenerator::default();
        let mut buffer = SequenceBuffer::named("seq");
        let obj = LabObject::new("plate1");

        let err = generator
            .append_array_move(&mut buffer, &obj, 0, 1)
            .unwrap_err();
        assert!(matches!(err, SequenceError::Validation(_)));
        assert!(buffer.is_blank());
    }

    #[test]
    fn test_parse_move_target() {
        assert_eq!(
            "plate1".parse::<MoveTarget>().unwrap(),
            MoveTarget::Object("plate1".into())
        );
        assert_eq!(
            "plate1:2, 3".parse::<MoveTarget>().unwrap(),
            MoveTarget::Well {
                object: "plate1".into(),
                row: 2,
                column: 3
            }
        );
        assert!("plate1:0,3".parse::<MoveTarget>().is_err());
        assert!(":1,1".parse::<MoveTarget>().is_err());
        assert!("".parse::<MoveTarget>().is_err());
    }

    #[test]
    fn test_parse_move_target_with_colon_in_name() {
        assert_eq!(
            "rack:A".parse::<MoveTarget>().unwrap(),
            MoveTarget::Object("rack:A".into())
        );
        assert_eq!(
            "plate1:a,b".parse::<MoveTarget>().unwrap(),
            MoveTarget::Object("plate1:a,b".into())
        );
        assert_eq!(
            "rack:A:2,1".parse::<MoveTarget>().unwrap(),
            MoveTarget::Well {
                object: "rack:A".into(),
                row: 2,
                column: 1
            }
        );
        assert_eq!(
            MoveTarget::Well {
                object: "p".into(),
                row: 1,
                column: 2
            }
            .to_string(),
            "p:1,2"
        );
    }
}
