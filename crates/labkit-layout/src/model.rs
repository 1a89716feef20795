//! Labware object model.
//!
//! A [`LabObject`] is a named rectangle on the bed with an optional grid of
//! wells. Geometry is stored as plain millimetre values; well positions are
//! always derived (see [`crate::well`]).

use labkit_core::LayoutError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest row count that still maps every row onto a letter `A..=Z`.
pub const MAX_ROWS: u32 = 26;

/// Whether an object participates in reports and sequence building
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStatus {
    #[default]
    #[serde(alias = "on")]
    Active,
    #[serde(alias = "off")]
    Inactive,
}

impl ObjectStatus {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl std::fmt::Display for ObjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for ObjectStatus {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" | "on" => Ok(Self::Active),
            "inactive" | "off" => Ok(Self::Inactive),
            other => Err(LayoutError::validation(
                "status",
                format!("expected active or inactive, got '{other}'"),
            )),
        }
    }
}

/// Outline drawn for each well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WellShape {
    #[default]
    Ellipse,
    Square,
}

impl std::fmt::Display for WellShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ellipse => write!(f, "ellipse"),
            Self::Square => write!(f, "square"),
        }
    }
}

impl std::str::FromStr for WellShape {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ellipse" => Ok(Self::Ellipse),
            "square" => Ok(Self::Square),
            other => Err(LayoutError::validation(
                "well shape",
                format!("expected ellipse or square, got '{other}'"),
            )),
        }
    }
}

/// Display color of an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Format as lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parse the `r,g,b` form used in the object editor
    pub fn from_csv(text: &str) -> Option<Self> {
        let mut parts = text.split(',').map(|p| p.trim().parse::<u8>());
        let rgb = Self::new(
            parts.next()?.ok()?,
            parts.next()?.ok()?,
            parts.next()?.ok()?,
        );
        if parts.next().is_some() {
            return None;
        }
        Some(rgb)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::new(99, 87, 101)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// A 2D offset or position in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Bounding box of an object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectSize {
    pub width: f64,
    pub height: f64,
    /// Height of the labware above the bed
    pub z: f64,
}

/// Row/column counts of the well grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellGrid {
    pub rows: u32,
    pub columns: u32,
}

impl WellGrid {
    pub fn well_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// True for anything larger than a single well
    pub fn is_array(&self) -> bool {
        self.rows > 1 || self.columns > 1
    }
}

/// Pitch between neighbouring wells
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WellSpacing {
    pub row: f64,
    pub column: f64,
}

/// Outline size of a single well
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WellSize {
    pub width: f64,
    pub height: f64,
}

/// Named labware placement with optional well grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabObject {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub catalog: String,
    #[serde(default)]
    pub status: ObjectStatus,
    /// Reference corner of the bounding rectangle
    pub position: Vec2,
    pub size: ObjectSize,
    pub well_grid: WellGrid,
    pub well_spacing: WellSpacing,
    /// Offset from the reference corner to the first well
    pub margin: Vec2,
    /// Fine-adjust offsets kept with the object; not applied to well positions
    #[serde(default)]
    pub shim: Vec2,
    #[serde(default)]
    pub well_shape: WellShape,
    pub well_size: WellSize,
    /// Z height for approach moves, 0 disables the Z move
    #[serde(default)]
    pub z_travel: f64,
    #[serde(default)]
    pub color: Rgb,
}

impl LabObject {
    /// Create an object with the default 1x8 strip geometry
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            catalog: String::new(),
            status: ObjectStatus::Active,
            position: Vec2::new(100.0, 100.0),
            size: ObjectSize {
                width: 75.0,
                height: 20.0,
                z: 29.0,
            },
            well_grid: WellGrid {
                rows: 1,
                columns: 8,
            },
            well_spacing: WellSpacing {
                row: 9.0,
                column: 9.0,
            },
            margin: Vec2::new(2.0, 10.0),
            shim: Vec2::default(),
            well_shape: WellShape::Ellipse,
            well_size: WellSize {
                width: 7.05,
                height: 7.05,
            },
            z_travel: 0.0,
            color: Rgb::default(),
        }
    }

    /// Deep copy with a fresh id, `_copy` name suffix and shifted position
    pub fn duplicate(&self, offset: Vec2) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: format!("{}_copy", self.name),
            position: Vec2::new(self.position.x + offset.x, self.position.y + offset.y),
            ..self.clone()
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn has_z_travel(&self) -> bool {
        self.z_travel != 0.0
    }

    /// Check the field constraints every stored object must satisfy
    pub fn validate(&self) -> Result<(), LayoutError> {
        let grid = self.well_grid;
        if grid.rows < 1 || grid.columns < 1 {
            return Err(LayoutError::validation(
                "well grid",
                format!(
                    "rows and columns must be >= 1 (got {}x{})",
                    grid.rows, grid.columns
                ),
            ));
        }
        if grid.rows > MAX_ROWS {
            return Err(LayoutError::validation(
                "well grid",
                format!("at most {MAX_ROWS} rows are supported (got {})", grid.rows),
            ));
        }

        let non_negative = [
            ("width", self.size.width),
            ("height", self.size.height),
            ("z height", self.size.z),
            ("row spacing", self.well_spacing.row),
            ("column spacing", self.well_spacing.column),
            ("well width", self.well_size.width),
            ("well height", self.well_size.height),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::validation(
                    field,
                    format!("must be a finite value >= 0 (got {value})"),
                ));
            }
        }

        let finite = [
            ("position x", self.position.x),
            ("position y", self.position.y),
            ("margin x", self.margin.x),
            ("margin y", self.margin.y),
            ("shim x", self.shim.x),
            ("shim y", self.shim.y),
            ("z travel", self.z_travel),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(LayoutError::validation(field, "must be finite"));
            }
        }

        Ok(())
    }
}

impl Default for LabObject {
    fn default() -> Self {
        Self::new("new_object")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let obj = LabObject::new("plate");
        assert_eq!(obj.size.width, 75.0);
        assert_eq!(obj.size.height, 20.0);
        assert_eq!(obj.well_grid, WellGrid { rows: 1, columns: 8 });
        assert_eq!(obj.well_spacing.column, 9.0);
        assert!(obj.is_active());
        assert!(!obj.has_z_travel());
        assert!(obj.validate().is_ok());
    }

    #[test]
    fn test_hex_color_conversion() {
        let c = Rgb::from_hex("#63576a").unwrap();
        assert_eq!(c, Rgb::new(0x63, 0x57, 0x6a));
        assert_eq!(c.to_hex(), "#63576a");
        assert_eq!(Rgb::from_hex("63576A"), Some(c));
        assert!(Rgb::from_hex("#1234").is_none());
        assert!(Rgb::from_hex("#zz0000").is_none());
    }

    #[test]
    fn test_csv_color_parsing() {
        assert_eq!(Rgb::from_csv("99, 87,101"), Some(Rgb::default()));
        assert!(Rgb::from_csv("1,2").is_none());
        assert!(Rgb::from_csv("1,2,3,4").is_none());
        assert!(Rgb::from_csv("1,2,300").is_none());
        assert_eq!(Rgb::default().to_string(), "99,87,101");
    }

    #[test]
    fn test_status_parsing_accepts_legacy_values() {
        assert_eq!("on".parse::<ObjectStatus>().unwrap(), ObjectStatus::Active);
        assert_eq!("Inactive".parse::<ObjectStatus>().unwrap(), ObjectStatus::Inactive);
        assert!("maybe".parse::<ObjectStatus>().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_grid() {
        let mut obj = LabObject::new("bad");
        obj.well_grid.columns = 0;
        assert!(matches!(obj.validate(), Err(LayoutError::Validation { .. })));

        let mut obj = LabObject::new("tall");
        obj.well_grid.rows = 27;
        assert!(obj.validate().is_err());

        let mut obj = LabObject::new("nan");
        obj.well_spacing.row = f64::NAN;
        assert!(obj.validate().is_err());
    }
}
