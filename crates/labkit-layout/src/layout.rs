//! The labware collection and bed area.
//!
//! [`LabLayout`] is the context object every layout and sequence operation is
//! handed. It owns the objects exclusively; everything else refers to them by
//! index or by name (first match wins).

use crate::model::{LabObject, Vec2};
use crate::serialization::LayoutSnapshot;
use crate::well::Well;
use labkit_core::LayoutError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Smallest accepted bed dimension in mm
pub const MIN_BED_DIMENSION: f64 = 100.0;

/// Offset applied to cloned objects so they do not sit exactly on the source
pub const CLONE_OFFSET: Vec2 = Vec2::new(20.0, 20.0);

/// Working envelope of the printer bed in mm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BedArea {
    pub width: f64,
    pub height: f64,
}

impl BedArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Reject dimensions below `min` or non-finite values
    pub fn validate(&self, min: f64) -> Result<(), LayoutError> {
        for (field, value) in [("bed width", self.width), ("bed height", self.height)] {
            if !value.is_finite() || value < min {
                return Err(LayoutError::validation(
                    field,
                    format!("must be at least {min}mm (got {value})"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for BedArea {
    fn default() -> Self {
        Self::new(380.0, 480.0)
    }
}

/// Collection of labware objects plus the bed they sit on
#[derive(Debug, Clone)]
pub struct LabLayout {
    objects: Vec<LabObject>,
    bed: BedArea,
    selected: Option<usize>,
    min_bed_dimension: f64,
    clone_offset: Vec2,
    /// (canvas height, scale) of the last display-scale computation
    cached_scale: Option<(f64, f64)>,
}

impl LabLayout {
    pub fn new() -> Self {
        Self::with_bed(BedArea::default())
    }

    pub fn with_bed(bed: BedArea) -> Self {
        Self {
            objects: Vec::new(),
            bed,
            selected: None,
            min_bed_dimension: MIN_BED_DIMENSION,
            clone_offset: CLONE_OFFSET,
            cached_scale: None,
        }
    }

    /// Override the clone offset (from configuration)
    pub fn set_clone_offset(&mut self, offset: Vec2) {
        self.clone_offset = offset;
    }

    /// Override the minimum bed dimension (from configuration)
    pub fn set_min_bed_dimension(&mut self, min: f64) {
        self.min_bed_dimension = min;
    }

    pub fn objects(&self) -> &[LabObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn bed(&self) -> BedArea {
        self.bed
    }

    pub fn get(&self, index: usize) -> Option<&LabObject> {
        self.objects.get(index)
    }

    /// Index of the first object with the given name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.objects.iter().position(|obj| obj.name == name)
    }

    /// First object with the given name
    pub fn get_object_by_name(&self, name: &str) -> Option<&LabObject> {
        self.objects.iter().find(|obj| obj.name == name)
    }

    /// Like [`get_object_by_name`](Self::get_object_by_name) but reports a miss
    pub fn require(&self, name: &str) -> Result<&LabObject, LayoutError> {
        self.get_object_by_name(name)
            .ok_or_else(|| LayoutError::NotFound(name.to_string()))
    }

    pub fn active_objects(&self) -> impl Iterator<Item = &LabObject> {
        self.objects.iter().filter(|obj| obj.is_active())
    }

    /// Name the "new object" action uses: `object_<n+1>`
    pub fn next_default_name(&self) -> String {
        format!("object_{}", self.objects.len() + 1)
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_object(&self) -> Option<&LabObject> {
        self.selected.and_then(|i| self.objects.get(i))
    }

    pub fn select(&mut self, index: usize) -> Result<(), LayoutError> {
        if index >= self.objects.len() {
            return Err(LayoutError::NotFound(format!("index {index}")));
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Append a default object and select it
    pub fn create_object(&mut self, name: impl Into<String>) -> &LabObject {
        let obj = LabObject::new(name);
        info!("Created labware object '{}'", obj.name);
        self.push_selected(obj)
    }

    /// Append a copy of the object at `index` and select it
    pub fn clone_object(&mut self, index: usize) -> Result<&LabObject, LayoutError> {
        let source = self
            .objects
            .get(index)
            .ok_or_else(|| LayoutError::NotFound(format!("index {index}")))?;
        let copy = source.duplicate(self.clone_offset);
        info!("Cloned '{}' as '{}'", source.name, copy.name);
        Ok(self.push_selected(copy))
    }

    pub fn clone_selected(&mut self) -> Result<&LabObject, LayoutError> {
        let index = self.selected.ok_or(LayoutError::NoSelection)?;
        self.clone_object(index)
    }

    /// Remove the object at `index` once `confirm` agrees.
    ///
    /// Returns `Ok(None)` when the confirmation was declined.
    pub fn delete_object(
        &mut self,
        index: usize,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Option<LabObject>, LayoutError> {
        let name = self
            .objects
            .get(index)
            .map(|obj| obj.name.clone())
            .ok_or_else(|| LayoutError::NotFound(format!("index {index}")))?;

        if !confirm(&format!("Are you sure you want to delete \"{name}\"?")) {
            warn!("Deletion of '{}' declined", name);
            return Ok(None);
        }

        let removed = self.objects.remove(index);
        self.selected = None;
        info!("Deleted labware object '{}'", removed.name);
        Ok(Some(removed))
    }

    pub fn delete_selected(
        &mut self,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<Option<LabObject>, LayoutError> {
        let index = self.selected.ok_or(LayoutError::NoSelection)?;
        self.delete_object(index, confirm)
    }

    /// Replace the editable fields of the object at `index`, keeping its id
    pub fn update_object(&mut self, index: usize, edited: LabObject) -> Result<(), LayoutError> {
        edited.validate()?;
        let slot = self
            .objects
            .get_mut(index)
            .ok_or_else(|| LayoutError::NotFound(format!("index {index}")))?;
        let id = slot.id;
        *slot = LabObject { id, ..edited };
        info!("Updated labware object '{}'", slot.name);
        Ok(())
    }

    /// Resize the bed; rejected below the minimum dimension
    pub fn update_area(&mut self, width: f64, height: f64) -> Result<(), LayoutError> {
        let bed = BedArea::new(width, height);
        bed.validate(self.min_bed_dimension)?;
        self.bed = bed;
        self.cached_scale = None;
        info!("Printer area updated to {}x{}mm", width, height);
        Ok(())
    }

    /// Pixels per mm when the bed is fitted to `canvas_height`
    pub fn display_scale(&mut self, canvas_height: f64) -> f64 {
        match self.cached_scale {
            Some((height, scale)) if height == canvas_height => scale,
            _ => {
                let scale = canvas_height / self.bed.height;
                self.cached_scale = Some((canvas_height, scale));
                scale
            }
        }
    }

    /// Wells of the named object in row-major order, empty when unknown
    pub fn get_well_coordinates(&self, object_name: &str) -> Vec<Well> {
        let wells = self
            .get_object_by_name(object_name)
            .map(LabObject::wells)
            .unwrap_or_default();
        debug!("Resolved {} wells for '{}'", wells.len(), object_name);
        wells
    }

    /// Snapshot of the full collection and bed
    pub fn serialize(&self) -> LayoutSnapshot {
        LayoutSnapshot::new(self.objects.clone(), self.bed)
    }

    /// Replace the collection and bed from a snapshot, clearing the selection
    pub fn deserialize(&mut self, snapshot: LayoutSnapshot) -> Result<(), LayoutError> {
        snapshot.validate(self.min_bed_dimension)?;
        self.objects = snapshot.objects;
        self.bed = snapshot.bed_area;
        self.selected = None;
        self.cached_scale = None;
        info!("Loaded layout with {} objects", self.objects.len());
        Ok(())
    }

    fn push_selected(&mut self, obj: LabObject) -> &LabObject {
        self.objects.push(obj);
        let index = self.objects.len() - 1;
        self.selected = Some(index);
        &self.objects[index]
    }
}

impl Default for LabLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_scale_is_cached_until_area_changes() {
        let mut layout = LabLayout::new();
        assert_eq!(layout.display_scale(300.0), 300.0 / 480.0);
        assert_eq!(layout.cached_scale, Some((300.0, 300.0 / 480.0)));

        layout.update_area(200.0, 600.0).unwrap();
        assert!(layout.cached_scale.is_none());
        assert_eq!(layout.display_scale(300.0), 0.5);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut layout = LabLayout::new();
        assert!(layout.select(0).is_err());
        layout.create_object("a");
        assert!(layout.select(0).is_ok());
    }
}
