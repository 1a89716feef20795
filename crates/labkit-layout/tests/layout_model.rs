use labkit_core::LayoutError;
use labkit_layout::{BedArea, LabLayout, ObjectStatus, CLONE_OFFSET};

#[test]
fn test_create_object_selects_it() {
    let mut layout = LabLayout::new();
    let name = layout.next_default_name();
    assert_eq!(name, "object_1");

    layout.create_object(name);
    assert_eq!(layout.len(), 1);
    assert_eq!(layout.selected(), Some(0));
    assert_eq!(layout.selected_object().unwrap().name, "object_1");
    assert_eq!(layout.next_default_name(), "object_2");
}

#[test]
fn test_duplicate_names_resolve_to_first_match() {
    let mut layout = LabLayout::new();
    layout.create_object("tips");
    layout.create_object("tips");

    let mut second = layout.get(1).unwrap().clone();
    second.position.x = 250.0;
    layout.update_object(1, second).unwrap();

    assert_eq!(layout.len(), 2);
    assert_eq!(layout.get_object_by_name("tips").unwrap().position.x, 100.0);
    assert_eq!(layout.index_of("tips"), Some(0));
    assert!(layout.get_object_by_name("missing").is_none());
    assert_eq!(
        layout.require("missing").unwrap_err(),
        LayoutError::NotFound("missing".to_string())
    );
}

#[test]
fn test_clone_does_not_mutate_source() {
    let mut layout = LabLayout::new();
    layout.create_object("plate1");
    let before = layout.get(0).unwrap().clone();

    let copy = layout.clone_object(0).unwrap().clone();

    assert_eq!(layout.get(0).unwrap(), &before);
    assert_eq!(copy.name, "plate1_copy");
    assert_ne!(copy.id, before.id);
    assert_eq!(copy.position.x, before.position.x + CLONE_OFFSET.x);
    assert_eq!(copy.position.y, before.position.y + CLONE_OFFSET.y);
    assert_eq!(copy.well_grid, before.well_grid);
    assert_eq!(copy.margin, before.margin);
    assert_eq!(layout.selected(), Some(1));
}

#[test]
fn test_clone_selected_requires_selection() {
    let mut layout = LabLayout::new();
    assert_eq!(layout.clone_selected().unwrap_err(), LayoutError::NoSelection);
    assert!(matches!(
        layout.clone_object(3),
        Err(LayoutError::NotFound(_))
    ));

    layout.create_object("plate1");
    layout.clear_selection();
    assert_eq!(layout.selected(), None);
    assert_eq!(layout.clone_selected().unwrap_err(), LayoutError::NoSelection);

    layout.select(0).unwrap();
    let copy_name = layout.clone_selected().unwrap().name.clone();
    assert_eq!(copy_name, "plate1_copy");
    assert_eq!(layout.selected(), Some(1));
}

#[test]
fn test_delete_requires_confirmation() {
    let mut layout = LabLayout::new();
    layout.create_object("plate1");

    let mut prompt = String::new();
    let declined = layout
        .delete_object(0, |msg| {
            prompt = msg.to_string();
            false
        })
        .unwrap();
    assert!(declined.is_none());
    assert!(prompt.contains("plate1"));
    assert_eq!(layout.len(), 1);
    assert_eq!(layout.selected(), Some(0));

    let removed = layout.delete_selected(|_| true).unwrap().unwrap();
    assert_eq!(removed.name, "plate1");
    assert!(layout.is_empty());
    assert_eq!(layout.selected(), None);

    assert_eq!(
        layout.delete_selected(|_| true).unwrap_err(),
        LayoutError::NoSelection
    );
}

#[test]
fn test_update_object_keeps_id_and_validates() {
    let mut layout = LabLayout::new();
    layout.create_object("plate1");
    let original = layout.get(0).unwrap().clone();

    let mut edited = original.clone();
    edited.id = uuid::Uuid::nil();
    edited.name = "reservoir".to_string();
    edited.status = ObjectStatus::Inactive;
    edited.well_grid.rows = 8;
    edited.well_grid.columns = 12;
    layout.update_object(0, edited).unwrap();

    let updated = layout.get(0).unwrap();
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.name, "reservoir");
    assert_eq!(updated.well_grid.rows, 8);

    let mut invalid = updated.clone();
    invalid.well_grid.rows = 0;
    assert!(matches!(
        layout.update_object(0, invalid),
        Err(LayoutError::Validation { .. })
    ));
    assert_eq!(layout.get(0).unwrap().well_grid.rows, 8);
}

#[test]
fn test_update_area_rejects_small_dimensions() {
    let mut layout = LabLayout::new();
    assert_eq!(layout.bed(), BedArea::new(380.0, 480.0));

    let err = layout.update_area(50.0, 50.0).unwrap_err();
    assert!(matches!(err, LayoutError::Validation { .. }));
    assert_eq!(layout.bed(), BedArea::new(380.0, 480.0));

    assert!(layout.update_area(300.0, 99.9).is_err());
    assert!(layout.update_area(f64::NAN, 300.0).is_err());

    layout.update_area(100.0, 250.0).unwrap();
    assert_eq!(layout.bed(), BedArea::new(100.0, 250.0));
}

#[test]
fn test_well_coordinates_for_plate() {
    let mut layout = LabLayout::new();
    layout.create_object("plate1");

    let wells = layout.get_well_coordinates("plate1");
    assert_eq!(wells.len(), 8);
    let a3 = &wells[2];
    assert_eq!(a3.name, "A3");
    assert_eq!(a3.x, 120.0);
    assert_eq!(a3.y, 110.0);

    assert!(layout.get_well_coordinates("nope").is_empty());
}
