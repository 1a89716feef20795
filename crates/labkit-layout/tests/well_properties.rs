use labkit_layout::{row_letter, LabObject};
use proptest::prelude::*;

proptest! {
    #[test]
    fn wells_cover_grid_in_row_major_order(
        rows in 1u32..=26,
        columns in 1u32..=24,
        x in -50.0f64..400.0,
        y in -50.0f64..400.0,
        margin_x in 0.0f64..20.0,
        margin_y in 0.0f64..20.0,
        row_pitch in 0.0f64..30.0,
        col_pitch in 0.0f64..30.0,
    ) {
        let mut obj = LabObject::new("p");
        obj.position.x = x;
        obj.position.y = y;
        obj.margin.x = margin_x;
        obj.margin.y = margin_y;
        obj.well_grid.rows = rows;
        obj.well_grid.columns = columns;
        obj.well_spacing.row = row_pitch;
        obj.well_spacing.column = col_pitch;

        let wells = obj.wells();
        prop_assert_eq!(wells.len(), (rows * columns) as usize);
        prop_assert_eq!(obj.well_grid.well_count(), wells.len());

        for (i, well) in wells.iter().enumerate() {
            let row = i as u32 / columns;
            let col = i as u32 % columns;
            prop_assert_eq!(well.row, row);
            prop_assert_eq!(well.col, col);
            prop_assert_eq!(&well.name, &format!("{}{}", row_letter(row), col + 1));
            prop_assert_eq!(well.x, x + margin_x + f64::from(col) * col_pitch);
            prop_assert_eq!(well.y, y + margin_y + f64::from(row) * row_pitch);
        }

        // Derivation is deterministic.
        prop_assert_eq!(obj.wells(), wells);
    }
}
