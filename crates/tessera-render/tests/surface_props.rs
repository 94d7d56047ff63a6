//! Property tests for surface clipping.

use proptest::prelude::*;
use tessera_render::{CellStyle, Point, Rect, Surface};

proptest! {
    #[test]
    fn copy_never_changes_destination_size(
        sw in 0i32..12, sh in 0i32..12,
        dw in 0i32..12, dh in 0i32..12,
        x in -15i32..15, y in -15i32..15,
    ) {
        let mut source = Surface::new(sw, sh);
        source.fill(source.bounds(), "#", CellStyle::default());
        let mut dest = Surface::new(dw, dh);
        dest.copy_from(&source, source.bounds(), Point::new(x, y));
        prop_assert_eq!(dest.width(), dw);
        prop_assert_eq!(dest.height(), dh);

        let expected = Rect::new(x, y, sw, sh).intersect(&dest.bounds());
        for row in 0..dh {
            for col in 0..dw {
                let filled = dest.cell(col, row).map(|c| c.symbol == "#").unwrap_or(false);
                let inside = expected.map(|r| r.contains(Point::new(col, row))).unwrap_or(false);
                prop_assert_eq!(filled, inside);
            }
        }
    }

    #[test]
    fn put_str_never_writes_past_width(width in 0i32..10, x in -3i32..12, text in "[a-z]{0,15}") {
        let mut surface = Surface::new(width, 1);
        let written = surface.put_str(x, 0, &text, CellStyle::default());
        prop_assert!(written <= width);
        prop_assert!(written as usize <= text.len());
    }
}
