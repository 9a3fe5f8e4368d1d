//! Tests for rectangles, sides and zone adjacency sets

#[cfg(test)]
mod tests {
    use splitmerge::SegmentationError;
    use splitmerge::segmentation::zone::{Rect, Side, Zone};

    fn rect(x_from: usize, x_to: usize, y_from: usize, y_to: usize) -> Rect {
        Rect::new(x_from, x_to, y_from, y_to).expect("valid rect")
    }

    #[test]
    fn test_new_rejects_empty_extent() {
        assert!(matches!(
            Rect::new(2, 2, 0, 1),
            Err(SegmentationError::InvalidZone {
                x_from: 2,
                x_to: 2,
                ..
            })
        ));
        assert!(Rect::new(0, 1, 3, 1).is_err());
        assert!(Rect::new(0, 1, 0, 1).is_ok());
    }

    #[test]
    fn test_extent_and_containment() {
        let r = rect(1, 4, 2, 4);
        assert_eq!((r.width(), r.height(), r.area()), (3, 2, 6));
        assert!(r.contains(1, 2));
        assert!(r.contains(3, 3));
        assert!(!r.contains(4, 3));
        assert!(!r.contains(1, 1));
    }

    // Floor midpoint puts the odd column in the eastern quadrants
    #[test]
    fn test_quadrants_floor_midpoint() {
        let [nw, ne, sw, se] = rect(0, 5, 0, 4).quadrants().expect("splittable");

        assert_eq!(nw, rect(0, 2, 0, 2));
        assert_eq!(ne, rect(2, 5, 0, 2));
        assert_eq!(sw, rect(0, 2, 2, 4));
        assert_eq!(se, rect(2, 5, 2, 4));
        assert_eq!(nw.area() + ne.area() + sw.area() + se.area(), 20);
    }

    #[test]
    fn test_quadrants_of_thin_rect_fail() {
        assert!(rect(0, 1, 0, 4).quadrants().is_err());
        assert!(rect(0, 4, 3, 4).quadrants().is_err());
        assert!(rect(3, 5, 7, 9).quadrants().is_ok());
    }

    #[test]
    fn test_touches_requires_shared_edge() {
        let a = rect(0, 2, 0, 2);
        let east = rect(2, 4, 1, 3);
        let diagonal = rect(2, 4, 2, 4);
        let south = rect(1, 3, 2, 5);

        assert!(a.touches(Side::East, &east));
        assert!(east.touches(Side::West, &a));
        assert!(!a.touches(Side::West, &east));
        assert!(!a.touches(Side::East, &diagonal));
        assert!(!a.touches(Side::South, &diagonal));
        assert!(a.touches(Side::South, &south));
        assert!(south.touches(Side::North, &a));
    }

    #[test]
    fn test_overlap_spans() {
        let a = rect(0, 2, 0, 2);
        assert!(a.overlaps_columns(&rect(1, 3, 5, 6)));
        assert!(!a.overlaps_columns(&rect(2, 3, 0, 1)));
        assert!(a.overlaps_rows(&rect(5, 6, 1, 4)));
        assert!(!a.overlaps_rows(&rect(0, 1, 2, 3)));
    }

    #[test]
    fn test_side_opposite() {
        for side in Side::ALL {
            assert_ne!(side.opposite(), side);
            assert_eq!(side.opposite().opposite(), side);
        }
        assert_eq!(Side::North.opposite(), Side::South);
        assert_eq!(Side::East.opposite(), Side::West);
    }

    #[test]
    fn test_new_zone_is_isolated() {
        let zone = Zone::new(rect(0, 3, 0, 3), 7);
        assert_eq!(zone.segment, 7);
        assert_eq!(zone.area(), 9);
        assert!(Side::ALL.into_iter().all(|side| zone.adjacent(side).is_empty()));
        assert_eq!(zone.all_adjacent().count(), 0);
    }
}
