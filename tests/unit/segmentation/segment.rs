//! Tests for segment ownership state

#[cfg(test)]
mod tests {
    use splitmerge::segmentation::segment::Segment;

    #[test]
    fn test_singleton_segment() {
        let segment = Segment::singleton(5, 3, 12);

        assert_eq!(segment.label, 5);
        assert_eq!(segment.area(), 12);
        assert!(segment.is_live());
        assert_eq!(segment.zones().iter().copied().collect::<Vec<_>>(), vec![3]);
        assert!(segment.neighbours().is_empty());
    }

    // A default segment owns nothing and counts as absorbed
    #[test]
    fn test_default_segment_is_dead() {
        let segment = Segment::default();
        assert!(!segment.is_live());
        assert_eq!(segment.area(), 0);
        assert_eq!(segment.label, 0);
    }
}
