//! Tests for feature matrix construction and windowed access

#[cfg(test)]
mod tests {
    use ndarray::Array3;
    use splitmerge::SegmentationError;
    use splitmerge::features::matrix::FeatureMatrix;
    use splitmerge::segmentation::zone::Rect;

    #[test]
    fn test_new_rejects_zero_extent() {
        let result = FeatureMatrix::new(Array3::<f64>::zeros((0, 4, 1)));
        assert!(matches!(
            result,
            Err(SegmentationError::EmptyFeatures {
                width: 4,
                height: 0,
                depth: 1
            })
        ));

        assert!(FeatureMatrix::new(Array3::<f64>::zeros((2, 2, 0))).is_err());
    }

    #[test]
    fn test_from_fn_layout() {
        let features = FeatureMatrix::from_fn(3, 2, 2, |y, x, c| (y * 100 + x * 10 + c) as f64)
            .expect("valid matrix");

        assert_eq!(features.width(), 3);
        assert_eq!(features.height(), 2);
        assert_eq!(features.depth(), 2);
        assert_eq!(features.area(), 6);
        assert_eq!(features.value(1, 2, 1), Some(121.0));
        assert_eq!(features.value(0, 1, 0), Some(10.0));
        assert_eq!(features.value(2, 0, 0), None);
        assert_eq!(features.value(0, 0, 2), None);
    }

    #[test]
    fn test_from_values_converts_integers() {
        let values = Array3::from_shape_fn((2, 2, 1), |(y, x, _)| (y * 2 + x) as u8 * 50);
        let features = FeatureMatrix::from_values(&values).expect("valid matrix");

        assert_eq!(features.value(1, 1, 0), Some(150.0));
        assert_eq!(features.data().dim(), (2, 2, 1));
    }

    // Windows past the raster edge are clamped rather than panicking
    #[test]
    fn test_channel_window_clamped() {
        let features =
            FeatureMatrix::from_fn(4, 3, 2, |y, x, c| (x + y + c) as f64).expect("valid matrix");

        let rect = Rect::new(1, 3, 0, 2).expect("valid rect");
        let window = features.channel_window(&rect, 1);
        assert_eq!(window.dim(), (2, 2));
        assert!((window.sum() - 12.0).abs() < f64::EPSILON);

        let oversized = Rect::new(2, 10, 1, 10).expect("valid rect");
        assert_eq!(features.channel_window(&oversized, 0).dim(), (2, 2));

        let outside = Rect::new(8, 10, 8, 10).expect("valid rect");
        assert_eq!(features.channel_window(&outside, 0).len(), 0);
    }
}
