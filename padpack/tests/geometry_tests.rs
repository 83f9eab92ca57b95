#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use test_case::test_case;

    use padpack::collision::rects_conflict;
    use padpack::geometry::outline::{construct_outlines, outline_edges};
    use padpack::geometry::polygon::point_in_outlines;
    use padpack::geometry::primitives::{Edge, Point, Rect};
    use padpack::geometry::rotation::{normalize_degrees, rotate_extents, rotate_point};

    fn rect(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Rect {
        Rect::try_new(x_min, y_min, x_max, y_max).unwrap()
    }

    fn ring() -> Vec<Rect> {
        vec![
            rect(0.0, 0.0, 3.0, 1.0),
            rect(0.0, 2.0, 3.0, 3.0),
            rect(0.0, 0.0, 1.0, 3.0),
            rect(2.0, 0.0, 3.0, 3.0),
        ]
    }

    #[test]
    fn single_rect_outline_is_ccw_square() {
        let outlines = construct_outlines(&[rect(0.0, 0.0, 2.0, 1.0)]);
        assert_eq!(outlines.len(), 1);
        let outline = &outlines[0];
        assert_eq!(outline.edges.len(), 4);
        assert!(outline.is_outer());
        assert!(approx_eq!(f64, outline.signed_area(), 2.0, epsilon = 1e-9));
        //closed loop
        for (a, b) in outline.edges.iter().zip(outline.edges.iter().cycle().skip(1)) {
            assert_eq!(a.end, b.start);
        }
        //every edge is axis aligned
        assert!(outline.edges.iter().all(|e| e.is_horizontal() || e.is_vertical()));
    }

    #[test]
    fn overlapping_rects_merge_into_one_outline() {
        let outlines = construct_outlines(&[rect(0.0, 0.0, 2.0, 1.0), rect(1.0, 0.0, 3.0, 2.0)]);
        assert_eq!(outlines.len(), 1);
        //collinear runs along the bottom are merged
        assert_eq!(outlines[0].edges.len(), 6);
        assert!(approx_eq!(f64, outlines[0].signed_area(), 5.0, epsilon = 1e-9));
    }

    #[test]
    fn enclosed_pocket_becomes_hole() {
        let outlines = construct_outlines(&ring());
        assert_eq!(outlines.len(), 2);
        let outer = outlines.iter().find(|o| o.is_outer()).unwrap();
        let hole = outlines.iter().find(|o| o.is_hole()).unwrap();
        assert!(approx_eq!(f64, outer.signed_area(), 9.0, epsilon = 1e-9));
        assert!(approx_eq!(f64, hole.signed_area(), -1.0, epsilon = 1e-9));
        assert_eq!(hole.bbox(), Some(rect(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn diagonally_touching_rects_stay_separate() {
        let outlines = construct_outlines(&[rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 1.0, 2.0, 2.0)]);
        assert_eq!(outlines.len(), 2);
        assert!(outlines.iter().all(|o| o.is_outer() && o.edges.len() == 4));
    }

    #[test]
    fn zero_size_rects_are_ignored() {
        assert!(construct_outlines(&[rect(0.0, 0.0, 0.0, 5.0)]).is_empty());
        assert!(construct_outlines(&[]).is_empty());
    }

    #[test]
    fn right_normal_of_outline_points_to_free_space() {
        let outlines = construct_outlines(&ring());
        let edges = outline_edges(&outlines).copied().collect::<Vec<_>>();
        for e in &edges {
            let n = e.right_normal().unwrap();
            let outside = e.centroid() + n * 1e-3;
            assert!(!point_in_outlines(outside, &edges), "{e:?}");
            let inward = e.centroid() - n * 1e-3;
            assert!(point_in_outlines(inward, &edges), "{e:?}");
        }
    }

    #[test_case(Point(0.5, 1.5), true; "inside ring")]
    #[test_case(Point(1.5, 1.5), false; "inside hole")]
    #[test_case(Point(-1.0, 1.5), false; "left of ring")]
    #[test_case(Point(4.0, 0.5), false; "right of ring")]
    fn point_in_ring(p: Point, expected: bool) {
        let outlines = construct_outlines(&ring());
        assert_eq!(point_in_outlines(p, outline_edges(&outlines)), expected);
    }

    #[test_case(Point(1.0, 0.0), 90.0, Point(0.0, 1.0); "quarter")]
    #[test_case(Point(1.0, 2.0), 180.0, Point(-1.0, -2.0); "half")]
    #[test_case(Point(1.0, 2.0), 270.0, Point(2.0, -1.0); "three quarters")]
    #[test_case(Point(1.0, 2.0), -90.0, Point(2.0, -1.0); "negative")]
    fn quarter_turns_are_exact(p: Point, degrees: f64, expected: Point) {
        assert_eq!(rotate_point(p, degrees), expected);
    }

    #[test]
    fn rotated_extents() {
        assert_eq!(rotate_extents(2.0, 1.0, 90.0), (1.0, 2.0));
        assert_eq!(rotate_extents(2.0, 1.0, 180.0), (2.0, 1.0));
        assert_eq!(rotate_extents(2.0, 1.0, 270.0), (1.0, 2.0));
        let (w, h) = rotate_extents(2.0, 1.0, 45.0);
        let expected = 3.0 / 2.0_f64.sqrt();
        assert!(approx_eq!(f64, w, expected, epsilon = 1e-9));
        assert!(approx_eq!(f64, h, expected, epsilon = 1e-9));
    }

    #[test_case(-90.0, 270.0)]
    #[test_case(450.0, 90.0)]
    #[test_case(360.0, 0.0)]
    #[test_case(-1e-20, 0.0)]
    fn degrees_are_normalized(input: f64, expected: f64) {
        assert_eq!(normalize_degrees(input), expected);
    }

    #[test]
    fn rect_validation_and_gaps() {
        assert!(Rect::try_new(1.0, 0.0, 0.0, 1.0).is_err());
        assert!(Rect::try_new(0.0, 0.0, 0.0, 0.0).is_ok());

        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(3.0, 0.5, 4.0, 2.0);
        assert_eq!(a.gap_to(&b), 2.0);
        //Chebyshev: only the largest axis gap counts
        let c = rect(2.0, 3.0, 3.0, 4.0);
        assert_eq!(a.gap_to(&c), 2.0);
        assert!(a.gap_to(&rect(0.5, 0.5, 2.0, 2.0)) < 0.0);

        assert_eq!(Rect::intersection(a, b), None);
        assert_eq!(a.inflate(-0.6), None);
        assert_eq!(a.inflate(1.0), Some(rect(-1.0, -1.0, 2.0, 2.0)));
    }

    #[test]
    fn flush_placement_does_not_conflict() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let flush = rect(1.25, 0.0, 2.0, 1.0);
        assert!(!rects_conflict(&a, &flush, 0.25));
        let close = rect(1.2, 0.0, 2.0, 1.0);
        assert!(rects_conflict(&a, &close, 0.25));
        //diagonal neighbours only need the gap along one axis
        let diagonal = rect(1.25, 1.1, 2.0, 2.0);
        assert!(!rects_conflict(&a, &diagonal, 0.25));
    }

    #[test]
    fn edge_helpers() {
        let e = Edge::new(Point(0.0, 0.0), Point(10.0, 0.0));
        assert_eq!(e.right_normal(), Some(Point(0.0, -1.0)));
        assert_eq!(e.left_normal(), Some(Point(0.0, 1.0)));
        assert_eq!(e.closest_point(&Point(5.0, 3.0)), Point(5.0, 0.0));
        assert_eq!(e.closest_point(&Point(-5.0, 3.0)), Point(0.0, 0.0));
        assert!(Edge::try_new(Point(1.0, 1.0), Point(1.0, 1.0)).is_err());

        let other = Edge::new(Point(12.0, 2.0), Point(12.0, 5.0));
        let (p, q) = e.closest_points_between(&other);
        assert_eq!(p, Point(10.0, 0.0));
        assert_eq!(q, Point(12.0, 2.0));
    }
}
