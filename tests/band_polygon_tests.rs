use series_geometry::ChartError;
use series_geometry::band::{BandFill, BandPolygonBuilder};
use series_geometry::core::{
    CategoryCoordinateCalculator, LinearCoordinateCalculator, PixelPoint, PointMapper,
    PointSeries, XyyPointSeries,
};

fn axes() -> (LinearCoordinateCalculator, LinearCoordinateCalculator) {
    (
        LinearCoordinateCalculator::horizontal(0.0, 10.0, 100.0).expect("x axis"),
        LinearCoordinateCalculator::vertical(0.0, 10.0, 100.0).expect("y axis"),
    )
}

fn line(y: &[f64]) -> PointSeries {
    let x = (0..y.len()).map(|i| i as f64).collect();
    PointSeries::new(x, y.to_vec()).expect("line")
}

fn assert_vertices(actual: &[PixelPoint], expected: &[(f64, f64)]) {
    assert_eq!(actual.len(), expected.len(), "vertices: {actual:?}");
    for (point, (x, y)) in actual.iter().zip(expected) {
        assert!((point.x - x).abs() <= 1e-9, "x {} != {x}", point.x);
        assert!((point.y - y).abs() <= 1e-9, "y {} != {y}", point.y);
    }
}

#[test]
fn crossings_split_band_into_alternating_polygons() {
    let (x_axis, y_axis) = axes();
    let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis));

    let polygons = builder
        .build(&line(&[1.0, 1.0, 1.0]), &line(&[0.0, 2.0, 0.0]))
        .expect("build");

    assert_eq!(polygons.len(), 3);
    assert_eq!(
        polygons.iter().map(|p| p.fill).collect::<Vec<_>>(),
        vec![BandFill::FirstAbove, BandFill::SecondAbove, BandFill::FirstAbove]
    );
    assert!(polygons.iter().all(|p| p.is_closed()));

    assert_vertices(
        &polygons[0].vertices,
        &[(0.0, 90.0), (5.0, 90.0), (5.0, 90.0), (0.0, 100.0), (0.0, 90.0)],
    );
    assert_vertices(
        &polygons[1].vertices,
        &[
            (5.0, 90.0),
            (10.0, 90.0),
            (15.0, 90.0),
            (15.0, 90.0),
            (10.0, 80.0),
            (5.0, 90.0),
        ],
    );
    assert_vertices(
        &polygons[2].vertices,
        &[(15.0, 90.0), (20.0, 90.0), (20.0, 100.0), (15.0, 90.0)],
    );
}

#[test]
fn vertical_chart_swaps_band_vertices() {
    let x_axis = LinearCoordinateCalculator::vertical(0.0, 10.0, 100.0).expect("x axis");
    let y_axis = LinearCoordinateCalculator::horizontal(0.0, 10.0, 100.0).expect("y axis");
    let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis));

    let polygons = builder
        .build(&line(&[1.0, 1.0, 1.0]), &line(&[0.0, 2.0, 0.0]))
        .expect("build");

    assert_eq!(polygons.len(), 3);
    assert_eq!(polygons[0].fill, BandFill::FirstAbove);
    assert_vertices(
        &polygons[0].vertices,
        &[(10.0, 100.0), (10.0, 95.0), (10.0, 95.0), (0.0, 100.0), (10.0, 100.0)],
    );
    assert_eq!(polygons[1].fill, BandFill::SecondAbove);
    assert_vertices(
        &polygons[1].vertices,
        &[
            (10.0, 95.0),
            (10.0, 90.0),
            (10.0, 85.0),
            (10.0, 85.0),
            (20.0, 90.0),
            (10.0, 95.0),
        ],
    );
}

#[test]
fn category_axis_places_crossovers_in_index_space() {
    let x_axis = CategoryCoordinateCalculator::new(vec![0.0, 1.0, 10.0], 0.0, 2.0, 200.0, true)
        .expect("category axis");
    let y_axis = LinearCoordinateCalculator::vertical(0.0, 10.0, 100.0).expect("y axis");
    let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis));
    let x = vec![0.0, 1.0, 10.0];
    let first = PointSeries::new(x.clone(), vec![1.0, 1.0, 1.0]).expect("first");
    let second = PointSeries::new(x, vec![0.0, 2.0, 0.0]).expect("second");

    let polygons = builder.build(&first, &second).expect("build");

    assert_eq!(polygons.len(), 3);
    assert_vertices(
        &polygons[1].vertices,
        &[
            (50.0, 90.0),
            (100.0, 90.0),
            (150.0, 90.0),
            (150.0, 90.0),
            (100.0, 80.0),
            (50.0, 90.0),
        ],
    );
    assert_vertices(
        &polygons[2].vertices,
        &[(150.0, 90.0), (200.0, 90.0), (200.0, 100.0), (150.0, 90.0)],
    );
}

#[test]
fn nan_run_closes_polygon_without_crossover_vertex() {
    let (x_axis, y_axis) = axes();
    let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis));

    let polygons = builder
        .build(
            &line(&[1.0, 2.0, f64::NAN, f64::NAN, 3.0, 4.0]),
            &line(&[0.0, 0.0, 0.0, 0.0, 1.0, 1.0]),
        )
        .expect("build");

    assert_eq!(polygons.len(), 2);
    assert_vertices(
        &polygons[0].vertices,
        &[(0.0, 90.0), (10.0, 80.0), (10.0, 100.0), (0.0, 100.0), (0.0, 90.0)],
    );
    assert_eq!(polygons[0].fill, BandFill::FirstAbove);
    assert_vertices(
        &polygons[1].vertices,
        &[(40.0, 70.0), (50.0, 60.0), (50.0, 90.0), (40.0, 90.0), (40.0, 70.0)],
    );
}

#[test]
fn gap_in_second_line_also_splits() {
    let (x_axis, y_axis) = axes();
    let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis));

    let polygons = builder
        .build(&line(&[0.0, 0.0, 0.0]), &line(&[1.0, f64::NAN, 1.0]))
        .expect("build");

    assert_eq!(polygons.len(), 2);
    assert!(polygons.iter().all(|p| p.fill == BandFill::SecondAbove));
}

#[test]
fn leading_gaps_and_all_nan_input() {
    let (x_axis, y_axis) = axes();
    let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis));

    let leading = builder
        .build(&line(&[f64::NAN, 2.0, 3.0]), &line(&[0.0, 1.0, 1.0]))
        .expect("leading");
    assert_eq!(leading.len(), 1);
    assert_eq!(leading[0].vertices[0], PixelPoint::new(10.0, 80.0));

    let all_nan = builder
        .build(&line(&[f64::NAN, f64::NAN]), &line(&[1.0, 2.0]))
        .expect("all nan");
    assert!(all_nan.is_empty());

    let empty = builder
        .build(&PointSeries::empty(), &PointSeries::empty())
        .expect("empty");
    assert!(empty.is_empty());
}

#[test]
fn mismatched_lengths_are_rejected() {
    let (x_axis, y_axis) = axes();
    let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis));

    let err = builder
        .build(&line(&[1.0, 2.0, 3.0]), &line(&[1.0, 2.0]))
        .expect_err("length mismatch");
    assert!(matches!(
        err,
        ChartError::LengthMismatch {
            left: 3,
            right: 2,
            ..
        }
    ));
}

#[test]
fn digital_band_splits_at_risers() {
    let (x_axis, y_axis) = axes();
    let builder =
        BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis)).with_digital_line(true);

    let polygons = builder
        .build(&line(&[1.0, 1.0, 1.0]), &line(&[0.0, 2.0, 0.0]))
        .expect("build");

    assert_eq!(polygons.len(), 3);
    assert_vertices(
        &polygons[0].vertices,
        &[(0.0, 90.0), (10.0, 90.0), (10.0, 100.0), (0.0, 100.0), (0.0, 90.0)],
    );
    assert_eq!(polygons[1].fill, BandFill::SecondAbove);
    assert_vertices(
        &polygons[1].vertices,
        &[(10.0, 90.0), (20.0, 90.0), (20.0, 80.0), (10.0, 80.0), (10.0, 90.0)],
    );
    assert_vertices(&polygons[2].vertices, &[(20.0, 90.0), (20.0, 100.0), (20.0, 90.0)]);
}

#[test]
fn digital_band_without_crossing_steps_both_lines() {
    let (x_axis, y_axis) = axes();
    let builder =
        BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis)).with_digital_line(true);

    let polygons = builder
        .build(&line(&[3.0, 4.0]), &line(&[1.0, 1.0]))
        .expect("build");

    assert_eq!(polygons.len(), 1);
    assert_vertices(
        &polygons[0].vertices,
        &[
            (0.0, 70.0),
            (10.0, 70.0),
            (10.0, 60.0),
            (10.0, 90.0),
            (10.0, 90.0),
            (0.0, 90.0),
            (0.0, 70.0),
        ],
    );
}

#[test]
fn band_series_split_feeds_the_builder() {
    let (x_axis, y_axis) = axes();
    let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis));
    let band = XyyPointSeries::new(vec![0.0, 1.0], vec![4.0, 5.0], vec![2.0, 2.5]).expect("band");
    let (first, second) = band.split();
    assert_eq!(band.y1_values(), second.y_values());

    let polygons = builder.build(&first, &second).expect("build");

    assert_eq!(polygons.len(), 1);
    assert_eq!(polygons[0].fill, BandFill::FirstAbove);
    assert_eq!(polygons[0].vertices.len(), 5);
}
