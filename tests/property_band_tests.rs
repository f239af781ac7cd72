use proptest::prelude::*;
use series_geometry::band::BandPolygonBuilder;
use series_geometry::core::{LinearCoordinateCalculator, PointMapper, PointSeries};

fn sample() -> impl Strategy<Value = f64> {
    prop_oneof![
        9 => -10.0f64..10.0,
        1 => Just(f64::NAN),
    ]
}

fn line(y: &[f64]) -> PointSeries {
    let x = (0..y.len()).map(|i| i as f64).collect();
    PointSeries::new(x, y.to_vec()).expect("line")
}

proptest! {
    #[test]
    fn every_polygon_is_closed(
        first in proptest::collection::vec(sample(), 2..48),
        second in proptest::collection::vec(sample(), 2..48),
        digital in any::<bool>()
    ) {
        let len = first.len().min(second.len());
        let x_axis =
            LinearCoordinateCalculator::horizontal(0.0, len as f64, 800.0).expect("x axis");
        let y_axis = LinearCoordinateCalculator::vertical(-10.0, 10.0, 400.0).expect("y axis");
        let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis))
            .with_digital_line(digital);

        let (first, second) = (line(&first[..len]), line(&second[..len]));
        let polygons = builder.build(&first, &second).expect("build");

        let any_valid = (0..len).any(|i| first.is_defined(i) && second.is_defined(i));
        prop_assert_eq!(any_valid, !polygons.is_empty());
        for polygon in &polygons {
            prop_assert!(polygon.is_closed());
            prop_assert!(polygon.vertices.len() >= 3);
            prop_assert!(polygon.vertices.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn lines_that_never_cross_make_one_polygon(
        base in proptest::collection::vec(-10.0f64..10.0, 2..32),
        offset in 0.5f64..5.0
    ) {
        let x_axis = LinearCoordinateCalculator::horizontal(0.0, base.len() as f64, 800.0)
            .expect("x axis");
        let y_axis = LinearCoordinateCalculator::vertical(-20.0, 20.0, 400.0).expect("y axis");
        let builder = BandPolygonBuilder::new(PointMapper::new(&x_axis, &y_axis));
        let upper: Vec<f64> = base.iter().map(|y| y + offset).collect();

        let polygons = builder.build(&line(&upper), &line(&base)).expect("build");

        prop_assert_eq!(polygons.len(), 1);
        prop_assert_eq!(polygons[0].vertices.len(), base.len() * 2 + 1);
    }
}
