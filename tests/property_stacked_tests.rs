use proptest::prelude::*;
use series_geometry::core::PointSeries;
use series_geometry::stacked::{SeriesId, StackedAccumulator, StackedMember};

fn build(columns: &[Vec<f64>], len: usize, one_hundred_percent: bool) -> StackedAccumulator {
    let mut stack = StackedAccumulator::new();
    for (i, column) in columns.iter().enumerate() {
        let x = (0..len).map(|j| j as f64).collect();
        let y = column[..len].to_vec();
        let series = PointSeries::new(x, y).expect("series");
        stack.add_member(
            StackedMember::new(SeriesId(i as u64), "group", series)
                .with_one_hundred_percent(one_hundred_percent),
        );
    }
    stack
}

proptest! {
    #[test]
    fn span_equals_own_value_and_keeps_sign(
        columns in proptest::collection::vec(
            proptest::collection::vec(-100.0f64..100.0, 16),
            1..6
        ),
        len in 1usize..16
    ) {
        let stack = build(&columns, len, false);

        for (member, column) in columns.iter().enumerate() {
            for index in 0..len {
                let bounds = stack
                    .accumulate_at(SeriesId(member as u64), index, false)
                    .expect("bounds");
                let value = column[index];
                prop_assert!((bounds.top - bounds.bottom - value).abs() <= 1e-9);
                if value >= 0.0 {
                    prop_assert!(bounds.bottom >= -1e-9);
                    prop_assert!(bounds.top >= bounds.bottom);
                } else {
                    prop_assert!(bounds.top <= 1e-9);
                    prop_assert!(bounds.top < bounds.bottom);
                }
            }
        }
    }

    #[test]
    fn one_hundred_percent_stays_within_bounds(
        columns in proptest::collection::vec(
            proptest::collection::vec(-100.0f64..100.0, 8),
            1..6
        )
    ) {
        let stack = build(&columns, 8, true);

        for index in 0..8 {
            let positive: f64 = columns.iter().map(|c| c[index].max(0.0)).sum();
            let negative: f64 = columns.iter().map(|c| c[index].min(0.0)).sum();
            prop_assume!(positive - negative > 1e-6);

            for member in 0..columns.len() {
                let bounds = stack
                    .accumulate_at(SeriesId(member as u64), index, false)
                    .expect("bounds");
                prop_assert!(bounds.top.abs() <= 100.0 + 1e-9);
                prop_assert!(bounds.bottom.abs() <= 100.0 + 1e-9);
            }
        }
    }

    #[test]
    fn y_range_contains_every_top(
        columns in proptest::collection::vec(
            proptest::collection::vec(-50.0f64..50.0, 12),
            1..5
        )
    ) {
        let stack = build(&columns, 12, false);
        let target = SeriesId(columns.len() as u64 - 1);

        let range = stack.calculate_y_range(target, 0..12, false).expect("range");
        prop_assert!(range.contains(0.0));
        for index in 0..12 {
            let bounds = stack.accumulate_at(target, index, false).expect("bounds");
            prop_assert!(range.contains(bounds.top));
        }
    }
}
