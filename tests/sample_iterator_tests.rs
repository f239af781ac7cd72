use std::cell::Cell;
use std::rc::Rc;

use series_geometry::core::{
    LinearCoordinateCalculator, LogarithmicCoordinateCalculator, PixelPoint, PointMapper,
    PointSeries,
};
use series_geometry::render::{
    Color, LineOptions, PathCommand, PathContext, PathDrawingSink, RecordingSink, SampleIterator,
};

const RED: Color = Color::rgb(1.0, 0.0, 0.0);

fn axes() -> (LinearCoordinateCalculator, LinearCoordinateCalculator) {
    (
        LinearCoordinateCalculator::horizontal(0.0, 10.0, 100.0).expect("x axis"),
        LinearCoordinateCalculator::vertical(0.0, 10.0, 100.0).expect("y axis"),
    )
}

fn assert_points(actual: &[PixelPoint], expected: &[(f64, f64)]) {
    assert_eq!(actual.len(), expected.len(), "vertex count: {actual:?}");
    for (point, (x, y)) in actual.iter().zip(expected) {
        assert!((point.x - x).abs() <= 1e-9, "x {} != {x}", point.x);
        assert!((point.y - y).abs() <= 1e-9, "y {} != {y}", point.y);
    }
}

#[test]
fn gap_splits_path_without_close_gaps() {
    let (x_axis, y_axis) = axes();
    let mapper = PointMapper::new(&x_axis, &y_axis);
    let series = PointSeries::new(vec![0.0, 1.0, 2.0], vec![1.0, f64::NAN, 2.0]).expect("series");

    let paths =
        SampleIterator::new(&series, mapper, LineOptions::default(), Color::BLACK).collect_paths();

    assert_eq!(paths.len(), 2);
    assert_points(&paths[0], &[(0.0, 90.0)]);
    assert_points(&paths[1], &[(20.0, 80.0)]);
}

#[test]
fn close_gaps_bridges_nan_runs() {
    let (x_axis, y_axis) = axes();
    let mapper = PointMapper::new(&x_axis, &y_axis);
    let series = PointSeries::new(
        vec![0.0, 1.0, 2.0, 3.0],
        vec![1.0, f64::NAN, f64::NAN, 2.0],
    )
    .expect("series");
    let options = LineOptions {
        close_gaps: true,
        ..LineOptions::default()
    };

    let paths = SampleIterator::new(&series, mapper, options, Color::BLACK).collect_paths();

    assert_eq!(paths.len(), 1);
    assert_points(&paths[0], &[(0.0, 90.0), (30.0, 80.0)]);
}

#[test]
fn leading_and_trailing_gaps_produce_no_empty_paths() {
    let (x_axis, y_axis) = axes();
    let mapper = PointMapper::new(&x_axis, &y_axis);
    let series = PointSeries::new(
        vec![0.0, 1.0, 2.0, 3.0],
        vec![f64::NAN, 1.0, 2.0, f64::NAN],
    )
    .expect("series");

    let commands: Vec<PathCommand> =
        SampleIterator::new(&series, mapper, LineOptions::default(), Color::BLACK).collect();

    assert_eq!(commands.len(), 3);
    assert!(matches!(commands[0], PathCommand::Begin { .. }));
    assert!(matches!(commands[1], PathCommand::MoveTo(_)));
    assert_eq!(commands[2], PathCommand::End);
}

#[test]
fn digital_line_inserts_step_corners() {
    let (x_axis, y_axis) = axes();
    let mapper = PointMapper::new(&x_axis, &y_axis);
    let series = PointSeries::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).expect("series");
    let options = LineOptions {
        is_digital: true,
        ..LineOptions::default()
    };

    let paths = SampleIterator::new(&series, mapper, options, Color::BLACK).collect_paths();

    assert_eq!(paths.len(), 1);
    assert_points(
        &paths[0],
        &[
            (0.0, 90.0),
            (10.0, 90.0),
            (10.0, 80.0),
            (20.0, 80.0),
            (20.0, 70.0),
        ],
    );
}

#[test]
fn palette_change_restarts_path_at_shared_point() {
    let (x_axis, y_axis) = axes();
    let mapper = PointMapper::new(&x_axis, &y_axis);
    let series = PointSeries::new(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 3.0]).expect("series");
    let palette = |index: usize, _x: f64, _y: f64| (index >= 1).then_some(RED);

    let mut sink = RecordingSink::new();
    let drawn = SampleIterator::new(&series, mapper, LineOptions::default(), Color::BLACK)
        .with_palette(&palette)
        .draw(&mut sink);

    assert_eq!(drawn, 2);
    assert_eq!(sink.pens_created, 2);
    assert_eq!(sink.paths[0].color, Color::BLACK);
    assert_points(&sink.paths[0].points, &[(0.0, 90.0), (10.0, 80.0)]);
    assert_eq!(sink.paths[1].color, RED);
    assert_points(&sink.paths[1].points, &[(10.0, 80.0), (20.0, 70.0)]);
}

struct CountedPen {
    dropped: Rc<Cell<usize>>,
}

impl Drop for CountedPen {
    fn drop(&mut self) {
        self.dropped.set(self.dropped.get() + 1);
    }
}

struct CountingContext<'a> {
    ended: &'a Cell<usize>,
    open_pens: usize,
}

impl PathContext for CountingContext<'_> {
    fn move_to(&mut self, _x: f64, _y: f64) {}

    fn end(self) {
        assert_eq!(self.open_pens, 1, "exactly one pen alive while a path is open");
        self.ended.set(self.ended.get() + 1);
    }
}

struct CountingSink {
    created: usize,
    dropped: Rc<Cell<usize>>,
    ended: Cell<usize>,
}

impl PathDrawingSink for CountingSink {
    type Pen = CountedPen;
    type Context<'a> = CountingContext<'a>;

    fn create_pen(&mut self, _color: Color) -> Self::Pen {
        self.created += 1;
        CountedPen {
            dropped: Rc::clone(&self.dropped),
        }
    }

    fn begin(&mut self, _pen: &Self::Pen, _x: f64, _y: f64) -> Self::Context<'_> {
        CountingContext {
            open_pens: self.created - self.dropped.get(),
            ended: &self.ended,
        }
    }
}

#[test]
fn every_pen_is_released_exactly_once() {
    let (x_axis, y_axis) = axes();
    let mapper = PointMapper::new(&x_axis, &y_axis);
    let series = PointSeries::new(
        vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
        vec![1.0, 2.0, f64::NAN, 3.0, 4.0, 5.0],
    )
    .expect("series");
    let palette = |index: usize, _x: f64, _y: f64| (index >= 4).then_some(RED);
    let mut sink = CountingSink {
        created: 0,
        dropped: Rc::new(Cell::new(0)),
        ended: Cell::new(0),
    };

    let drawn = SampleIterator::new(&series, mapper, LineOptions::default(), Color::BLACK)
        .with_palette(&palette)
        .draw(&mut sink);

    assert_eq!(drawn, 3);
    assert_eq!(sink.created, 3);
    assert_eq!(sink.dropped.get(), 3);
    assert_eq!(sink.ended.get(), 3);
}

#[test]
fn vertical_chart_swaps_axes() {
    let x_axis = LinearCoordinateCalculator::vertical(0.0, 10.0, 100.0).expect("x axis");
    let y_axis = LinearCoordinateCalculator::horizontal(0.0, 10.0, 100.0).expect("y axis");
    let mapper = PointMapper::new(&x_axis, &y_axis);
    let series = PointSeries::new(vec![0.0, 5.0], vec![1.0, 2.0]).expect("series");

    let paths =
        SampleIterator::new(&series, mapper, LineOptions::default(), Color::BLACK).collect_paths();

    assert!(mapper.is_vertical_chart());
    assert_points(&paths[0], &[(10.0, 100.0), (20.0, 50.0)]);
}

#[test]
fn log_axis_treats_non_positive_values_as_gaps() {
    let x_axis = LinearCoordinateCalculator::horizontal(0.0, 10.0, 100.0).expect("x axis");
    let y_axis =
        LogarithmicCoordinateCalculator::new(1.0, 100.0, 100.0, false, 10.0).expect("log axis");
    let mapper = PointMapper::new(&x_axis, &y_axis);
    let series = PointSeries::new(vec![0.0, 1.0, 2.0], vec![10.0, 0.0, 100.0]).expect("series");

    let paths =
        SampleIterator::new(&series, mapper, LineOptions::default(), Color::BLACK).collect_paths();

    assert_eq!(paths.len(), 2);
    assert_points(&paths[0], &[(0.0, 50.0)]);
    assert_points(&paths[1], &[(20.0, 0.0)]);
}

#[test]
fn empty_and_single_sample_series() {
    let (x_axis, y_axis) = axes();
    let mapper = PointMapper::new(&x_axis, &y_axis);

    let empty = PointSeries::empty();
    let mut sink = RecordingSink::new();
    assert_eq!(
        SampleIterator::new(&empty, mapper, LineOptions::default(), Color::BLACK).draw(&mut sink),
        0
    );
    assert!(sink.paths.is_empty());

    let single = PointSeries::new(vec![3.0], vec![4.0]).expect("series");
    let paths =
        SampleIterator::new(&single, mapper, LineOptions::default(), Color::BLACK).collect_paths();
    assert_eq!(paths.len(), 1);
    assert_points(&paths[0], &[(30.0, 60.0)]);
}

#[test]
fn area_polygons_close_down_to_zero_line() {
    let (x_axis, y_axis) = axes();
    let mapper = PointMapper::new(&x_axis, &y_axis);
    let series =
        PointSeries::new(vec![0.0, 1.0, 2.0, 3.0], vec![1.0, 2.0, f64::NAN, 3.0]).expect("series");

    let polygons = SampleIterator::new(&series, mapper, LineOptions::default(), Color::BLACK)
        .area_polygons(0.0);

    assert_eq!(polygons.len(), 2);
    assert_points(
        &polygons[0],
        &[
            (0.0, 100.0),
            (0.0, 90.0),
            (10.0, 80.0),
            (10.0, 100.0),
            (0.0, 100.0),
        ],
    );
    assert_eq!(polygons[1].first(), polygons[1].last());
    assert_eq!(polygons[1].len(), 4);
}
