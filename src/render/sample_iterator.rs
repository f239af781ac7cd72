use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{PixelPoint, PointMapper, PointSeries};
use crate::render::{Color, PathCommand, PathDrawingSink, drive_path_commands};

/// Gap and step policy for line/area iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOptions {
    /// Draw a staircase: horizontal treads at the previous value, vertical risers.
    pub is_digital: bool,
    /// Bridge `NaN` gaps by continuing the open path to the next valid sample.
    pub close_gaps: bool,
}

/// Per-sample stroke override (palette mode).
pub trait PaletteProvider {
    /// Returns the stroke for the sample at `index`, or `None` for the series default.
    fn override_stroke(&self, index: usize, x_value: f64, y_value: f64) -> Option<Color>;
}

impl<F> PaletteProvider for F
where
    F: Fn(usize, f64, f64) -> Option<Color>,
{
    fn override_stroke(&self, index: usize, x_value: f64, y_value: f64) -> Option<Color> {
        self(index, x_value, y_value)
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenPath {
    color: Color,
    last_coords: (f64, f64),
}

/// Walks a [`PointSeries`] and yields [`PathCommand`]s.
///
/// Samples with `NaN` (or with no coordinate, e.g. non-positive values on a
/// log axis) are gaps. A color change from the palette ends the open path and
/// begins a new one at the same point, so no path mixes colors.
pub struct SampleIterator<'a> {
    series: &'a PointSeries,
    mapper: PointMapper<'a>,
    options: LineOptions,
    stroke: Color,
    palette: Option<&'a dyn PaletteProvider>,
    index: usize,
    open: Option<OpenPath>,
    pending: SmallVec<[PathCommand; 4]>,
}

impl<'a> SampleIterator<'a> {
    #[must_use]
    pub fn new(
        series: &'a PointSeries,
        mapper: PointMapper<'a>,
        options: LineOptions,
        stroke: Color,
    ) -> Self {
        Self {
            series,
            mapper,
            options,
            stroke,
            palette: None,
            index: 0,
            open: None,
            pending: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn with_palette(mut self, palette: &'a dyn PaletteProvider) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Draws every path into `sink`; returns the number of paths drawn.
    pub fn draw<S: PathDrawingSink>(self, sink: &mut S) -> usize {
        drive_path_commands(self, sink)
    }

    /// Collects each path's vertices in emission order.
    #[must_use]
    pub fn collect_paths(self) -> Vec<Vec<PixelPoint>> {
        let mut paths = Vec::new();
        let mut current: Vec<PixelPoint> = Vec::new();
        for command in self {
            match command {
                PathCommand::Begin { point, .. } => {
                    current.clear();
                    current.push(point);
                }
                PathCommand::MoveTo(point) => current.push(point),
                PathCommand::End => paths.push(std::mem::take(&mut current)),
            }
        }
        paths
    }

    /// Closes every path down to `zero_line_y` (data units) for area fills.
    ///
    /// Each polygon runs baseline-start, path vertices, baseline-end and then
    /// repeats baseline-start, so first and last vertex are equal.
    #[must_use]
    pub fn area_polygons(self, zero_line_y: f64) -> Vec<Vec<PixelPoint>> {
        let mapper = self.mapper;
        let zero_coord = mapper.y_coordinate(zero_line_y);
        self.collect_paths()
            .into_iter()
            .filter_map(|path| {
                let (first_x, _) = mapper.coordinates_from_pixel(*path.first()?);
                let (last_x, _) = mapper.coordinates_from_pixel(*path.last()?);
                let start = mapper.pixel_from_coordinates(first_x, zero_coord);
                let mut polygon = Vec::with_capacity(path.len() + 3);
                polygon.push(start);
                polygon.extend(path);
                polygon.push(mapper.pixel_from_coordinates(last_x, zero_coord));
                polygon.push(start);
                Some(polygon)
            })
            .collect()
    }

    fn advance(&mut self, index: usize) {
        let x_value = self.series.x(index);
        let y_value = self.series.y(index);
        let x_coord = self.mapper.x_coordinate(x_value);
        let y_coord = self.mapper.y_coordinate(y_value);

        if !x_coord.is_finite() || !y_coord.is_finite() {
            if !self.options.close_gaps && self.open.take().is_some() {
                self.pending.push(PathCommand::End);
            }
            return;
        }

        let point = self.mapper.pixel_from_coordinates(x_coord, y_coord);
        let color = self
            .palette
            .and_then(|palette| palette.override_stroke(index, x_value, y_value))
            .unwrap_or(self.stroke);

        match self.open.as_mut() {
            None => {
                self.pending.push(PathCommand::Begin { color, point });
                self.open = Some(OpenPath {
                    color,
                    last_coords: (x_coord, y_coord),
                });
            }
            Some(path) => {
                if self.options.is_digital {
                    let corner = self.mapper.pixel_from_coordinates(x_coord, path.last_coords.1);
                    self.pending.push(PathCommand::MoveTo(corner));
                }
                self.pending.push(PathCommand::MoveTo(point));
                if color != path.color {
                    self.pending.push(PathCommand::End);
                    self.pending.push(PathCommand::Begin { color, point });
                    path.color = color;
                }
                path.last_coords = (x_coord, y_coord);
            }
        }
    }
}

impl Iterator for SampleIterator<'_> {
    type Item = PathCommand;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !self.pending.is_empty() {
                return Some(self.pending.remove(0));
            }
            if self.index >= self.series.count() {
                return self.open.take().map(|_| PathCommand::End);
            }
            let index = self.index;
            self.index += 1;
            self.advance(index);
        }
    }
}
