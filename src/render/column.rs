use serde::{Deserialize, Serialize};

use crate::core::{CoordinateArena, PixelRect, PointMapper, PointSeries};
use crate::error::{ChartError, ChartResult};

/// Deterministic column geometry for one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnBar {
    pub index: usize,
    pub rect: PixelRect,
}

/// Projects column/bar series into rectangles.
///
/// Owns a [`CoordinateArena`] so per-frame coordinate buffers are reused.
/// Column width is `data_point_width` times the smallest pixel spacing between
/// neighbouring samples.
#[derive(Debug)]
pub struct ColumnProjector {
    arena: CoordinateArena,
    data_point_width: f64,
}

impl ColumnProjector {
    /// Spacing assumed when fewer than two samples are on screen.
    pub const SINGLE_SAMPLE_SPACING_PX: f64 = 20.0;

    pub fn new(data_point_width: f64) -> ChartResult<Self> {
        if !data_point_width.is_finite() || data_point_width <= 0.0 || data_point_width > 1.0 {
            return Err(ChartError::invalid_argument(
                "data_point_width",
                "must be finite and in (0, 1]",
            ));
        }
        Ok(Self {
            arena: CoordinateArena::new(),
            data_point_width,
        })
    }

    #[must_use]
    pub fn data_point_width(&self) -> f64 {
        self.data_point_width
    }

    #[must_use]
    pub fn arena(&self) -> &CoordinateArena {
        &self.arena
    }

    /// Fills the arena with X/Y axis coordinates for every sample.
    pub fn precalculate(&mut self, series: &PointSeries, mapper: PointMapper<'_>) {
        let (xs, ys) = self.arena.prepare(series.count());
        for (i, (x, y)) in xs.iter_mut().zip(ys.iter_mut()).enumerate() {
            *x = mapper.x_coordinate(series.x(i));
            *y = mapper.y_coordinate(series.y(i));
        }
    }

    /// Body width in pixels for the coordinates currently in the arena.
    #[must_use]
    pub fn body_width_px(&self) -> f64 {
        let min_spacing = self
            .arena
            .x_coords()
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).abs())
            .filter(|gap| gap.is_finite() && *gap > 0.0)
            .fold(f64::INFINITY, f64::min);
        let spacing = if min_spacing.is_finite() {
            min_spacing
        } else {
            Self::SINGLE_SAMPLE_SPACING_PX
        };
        spacing * self.data_point_width
    }

    /// Precalculates `series` and returns its body width.
    pub fn measure(&mut self, series: &PointSeries, mapper: PointMapper<'_>) -> f64 {
        self.precalculate(series, mapper);
        self.body_width_px()
    }

    /// Projects each defined sample into a column spanning `zero_line_y` to its value.
    pub fn project(
        &mut self,
        series: &PointSeries,
        mapper: PointMapper<'_>,
        zero_line_y: f64,
    ) -> Vec<ColumnBar> {
        let half_width = self.measure(series, mapper) * 0.5;
        let zero_coord = mapper.y_coordinate(zero_line_y);

        let xs = self.arena.x_coords();
        let ys = self.arena.y_coords();
        let mut bars = Vec::with_capacity(series.count());
        for index in 0..series.count() {
            let (x, y) = (xs[index], ys[index]);
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            let a = mapper.pixel_from_coordinates(x - half_width, zero_coord);
            let b = mapper.pixel_from_coordinates(x + half_width, y);
            bars.push(ColumnBar {
                index,
                rect: PixelRect::from_corners(a, b),
            });
        }
        bars
    }
}
