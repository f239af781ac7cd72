use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::primitives::{clamped_fraction, distance_to_segment, lerp};
use crate::core::{PixelPoint, PointMapper, PointSeries};
use crate::error::{ChartError, ChartResult};
use crate::hit_test::HitTestResult;

/// Radius used when a zero radius cannot select anything meaningful.
pub const DEFAULT_HIT_TEST_RADIUS_PX: f64 = 7.07;

/// How [`HitTestEngine::nearest_sample`] picks a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchMode {
    /// Closest sample within the effective radius.
    #[default]
    Nearest,
    /// Last sample at or before the hit X.
    RoundDown,
    /// First sample at or after the hit X.
    RoundUp,
}

/// Pointer queries against one [`PointSeries`].
#[derive(Debug, Clone, Copy)]
pub struct HitTestEngine<'a> {
    series: &'a PointSeries,
    secondary: Option<&'a PointSeries>,
    mapper: PointMapper<'a>,
    is_digital: bool,
    use_y_for_distance: bool,
}

impl<'a> HitTestEngine<'a> {
    #[must_use]
    pub fn new(series: &'a PointSeries, mapper: PointMapper<'a>) -> Self {
        Self {
            series,
            secondary: None,
            mapper,
            is_digital: false,
            use_y_for_distance: true,
        }
    }

    /// Second line of two-line (band) series; reported through the `y1_*` fields.
    #[must_use]
    pub fn with_secondary(mut self, secondary: &'a PointSeries) -> Self {
        self.secondary = Some(secondary);
        self
    }

    #[must_use]
    pub fn with_digital_line(mut self, is_digital: bool) -> Self {
        self.is_digital = is_digital;
        self
    }

    /// When `false`, only X distance counts and hits are reported as vertical.
    #[must_use]
    pub fn with_y_distance(mut self, use_y_for_distance: bool) -> Self {
        self.use_y_for_distance = use_y_for_distance;
        self
    }

    #[must_use]
    pub fn series(&self) -> &'a PointSeries {
        self.series
    }

    #[must_use]
    pub fn mapper(&self) -> PointMapper<'a> {
        self.mapper
    }

    /// Full query: search, snap and optionally interpolate.
    ///
    /// With `interpolate` the search always brackets from below
    /// ([`SearchMode::RoundDown`]) so the result can be refined towards the
    /// next sample; otherwise `mode` is used as given.
    pub fn hit_test(
        &self,
        raw_point: PixelPoint,
        radius_px: f64,
        mode: SearchMode,
        interpolate: bool,
    ) -> ChartResult<HitTestResult> {
        validate_radius(radius_px)?;
        let search = if interpolate { SearchMode::RoundDown } else { mode };
        let Some(index) =
            self.nearest_sample(raw_point, radius_px, search, self.use_y_for_distance)?
        else {
            return Ok(HitTestResult::empty());
        };

        let radius = self.effective_radius(radius_px);
        let result = self.sample_result(raw_point, index, radius);
        if interpolate {
            Ok(self.interpolate(raw_point, index, radius, result))
        } else {
            Ok(result)
        }
    }

    /// Index of the sample selected by `mode`, or `None`.
    ///
    /// Samples with `NaN` are never returned.
    pub fn nearest_sample(
        &self,
        raw_point: PixelPoint,
        radius_px: f64,
        mode: SearchMode,
        use_y_for_distance: bool,
    ) -> ChartResult<Option<usize>> {
        validate_radius(radius_px)?;
        if self.series.is_empty() {
            return Ok(None);
        }

        let (x_coord, y_coord) = self.mapper.coordinates_from_pixel(raw_point);
        let hit_x = self.mapper.x_value_at(x_coord);
        if hit_x.is_nan() {
            return Ok(None);
        }

        match mode {
            SearchMode::RoundDown => Ok(self.round_down(hit_x)),
            SearchMode::RoundUp => Ok(self.round_up(hit_x)),
            SearchMode::Nearest => {
                let hit_y = self.mapper.y_value_at(y_coord);
                let x_units_per_pixel = self.mapper.x_units_per_pixel(x_coord);
                let y_units_per_pixel = self.mapper.y_units_per_pixel(y_coord);
                let xy_scale_ratio = if use_y_for_distance
                    && y_units_per_pixel > 0.0
                    && y_units_per_pixel.is_finite()
                    && !hit_y.is_nan()
                {
                    x_units_per_pixel / y_units_per_pixel
                } else {
                    0.0
                };

                let radius = self.effective_radius(radius_px);
                if radius == 0.0 {
                    return Ok(self.closest_by_x(hit_x));
                }
                Ok(self.closest_within(
                    hit_x,
                    hit_y,
                    xy_scale_ratio,
                    radius * x_units_per_pixel,
                ))
            }
        }
    }

    /// Refines `result` between sample `nearest_index` and the next one.
    ///
    /// Y is interpolated linearly at the hit's data X (fraction clamped to
    /// `[0, 1]`). Digital lines keep the left sample's Y and only move the
    /// snapped X. Returns `result` untouched when there is no next sample or
    /// the bracket crosses a gap.
    #[must_use]
    pub fn interpolate(
        &self,
        raw_point: PixelPoint,
        nearest_index: usize,
        radius_px: f64,
        mut result: HitTestResult,
    ) -> HitTestResult {
        let next = nearest_index + 1;
        if next >= self.series.count()
            || !self.series.is_defined(nearest_index)
            || !self.series.is_defined(next)
        {
            return result;
        }

        let (x0, y0) = (self.series.x(nearest_index), self.series.y(nearest_index));
        let (x1, y1) = (self.series.x(next), self.series.y(next));
        let (x_coord, _) = self.mapper.coordinates_from_pixel(raw_point);
        let fraction = clamped_fraction(x0, x1, self.mapper.x_value_at(x_coord));

        let x_value = lerp(x0, x1, fraction);
        let y_value = if self.is_digital {
            y0
        } else {
            lerp(y0, y1, fraction)
        };
        result.x_value = x_value;
        result.y_value = y_value;
        result.hit_point = self.mapper.to_pixel(x_value, y_value);

        if let Some(secondary) = self.secondary {
            if secondary.is_defined(nearest_index) && secondary.is_defined(next) {
                let (s0, s1) = (secondary.y(nearest_index), secondary.y(next));
                let y1_value = if self.is_digital {
                    s0
                } else {
                    lerp(s0, s1, fraction)
                };
                result.y1_value = Some(y1_value);
                result.y1_hit_point = Some(self.mapper.to_pixel(x_value, y1_value));
            }
        }

        if !result.is_hit {
            let start = self.mapper.to_pixel(x0, y0);
            let end = self.mapper.to_pixel(x1, y1);
            let distance = if self.is_digital {
                let corner = self.mapper.to_pixel(x1, y0);
                distance_to_segment(raw_point, start, corner)
                    .min(distance_to_segment(raw_point, corner, end))
            } else {
                distance_to_segment(raw_point, start, end)
            };
            result.is_hit = distance <= radius_px;
        }

        result
    }

    /// Snapped result for sample `index` without interpolation.
    #[must_use]
    pub fn sample_result(
        &self,
        raw_point: PixelPoint,
        index: usize,
        radius_px: f64,
    ) -> HitTestResult {
        let x_value = self.series.x(index);
        let y_value = self.series.y(index);
        let hit_point = self.mapper.to_pixel(x_value, y_value);

        let is_hit = if self.use_y_for_distance {
            raw_point.distance_to(hit_point) <= radius_px
        } else {
            let (raw_x, _) = self.mapper.coordinates_from_pixel(raw_point);
            let (sample_x, _) = self.mapper.coordinates_from_pixel(hit_point);
            (raw_x - sample_x).abs() <= radius_px
        };

        let (raw_x, _) = self.mapper.coordinates_from_pixel(raw_point);
        let mut result = HitTestResult {
            index: Some(index),
            hit_point,
            x_value,
            y_value,
            is_hit,
            is_within_data_bounds: self.is_within_data_bounds(self.mapper.x_value_at(raw_x)),
            is_vertical_hit: !self.use_y_for_distance,
            ..HitTestResult::empty()
        };

        if let Some(secondary) = self.secondary {
            if index < secondary.count() {
                let y1_value = secondary.y(index);
                result.y1_value = Some(y1_value);
                result.y1_hit_point = Some(self.mapper.to_pixel(secondary.x(index), y1_value));
            }
        }
        result
    }

    /// Radius actually used by [`SearchMode::Nearest`].
    ///
    /// Series with fewer than two samples always use the default radius. A
    /// zero radius means "closest X wins", which needs sorted data, so an
    /// unsorted series with a zero radius also falls back to the default.
    #[must_use]
    pub fn effective_radius(&self, radius_px: f64) -> f64 {
        let radius = radius_px.max(0.0);
        if self.series.count() < 2 || (radius == 0.0 && !self.series.is_sorted()) {
            trace!(
                count = self.series.count(),
                sorted = self.series.is_sorted(),
                requested = radius,
                "hit-test radius replaced by default"
            );
            return DEFAULT_HIT_TEST_RADIUS_PX;
        }
        radius
    }

    fn is_within_data_bounds(&self, hit_x: f64) -> bool {
        let xs = self.series.x_values();
        let (min, max) = if self.series.is_sorted() {
            match (xs.first(), xs.last()) {
                (Some(first), Some(last)) => (*first, *last),
                _ => return false,
            }
        } else {
            xs.iter()
                .filter(|x| !x.is_nan())
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                    (lo.min(*x), hi.max(*x))
                })
        };
        hit_x >= min && hit_x <= max
    }

    fn defined_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.series.count()).filter(|i| self.series.is_defined(*i))
    }

    fn closest_by_x(&self, hit_x: f64) -> Option<usize> {
        self.defined_indices()
            .min_by_key(|i| OrderedFloat((self.series.x(*i) - hit_x).abs()))
    }

    fn closest_within(
        &self,
        hit_x: f64,
        hit_y: f64,
        xy_scale_ratio: f64,
        max_distance: f64,
    ) -> Option<usize> {
        let xs = self.series.x_values();
        let window = if self.series.is_sorted() {
            let lo = xs.partition_point(|x| *x < hit_x - max_distance);
            let hi = xs.partition_point(|x| *x <= hit_x + max_distance);
            lo..hi.max(lo)
        } else {
            0..xs.len()
        };

        window
            .filter(|i| self.series.is_defined(*i))
            .filter_map(|i| {
                let dx = self.series.x(i) - hit_x;
                let dy = if xy_scale_ratio == 0.0 {
                    0.0
                } else {
                    (self.series.y(i) - hit_y) * xy_scale_ratio
                };
                let distance = dx.hypot(dy);
                (distance <= max_distance).then_some((i, OrderedFloat(distance)))
            })
            .min_by_key(|(_, distance)| *distance)
            .map(|(i, _)| i)
    }

    fn round_down(&self, hit_x: f64) -> Option<usize> {
        if self.series.is_sorted() {
            let upper = self.series.x_values().partition_point(|x| *x <= hit_x);
            (0..upper)
                .rev()
                .find(|i| self.series.is_defined(*i))
                .or_else(|| self.defined_indices().next())
        } else {
            self.defined_indices()
                .filter(|i| self.series.x(*i) <= hit_x)
                .max_by_key(|i| OrderedFloat(self.series.x(*i)))
                .or_else(|| {
                    self.defined_indices()
                        .min_by_key(|i| OrderedFloat(self.series.x(*i)))
                })
        }
    }

    fn round_up(&self, hit_x: f64) -> Option<usize> {
        if self.series.is_sorted() {
            let lower = self.series.x_values().partition_point(|x| *x < hit_x);
            (lower..self.series.count())
                .find(|i| self.series.is_defined(*i))
                .or_else(|| self.defined_indices().last())
        } else {
            self.defined_indices()
                .filter(|i| self.series.x(*i) >= hit_x)
                .min_by_key(|i| OrderedFloat(self.series.x(*i)))
                .or_else(|| {
                    self.defined_indices()
                        .max_by_key(|i| OrderedFloat(self.series.x(*i)))
                })
        }
    }
}

pub(crate) fn validate_radius(radius_px: f64) -> ChartResult<()> {
    if radius_px.is_nan() {
        return Err(ChartError::invalid_argument(
            "radius_px",
            "hit-test radius must not be NaN",
        ));
    }
    Ok(())
}
