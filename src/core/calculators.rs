use serde::{Deserialize, Serialize};

use crate::core::CoordinateCalculator;
use crate::error::{ChartError, ChartResult};

/// Linear mapping of a transformed domain onto `[0, size_px]`.
///
/// Horizontal axes grow left-to-right; vertical axes grow bottom-to-top so the
/// domain maximum lands at pixel 0. `flipped` reverses either direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct AxisSpan {
    start: f64,
    end: f64,
    size_px: f64,
    horizontal: bool,
    flipped: bool,
}

impl AxisSpan {
    fn new(start: f64, end: f64, size_px: f64, horizontal: bool) -> ChartResult<Self> {
        if !start.is_finite() || !end.is_finite() || start == end {
            return Err(ChartError::InvalidData(
                "axis domain must be finite and non-zero".to_owned(),
            ));
        }
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "axis size must be finite and > 0".to_owned(),
            ));
        }
        Ok(Self {
            start,
            end,
            size_px,
            horizontal,
            flipped: false,
        })
    }

    fn grows_from_origin(self) -> bool {
        self.horizontal != self.flipped
    }

    fn to_pixel(self, transformed: f64) -> f64 {
        let along = (transformed - self.start) / (self.end - self.start) * self.size_px;
        if self.grows_from_origin() {
            along
        } else {
            self.size_px - along
        }
    }

    fn from_pixel(self, pixel: f64) -> f64 {
        let along = if self.grows_from_origin() {
            pixel
        } else {
            self.size_px - pixel
        };
        self.start + along / self.size_px * (self.end - self.start)
    }
}

/// Plain numeric axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCoordinateCalculator {
    span: AxisSpan,
}

impl LinearCoordinateCalculator {
    pub fn new(
        visible_min: f64,
        visible_max: f64,
        size_px: f64,
        horizontal: bool,
    ) -> ChartResult<Self> {
        Ok(Self {
            span: AxisSpan::new(visible_min, visible_max, size_px, horizontal)?,
        })
    }

    pub fn horizontal(visible_min: f64, visible_max: f64, size_px: f64) -> ChartResult<Self> {
        Self::new(visible_min, visible_max, size_px, true)
    }

    pub fn vertical(visible_min: f64, visible_max: f64, size_px: f64) -> ChartResult<Self> {
        Self::new(visible_min, visible_max, size_px, false)
    }

    #[must_use]
    pub fn with_flipped(mut self, flipped: bool) -> Self {
        self.span.flipped = flipped;
        self
    }
}

impl CoordinateCalculator for LinearCoordinateCalculator {
    fn get_coordinate(&self, value: f64) -> f64 {
        self.span.to_pixel(value)
    }

    fn get_data_value(&self, pixel: f64) -> f64 {
        self.span.from_pixel(pixel)
    }

    fn is_horizontal(&self) -> bool {
        self.span.horizontal
    }

    fn is_flipped(&self) -> bool {
        self.span.flipped
    }
}

/// Logarithmic axis. Non-positive values have no coordinate and map to `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogarithmicCoordinateCalculator {
    span: AxisSpan,
    base: f64,
}

impl LogarithmicCoordinateCalculator {
    pub fn new(
        visible_min: f64,
        visible_max: f64,
        size_px: f64,
        horizontal: bool,
        base: f64,
    ) -> ChartResult<Self> {
        if visible_min <= 0.0 || visible_max <= 0.0 {
            return Err(ChartError::InvalidData(
                "logarithmic axis range must be > 0".to_owned(),
            ));
        }
        if !base.is_finite() || base <= 1.0 {
            return Err(ChartError::InvalidData(
                "logarithmic base must be finite and > 1".to_owned(),
            ));
        }
        Ok(Self {
            span: AxisSpan::new(
                visible_min.log(base),
                visible_max.log(base),
                size_px,
                horizontal,
            )?,
            base,
        })
    }

    #[must_use]
    pub fn with_flipped(mut self, flipped: bool) -> Self {
        self.span.flipped = flipped;
        self
    }
}

impl CoordinateCalculator for LogarithmicCoordinateCalculator {
    fn get_coordinate(&self, value: f64) -> f64 {
        if value <= 0.0 {
            return f64::NAN;
        }
        self.span.to_pixel(value.log(self.base))
    }

    fn get_data_value(&self, pixel: f64) -> f64 {
        self.base.powf(self.span.from_pixel(pixel))
    }

    fn is_horizontal(&self) -> bool {
        self.span.horizontal
    }

    fn is_flipped(&self) -> bool {
        self.span.flipped
    }

    fn is_logarithmic(&self) -> bool {
        true
    }
}

/// Category axis: evenly spaced slots regardless of the gaps between data values.
///
/// Coordinates are computed in index space. `base_values` holds the sorted data
/// value of each category; fractional indices interpolate linearly between
/// neighbours and extrapolate past either end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCoordinateCalculator {
    span: AxisSpan,
    base_values: Vec<f64>,
}

impl CategoryCoordinateCalculator {
    pub fn new(
        base_values: Vec<f64>,
        visible_min_index: f64,
        visible_max_index: f64,
        size_px: f64,
        horizontal: bool,
    ) -> ChartResult<Self> {
        Ok(Self {
            span: AxisSpan::new(visible_min_index, visible_max_index, size_px, horizontal)?,
            base_values,
        })
    }

    #[must_use]
    pub fn with_flipped(mut self, flipped: bool) -> Self {
        self.span.flipped = flipped;
        self
    }

    fn last_pair_start(&self) -> usize {
        self.base_values.len().saturating_sub(2)
    }
}

impl CoordinateCalculator for CategoryCoordinateCalculator {
    fn get_coordinate(&self, value: f64) -> f64 {
        self.span.to_pixel(value)
    }

    fn get_data_value(&self, pixel: f64) -> f64 {
        self.span.from_pixel(pixel)
    }

    fn is_horizontal(&self) -> bool {
        self.span.horizontal
    }

    fn is_flipped(&self) -> bool {
        self.span.flipped
    }

    fn is_category(&self) -> bool {
        true
    }

    fn transform_index_to_data(&self, index: f64) -> f64 {
        match self.base_values.len() {
            0 => index,
            1 => self.base_values[0],
            _ => {
                if index.is_nan() {
                    return f64::NAN;
                }
                let lo = (index.floor().max(0.0) as usize).min(self.last_pair_start());
                let (a, b) = (self.base_values[lo], self.base_values[lo + 1]);
                a + (b - a) * (index - lo as f64)
            }
        }
    }

    fn transform_data_to_index(&self, value: f64) -> f64 {
        match self.base_values.len() {
            0 => value,
            1 => 0.0,
            _ => {
                if value.is_nan() {
                    return f64::NAN;
                }
                let upper = self.base_values.partition_point(|v| *v < value);
                let lo = upper.saturating_sub(1).min(self.last_pair_start());
                let (a, b) = (self.base_values[lo], self.base_values[lo + 1]);
                if b == a {
                    lo as f64
                } else {
                    lo as f64 + (value - a) / (b - a)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_vertical_axis_puts_maximum_at_top() {
        let calc = LinearCoordinateCalculator::vertical(0.0, 100.0, 500.0).expect("calc");
        assert!((calc.get_coordinate(100.0) - 0.0).abs() <= 1e-9);
        assert!((calc.get_coordinate(0.0) - 500.0).abs() <= 1e-9);
        assert!((calc.get_data_value(250.0) - 50.0).abs() <= 1e-9);

        let flipped = calc.with_flipped(true);
        assert!((flipped.get_coordinate(100.0) - 500.0).abs() <= 1e-9);
    }

    #[test]
    fn logarithmic_axis_round_trips_and_rejects_non_positive() {
        let calc =
            LogarithmicCoordinateCalculator::new(1.0, 1000.0, 300.0, true, 10.0).expect("calc");
        assert!((calc.get_coordinate(10.0) - 100.0).abs() <= 1e-9);
        assert!((calc.get_data_value(200.0) - 100.0).abs() <= 1e-6);
        assert!(calc.get_coordinate(0.0).is_nan());
        assert!(LogarithmicCoordinateCalculator::new(0.0, 10.0, 300.0, true, 10.0).is_err());
    }

    #[test]
    fn category_transform_interpolates_between_slots() {
        let calc = CategoryCoordinateCalculator::new(vec![10.0, 20.0, 40.0], 0.0, 2.0, 200.0, true)
            .expect("calc");
        assert!((calc.transform_index_to_data(1.5) - 30.0).abs() <= 1e-9);
        assert!((calc.transform_data_to_index(30.0) - 1.5).abs() <= 1e-9);
        assert!((calc.transform_index_to_data(3.0) - 60.0).abs() <= 1e-9);
        assert!((calc.transform_data_to_index(5.0) + 0.5).abs() <= 1e-9);
        assert!((calc.get_coordinate(1.0) - 100.0).abs() <= 1e-9);
    }
}
