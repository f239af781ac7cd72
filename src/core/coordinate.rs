use crate::core::PixelPoint;

/// Bidirectional data-value <-> pixel mapping for one axis.
///
/// Calculators are owned by the host and shared across render passes. For
/// category axes `get_coordinate`/`get_data_value` operate on category
/// indices; `transform_index_to_data` and `transform_data_to_index` convert
/// between those indices and the underlying data values.
pub trait CoordinateCalculator {
    fn get_coordinate(&self, value: f64) -> f64;

    fn get_data_value(&self, pixel: f64) -> f64;

    fn is_horizontal(&self) -> bool;

    fn is_flipped(&self) -> bool {
        false
    }

    fn is_category(&self) -> bool {
        false
    }

    fn is_logarithmic(&self) -> bool {
        false
    }

    fn is_polar(&self) -> bool {
        false
    }

    fn transform_index_to_data(&self, index: f64) -> f64 {
        index
    }

    fn transform_data_to_index(&self, value: f64) -> f64 {
        value
    }
}

/// Pairs the X and Y calculators of one series and applies the transforms
/// every renderer shares: category index mapping on X and the axis swap of
/// vertical charts.
///
/// "Coordinate" below means the raw calculator output along an axis;
/// "pixel" means the final screen point after the swap.
#[derive(Clone, Copy)]
pub struct PointMapper<'a> {
    x_calc: &'a dyn CoordinateCalculator,
    y_calc: &'a dyn CoordinateCalculator,
}

impl<'a> PointMapper<'a> {
    #[must_use]
    pub fn new(x_calc: &'a dyn CoordinateCalculator, y_calc: &'a dyn CoordinateCalculator) -> Self {
        Self { x_calc, y_calc }
    }

    #[must_use]
    pub fn x_calculator(&self) -> &'a dyn CoordinateCalculator {
        self.x_calc
    }

    #[must_use]
    pub fn y_calculator(&self) -> &'a dyn CoordinateCalculator {
        self.y_calc
    }

    /// A chart is vertical when its X axis runs top-to-bottom.
    #[must_use]
    pub fn is_vertical_chart(&self) -> bool {
        !self.x_calc.is_horizontal()
    }

    #[must_use]
    pub fn x_coordinate(&self, x_value: f64) -> f64 {
        if self.x_calc.is_category() {
            self.x_calc
                .get_coordinate(self.x_calc.transform_data_to_index(x_value))
        } else {
            self.x_calc.get_coordinate(x_value)
        }
    }

    #[must_use]
    pub fn y_coordinate(&self, y_value: f64) -> f64 {
        self.y_calc.get_coordinate(y_value)
    }

    /// Data X under an X-axis coordinate, interpolating between categories.
    #[must_use]
    pub fn x_value_at(&self, x_coord: f64) -> f64 {
        let raw = self.x_calc.get_data_value(x_coord);
        if self.x_calc.is_category() {
            self.x_calc.transform_index_to_data(raw)
        } else {
            raw
        }
    }

    #[must_use]
    pub fn y_value_at(&self, y_coord: f64) -> f64 {
        self.y_calc.get_data_value(y_coord)
    }

    /// Combines axis coordinates into a screen point.
    #[must_use]
    pub fn pixel_from_coordinates(&self, x_coord: f64, y_coord: f64) -> PixelPoint {
        if self.is_vertical_chart() {
            PixelPoint::new(y_coord, x_coord)
        } else {
            PixelPoint::new(x_coord, y_coord)
        }
    }

    /// Splits a screen point into `(x_coord, y_coord)`.
    #[must_use]
    pub fn coordinates_from_pixel(&self, pixel: PixelPoint) -> (f64, f64) {
        if self.is_vertical_chart() {
            (pixel.y, pixel.x)
        } else {
            (pixel.x, pixel.y)
        }
    }

    #[must_use]
    pub fn to_pixel(&self, x_value: f64, y_value: f64) -> PixelPoint {
        self.pixel_from_coordinates(self.x_coordinate(x_value), self.y_coordinate(y_value))
    }

    /// Data-space width of one pixel on the X axis, sampled at `x_coord`.
    #[must_use]
    pub fn x_units_per_pixel(&self, x_coord: f64) -> f64 {
        (self.x_value_at(x_coord + 1.0) - self.x_value_at(x_coord)).abs()
    }

    /// Data-space height of one pixel on the Y axis, sampled at `y_coord`.
    #[must_use]
    pub fn y_units_per_pixel(&self, y_coord: f64) -> f64 {
        (self.y_value_at(y_coord + 1.0) - self.y_value_at(y_coord)).abs()
    }
}

impl std::fmt::Debug for PointMapper<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointMapper")
            .field("vertical_chart", &self.is_vertical_chart())
            .field("x_category", &self.x_calc.is_category())
            .field("y_logarithmic", &self.y_calc.is_logarithmic())
            .finish()
    }
}
