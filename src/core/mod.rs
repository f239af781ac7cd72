mod arena;
mod calculators;
mod coordinate;
mod point_series;
pub mod primitives;
mod types;

pub use arena::CoordinateArena;
pub use calculators::{
    CategoryCoordinateCalculator, LinearCoordinateCalculator, LogarithmicCoordinateCalculator,
};
pub use coordinate::{CoordinateCalculator, PointMapper};
pub use point_series::{
    BoxPointSeries, HlcPointSeries, OhlcPointSeries, PointSeries, PointSeriesData, SeriesKind,
    XyyPointSeries, XyzPointSeries,
};
pub use types::{DataPoint, DataRange, PixelPoint, PixelRect};
