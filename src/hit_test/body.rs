use tracing::trace;

use crate::core::{
    BoxPointSeries, HlcPointSeries, OhlcPointSeries, PixelPoint, PixelRect, PointMapper,
    PointSeries, PointSeriesData, SeriesKind, XyzPointSeries,
};
use crate::error::{ChartError, ChartResult};
use crate::hit_test::engine::validate_radius;
use crate::hit_test::{HitTestDetail, HitTestEngine, HitTestResult, SearchMode};

/// Data-space extent of one sample's drawn body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyBounds {
    /// Vertical span `lower..upper` (data units) and a width in pixels.
    Rect { upper: f64, lower: f64, width_px: f64 },
    /// Circle centred on the sample with a pixel radius.
    Circle { radius_px: f64 },
}

/// Per-series-kind geometry used by [`hit_test_body`].
pub trait BodyHitStrategy {
    fn kind(&self) -> SeriesKind;

    /// X plus the anchor Y reported as the hit point.
    fn points(&self) -> &PointSeries;

    /// `None` when the sample has nothing drawn (gap).
    fn bounds(&self, index: usize) -> Option<BodyBounds>;

    fn detail(&self, _index: usize) -> HitTestDetail {
        HitTestDetail::None
    }
}

fn finite_span(upper: f64, lower: f64) -> Option<(f64, f64)> {
    if upper.is_nan() || lower.is_nan() {
        None
    } else {
        Some((upper.max(lower), upper.min(lower)))
    }
}

fn checked_width(width_px: f64) -> ChartResult<f64> {
    if !width_px.is_finite() || width_px < 0.0 {
        return Err(ChartError::invalid_argument(
            "width_px",
            "body width must be finite and >= 0",
        ));
    }
    Ok(width_px)
}

/// Columns spanning the zero line to each value.
#[derive(Debug, Clone, Copy)]
pub struct ColumnHitStrategy<'a> {
    series: &'a PointSeries,
    zero_line_y: f64,
    width_px: f64,
}

impl<'a> ColumnHitStrategy<'a> {
    pub fn new(series: &'a PointSeries, zero_line_y: f64, width_px: f64) -> ChartResult<Self> {
        Ok(Self {
            series,
            zero_line_y,
            width_px: checked_width(width_px)?,
        })
    }

    pub fn from_data(
        data: &'a PointSeriesData,
        zero_line_y: f64,
        width_px: f64,
    ) -> ChartResult<Self> {
        Self::new(data.as_xy()?, zero_line_y, width_px)
    }
}

impl BodyHitStrategy for ColumnHitStrategy<'_> {
    fn kind(&self) -> SeriesKind {
        SeriesKind::Xy
    }

    fn points(&self) -> &PointSeries {
        self.series
    }

    fn bounds(&self, index: usize) -> Option<BodyBounds> {
        let (upper, lower) = finite_span(self.series.y(index), self.zero_line_y)?;
        Some(BodyBounds::Rect {
            upper,
            lower,
            width_px: self.width_px,
        })
    }
}

fn ohlc_bounds(series: &OhlcPointSeries, index: usize, width_px: f64) -> Option<BodyBounds> {
    let (upper, lower) = finite_span(series.high(index), series.low(index))?;
    Some(BodyBounds::Rect {
        upper,
        lower,
        width_px,
    })
}

fn ohlc_detail(series: &OhlcPointSeries, index: usize) -> HitTestDetail {
    HitTestDetail::Ohlc {
        open: series.open(index),
        high: series.high(index),
        low: series.low(index),
        close: series.close(index),
        volume: series.volume(index),
    }
}

/// Candles: body plus wicks, so the whole high..low span counts.
#[derive(Debug, Clone, Copy)]
pub struct CandlestickHitStrategy<'a> {
    series: &'a OhlcPointSeries,
    body_width_px: f64,
}

impl<'a> CandlestickHitStrategy<'a> {
    pub fn new(series: &'a OhlcPointSeries, body_width_px: f64) -> ChartResult<Self> {
        Ok(Self {
            series,
            body_width_px: checked_width(body_width_px)?,
        })
    }

    pub fn from_data(data: &'a PointSeriesData, body_width_px: f64) -> ChartResult<Self> {
        Self::new(data.as_ohlc()?, body_width_px)
    }
}

impl BodyHitStrategy for CandlestickHitStrategy<'_> {
    fn kind(&self) -> SeriesKind {
        SeriesKind::Ohlc
    }

    fn points(&self) -> &PointSeries {
        self.series.points()
    }

    fn bounds(&self, index: usize) -> Option<BodyBounds> {
        ohlc_bounds(self.series, index, self.body_width_px)
    }

    fn detail(&self, index: usize) -> HitTestDetail {
        ohlc_detail(self.series, index)
    }
}

/// OHLC bars: high-low stem with open/close ticks reaching `tick_span_px` across.
#[derive(Debug, Clone, Copy)]
pub struct OhlcBarHitStrategy<'a> {
    series: &'a OhlcPointSeries,
    tick_span_px: f64,
}

impl<'a> OhlcBarHitStrategy<'a> {
    pub fn new(series: &'a OhlcPointSeries, tick_span_px: f64) -> ChartResult<Self> {
        Ok(Self {
            series,
            tick_span_px: checked_width(tick_span_px)?,
        })
    }

    pub fn from_data(data: &'a PointSeriesData, tick_span_px: f64) -> ChartResult<Self> {
        Self::new(data.as_ohlc()?, tick_span_px)
    }
}

impl BodyHitStrategy for OhlcBarHitStrategy<'_> {
    fn kind(&self) -> SeriesKind {
        SeriesKind::Ohlc
    }

    fn points(&self) -> &PointSeries {
        self.series.points()
    }

    fn bounds(&self, index: usize) -> Option<BodyBounds> {
        ohlc_bounds(self.series, index, self.tick_span_px)
    }

    fn detail(&self, index: usize) -> HitTestDetail {
        ohlc_detail(self.series, index)
    }
}

/// Box plots: whiskers included, minimum..maximum.
#[derive(Debug, Clone, Copy)]
pub struct BoxPlotHitStrategy<'a> {
    series: &'a BoxPointSeries,
    body_width_px: f64,
}

impl<'a> BoxPlotHitStrategy<'a> {
    pub fn new(series: &'a BoxPointSeries, body_width_px: f64) -> ChartResult<Self> {
        Ok(Self {
            series,
            body_width_px: checked_width(body_width_px)?,
        })
    }

    pub fn from_data(data: &'a PointSeriesData, body_width_px: f64) -> ChartResult<Self> {
        Self::new(data.as_box_plot()?, body_width_px)
    }
}

impl BodyHitStrategy for BoxPlotHitStrategy<'_> {
    fn kind(&self) -> SeriesKind {
        SeriesKind::BoxPlot
    }

    fn points(&self) -> &PointSeries {
        self.series.points()
    }

    fn bounds(&self, index: usize) -> Option<BodyBounds> {
        let (upper, lower) =
            finite_span(self.series.maximum(index), self.series.minimum(index))?;
        Some(BodyBounds::Rect {
            upper,
            lower,
            width_px: self.body_width_px,
        })
    }

    fn detail(&self, index: usize) -> HitTestDetail {
        HitTestDetail::BoxPlot {
            minimum: self.series.minimum(index),
            lower_quartile: self.series.lower_quartile(index),
            median: self.series.median(index),
            upper_quartile: self.series.upper_quartile(index),
            maximum: self.series.maximum(index),
        }
    }
}

/// Error bars: low..high with caps `cap_width_px` across.
#[derive(Debug, Clone, Copy)]
pub struct ErrorBarHitStrategy<'a> {
    series: &'a HlcPointSeries,
    cap_width_px: f64,
}

impl<'a> ErrorBarHitStrategy<'a> {
    pub fn new(series: &'a HlcPointSeries, cap_width_px: f64) -> ChartResult<Self> {
        Ok(Self {
            series,
            cap_width_px: checked_width(cap_width_px)?,
        })
    }

    pub fn from_data(data: &'a PointSeriesData, cap_width_px: f64) -> ChartResult<Self> {
        Self::new(data.as_hlc()?, cap_width_px)
    }
}

impl BodyHitStrategy for ErrorBarHitStrategy<'_> {
    fn kind(&self) -> SeriesKind {
        SeriesKind::Hlc
    }

    fn points(&self) -> &PointSeries {
        self.series.points()
    }

    fn bounds(&self, index: usize) -> Option<BodyBounds> {
        let (upper, lower) = finite_span(self.series.high(index), self.series.low(index))?;
        Some(BodyBounds::Rect {
            upper,
            lower,
            width_px: self.cap_width_px,
        })
    }

    fn detail(&self, index: usize) -> HitTestDetail {
        HitTestDetail::ErrorBar {
            high: self.series.high(index),
            low: self.series.low(index),
        }
    }
}

/// Bubbles: `z * z_scale_factor` is the diameter in pixels.
#[derive(Debug, Clone, Copy)]
pub struct BubbleHitStrategy<'a> {
    series: &'a XyzPointSeries,
    z_scale_factor: f64,
}

impl<'a> BubbleHitStrategy<'a> {
    pub fn new(series: &'a XyzPointSeries, z_scale_factor: f64) -> ChartResult<Self> {
        if !z_scale_factor.is_finite() || z_scale_factor <= 0.0 {
            return Err(ChartError::invalid_argument(
                "z_scale_factor",
                "must be finite and > 0",
            ));
        }
        Ok(Self {
            series,
            z_scale_factor,
        })
    }

    pub fn from_data(data: &'a PointSeriesData, z_scale_factor: f64) -> ChartResult<Self> {
        Self::new(data.as_xyz()?, z_scale_factor)
    }
}

impl BodyHitStrategy for BubbleHitStrategy<'_> {
    fn kind(&self) -> SeriesKind {
        SeriesKind::Xyz
    }

    fn points(&self) -> &PointSeries {
        self.series.points()
    }

    fn bounds(&self, index: usize) -> Option<BodyBounds> {
        let z = self.series.z(index);
        if z.is_nan() || !self.series.points().is_defined(index) {
            return None;
        }
        Some(BodyBounds::Circle {
            radius_px: (z * self.z_scale_factor).abs() * 0.5,
        })
    }

    fn detail(&self, index: usize) -> HitTestDetail {
        HitTestDetail::Bubble {
            z: self.series.z(index),
        }
    }
}

/// Body/area hit test shared by bars, candles, box plots, error bars and bubbles.
///
/// Picks the sample closest in X, expands its body by
/// `stroke_thickness_px / 2 + radius_px` and tests the raw point against the
/// resulting rectangle (or circle for bubbles), after the same category
/// transform and axis swap used for drawing.
pub fn hit_test_body(
    strategy: &dyn BodyHitStrategy,
    mapper: PointMapper<'_>,
    raw_point: PixelPoint,
    radius_px: f64,
    stroke_thickness_px: f64,
) -> ChartResult<HitTestResult> {
    validate_radius(radius_px)?;
    let points = strategy.points();
    let engine = HitTestEngine::new(points, mapper).with_y_distance(false);
    let Some(index) = engine.nearest_sample(raw_point, 0.0, SearchMode::Nearest, false)? else {
        return Ok(HitTestResult::empty());
    };

    let mut result = engine.sample_result(raw_point, index, radius_px);
    result.detail = strategy.detail(index);
    let padding = stroke_thickness_px.max(0.0) * 0.5 + radius_px.max(0.0);

    result.is_hit = match strategy.bounds(index) {
        None => false,
        Some(BodyBounds::Rect {
            upper,
            lower,
            width_px,
        }) => {
            let x_coord = mapper.x_coordinate(points.x(index));
            let half_width = width_px * 0.5;
            let a = mapper.pixel_from_coordinates(x_coord - half_width, mapper.y_coordinate(upper));
            let b = mapper.pixel_from_coordinates(x_coord + half_width, mapper.y_coordinate(lower));
            PixelRect::from_corners(a, b)
                .inflate(padding)
                .contains(raw_point)
        }
        Some(BodyBounds::Circle { radius_px: body }) => {
            raw_point.distance_to(result.hit_point) <= body + padding
        }
    };
    trace!(kind = %strategy.kind(), index, is_hit = result.is_hit, "body hit test");
    Ok(result)
}
