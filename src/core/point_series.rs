use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::DataPoint;
use crate::error::{ChartError, ChartResult};

/// Shape of the samples a series carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesKind {
    Xy,
    Xyy,
    Ohlc,
    Hlc,
    BoxPlot,
    Xyz,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Xy => "XY",
            Self::Xyy => "XYY (band)",
            Self::Ohlc => "OHLC",
            Self::Hlc => "HLC (error bar)",
            Self::BoxPlot => "box plot",
            Self::Xyz => "XYZ (bubble)",
        };
        f.write_str(name)
    }
}

/// Resampled, screen-ready snapshot of one series for a single render pass.
///
/// `NaN` in `y` marks a gap. `x` is expected non-decreasing; unsorted input is
/// tolerated and only flips [`PointSeries::is_sorted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointSeries {
    x: Vec<f64>,
    y: Vec<f64>,
    sorted: bool,
}

impl PointSeries {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> ChartResult<Self> {
        check_len("point series x/y", x.len(), y.len())?;
        let sorted = x.windows(2).all(|pair| !(pair[1] < pair[0]));
        Ok(Self { x, y, sorted })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            sorted: true,
        }
    }

    #[must_use]
    pub fn from_points(points: &[DataPoint]) -> Self {
        let x = points.iter().map(|p| p.x).collect();
        let y = points.iter().map(|p| p.y).collect();
        // Lengths match by construction.
        Self::new(x, y).unwrap_or_else(|_| Self::empty())
    }

    /// Builds a series from timestamped decimal samples (unix seconds on X).
    pub fn from_decimal_time(samples: &[(DateTime<Utc>, Decimal)]) -> ChartResult<Self> {
        let points = samples
            .iter()
            .map(|(time, value)| DataPoint::from_decimal_time(*time, *value))
            .collect::<ChartResult<Vec<_>>>()?;
        Ok(Self::from_points(&points))
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    #[must_use]
    pub fn x_values(&self) -> &[f64] {
        &self.x
    }

    #[must_use]
    pub fn y_values(&self) -> &[f64] {
        &self.y
    }

    #[must_use]
    pub fn x(&self, index: usize) -> f64 {
        self.x[index]
    }

    #[must_use]
    pub fn y(&self, index: usize) -> f64 {
        self.y[index]
    }

    /// `true` when the sample exists and neither coordinate is `NaN`.
    #[must_use]
    pub fn is_defined(&self, index: usize) -> bool {
        index < self.count() && !self.x[index].is_nan() && !self.y[index].is_nan()
    }

    /// Y value at `index`; past the end reads as a gap (`NaN`).
    #[must_use]
    pub fn y_or_gap(&self, index: usize) -> f64 {
        self.y.get(index).copied().unwrap_or(f64::NAN)
    }

    /// Y value at `index`, clamped into range.
    ///
    /// Reaching past the end is a caller bug: debug builds panic, release
    /// builds read the last sample. An empty series reads as `NaN`.
    #[must_use]
    pub(crate) fn y_clamped(&self, index: usize) -> f64 {
        debug_assert!(
            index < self.count(),
            "sample index {index} out of range for {} samples",
            self.count()
        );
        match self.count() {
            0 => f64::NAN,
            n => self.y[index.min(n - 1)],
        }
    }
}

impl Default for PointSeries {
    fn default() -> Self {
        Self::empty()
    }
}

fn check_len(context: &'static str, left: usize, right: usize) -> ChartResult<()> {
    if left != right {
        return Err(ChartError::LengthMismatch {
            context,
            left,
            right,
        });
    }
    Ok(())
}

/// Two aligned lines sharing X, as drawn by band series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyyPointSeries {
    x: Vec<f64>,
    y: Vec<f64>,
    y1: Vec<f64>,
}

impl XyyPointSeries {
    pub fn new(x: Vec<f64>, y: Vec<f64>, y1: Vec<f64>) -> ChartResult<Self> {
        check_len("xyy series x/y", x.len(), y.len())?;
        check_len("xyy series x/y1", x.len(), y1.len())?;
        Ok(Self { x, y, y1 })
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.x.len()
    }

    /// Splits into the first (`y`) and second (`y1`) line.
    #[must_use]
    pub fn split(&self) -> (PointSeries, PointSeries) {
        let first = PointSeries::new(self.x.clone(), self.y.clone()).unwrap_or_default();
        let second = PointSeries::new(self.x.clone(), self.y1.clone()).unwrap_or_default();
        (first, second)
    }

    #[must_use]
    pub fn y1_values(&self) -> &[f64] {
        &self.y1
    }
}

/// Open/high/low/close samples. The embedded point series carries `close`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcPointSeries {
    points: PointSeries,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    volume: Option<Vec<f64>>,
}

impl OhlcPointSeries {
    pub fn new(
        x: Vec<f64>,
        open: Vec<f64>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    ) -> ChartResult<Self> {
        check_len("ohlc series x/open", x.len(), open.len())?;
        check_len("ohlc series x/high", x.len(), high.len())?;
        check_len("ohlc series x/low", x.len(), low.len())?;
        Ok(Self {
            points: PointSeries::new(x, close)?,
            open,
            high,
            low,
            volume: None,
        })
    }

    pub fn with_volume(mut self, volume: Vec<f64>) -> ChartResult<Self> {
        check_len("ohlc series x/volume", self.points.count(), volume.len())?;
        self.volume = Some(volume);
        Ok(self)
    }

    #[must_use]
    pub fn points(&self) -> &PointSeries {
        &self.points
    }

    #[must_use]
    pub fn open(&self, index: usize) -> f64 {
        self.open[index]
    }

    #[must_use]
    pub fn high(&self, index: usize) -> f64 {
        self.high[index]
    }

    #[must_use]
    pub fn low(&self, index: usize) -> f64 {
        self.low[index]
    }

    #[must_use]
    pub fn close(&self, index: usize) -> f64 {
        self.points.y(index)
    }

    #[must_use]
    pub fn volume(&self, index: usize) -> Option<f64> {
        self.volume.as_ref().map(|v| v[index])
    }
}

/// Value with high/low error bounds. The embedded point series carries the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HlcPointSeries {
    points: PointSeries,
    high: Vec<f64>,
    low: Vec<f64>,
}

impl HlcPointSeries {
    pub fn new(x: Vec<f64>, y: Vec<f64>, high: Vec<f64>, low: Vec<f64>) -> ChartResult<Self> {
        check_len("hlc series x/high", x.len(), high.len())?;
        check_len("hlc series x/low", x.len(), low.len())?;
        Ok(Self {
            points: PointSeries::new(x, y)?,
            high,
            low,
        })
    }

    #[must_use]
    pub fn points(&self) -> &PointSeries {
        &self.points
    }

    #[must_use]
    pub fn high(&self, index: usize) -> f64 {
        self.high[index]
    }

    #[must_use]
    pub fn low(&self, index: usize) -> f64 {
        self.low[index]
    }
}

/// Five-number summary per sample. The embedded point series carries the median.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPointSeries {
    points: PointSeries,
    minimum: Vec<f64>,
    lower_quartile: Vec<f64>,
    upper_quartile: Vec<f64>,
    maximum: Vec<f64>,
}

impl BoxPointSeries {
    pub fn new(
        x: Vec<f64>,
        minimum: Vec<f64>,
        lower_quartile: Vec<f64>,
        median: Vec<f64>,
        upper_quartile: Vec<f64>,
        maximum: Vec<f64>,
    ) -> ChartResult<Self> {
        check_len("box series x/minimum", x.len(), minimum.len())?;
        check_len("box series x/lower quartile", x.len(), lower_quartile.len())?;
        check_len("box series x/upper quartile", x.len(), upper_quartile.len())?;
        check_len("box series x/maximum", x.len(), maximum.len())?;
        Ok(Self {
            points: PointSeries::new(x, median)?,
            minimum,
            lower_quartile,
            upper_quartile,
            maximum,
        })
    }

    #[must_use]
    pub fn points(&self) -> &PointSeries {
        &self.points
    }

    #[must_use]
    pub fn minimum(&self, index: usize) -> f64 {
        self.minimum[index]
    }

    #[must_use]
    pub fn lower_quartile(&self, index: usize) -> f64 {
        self.lower_quartile[index]
    }

    #[must_use]
    pub fn median(&self, index: usize) -> f64 {
        self.points.y(index)
    }

    #[must_use]
    pub fn upper_quartile(&self, index: usize) -> f64 {
        self.upper_quartile[index]
    }

    #[must_use]
    pub fn maximum(&self, index: usize) -> f64 {
        self.maximum[index]
    }
}

/// X/Y plus a size channel, as drawn by bubble series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyzPointSeries {
    points: PointSeries,
    z: Vec<f64>,
}

impl XyzPointSeries {
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> ChartResult<Self> {
        check_len("xyz series x/z", x.len(), z.len())?;
        Ok(Self {
            points: PointSeries::new(x, y)?,
            z,
        })
    }

    #[must_use]
    pub fn points(&self) -> &PointSeries {
        &self.points
    }

    #[must_use]
    pub fn z(&self, index: usize) -> f64 {
        self.z[index]
    }
}

/// Kind-tagged series handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointSeriesData {
    Xy(PointSeries),
    Xyy(XyyPointSeries),
    Ohlc(OhlcPointSeries),
    Hlc(HlcPointSeries),
    BoxPlot(BoxPointSeries),
    Xyz(XyzPointSeries),
}

impl PointSeriesData {
    #[must_use]
    pub fn kind(&self) -> SeriesKind {
        match self {
            Self::Xy(_) => SeriesKind::Xy,
            Self::Xyy(_) => SeriesKind::Xyy,
            Self::Ohlc(_) => SeriesKind::Ohlc,
            Self::Hlc(_) => SeriesKind::Hlc,
            Self::BoxPlot(_) => SeriesKind::BoxPlot,
            Self::Xyz(_) => SeriesKind::Xyz,
        }
    }

    /// Fails with [`ChartError::SeriesKindMismatch`] unless the data has the expected shape.
    pub fn assert_kind(&self, expected: SeriesKind) -> ChartResult<()> {
        let actual = self.kind();
        if actual != expected {
            return Err(ChartError::SeriesKindMismatch { expected, actual });
        }
        Ok(())
    }

    pub fn as_xy(&self) -> ChartResult<&PointSeries> {
        match self {
            Self::Xy(series) => Ok(series),
            other => Err(mismatch(SeriesKind::Xy, other)),
        }
    }

    pub fn as_xyy(&self) -> ChartResult<&XyyPointSeries> {
        match self {
            Self::Xyy(series) => Ok(series),
            other => Err(mismatch(SeriesKind::Xyy, other)),
        }
    }

    pub fn as_ohlc(&self) -> ChartResult<&OhlcPointSeries> {
        match self {
            Self::Ohlc(series) => Ok(series),
            other => Err(mismatch(SeriesKind::Ohlc, other)),
        }
    }

    pub fn as_hlc(&self) -> ChartResult<&HlcPointSeries> {
        match self {
            Self::Hlc(series) => Ok(series),
            other => Err(mismatch(SeriesKind::Hlc, other)),
        }
    }

    pub fn as_box_plot(&self) -> ChartResult<&BoxPointSeries> {
        match self {
            Self::BoxPlot(series) => Ok(series),
            other => Err(mismatch(SeriesKind::BoxPlot, other)),
        }
    }

    pub fn as_xyz(&self) -> ChartResult<&XyzPointSeries> {
        match self {
            Self::Xyz(series) => Ok(series),
            other => Err(mismatch(SeriesKind::Xyz, other)),
        }
    }
}

fn mismatch(expected: SeriesKind, actual: &PointSeriesData) -> ChartError {
    ChartError::SeriesKindMismatch {
        expected,
        actual: actual.kind(),
    }
}
