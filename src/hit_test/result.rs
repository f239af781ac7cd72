use serde::{Deserialize, Serialize};

use crate::core::PixelPoint;

/// Series-kind-specific values attached to a hit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum HitTestDetail {
    #[default]
    None,
    Ohlc {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<f64>,
    },
    BoxPlot {
        minimum: f64,
        lower_quartile: f64,
        median: f64,
        upper_quartile: f64,
        maximum: f64,
    },
    ErrorBar {
        high: f64,
        low: f64,
    },
    Bubble {
        z: f64,
    },
    Stacked {
        /// Share of the group's absolute total at this sample, in percent.
        percentage: f64,
    },
}

/// Outcome of one pointer query against a series.
///
/// `hit_point` is the snapped screen location of the matched (or
/// interpolated) sample. Two-line series also fill the `y1_*` fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitTestResult {
    pub index: Option<usize>,
    pub hit_point: PixelPoint,
    pub y1_hit_point: Option<PixelPoint>,
    pub x_value: f64,
    pub y_value: f64,
    pub y1_value: Option<f64>,
    pub is_hit: bool,
    pub is_within_data_bounds: bool,
    pub is_vertical_hit: bool,
    pub detail: HitTestDetail,
}

impl HitTestResult {
    /// Result for queries that matched nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            index: None,
            hit_point: PixelPoint::new(f64::NAN, f64::NAN),
            y1_hit_point: None,
            x_value: f64::NAN,
            y_value: f64::NAN,
            y1_value: None,
            is_hit: false,
            is_within_data_bounds: false,
            is_vertical_hit: false,
            detail: HitTestDetail::None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_none()
    }
}

impl Default for HitTestResult {
    fn default() -> Self {
        Self::empty()
    }
}
