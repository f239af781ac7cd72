use serde::{Deserialize, Serialize};

use crate::core::PointSeries;

/// Host-assigned identity of a series taking part in stacking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeriesId(pub u64);

/// One series registered in a stacked group.
///
/// `data` is the full data series (used for autorange); `snapshot` is the
/// resampled point series of the current render pass, replaced every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedMember {
    pub(super) id: SeriesId,
    pub(super) group_id: String,
    pub(super) visible: bool,
    pub(super) zero_line_y: f64,
    pub(super) one_hundred_percent: bool,
    pub(super) data: PointSeries,
    pub(super) snapshot: Option<PointSeries>,
}

impl StackedMember {
    #[must_use]
    pub fn new(id: SeriesId, group_id: impl Into<String>, data: PointSeries) -> Self {
        Self {
            id,
            group_id: group_id.into(),
            visible: true,
            zero_line_y: 0.0,
            one_hundred_percent: false,
            data,
            snapshot: None,
        }
    }

    #[must_use]
    pub fn with_zero_line(mut self, zero_line_y: f64) -> Self {
        self.zero_line_y = zero_line_y;
        self
    }

    #[must_use]
    pub fn with_one_hundred_percent(mut self, one_hundred_percent: bool) -> Self {
        self.one_hundred_percent = one_hundred_percent;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn id(&self) -> SeriesId {
        self.id
    }

    #[must_use]
    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn zero_line_y(&self) -> f64 {
        self.zero_line_y
    }

    #[must_use]
    pub fn is_one_hundred_percent(&self) -> bool {
        self.one_hundred_percent
    }

    /// Pass snapshot when requested and present, otherwise the full data.
    #[must_use]
    pub fn values(&self, use_pass_snapshot: bool) -> &PointSeries {
        match (&self.snapshot, use_pass_snapshot) {
            (Some(snapshot), true) => snapshot,
            _ => &self.data,
        }
    }

    /// Value at `index` with gaps counted as zero.
    ///
    /// Members shorter than the stacked target contribute nothing past their end.
    pub(super) fn stack_value(&self, index: usize, use_pass_snapshot: bool) -> f64 {
        let value = self.values(use_pass_snapshot).y_or_gap(index);
        if value.is_nan() { 0.0 } else { value }
    }
}
