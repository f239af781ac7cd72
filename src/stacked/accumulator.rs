use std::ops::Range;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::{DataRange, PixelPoint, PointMapper, PointSeries};
use crate::error::{ChartError, ChartResult};
use crate::hit_test::{HitTestDetail, HitTestResult};
use crate::stacked::{SeriesId, StackedMember};

/// Vertical extent of one member at one sample after stacking.
///
/// `top - bottom` equals the member's own value (before 100% rescaling).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackedBounds {
    pub top: f64,
    pub bottom: f64,
}

impl StackedBounds {
    const GAP: Self = Self {
        top: f64::NAN,
        bottom: f64::NAN,
    };
}

/// Outcome of [`StackedAccumulator::request_draw`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawReadiness {
    /// Not every visible member has asked yet.
    Pending { requested: usize, expected: usize },
    /// Draw the whole group now, bottom member first.
    Ready { members: Vec<SeriesId> },
}

#[derive(Debug, Default)]
struct StackedGroup {
    members: Vec<StackedMember>,
    pending_draws: usize,
}

impl StackedGroup {
    fn is_one_hundred_percent(&self) -> bool {
        self.members
            .first()
            .is_some_and(StackedMember::is_one_hundred_percent)
    }

    fn visible(&self) -> impl Iterator<Item = &StackedMember> {
        self.members.iter().filter(|m| m.visible)
    }

    fn totals(&self, index: usize, use_pass_snapshot: bool) -> (f64, f64) {
        self.visible()
            .map(|m| m.stack_value(index, use_pass_snapshot))
            .fold((0.0, 0.0), |(positive, negative), value| {
                if value >= 0.0 {
                    (positive + value, negative)
                } else {
                    (positive, negative + value)
                }
            })
    }

    fn accumulate(
        &self,
        target: &StackedMember,
        index: usize,
        use_pass_snapshot: bool,
    ) -> StackedBounds {
        if !target.visible || target.values(use_pass_snapshot).y_clamped(index).is_nan() {
            return StackedBounds::GAP;
        }

        let normalized = self.is_one_hundred_percent();
        let mut positive = 0.0;
        let mut negative = 0.0;
        let mut bounds = StackedBounds::GAP;
        for member in self.visible() {
            let value = member.stack_value(index, use_pass_snapshot);
            if value >= 0.0 {
                positive += value;
            } else {
                negative += value;
            }
            if member.id == target.id {
                let same_sign = if value >= 0.0 { positive } else { negative };
                let top = target.zero_line_y + same_sign;
                bounds = StackedBounds {
                    top,
                    bottom: top - value,
                };
                break;
            }
        }

        if normalized {
            // A zero span propagates NaN/inf on purpose.
            let (total_positive, total_negative) = self.totals(index, use_pass_snapshot);
            let span = total_positive - total_negative;
            bounds.top = bounds.top * 100.0 / span;
            bounds.bottom = bounds.bottom * 100.0 / span;
        }
        bounds
    }
}

/// Registry of stacked groups and the per-sample accumulation over them.
///
/// Groups keep members in registration order; the first registered member
/// stacks lowest. Accumulation is recomputed on every call and never cached
/// across passes.
#[derive(Debug, Default)]
pub struct StackedAccumulator {
    groups: IndexMap<String, StackedGroup>,
}

impl StackedAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `member` to its group, creating the group on first use.
    ///
    /// Returns `false` (and changes nothing) when the id is already registered.
    pub fn add_member(&mut self, member: StackedMember) -> bool {
        if let Some(existing) = self.group_of(member.id) {
            if existing != member.group_id {
                warn!(
                    series = member.id.0,
                    existing,
                    requested = %member.group_id,
                    "series already stacked in another group"
                );
            }
            return false;
        }
        debug!(series = member.id.0, group = %member.group_id, "add stacked member");
        self.groups
            .entry(member.group_id.clone())
            .or_default()
            .members
            .push(member);
        true
    }

    /// Removes the member; its group goes away once empty.
    pub fn remove_member(&mut self, id: SeriesId) -> Option<StackedMember> {
        let (group_index, member_index) = self.locate(id)?;
        let (_, group) = self.groups.get_index_mut(group_index)?;
        let member = group.members.remove(member_index);
        if group.members.is_empty() {
            self.groups.shift_remove_index(group_index);
        }
        debug!(series = id.0, group = %member.group_id, "remove stacked member");
        Some(member)
    }

    /// Moves a member to `group_id` (appended last there).
    pub fn move_member(&mut self, id: SeriesId, group_id: impl Into<String>) -> ChartResult<()> {
        let mut member = self
            .remove_member(id)
            .ok_or(ChartError::UnknownSeries(id.0))?;
        member.group_id = group_id.into();
        self.add_member(member);
        Ok(())
    }

    /// Members sharing `group_id`, in registration order.
    #[must_use]
    pub fn members_of(&self, group_id: &str) -> &[StackedMember] {
        self.groups
            .get(group_id)
            .map_or(&[], |group| group.members.as_slice())
    }

    #[must_use]
    pub fn group_of(&self, id: SeriesId) -> Option<&str> {
        self.locate(id)
            .and_then(|(group_index, _)| self.groups.get_index(group_index))
            .map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn group_ids(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Group-wide 100% flag, read from the first member.
    #[must_use]
    pub fn is_one_hundred_percent(&self, group_id: &str) -> bool {
        self.groups
            .get(group_id)
            .is_some_and(StackedGroup::is_one_hundred_percent)
    }

    pub fn member(&self, id: SeriesId) -> ChartResult<&StackedMember> {
        let (group_index, member_index) =
            self.locate(id).ok_or(ChartError::UnknownSeries(id.0))?;
        Ok(&self.groups[group_index].members[member_index])
    }

    pub fn set_visible(&mut self, id: SeriesId, visible: bool) -> ChartResult<()> {
        self.member_mut(id)?.visible = visible;
        Ok(())
    }

    pub fn set_data(&mut self, id: SeriesId, data: PointSeries) -> ChartResult<()> {
        self.member_mut(id)?.data = data;
        Ok(())
    }

    /// Installs the resampled series for the current render pass.
    pub fn set_pass_snapshot(&mut self, id: SeriesId, snapshot: PointSeries) -> ChartResult<()> {
        self.member_mut(id)?.snapshot = Some(snapshot);
        Ok(())
    }

    /// Stacked top/bottom of `id` at `index`.
    ///
    /// Values of visible members below `id` (registration order) with the
    /// same sign accumulate onto its zero line. In 100% groups both bounds are
    /// rescaled by `100 / (total_positive - total_negative)` over all visible
    /// members. Hidden series and `NaN` samples yield `NaN` bounds.
    pub fn accumulate_at(
        &self,
        id: SeriesId,
        index: usize,
        use_pass_snapshot: bool,
    ) -> ChartResult<StackedBounds> {
        let (group, member) = self.resolve(id)?;
        Ok(group.accumulate(member, index, use_pass_snapshot))
    }

    /// Share of the group's absolute total held by `id` at `index`, in percent.
    pub fn percentage_at(
        &self,
        id: SeriesId,
        index: usize,
        use_pass_snapshot: bool,
    ) -> ChartResult<f64> {
        let (group, member) = self.resolve(id)?;
        let (total_positive, total_negative) = group.totals(index, use_pass_snapshot);
        let value = member.values(use_pass_snapshot).y_clamped(index);
        Ok(value * 100.0 / (total_positive - total_negative))
    }

    /// Adds the stacked percentage to a hit on `id`.
    pub fn annotate_hit(
        &self,
        id: SeriesId,
        result: &mut HitTestResult,
        use_pass_snapshot: bool,
    ) -> ChartResult<()> {
        let Some(index) = result.index else {
            return Ok(());
        };
        result.detail = HitTestDetail::Stacked {
            percentage: self.percentage_at(id, index, use_pass_snapshot)?,
        };
        Ok(())
    }

    /// Range covering the zero line and every stacked top in `window`.
    ///
    /// The window is clipped to the member's sample count.
    pub fn calculate_y_range(
        &self,
        id: SeriesId,
        window: Range<usize>,
        use_pass_snapshot: bool,
    ) -> ChartResult<DataRange> {
        let (group, member) = self.resolve(id)?;
        let end = window.end.min(member.values(use_pass_snapshot).count());
        let window = window.start.min(end)..end;
        let baseline = DataRange::point(member.zero_line_y);

        #[cfg(feature = "parallel-projection")]
        let range = window
            .into_par_iter()
            .map(|index| group.accumulate(member, index, use_pass_snapshot).top)
            .fold(|| baseline, DataRange::union_value)
            .reduce(|| baseline, DataRange::union);

        #[cfg(not(feature = "parallel-projection"))]
        let range = window
            .map(|index| group.accumulate(member, index, use_pass_snapshot).top)
            .fold(baseline, DataRange::union_value);

        Ok(range)
    }

    /// Closed fill polygon for `id`: tops left-to-right, bottoms right-to-left.
    ///
    /// Gap samples are skipped. Returns an empty polygon when nothing is drawable.
    pub fn stacked_polygon(
        &self,
        id: SeriesId,
        mapper: PointMapper<'_>,
        use_pass_snapshot: bool,
    ) -> ChartResult<Vec<PixelPoint>> {
        let (group, member) = self.resolve(id)?;
        let values = member.values(use_pass_snapshot);
        let mut tops = Vec::with_capacity(values.count());
        let mut bottoms = Vec::with_capacity(values.count());
        for index in 0..values.count() {
            let bounds = group.accumulate(member, index, use_pass_snapshot);
            let x = values.x(index);
            if x.is_nan() || bounds.top.is_nan() || bounds.bottom.is_nan() {
                continue;
            }
            tops.push(mapper.to_pixel(x, bounds.top));
            bottoms.push(mapper.to_pixel(x, bounds.bottom));
        }

        let mut polygon = tops;
        polygon.extend(bottoms.into_iter().rev());
        if let Some(first) = polygon.first().copied() {
            polygon.push(first);
        }
        Ok(polygon)
    }

    /// Records that `id` wants to draw this pass.
    ///
    /// The group draws once, when the request count equals its number of
    /// visible members, and the count then resets. Membership or visibility
    /// changes between requests are not reconciled: the count can skip past
    /// the new visible total and suppress the group draw.
    pub fn request_draw(&mut self, id: SeriesId) -> ChartResult<DrawReadiness> {
        let (group_index, _) = self.locate(id).ok_or(ChartError::UnknownSeries(id.0))?;
        let (group_id, group) = self
            .groups
            .get_index_mut(group_index)
            .ok_or(ChartError::UnknownSeries(id.0))?;

        group.pending_draws += 1;
        let expected = group.visible().count();
        trace!(
            group = %group_id,
            requested = group.pending_draws,
            expected,
            "stacked draw requested"
        );
        if group.pending_draws == expected {
            group.pending_draws = 0;
            let members: Vec<SeriesId> = group.visible().map(|m| m.id).collect();
            debug!(group = %group_id, members = members.len(), "stacked group ready to draw");
            return Ok(DrawReadiness::Ready { members });
        }
        Ok(DrawReadiness::Pending {
            requested: group.pending_draws,
            expected,
        })
    }

    /// Draw requests counted so far for `group_id` in the current pass.
    #[must_use]
    pub fn pending_draws(&self, group_id: &str) -> usize {
        self.groups.get(group_id).map_or(0, |group| group.pending_draws)
    }

    fn locate(&self, id: SeriesId) -> Option<(usize, usize)> {
        self.groups
            .values()
            .enumerate()
            .find_map(|(group_index, group)| {
                group
                    .members
                    .iter()
                    .position(|m| m.id == id)
                    .map(|member_index| (group_index, member_index))
            })
    }

    fn resolve(&self, id: SeriesId) -> ChartResult<(&StackedGroup, &StackedMember)> {
        let (group_index, member_index) =
            self.locate(id).ok_or(ChartError::UnknownSeries(id.0))?;
        let group = &self.groups[group_index];
        Ok((group, &group.members[member_index]))
    }

    fn member_mut(&mut self, id: SeriesId) -> ChartResult<&mut StackedMember> {
        let (group_index, member_index) =
            self.locate(id).ok_or(ChartError::UnknownSeries(id.0))?;
        Ok(&mut self.groups[group_index].members[member_index])
    }
}
