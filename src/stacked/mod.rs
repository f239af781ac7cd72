//! Stacked groups: running positive/negative sums per sample, optional 100%
//! normalization, and the once-per-group draw coordination.

mod accumulator;
mod member;

pub use accumulator::{DrawReadiness, StackedAccumulator, StackedBounds};
pub use member::{SeriesId, StackedMember};
