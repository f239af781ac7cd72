//! Pointer hit testing: nearest-sample search, interpolation and body tests.

mod body;
mod engine;
mod result;

pub use body::{
    BodyBounds, BodyHitStrategy, BoxPlotHitStrategy, BubbleHitStrategy, CandlestickHitStrategy,
    ColumnHitStrategy, ErrorBarHitStrategy, OhlcBarHitStrategy, hit_test_body,
};
pub use engine::{DEFAULT_HIT_TEST_RADIUS_PX, HitTestEngine, SearchMode};
pub use result::{HitTestDetail, HitTestResult};
