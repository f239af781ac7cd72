use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::core::PixelPoint;
use crate::error::{ChartError, ChartResult};

/// Parametric tolerance used when deciding whether two segments are parallel.
const PARALLEL_EPSILON: f64 = 1e-12;

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Fraction of `value` between `start` and `end`, clamped to `[0, 1]`.
///
/// A zero-length span yields `0.0` so callers snap to the left sample.
#[must_use]
pub fn clamped_fraction(start: f64, end: f64, value: f64) -> f64 {
    let span = end - start;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let fraction = (value - start) / span;
    if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

#[must_use]
pub fn lerp(start: f64, end: f64, fraction: f64) -> f64 {
    start + (end - start) * fraction
}

/// Shortest distance from `point` to the closed segment `start..end`.
#[must_use]
pub fn distance_to_segment(point: PixelPoint, start: PixelPoint, end: PixelPoint) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;
    if length_sq == 0.0 {
        return point.distance_to(start);
    }
    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
    point.distance_to(PixelPoint::new(start.x + t * dx, start.y + t * dy))
}

/// Intersection of segments `a0..a1` and `b0..b1`.
///
/// Touching at the shared start (`t == 0`) is not reported, so a crossover
/// that lands exactly on a sample closes the span ending there and is not
/// found again by the span starting there. Parallel and collinear segments
/// never intersect.
#[must_use]
pub fn segment_intersection(
    a0: PixelPoint,
    a1: PixelPoint,
    b0: PixelPoint,
    b1: PixelPoint,
) -> Option<PixelPoint> {
    let r = PixelPoint::new(a1.x - a0.x, a1.y - a0.y);
    let s = PixelPoint::new(b1.x - b0.x, b1.y - b0.y);
    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() <= PARALLEL_EPSILON || !denom.is_finite() {
        return None;
    }

    let qp = PixelPoint::new(b0.x - a0.x, b0.y - a0.y);
    let t = (qp.x * s.y - qp.y * s.x) / denom;
    let u = (qp.x * r.y - qp.y * r.x) / denom;
    if t <= 0.0 || t > 1.0 || !(0.0..=1.0).contains(&u) {
        return None;
    }

    Some(PixelPoint::new(a0.x + t * r.x, a0.y + t * r.y))
}
