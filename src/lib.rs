//! series-geometry: backend-independent geometry for chart series.
//!
//! The crate turns point series into drawable geometry and answers pointer
//! queries against them:
//! - [`render::SampleIterator`] walks samples into gap-aware path commands
//!   for any [`render::PathDrawingSink`] backend.
//! - [`hit_test::HitTestEngine`] finds, snaps and interpolates the sample
//!   under the pointer; [`hit_test::hit_test_body`] covers bars, candles,
//!   box plots, error bars and bubbles.
//! - [`band::BandPolygonBuilder`] splits the region between two lines into
//!   fill polygons at crossovers and gaps.
//! - [`stacked::StackedAccumulator`] stacks series per sample, optionally
//!   normalized to 100%, and coordinates a single draw per group.
//!
//! Axis mapping is pluggable through [`core::CoordinateCalculator`].

pub mod api;
pub mod band;
pub mod core;
pub mod error;
pub mod hit_test;
pub mod render;
pub mod stacked;
pub mod telemetry;

pub use api::GeometryConfig;
pub use error::{ChartError, ChartResult};
