use serde::{Deserialize, Serialize};

use crate::core::PixelPoint;
use crate::error::{ChartError, ChartResult};
use crate::hit_test::{DEFAULT_HIT_TEST_RADIUS_PX, HitTestEngine, HitTestResult, SearchMode};
use crate::render::{ColumnProjector, LineOptions};

pub const GEOMETRY_CONFIG_JSON_SCHEMA_V1: u32 = 1;

/// Pointer query settings shared by line and body hit tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitTestConfig {
    #[serde(default = "default_radius_px")]
    pub radius_px: f64,
    #[serde(default)]
    pub interpolate: bool,
    #[serde(default = "default_use_y_for_distance")]
    pub use_y_for_distance: bool,
    #[serde(default = "default_stroke_thickness_px")]
    pub stroke_thickness_px: f64,
    #[serde(default)]
    pub search_mode: SearchMode,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self {
            radius_px: default_radius_px(),
            interpolate: false,
            use_y_for_distance: default_use_y_for_distance(),
            stroke_thickness_px: default_stroke_thickness_px(),
            search_mode: SearchMode::default(),
        }
    }
}

impl HitTestConfig {
    /// Runs [`HitTestEngine::hit_test`] with these settings.
    pub fn run(
        &self,
        engine: HitTestEngine<'_>,
        raw_point: PixelPoint,
    ) -> ChartResult<HitTestResult> {
        engine
            .with_y_distance(self.use_y_for_distance)
            .hit_test(raw_point, self.radius_px, self.search_mode, self.interpolate)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnConfig {
    #[serde(default = "default_data_point_width")]
    pub data_point_width: f64,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            data_point_width: default_data_point_width(),
        }
    }
}

impl ColumnConfig {
    pub fn projector(&self) -> ChartResult<ColumnProjector> {
        ColumnProjector::new(self.data_point_width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BubbleConfig {
    #[serde(default = "default_z_scale_factor")]
    pub z_scale_factor: f64,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            z_scale_factor: default_z_scale_factor(),
        }
    }
}

/// Host-facing settings for the geometry core.
///
/// Serializable so hosts can persist series setup; every field falls back to
/// its default when missing from the input.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryConfig {
    #[serde(default)]
    pub hit_test: HitTestConfig,
    #[serde(default)]
    pub line: LineOptions,
    #[serde(default)]
    pub column: ColumnConfig,
    #[serde(default)]
    pub bubble: BubbleConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryConfigJsonContractV1 {
    pub schema_version: u32,
    pub config: GeometryConfig,
}

impl GeometryConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hit_test(mut self, hit_test: HitTestConfig) -> Self {
        self.hit_test = hit_test;
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: LineOptions) -> Self {
        self.line = line;
        self
    }

    #[must_use]
    pub fn with_data_point_width(mut self, data_point_width: f64) -> Self {
        self.column.data_point_width = data_point_width;
        self
    }

    #[must_use]
    pub fn with_z_scale_factor(mut self, z_scale_factor: f64) -> Self {
        self.bubble.z_scale_factor = z_scale_factor;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        let radius = self.hit_test.radius_px;
        if radius.is_nan() || radius < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "hit test radius must be >= 0, got {radius}"
            )));
        }
        let stroke = self.hit_test.stroke_thickness_px;
        if !stroke.is_finite() || stroke < 0.0 {
            return Err(ChartError::InvalidData(format!(
                "stroke thickness must be finite and >= 0, got {stroke}"
            )));
        }
        let width = self.column.data_point_width;
        if !(width > 0.0 && width <= 1.0) {
            return Err(ChartError::InvalidData(format!(
                "data point width must be in (0, 1], got {width}"
            )));
        }
        let factor = self.bubble.z_scale_factor;
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "z scale factor must be finite and > 0, got {factor}"
            )));
        }
        Ok(())
    }

    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        self.validate()?;
        let payload = GeometryConfigJsonContractV1 {
            schema_version: GEOMETRY_CONFIG_JSON_SCHEMA_V1,
            config: *self,
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize geometry config contract v1: {e}"))
        })
    }

    /// Accepts either a bare config or the versioned contract envelope.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse geometry config json: {e}"))
        })?;
        let config = if value.get("schema_version").is_some() {
            let payload: GeometryConfigJsonContractV1 =
                serde_json::from_value(value).map_err(|e| {
                    ChartError::InvalidData(format!("failed to parse geometry config payload: {e}"))
                })?;
            if payload.schema_version != GEOMETRY_CONFIG_JSON_SCHEMA_V1 {
                return Err(ChartError::InvalidData(format!(
                    "unsupported geometry config schema version: {}",
                    payload.schema_version
                )));
            }
            payload.config
        } else {
            serde_json::from_value::<Self>(value).map_err(|e| {
                ChartError::InvalidData(format!("failed to parse geometry config: {e}"))
            })?
        };
        config.validate()?;
        Ok(config)
    }
}

fn default_radius_px() -> f64 {
    DEFAULT_HIT_TEST_RADIUS_PX
}

fn default_use_y_for_distance() -> bool {
    true
}

fn default_stroke_thickness_px() -> f64 {
    1.0
}

fn default_data_point_width() -> f64 {
    0.8
}

fn default_z_scale_factor() -> f64 {
    1.0
}
