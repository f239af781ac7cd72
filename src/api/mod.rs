mod config;
mod invalidation;

pub use config::{
    BubbleConfig, ColumnConfig, GEOMETRY_CONFIG_JSON_SCHEMA_V1, GeometryConfig,
    GeometryConfigJsonContractV1, HitTestConfig,
};
pub use invalidation::{InvalidationTopic, InvalidationTopics, InvalidationTracker, ObserverId};
