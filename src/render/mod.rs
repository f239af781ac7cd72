mod column;
mod primitives;
mod recording_sink;
mod resource_cache;
mod sample_iterator;
mod sink;

pub use column::{ColumnBar, ColumnProjector};
pub use primitives::{Color, PathCommand};
pub use recording_sink::{RecordedPath, RecordingPathContext, RecordingSink};
pub use resource_cache::{BackendId, ResourceCache, ResourceCacheStats};
pub use sample_iterator::{LineOptions, PaletteProvider, SampleIterator};
pub use sink::{PathContext, PathDrawingSink, drive_path_commands};
