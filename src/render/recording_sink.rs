use crate::core::PixelPoint;
use crate::render::{Color, PathContext, PathDrawingSink};

/// Polyline captured by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPath {
    pub color: Color,
    pub points: Vec<PixelPoint>,
}

/// Headless sink used by tests and by hosts that rasterize elsewhere.
///
/// Records every finished path in draw order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub paths: Vec<RecordedPath>,
    pub pens_created: usize,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
        self.pens_created = 0;
    }
}

/// Open path on a [`RecordingSink`].
#[derive(Debug)]
pub struct RecordingPathContext<'a> {
    sink: &'a mut RecordingSink,
    path: RecordedPath,
}

impl PathContext for RecordingPathContext<'_> {
    fn move_to(&mut self, x: f64, y: f64) {
        self.path.points.push(PixelPoint::new(x, y));
    }

    fn end(self) {
        self.sink.paths.push(self.path);
    }
}

impl PathDrawingSink for RecordingSink {
    type Pen = Color;
    type Context<'a> = RecordingPathContext<'a>;

    fn create_pen(&mut self, color: Color) -> Self::Pen {
        self.pens_created += 1;
        color
    }

    fn begin(&mut self, pen: &Self::Pen, x: f64, y: f64) -> Self::Context<'_> {
        RecordingPathContext {
            path: RecordedPath {
                color: *pen,
                points: vec![PixelPoint::new(x, y)],
            },
            sink: self,
        }
    }
}
