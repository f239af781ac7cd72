use tracing::warn;

use crate::core::PixelPoint;
use crate::render::{Color, PathCommand};

/// An open polyline on a drawing backend.
pub trait PathContext {
    fn move_to(&mut self, x: f64, y: f64);

    /// Finishes the polyline. Consumes the context so it cannot be reused.
    fn end(self);
}

/// Minimal drawing SPI consumed by path iteration.
///
/// `Pen` is the per-segment backend resource (pen or brush). It is created
/// once per path and dropped exactly once, right after that path ends.
pub trait PathDrawingSink {
    type Pen;
    type Context<'a>: PathContext
    where
        Self: 'a;

    fn create_pen(&mut self, color: Color) -> Self::Pen;

    fn begin(&mut self, pen: &Self::Pen, x: f64, y: f64) -> Self::Context<'_>;
}

/// Feeds path commands into `sink` and returns how many paths were drawn.
///
/// Stray `MoveTo`/`End` outside a path are ignored. A `Begin` inside an open
/// path ends the open one first.
pub fn drive_path_commands<S, I>(commands: I, sink: &mut S) -> usize
where
    S: PathDrawingSink,
    I: IntoIterator<Item = PathCommand>,
{
    let mut commands = commands.into_iter();
    let mut restart: Option<(Color, PixelPoint)> = None;
    let mut drawn = 0;

    loop {
        let Some((color, start)) = restart.take().or_else(|| next_begin(&mut commands)) else {
            break;
        };

        let pen = sink.create_pen(color);
        let mut context = sink.begin(&pen, start.x, start.y);
        for command in commands.by_ref() {
            match command {
                PathCommand::MoveTo(point) => context.move_to(point.x, point.y),
                PathCommand::End => break,
                PathCommand::Begin { color, point } => {
                    warn!(x = point.x, y = point.y, "path begun while another was open");
                    restart = Some((color, point));
                    break;
                }
            }
        }
        context.end();
        drop(pen);
        drawn += 1;
    }

    drawn
}

fn next_begin(commands: &mut impl Iterator<Item = PathCommand>) -> Option<(Color, PixelPoint)> {
    commands.find_map(|command| match command {
        PathCommand::Begin { color, point } => Some((color, point)),
        PathCommand::MoveTo(_) | PathCommand::End => None,
    })
}
