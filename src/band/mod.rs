//! Fill polygons for band series: the region between two aligned lines,
//! split wherever the lines cross or either line has a gap.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::primitives::segment_intersection;
use crate::core::{PixelPoint, PointMapper, PointSeries};
use crate::error::{ChartError, ChartResult};

/// Which of the two band brushes fills a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandFill {
    /// The first line was at or above the second.
    FirstAbove,
    /// The second line was above the first.
    SecondAbove,
}

impl BandFill {
    #[must_use]
    pub fn compare(first_y: f64, second_y: f64) -> Self {
        if first_y >= second_y {
            Self::FirstAbove
        } else {
            Self::SecondAbove
        }
    }
}

/// Closed vertex loop (first vertex == last vertex) in pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPolygon {
    pub vertices: Vec<PixelPoint>,
    pub fill: BandFill,
}

impl BandPolygon {
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.vertices.first(), self.vertices.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }
}

/// Vertices of the polygon under construction, kept in axis coordinates
/// until the polygon is closed.
#[derive(Debug, Default)]
struct OpenPolygon {
    first_line: Vec<(f64, f64)>,
    second_line: Vec<(f64, f64)>,
}

impl OpenPolygon {
    fn is_empty(&self) -> bool {
        self.first_line.is_empty() && self.second_line.is_empty()
    }

    fn push(&mut self, first: (f64, f64), second: (f64, f64)) {
        self.first_line.push(first);
        self.second_line.push(second);
    }

    /// Forward along the first line, backward along the second, then the
    /// first vertex again.
    fn close(self, mapper: &PointMapper<'_>, fill: BandFill) -> BandPolygon {
        let mut vertices = Vec::with_capacity(self.first_line.len() + self.second_line.len() + 1);
        vertices.extend(
            self.first_line
                .iter()
                .chain(self.second_line.iter().rev())
                .map(|(x, y)| mapper.pixel_from_coordinates(*x, *y)),
        );
        if let Some(first) = vertices.first().copied() {
            vertices.push(first);
        }
        BandPolygon { vertices, fill }
    }
}

/// Splits the area between two lines into fill polygons.
#[derive(Debug, Clone, Copy)]
pub struct BandPolygonBuilder<'a> {
    mapper: PointMapper<'a>,
    is_digital: bool,
}

impl<'a> BandPolygonBuilder<'a> {
    #[must_use]
    pub fn new(mapper: PointMapper<'a>) -> Self {
        Self {
            mapper,
            is_digital: false,
        }
    }

    #[must_use]
    pub fn with_digital_line(mut self, is_digital: bool) -> Self {
        self.is_digital = is_digital;
        self
    }

    /// Builds polygons for lines `first` and `second`, which must have equal length.
    ///
    /// Polygons close at every `NaN` run (no crossover vertex, fill taken at
    /// the previous valid sample) and at every crossover (fill taken at the
    /// start of the crossing segment). A trailing polygon takes its fill
    /// from the last sample.
    pub fn build(
        &self,
        first: &PointSeries,
        second: &PointSeries,
    ) -> ChartResult<Vec<BandPolygon>> {
        if first.count() != second.count() {
            return Err(ChartError::LengthMismatch {
                context: "band series lines",
                left: first.count(),
                right: second.count(),
            });
        }

        let count = first.count();
        let is_valid = |i: usize| first.is_defined(i) && second.is_defined(i);
        let coords = |series: &PointSeries, i: usize| {
            (
                self.mapper.x_coordinate(series.x(i)),
                self.mapper.y_coordinate(series.y(i)),
            )
        };
        let fill_at = |i: usize| BandFill::compare(first.y(i), second.y(i));

        let mut polygons = Vec::new();
        let Some(start) = (0..count).find(|i| is_valid(*i)) else {
            return Ok(polygons);
        };

        let mut open = OpenPolygon::default();
        open.push(coords(first, start), coords(second, start));

        let mut i = start + 1;
        while i < count {
            if !is_valid(i) {
                let finished = std::mem::take(&mut open);
                polygons.push(finished.close(&self.mapper, fill_at(i - 1)));

                let Some(next) = (i + 1..count).find(|j| is_valid(*j)) else {
                    break;
                };
                open.push(coords(first, next), coords(second, next));
                i = next + 1;
                continue;
            }

            let (a0, a1) = (coords(first, i - 1), coords(first, i));
            let (b0, b1) = (coords(second, i - 1), coords(second, i));
            let crossing = segment_intersection(
                PixelPoint::new(a0.0, a0.1),
                PixelPoint::new(a1.0, a1.1),
                PixelPoint::new(b0.0, b0.1),
                PixelPoint::new(b1.0, b1.1),
            );

            match crossing {
                Some(point) => {
                    let mut finished = std::mem::take(&mut open);
                    if self.is_digital {
                        // Both treads run at the previous values up to the riser at x[i].
                        if let Some(last) = finished.first_line.last().copied() {
                            finished.first_line.push((a1.0, last.1));
                        }
                        if let Some(last) = finished.second_line.last().copied() {
                            finished.second_line.push((b1.0, last.1));
                        }
                        polygons.push(finished.close(&self.mapper, fill_at(i - 1)));
                        open.push(a1, b1);
                    } else {
                        let vertex = (point.x, point.y);
                        finished.push(vertex, vertex);
                        polygons.push(finished.close(&self.mapper, fill_at(i - 1)));
                        open.first_line.push(vertex);
                        open.push(a1, b1);
                    }
                }
                None => {
                    if self.is_digital {
                        open.push((a1.0, a0.1), (b1.0, b0.1));
                    }
                    open.push(a1, b1);
                }
            }
            i += 1;
        }

        if !open.is_empty() && is_valid(count - 1) {
            polygons.push(open.close(&self.mapper, fill_at(count - 1)));
        }

        debug!(
            samples = count,
            polygons = polygons.len(),
            digital = self.is_digital,
            "built band polygons"
        );
        Ok(polygons)
    }
}
