use tracing::trace;

/// Reusable per-renderer buffers for precalculated X/Y coordinates.
///
/// Capacity grows geometrically when a pass needs more slots and is never
/// shrunk, so steady-state frames do not allocate. Each renderer instance owns
/// its own arena.
#[derive(Debug, Default)]
pub struct CoordinateArena {
    x_coords: Vec<f64>,
    y_coords: Vec<f64>,
    len: usize,
}

impl CoordinateArena {
    const MIN_CAPACITY: usize = 16;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = Self::default();
        arena.reserve(capacity);
        arena
    }

    /// Slots available without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.x_coords.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sizes the arena for `count` samples and returns mutable views of both buffers.
    pub fn prepare(&mut self, count: usize) -> (&mut [f64], &mut [f64]) {
        self.reserve(count);
        self.len = count;
        (&mut self.x_coords[..count], &mut self.y_coords[..count])
    }

    #[must_use]
    pub fn x_coords(&self) -> &[f64] {
        &self.x_coords[..self.len]
    }

    #[must_use]
    pub fn y_coords(&self) -> &[f64] {
        &self.y_coords[..self.len]
    }

    fn reserve(&mut self, count: usize) {
        let current = self.capacity();
        if count <= current {
            return;
        }
        let mut grown = current.max(Self::MIN_CAPACITY);
        while grown < count {
            grown = grown.saturating_mul(2);
        }
        trace!(from = current, to = grown, "grow coordinate arena");
        self.x_coords.resize(grown, f64::NAN);
        self.y_coords.resize(grown, f64::NAN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_grows_geometrically_and_never_shrinks() {
        let mut arena = CoordinateArena::new();
        assert_eq!(arena.capacity(), 0);

        let (xs, ys) = arena.prepare(20);
        assert_eq!(xs.len(), 20);
        assert_eq!(ys.len(), 20);
        assert_eq!(arena.capacity(), 32);

        arena.prepare(3);
        assert_eq!(arena.len(), 3);
        assert_eq!(arena.capacity(), 32);

        arena.prepare(33);
        assert_eq!(arena.capacity(), 64);
    }

    #[test]
    fn preallocated_arena_starts_empty() {
        let arena = CoordinateArena::with_capacity(5);
        assert!(arena.is_empty());
        assert_eq!(arena.capacity(), 16);
        assert!(arena.x_coords().is_empty());
    }
}
