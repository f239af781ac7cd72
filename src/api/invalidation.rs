use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// What changed since the host last redrew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidationTopic {
    /// Point series contents (append, replace, resample).
    Data,
    /// Axis ranges or sizes; every cached coordinate is stale.
    Axis,
    /// Stroke, fill, palette or widths; cached backend resources are stale.
    Style,
    Visibility,
    /// Stacked group membership or 100% mode.
    Stacking,
}

impl InvalidationTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Data => 1 << 0,
            Self::Axis => 1 << 1,
            Self::Style => 1 << 2,
            Self::Visibility => 1 << 3,
            Self::Stacking => 1 << 4,
        }
    }
}

/// Bitmask of invalidation topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationTopics {
    bits: u8,
}

impl InvalidationTopics {
    const ALL_BITS: u8 = InvalidationTopic::Data.bit()
        | InvalidationTopic::Axis.bit()
        | InvalidationTopic::Style.bit()
        | InvalidationTopic::Visibility.bit()
        | InvalidationTopic::Stacking.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: InvalidationTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        (self.bits & other.bits) != 0
    }

    #[must_use]
    pub const fn contains_topic(self, topic: InvalidationTopic) -> bool {
        self.intersects(Self::from_topic(topic))
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// Handle returned by [`InvalidationTracker::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer = Box<dyn FnMut(InvalidationTopics) + Send>;

/// Accumulates dirty topics between host redraws.
///
/// Observers are called synchronously on every `invalidate` with the topics
/// of that call only; the host later drains the merged set with
/// [`take_pending`](Self::take_pending).
#[derive(Default)]
pub struct InvalidationTracker {
    pending: InvalidationTopics,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl std::fmt::Debug for InvalidationTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationTracker")
            .field("pending", &self.pending)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl InvalidationTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(InvalidationTopics) + Send + 'static,
    ) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        before != self.observers.len()
    }

    pub fn invalidate(&mut self, topics: InvalidationTopics) {
        if topics.is_none() {
            return;
        }
        self.pending = self.pending.union(topics);
        trace!(?topics, observers = self.observers.len(), "invalidate");
        for (_, observer) in &mut self.observers {
            observer(topics);
        }
    }

    pub fn invalidate_topic(&mut self, topic: InvalidationTopic) {
        self.invalidate(InvalidationTopics::from_topic(topic));
    }

    #[must_use]
    pub fn pending(&self) -> InvalidationTopics {
        self.pending
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_none()
    }

    /// Returns and clears the merged pending topics.
    pub fn take_pending(&mut self) -> InvalidationTopics {
        let pending = std::mem::take(&mut self.pending);
        if !pending.is_none() {
            debug!(?pending, "drained pending invalidation");
        }
        pending
    }
}
