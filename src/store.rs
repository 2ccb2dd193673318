//! Bounded, insertion-ordered event storage
//!
//! [`BoundedLog`] is the shared design for every capture history in this
//! crate: an append-only sequence with a fixed capacity and amortized batch
//! eviction. When a push leaves the log over capacity, the oldest chunk is
//! dropped in one batch rather than trimming one item per append.
//!
//! [`EventStore`] layers the recording/paused state machine on top: while
//! paused, appends divert into a holding buffer that is flushed back into the
//! log (in arrival order, honoring the capacity bound) on resume. Subscribers
//! receive recorded events over a broadcast channel; events sent while nobody
//! is subscribed are simply not delivered.
//!
//! # Example
//!
//! ```rust
//! use webscope::event::{Event, EventKind};
//! use webscope::store::EventStore;
//!
//! let mut store = EventStore::with_capacity(1000);
//! store.append(Event::new(EventKind::Navigation, "didCommitNavigation", vec![]));
//! assert_eq!(store.len(), 1);
//!
//! store.toggle_pause();
//! store.append(Event::new(EventKind::Navigation, "didFinishNavigation", vec![]));
//! assert_eq!(store.len(), 1); // held, not recorded
//!
//! store.toggle_pause();
//! assert_eq!(store.len(), 2); // flushed on resume
//! ```

use std::collections::VecDeque;

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::event::Event;

/// Default capacity of a bounded log
pub const DEFAULT_CAPACITY: usize = 1000;

/// Default number of oldest items dropped per eviction batch
pub const DEFAULT_EVICT_CHUNK: usize = 100;

/// Capacity of the broadcast channel behind [`EventStore::subscribe`]
const FEED_CHANNEL_CAPACITY: usize = 256;

/// Append-only sequence with a fixed capacity and batch eviction
///
/// Insertion order is preserved; eviction always removes from the front.
/// After `push` returns, `len() <= capacity()` holds.
#[derive(Debug)]
pub struct BoundedLog<T> {
    items: VecDeque<T>,
    capacity: usize,
    evict_chunk: usize,
    total_pushed: u64,
    total_evicted: u64,
}

impl<T> BoundedLog<T> {
    /// Create a log with the given capacity and eviction batch size
    ///
    /// The batch size is clamped to the capacity so a single eviction can
    /// never empty a log below one surviving item per overflowing push.
    pub fn new(capacity: usize, evict_chunk: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity.min(4096)),
            capacity,
            evict_chunk: evict_chunk.clamp(1, capacity),
            total_pushed: 0,
            total_evicted: 0,
        }
    }

    /// Create a log with the given capacity and the default eviction batch
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, DEFAULT_EVICT_CHUNK)
    }

    /// Append an item, evicting the oldest batch if the bound is exceeded
    ///
    /// Returns the number of items evicted by this push (zero or the batch
    /// size).
    pub fn push(&mut self, item: T) -> usize {
        self.items.push_back(item);
        self.total_pushed += 1;

        if self.items.len() <= self.capacity {
            return 0;
        }

        let overflow = self.items.len() - self.capacity;
        let evicted = self.evict_chunk.max(overflow).min(self.items.len());
        self.items.drain(..evicted);
        self.total_evicted += evicted as u64;
        evicted
    }

    /// Number of items currently retained
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the log holds no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The capacity bound
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate the retained items in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Drop every retained item
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total items ever pushed
    pub fn total_pushed(&self) -> u64 {
        self.total_pushed
    }

    /// Total items ever evicted by the capacity bound
    pub fn total_evicted(&self) -> u64 {
        self.total_evicted
    }
}

impl<T: Clone> BoundedLog<T> {
    /// Clone the retained items into a `Vec`, oldest first
    pub fn snapshot(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

/// Outcome of an [`EventStore::append`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The event was recorded into the main sequence
    Recorded,
    /// The store is paused; the event was diverted into the holding buffer
    Buffered,
}

/// Point-in-time counters for an [`EventStore`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    /// Events currently retained in the main sequence
    pub count: usize,
    /// Capacity bound of the main sequence
    pub capacity: usize,
    /// Events currently held in the pause buffer
    pub buffered: usize,
    /// Events ever pushed into the main sequence
    pub total_recorded: u64,
    /// Events ever dropped by the capacity bound
    pub total_evicted: u64,
}

/// Capacity-bounded, pausable store of normalized events
///
/// All mutation goes through `&mut self`; shared use wraps the store in
/// `Arc<RwLock<…>>` so producers on the engine's callback thread serialize
/// against readers. State changes are visible to readers as soon as the
/// mutating call returns.
#[derive(Debug)]
pub struct EventStore {
    log: BoundedLog<Event>,
    pending: Vec<Event>,
    paused: bool,
    events_tx: broadcast::Sender<Event>,
}

impl EventStore {
    /// Create a store with the given capacity and the default eviction batch
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(capacity, DEFAULT_EVICT_CHUNK)
    }

    /// Create a store with explicit capacity and eviction batch size
    pub fn new(capacity: usize, evict_chunk: usize) -> Self {
        let (events_tx, _) = broadcast::channel(FEED_CHANNEL_CAPACITY);
        Self {
            log: BoundedLog::new(capacity, evict_chunk),
            pending: Vec::new(),
            paused: false,
            events_tx,
        }
    }

    /// Append a normalized event
    ///
    /// While recording, the event lands in the main sequence (evicting the
    /// oldest batch when the bound is exceeded) and is published to
    /// subscribers before this call returns. While paused, the event is
    /// diverted into the holding buffer instead.
    pub fn append(&mut self, event: Event) -> AppendOutcome {
        if self.paused {
            self.pending.push(event);
            return AppendOutcome::Buffered;
        }
        self.record(event);
        AppendOutcome::Recorded
    }

    fn record(&mut self, event: Event) {
        let _ = self.events_tx.send(event.clone());
        let evicted = self.log.push(event);
        if evicted > 0 {
            debug!(evicted, retained = self.log.len(), "evicted oldest events");
        }
    }

    /// Toggle between recording and paused; returns the new paused state
    ///
    /// Resuming flushes the holding buffer into the main sequence in arrival
    /// order, subject to the same eviction policy as direct appends.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;

        if !self.paused && !self.pending.is_empty() {
            let held = std::mem::take(&mut self.pending);
            debug!(flushed = held.len(), "resuming event capture");
            for event in held {
                self.record(event);
            }
        }

        self.paused
    }

    /// Drop every retained event, including the pause holding buffer
    pub fn clear(&mut self) {
        self.log.clear();
        self.pending.clear();
    }

    /// Iterate the recorded events in insertion order
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.log.iter()
    }

    /// Clone the recorded events, oldest first
    pub fn snapshot(&self) -> Vec<Event> {
        self.log.snapshot()
    }

    /// Number of recorded events (the holding buffer does not count)
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether no events are recorded
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Whether appends are currently being diverted
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Subscribe to events as they are recorded
    ///
    /// Buffered events are delivered when the store resumes, in arrival
    /// order. Subscribers that fall behind miss events.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events_tx.subscribe()
    }

    /// Current counters
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            count: self.log.len(),
            capacity: self.log.capacity(),
            buffered: self.pending.len(),
            total_recorded: self.log.total_pushed(),
            total_evicted: self.log.total_evicted(),
        }
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}
