//! Live filtered projection over the event store
//!
//! [`EventsView`] owns an [`EventStore`] and derives a filtered projection
//! from it: a case-insensitive substring search over label, description, and
//! kind name, conjoined with a kind-selection set. The projection and the
//! per-kind counts are recomputed synchronously inside every mutating call
//! (append, flush, clear, or filter change), so readers never observe a stale
//! view.
//!
//! Presentation layers subscribe to typed [`ViewUpdate`] notifications;
//! sending is synchronous and events are dropped when nobody listens.
//!
//! # Example
//!
//! ```rust
//! use webscope::event::{Event, EventKind};
//! use webscope::view::EventsView;
//!
//! let mut view = EventsView::default();
//! view.append(Event::new(EventKind::Navigation, "didFinishNavigation", vec![]));
//! view.append(Event::new(EventKind::ScriptMessage, "checkout", vec![]));
//!
//! view.set_search_text("checkout");
//! assert_eq!(view.filtered().len(), 1);
//! assert_eq!(view.filtered()[0].kind, EventKind::ScriptMessage);
//! ```

use std::collections::{BTreeMap, HashSet};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::instrument;

use crate::event::{Event, EventKind};
use crate::store::{AppendOutcome, EventStore, StoreStats};

/// Capacity of the broadcast channel behind [`EventsView::subscribe`]
const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Width of the separator rule in the export header
const EXPORT_RULE_WIDTH: usize = 80;

/// Notification of a change to the view's observable state
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ViewUpdate {
    /// An event was recorded into the main sequence
    #[serde(rename = "event_appended")]
    EventAppended(Event),
    /// The store and the pause buffer were emptied
    #[serde(rename = "cleared")]
    Cleared,
    /// Search text or kind selection changed
    #[serde(rename = "filter_changed")]
    FilterChanged {
        /// Number of events matching the new filter
        matching: usize,
    },
    /// The pause state flipped
    #[serde(rename = "paused")]
    Paused(bool),
}

/// Filterable, live-updating view model over an [`EventStore`]
#[derive(Debug)]
pub struct EventsView {
    store: EventStore,
    search_text: String,
    selected_kinds: HashSet<EventKind>,
    filtered: Vec<Event>,
    counts: BTreeMap<&'static str, usize>,
    update_tx: broadcast::Sender<ViewUpdate>,
}

impl EventsView {
    /// Create a view over a store with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self::over(EventStore::with_capacity(capacity))
    }

    /// Create a view over an existing store
    pub fn over(store: EventStore) -> Self {
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let mut view = Self {
            store,
            search_text: String::new(),
            selected_kinds: EventKind::ALL.into_iter().collect(),
            filtered: Vec::new(),
            counts: BTreeMap::new(),
            update_tx,
        };
        view.refresh();
        view
    }

    /// Append a normalized event and refresh the projection
    #[instrument(skip(self, event), fields(kind = %event.kind, label = %event.label))]
    pub fn append(&mut self, event: Event) -> AppendOutcome {
        let notify = event.clone();
        let outcome = self.store.append(event);
        if outcome == AppendOutcome::Recorded {
            self.refresh();
            let _ = self.update_tx.send(ViewUpdate::EventAppended(notify));
        }
        outcome
    }

    /// Replace the search text and recompute the projection before returning
    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.refresh();
        let _ = self.update_tx.send(ViewUpdate::FilterChanged {
            matching: self.filtered.len(),
        });
    }

    /// Toggle one kind in the selection set
    ///
    /// Once toggled, the selection is a genuine subset; there is no implicit
    /// "all" sentinel. Toggling every kind off yields an empty projection
    /// regardless of search text.
    pub fn toggle_kind(&mut self, kind: EventKind) {
        if !self.selected_kinds.remove(&kind) {
            self.selected_kinds.insert(kind);
        }
        self.refresh();
        let _ = self.update_tx.send(ViewUpdate::FilterChanged {
            matching: self.filtered.len(),
        });
    }

    /// Toggle between recording and paused; returns the new paused state
    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.store.toggle_pause();
        if !paused {
            self.refresh();
        }
        let _ = self.update_tx.send(ViewUpdate::Paused(paused));
        paused
    }

    /// Drop every event, including the pause holding buffer
    pub fn clear(&mut self) {
        self.store.clear();
        self.refresh();
        let _ = self.update_tx.send(ViewUpdate::Cleared);
    }

    /// The current filtered projection, oldest first
    pub fn filtered(&self) -> &[Event] {
        &self.filtered
    }

    /// Unfiltered per-kind counts over every known kind (zeroes included)
    pub fn counts_by_kind(&self) -> &BTreeMap<&'static str, usize> {
        &self.counts
    }

    /// The current search text
    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Whether a kind is currently selected
    pub fn is_kind_selected(&self, kind: EventKind) -> bool {
        self.selected_kinds.contains(&kind)
    }

    /// Whether appends are currently being diverted
    pub fn is_paused(&self) -> bool {
        self.store.is_paused()
    }

    /// Read-only access to the underlying store
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Counters of the underlying store
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    /// Subscribe to view updates
    pub fn subscribe(&self) -> broadcast::Receiver<ViewUpdate> {
        self.update_tx.subscribe()
    }

    /// Render the filtered projection as a plain-text report
    ///
    /// Line-oriented and human-readable; not intended for round-trip parsing.
    /// One `[timestamp]` line per filtered event, description lines indented
    /// beneath it, blank line between events.
    pub fn export_text(&self) -> String {
        let mut output = String::new();
        output.push_str("WebView Events Export\n");
        output.push_str(&format!(
            "Generated: {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        output.push_str(&format!("Total Events: {}\n", self.filtered.len()));
        output.push_str(&"=".repeat(EXPORT_RULE_WIDTH));
        output.push_str("\n\n");

        for event in &self.filtered {
            output.push_str(&format!(
                "[{}] {} - {}\n",
                event.formatted_timestamp(),
                event.kind,
                event.label
            ));
            if !event.raw_description.is_empty() {
                for line in event.raw_description.lines() {
                    output.push_str("  ");
                    output.push_str(line);
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        output
    }

    fn refresh(&mut self) {
        let search = self.search_text.to_lowercase();
        let filtered: Vec<Event> = self
            .store
            .events()
            .filter(|event| self.matches(event, &search))
            .cloned()
            .collect();
        let counts: BTreeMap<&'static str, usize> = EventKind::ALL
            .into_iter()
            .map(|kind| {
                let count = self.store.events().filter(|e| e.kind == kind).count();
                (kind.as_str(), count)
            })
            .collect();

        self.filtered = filtered;
        self.counts = counts;
    }

    fn matches(&self, event: &Event, search_lower: &str) -> bool {
        if !self.selected_kinds.contains(&event.kind) {
            return false;
        }
        if search_lower.is_empty() {
            return true;
        }
        event.label.to_lowercase().contains(search_lower)
            || event.raw_description.to_lowercase().contains(search_lower)
            || event.kind.as_str().to_lowercase().contains(search_lower)
    }
}

impl Default for EventsView {
    fn default() -> Self {
        Self::over(EventStore::default())
    }
}

/// Shared handle for producers on the engine's callback thread
pub type SharedEventsView = std::sync::Arc<std::sync::RwLock<EventsView>>;

/// Create a shared view over a store with the given capacity
pub fn shared_view(capacity: usize) -> SharedEventsView {
    std::sync::Arc::new(std::sync::RwLock::new(EventsView::with_capacity(capacity)))
}
