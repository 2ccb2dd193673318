//! Webscope - Debugging Instrumentation for Embedded Web Views
//!
//! This crate attaches devtools-style instrumentation to an embedded web view:
//! console log capture, lifecycle event tracing, DOM snapshots, and web
//! storage inspection, all behind two narrow seams to the host's browser
//! engine binding.
//!
//! # Features
//!
//! - **Console Capture**: Page-side intercept of the five console severities,
//!   forwarded to a bounded in-memory log
//! - **Event Capture**: Decorator proxies over the engine's navigation, UI,
//!   and script-message callback interfaces: record, then forward
//! - **Bounded Stores**: Capacity-limited, insertion-ordered logs with
//!   amortized batch eviction and a pause/resume holding buffer
//! - **Filtering**: Live-recomputed search and category projection with
//!   per-kind counts and plain-text export
//! - **DOM Inspection**: Point-in-time element tree snapshots
//! - **Storage Inspection**: localStorage, sessionStorage, and cookies
//! - **Best-Effort Semantics**: a torn-down view or a failed script yields
//!   "no data", never an error across the capture boundary
//!
//! # Architecture
//!
//! ```text
//! Page (JS) ──▶ Console Intercept ─┐
//!                                  │ {method, args}
//! Engine Callbacks ──▶ Proxies ────┤
//!   (navigation / UI / messages)   ▼
//!                            ┌──────────────┐
//!                            │  Normalizer  │  raw call → Event
//!                            └──────┬───────┘
//!                                   ▼
//!                            ┌──────────────┐
//!                            │ BoundedLog   │  capacity + batch eviction
//!                            │ (pausable)   │
//!                            └──────┬───────┘
//!                                   ▼
//!                            ┌──────────────┐
//!                            │ EventsView   │──▶ filtered / counts / export
//!                            │ (filtering)  │──▶ broadcast updates
//!                            └──────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use webscope::event::{Event, EventKind};
//! use webscope::view::EventsView;
//!
//! let mut view = EventsView::with_capacity(1000);
//! view.append(Event::new(EventKind::Navigation, "didFinishNavigation", vec![]));
//!
//! view.set_search_text("finish");
//! assert_eq!(view.filtered().len(), 1);
//! println!("{}", view.export_text());
//! ```
//!
//! # Attaching to a Web View
//!
//! The host composes a [`WebViewDebugger`] explicitly; the debugger never
//! attaches itself invisibly to a view:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use webscope::{DebuggerConfig, ScriptEvaluator, WebViewDebugger};
//!
//! # fn engine_binding() -> Arc<dyn ScriptEvaluator> { unimplemented!() }
//! # #[tokio::main] async fn main() {
//! let engine: Arc<dyn ScriptEvaluator> = engine_binding();
//! let mut debugger = WebViewDebugger::new(&engine, DebuggerConfig::default());
//!
//! // 1. Install the instrumentation scripts before page load.
//! for script in debugger.user_scripts() { /* webview.add_user_script(script) */ }
//!
//! // 2. Install the proxies as the view's delegates.
//! let navigation = debugger.wrap_navigation_delegate(None).unwrap();
//!
//! // 3. Route posted messages into the debugger.
//! // debugger.handle_script_message(&message);
//!
//! // 4. Inspect on demand.
//! let dom = debugger.fetch_dom_tree().await;
//! let storage = debugger.fetch_web_storage().await;
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod console;
pub mod debugger;
pub mod dom;
pub mod engine;
pub mod error;
pub mod event;
pub mod inject;
pub mod metrics;
pub mod proxy;
pub mod storage;
pub mod store;
pub mod telemetry;
pub mod view;

// Re-exports for convenience
pub use config::DebuggerConfig;
pub use console::{ConsoleLevel, ConsoleLog, ConsoleMessage, SharedConsoleLog};
pub use debugger::WebViewDebugger;
pub use dom::DomNode;
pub use engine::{ScriptEvaluator, ScriptMessage};
pub use error::{DebuggerError, Result};
pub use event::{DetailValue, Event, EventKind};
pub use inject::{InjectedScript, InjectionTime, CONSOLE_HANDLER_NAME};
pub use metrics::{InstrumentationMetrics, MetricsSnapshot, METRICS};
pub use proxy::{
    NavigationDelegate, NavigationDelegateProxy, NavigationPolicy, PermissionDecision,
    ScriptMessageHandler, ScriptMessageProxy, UiDelegate, UiDelegateProxy,
};
pub use storage::{WebStorageItem, WebStorageKind};
pub use store::{BoundedLog, EventStore, StoreStats};
pub use telemetry::{init_tracing, init_tracing_with_format, LogFormat};
pub use view::{EventsView, SharedEventsView, ViewUpdate};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
