//! Composition-based debugger for an embedded web view
//!
//! [`WebViewDebugger`] is the root the host composes explicitly: it is handed
//! a reference to the engine's script evaluator (held weakly; the host view
//! owns the engine's lifetime), wires the console intercept and delegate
//! proxies, and exposes the captured state through shared handles.
//!
//! Everything here is best-effort instrumentation. A torn-down engine, a
//! disabled feature, or a failing snapshot script yields "no data", never an
//! error across the capture boundary. The one fallible surface is
//! [`WebViewDebugger::execute_script`], which hosts call deliberately.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use webscope::config::DebuggerConfig;
//! use webscope::debugger::WebViewDebugger;
//! use webscope::engine::ScriptEvaluator;
//!
//! # fn engine_binding() -> Arc<dyn ScriptEvaluator> { unimplemented!() }
//! let engine: Arc<dyn ScriptEvaluator> = engine_binding();
//! let mut debugger = WebViewDebugger::new(&engine, DebuggerConfig::default());
//!
//! // Install the returned scripts and proxies into the web view, then route
//! // the engine's posted messages into `debugger.handle_script_message`.
//! for script in debugger.user_scripts() {
//!     // webview.add_user_script(script) ...
//! }
//! let _navigation = debugger.wrap_navigation_delegate(None).unwrap();
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::DebuggerConfig;
use crate::console::{shared_console_log, ConsoleMessage, SharedConsoleLog};
use crate::dom::DomNode;
use crate::engine::{ScriptEvaluator, ScriptMessage};
use crate::error::{DebuggerError, Result};
use crate::inject::{
    console_capture_script, InjectedScript, COOKIE_SCRIPT, CONSOLE_HANDLER_NAME,
    DOM_SNAPSHOT_SCRIPT, LOCAL_STORAGE_SCRIPT, SESSION_STORAGE_SCRIPT,
};
use crate::metrics::METRICS;
use crate::proxy::{
    NavigationDelegate, NavigationDelegateProxy, ScriptMessageHandler, ScriptMessageProxy,
    UiDelegate, UiDelegateProxy,
};
use crate::storage::{parse_cookie_string, parse_entries, WebStorageItem, WebStorageKind};
use crate::view::{shared_view, SharedEventsView};

/// Debugger attached to one web view
pub struct WebViewDebugger {
    engine: Weak<dyn ScriptEvaluator>,
    config: DebuggerConfig,
    console: SharedConsoleLog,
    events: SharedEventsView,
    script_proxies: HashMap<String, ScriptMessageProxy>,
    navigation_wrapped: bool,
    ui_wrapped: bool,
}

impl WebViewDebugger {
    /// Create a debugger over the given engine binding
    ///
    /// The engine is held weakly; the host view keeps it alive. Once the host
    /// drops it, every fetch operation returns "no data".
    pub fn new(engine: &Arc<dyn ScriptEvaluator>, config: DebuggerConfig) -> Self {
        Self {
            engine: Arc::downgrade(engine),
            console: shared_console_log(config.max_console_messages),
            events: shared_view(config.max_events),
            config,
            script_proxies: HashMap::new(),
            navigation_wrapped: false,
            ui_wrapped: false,
        }
    }

    /// Create a debugger with the default configuration
    pub fn attach(engine: &Arc<dyn ScriptEvaluator>) -> Self {
        Self::new(engine, DebuggerConfig::default())
    }

    /// The active configuration
    pub fn config(&self) -> &DebuggerConfig {
        &self.config
    }

    /// Name of the console message channel the host must route here
    pub fn console_handler_name(&self) -> &'static str {
        CONSOLE_HANDLER_NAME
    }

    /// Scripts the host must install before page content executes
    ///
    /// Empty when console capture is disabled. The console intercept is
    /// self-guarding: installing it twice is a page-side no-op.
    pub fn user_scripts(&self) -> Vec<InjectedScript> {
        if !self.config.console_logging {
            return Vec::new();
        }
        vec![console_capture_script(CONSOLE_HANDLER_NAME)]
    }

    /// Build the navigation proxy the host installs as its delegate
    ///
    /// Pass the previously installed delegate, if any; its decisions remain
    /// authoritative. Returns `None` when event capture is disabled or the
    /// navigation delegate was already wrapped by this debugger.
    pub fn wrap_navigation_delegate(
        &mut self,
        original: Option<Box<dyn NavigationDelegate>>,
    ) -> Option<NavigationDelegateProxy> {
        if !self.config.event_capture {
            return None;
        }
        if self.navigation_wrapped {
            warn!("navigation delegate already wrapped; refusing to double-install");
            return None;
        }
        self.navigation_wrapped = true;
        Some(NavigationDelegateProxy::new(original, Arc::downgrade(&self.events)))
    }

    /// Build the UI proxy the host installs as its delegate
    ///
    /// Same contract as [`Self::wrap_navigation_delegate`].
    pub fn wrap_ui_delegate(&mut self, original: Option<Box<dyn UiDelegate>>) -> Option<UiDelegateProxy> {
        if !self.config.event_capture {
            return None;
        }
        if self.ui_wrapped {
            warn!("UI delegate already wrapped; refusing to double-install");
            return None;
        }
        self.ui_wrapped = true;
        Some(UiDelegateProxy::new(original, Arc::downgrade(&self.events)))
    }

    /// Register a named script-message channel, wrapping an optional handler
    ///
    /// Messages routed through [`Self::handle_script_message`] for this name
    /// are recorded as script-message events (when event capture is enabled)
    /// and forwarded to the wrapped handler.
    pub fn add_script_message_handler(
        &mut self,
        name: impl Into<String>,
        original: Option<Box<dyn ScriptMessageHandler>>,
    ) {
        let name = name.into();
        let events = if self.config.event_capture {
            Arc::downgrade(&self.events)
        } else {
            Weak::new()
        };
        self.script_proxies
            .insert(name.clone(), ScriptMessageProxy::new(name, original, events));
    }

    /// Remove a named script-message channel
    pub fn remove_script_message_handler(&mut self, name: &str) -> bool {
        self.script_proxies.remove(name).is_some()
    }

    /// Route a message the engine delivered on its page-to-host channel
    ///
    /// The console channel feeds the console log; named channels feed their
    /// proxies. Unroutable messages and malformed console payloads are
    /// dropped silently.
    #[instrument(skip(self, message), fields(channel = %message.name))]
    pub fn handle_script_message(&mut self, message: &ScriptMessage) {
        if message.name == CONSOLE_HANDLER_NAME {
            self.ingest_console_payload(&message.body);
            return;
        }

        if let Some(proxy) = self.script_proxies.get_mut(&message.name) {
            proxy.did_receive(message);
        } else {
            debug!("no handler registered for channel");
        }
    }

    /// Mutation is confined by the console log's write lock, so producers on
    /// the engine's intercept thread serialize against readers and the new
    /// message is visible before this returns.
    fn ingest_console_payload(&self, body: &Value) {
        if !self.config.console_logging {
            return;
        }

        match ConsoleMessage::from_payload(body) {
            Some(message) => {
                METRICS.record_console_message();
                if let Ok(mut console) = self.console.write() {
                    console.push(message);
                }
            }
            None => {
                METRICS.record_malformed_payload();
                debug!("dropping malformed console payload");
            }
        }
    }

    /// Fetch a point-in-time DOM snapshot
    ///
    /// `None` when DOM inspection is disabled, the engine is gone, or the
    /// snapshot script fails; the inspector shows an empty state instead.
    #[instrument(skip(self))]
    pub async fn fetch_dom_tree(&self) -> Option<DomNode> {
        if !self.config.dom_inspection {
            return None;
        }
        let engine = self.engine.upgrade()?;

        match engine.evaluate(DOM_SNAPSHOT_SCRIPT).await {
            Ok(Value::String(json)) => match DomNode::from_json(&json) {
                Ok(tree) => {
                    METRICS.record_dom_snapshot();
                    Some(tree)
                }
                Err(error) => {
                    METRICS.record_script_failure();
                    warn!(%error, "DOM snapshot returned undecodable JSON");
                    None
                }
            },
            Ok(other) => {
                METRICS.record_script_failure();
                warn!(kind = %value_kind(&other), "DOM snapshot returned a non-string result");
                None
            }
            Err(error) => {
                METRICS.record_script_failure();
                warn!(%error, "DOM snapshot evaluation failed");
                None
            }
        }
    }

    /// Fetch the configured web storage entries
    ///
    /// Collects local storage, session storage, and cookies in that order,
    /// restricted to the configured kinds. Failing pieces are skipped; a
    /// disabled feature or a dead engine yields an empty list.
    #[instrument(skip(self))]
    pub async fn fetch_web_storage(&self) -> Vec<WebStorageItem> {
        if !self.config.storage_inspection {
            return Vec::new();
        }
        let Some(engine) = self.engine.upgrade() else {
            debug!("engine gone; storage snapshot skipped");
            return Vec::new();
        };

        let mut items = Vec::new();

        if self.config.storage_kinds.contains(&WebStorageKind::LocalStorage) {
            match engine.evaluate(LOCAL_STORAGE_SCRIPT).await {
                Ok(value) => items.extend(parse_entries(&value, WebStorageKind::LocalStorage)),
                Err(error) => {
                    METRICS.record_script_failure();
                    warn!(%error, "localStorage snapshot failed");
                }
            }
        }

        if self.config.storage_kinds.contains(&WebStorageKind::SessionStorage) {
            match engine.evaluate(SESSION_STORAGE_SCRIPT).await {
                Ok(value) => items.extend(parse_entries(&value, WebStorageKind::SessionStorage)),
                Err(error) => {
                    METRICS.record_script_failure();
                    warn!(%error, "sessionStorage snapshot failed");
                }
            }
        }

        if self.config.storage_kinds.contains(&WebStorageKind::Cookies) {
            match engine.evaluate(COOKIE_SCRIPT).await {
                Ok(Value::String(cookies)) if !cookies.is_empty() => {
                    items.extend(parse_cookie_string(&cookies));
                }
                Ok(_) => {}
                Err(error) => {
                    METRICS.record_script_failure();
                    warn!(%error, "cookie snapshot failed");
                }
            }
        }

        METRICS.record_storage_snapshot();
        items
    }

    /// Evaluate an ad-hoc script in the page
    pub async fn execute_script(&self, script: &str) -> Result<Value> {
        let engine = self.engine.upgrade().ok_or(DebuggerError::EngineGone)?;
        engine.evaluate(script).await
    }

    /// Drop every captured console message
    pub fn clear_console(&self) {
        if let Ok(mut console) = self.console.write() {
            console.clear();
        }
    }

    /// Shared handle to the captured console log
    pub fn console(&self) -> SharedConsoleLog {
        Arc::clone(&self.console)
    }

    /// Shared handle to the events view model
    pub fn events(&self) -> SharedEventsView {
        Arc::clone(&self.events)
    }

    /// Whether the engine binding is still alive
    pub fn is_engine_alive(&self) -> bool {
        self.engine.strong_count() > 0
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleLevel;
    use futures::future::BoxFuture;
    use serde_json::json;

    /// Engine stub answering each instrumentation script with canned data
    struct MockEngine;

    impl ScriptEvaluator for MockEngine {
        fn evaluate(&self, script: &str) -> BoxFuture<'_, Result<Value>> {
            let response = if script.contains("getDomTree") {
                Ok(Value::String(
                    json!({
                        "tag": "BODY",
                        "id": "",
                        "className": "",
                        "innerText": null,
                        "children": [
                            {"tag": "P", "id": "", "className": "", "innerText": "hi", "children": []}
                        ]
                    })
                    .to_string(),
                ))
            } else if script.contains("localStorage") {
                Ok(json!([["theme", "dark"]]))
            } else if script.contains("sessionStorage") {
                Ok(json!([["cart", "3"]]))
            } else if script.contains("document.cookie") {
                Ok(json!("session=abc; lang=en"))
            } else {
                Ok(json!(null))
            };
            Box::pin(async move { response })
        }
    }

    struct FailingEngine;

    impl ScriptEvaluator for FailingEngine {
        fn evaluate(&self, _script: &str) -> BoxFuture<'_, Result<Value>> {
            Box::pin(async { Err(DebuggerError::ScriptFailed("not ready".to_string())) })
        }
    }

    fn mock_engine() -> Arc<dyn ScriptEvaluator> {
        Arc::new(MockEngine)
    }

    fn console_payload(method: &str, args: Value) -> ScriptMessage {
        ScriptMessage::new(CONSOLE_HANDLER_NAME, json!({"method": method, "args": args}), None)
    }

    #[test]
    fn test_user_scripts_follow_config() {
        let engine = mock_engine();
        let debugger = WebViewDebugger::attach(&engine);
        assert_eq!(debugger.user_scripts().len(), 1);

        let quiet = WebViewDebugger::new(&engine, DebuggerConfig::production());
        assert!(quiet.user_scripts().is_empty());
    }

    #[test]
    fn test_console_ingestion() {
        let engine = mock_engine();
        let mut debugger = WebViewDebugger::attach(&engine);

        debugger.handle_script_message(&console_payload("error", json!(["boom", 7])));
        debugger.handle_script_message(&console_payload("log", json!(["fine"])));

        let console = debugger.console();
        let console = console.read().unwrap();
        assert_eq!(console.len(), 2);
        let first = console.messages().next().unwrap();
        assert_eq!(first.level, ConsoleLevel::Error);
        assert_eq!(first.text, "boom 7");
    }

    #[test]
    fn test_malformed_console_payload_is_dropped() {
        let engine = mock_engine();
        let mut debugger = WebViewDebugger::attach(&engine);

        debugger.handle_script_message(&ScriptMessage::new(
            CONSOLE_HANDLER_NAME,
            json!({"args": ["no method"]}),
            None,
        ));
        debugger.handle_script_message(&ScriptMessage::new(CONSOLE_HANDLER_NAME, json!(42), None));

        assert!(debugger.console().read().unwrap().is_empty());
    }

    #[test]
    fn test_console_disabled_ignores_payloads() {
        let engine = mock_engine();
        let config = DebuggerConfig::builder().console_logging(false).build();
        let mut debugger = WebViewDebugger::new(&engine, config);

        debugger.handle_script_message(&console_payload("log", json!(["ignored"])));
        assert!(debugger.console().read().unwrap().is_empty());
    }

    #[test]
    fn test_script_message_routing_records_event() {
        let engine = mock_engine();
        let mut debugger = WebViewDebugger::attach(&engine);
        debugger.add_script_message_handler("bridge", None);

        debugger.handle_script_message(&ScriptMessage::new("bridge", json!({"x": 1}), None));
        debugger.handle_script_message(&ScriptMessage::new("unknown", json!({}), None));

        let events = debugger.events();
        let events = events.read().unwrap();
        assert_eq!(events.filtered().len(), 1);
        assert_eq!(events.filtered()[0].label, "bridge");
    }

    #[test]
    fn test_remove_script_message_handler() {
        let engine = mock_engine();
        let mut debugger = WebViewDebugger::attach(&engine);
        debugger.add_script_message_handler("bridge", None);

        assert!(debugger.remove_script_message_handler("bridge"));
        assert!(!debugger.remove_script_message_handler("bridge"));

        debugger.handle_script_message(&ScriptMessage::new("bridge", json!({}), None));
        assert!(debugger.events().read().unwrap().filtered().is_empty());
    }

    #[test]
    fn test_wrapping_is_idempotent() {
        let engine = mock_engine();
        let mut debugger = WebViewDebugger::attach(&engine);

        assert!(debugger.wrap_navigation_delegate(None).is_some());
        assert!(debugger.wrap_navigation_delegate(None).is_none());
        assert!(debugger.wrap_ui_delegate(None).is_some());
        assert!(debugger.wrap_ui_delegate(None).is_none());
    }

    #[test]
    fn test_wrapping_disabled_by_config() {
        let engine = mock_engine();
        let config = DebuggerConfig::builder().event_capture(false).build();
        let mut debugger = WebViewDebugger::new(&engine, config);
        assert!(debugger.wrap_navigation_delegate(None).is_none());
    }

    #[tokio::test]
    async fn test_fetch_dom_tree() {
        let engine = mock_engine();
        let debugger = WebViewDebugger::attach(&engine);

        let tree = debugger.fetch_dom_tree().await.unwrap();
        assert_eq!(tree.tag, "BODY");
        assert_eq!(tree.children[0].inner_text.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_fetch_dom_tree_disabled() {
        let engine = mock_engine();
        let config = DebuggerConfig::builder().dom_inspection(false).build();
        let debugger = WebViewDebugger::new(&engine, config);
        assert!(debugger.fetch_dom_tree().await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_dom_tree_engine_failure_yields_none() {
        let engine: Arc<dyn ScriptEvaluator> = Arc::new(FailingEngine);
        let debugger = WebViewDebugger::attach(&engine);
        assert!(debugger.fetch_dom_tree().await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_web_storage() {
        let engine = mock_engine();
        let debugger = WebViewDebugger::attach(&engine);

        let items = debugger.fetch_web_storage().await;
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].kind, WebStorageKind::LocalStorage);
        assert_eq!(items[0].key, "theme");
        assert_eq!(items[1].kind, WebStorageKind::SessionStorage);
        assert_eq!(items[2].key, "session");
        assert_eq!(items[3].key, "lang");
    }

    #[tokio::test]
    async fn test_fetch_web_storage_restricted_kinds() {
        let engine = mock_engine();
        let mut kinds = std::collections::HashSet::new();
        kinds.insert(WebStorageKind::Cookies);
        let config = DebuggerConfig::builder().storage_kinds(kinds).build();
        let debugger = WebViewDebugger::new(&engine, config);

        let items = debugger.fetch_web_storage().await;
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.kind == WebStorageKind::Cookies));
    }

    #[tokio::test]
    async fn test_dead_engine_yields_no_data() {
        let engine = mock_engine();
        let debugger = WebViewDebugger::attach(&engine);
        drop(engine);

        assert!(!debugger.is_engine_alive());
        assert!(debugger.fetch_dom_tree().await.is_none());
        assert!(debugger.fetch_web_storage().await.is_empty());
        assert!(matches!(
            debugger.execute_script("1 + 1").await,
            Err(DebuggerError::EngineGone)
        ));
    }

    #[test]
    fn test_clear_console() {
        let engine = mock_engine();
        let mut debugger = WebViewDebugger::attach(&engine);
        debugger.handle_script_message(&console_payload("log", json!(["x"])));

        debugger.clear_console();
        assert!(debugger.console().read().unwrap().is_empty());
    }
}
