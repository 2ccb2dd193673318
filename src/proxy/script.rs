//! Script message handler proxy

use std::sync::{RwLock, Weak};

use serde_json::Value;

use crate::engine::ScriptMessage;
use crate::event::{DetailValue, Event, EventKind};
use crate::view::EventsView;

use super::emit;

/// Receiver for messages a page posts to a named host channel
pub trait ScriptMessageHandler: Send {
    /// A message arrived on the handler's channel
    fn did_receive(&mut self, message: &ScriptMessage);
}

/// Decorator that records every posted message as an event and forwards it to
/// an optionally wrapped original handler
pub struct ScriptMessageProxy {
    handler_name: String,
    original: Option<Box<dyn ScriptMessageHandler>>,
    events: Weak<RwLock<EventsView>>,
}

impl ScriptMessageProxy {
    /// Wrap an optional original handler for the named channel
    pub fn new(
        handler_name: impl Into<String>,
        original: Option<Box<dyn ScriptMessageHandler>>,
        events: Weak<RwLock<EventsView>>,
    ) -> Self {
        Self {
            handler_name: handler_name.into(),
            original,
            events,
        }
    }

    /// The channel name this proxy serves
    pub fn handler_name(&self) -> &str {
        &self.handler_name
    }

    /// Record the message and forward it to the wrapped handler
    pub fn did_receive(&mut self, message: &ScriptMessage) {
        let body = match &message.body {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let frame = message
            .frame_url
            .as_ref()
            .map_or_else(|| "unknown".to_string(), |u| u.to_string());

        emit(
            &self.events,
            Event::new(
                EventKind::ScriptMessage,
                self.handler_name.clone(),
                vec![
                    ("name", DetailValue::from(message.name.as_str())),
                    ("body", DetailValue::from(body)),
                    ("frameInfo", DetailValue::from(frame)),
                ],
            ),
        );

        if let Some(original) = self.original.as_mut() {
            original.did_receive(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::shared_view;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use url::Url;

    struct RecordingHandler {
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptMessageHandler for RecordingHandler {
        fn did_receive(&mut self, message: &ScriptMessage) {
            self.seen.lock().unwrap().push(message.name.clone());
        }
    }

    #[test]
    fn test_proxy_records_and_forwards() {
        let view = shared_view(1000);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut proxy = ScriptMessageProxy::new(
            "checkout",
            Some(Box::new(RecordingHandler { seen: Arc::clone(&seen) })),
            Arc::downgrade(&view),
        );

        let message = ScriptMessage::new(
            "checkout",
            json!({"step": 2}),
            Some(Url::parse("https://shop.example/cart").unwrap()),
        );
        proxy.did_receive(&message);

        assert_eq!(seen.lock().unwrap().as_slice(), ["checkout"]);

        let guard = view.read().unwrap();
        let event = &guard.filtered()[0];
        assert_eq!(event.kind, EventKind::ScriptMessage);
        assert_eq!(event.label, "checkout");
        assert!(event.raw_description.contains("name: checkout"));
        assert!(event.raw_description.contains(r#"body: {"step":2}"#));
        assert!(event.raw_description.contains("frameInfo: https://shop.example/cart"));
    }

    #[test]
    fn test_unknown_frame_is_recorded_as_unknown() {
        let view = shared_view(1000);
        let mut proxy = ScriptMessageProxy::new("bridge", None, Arc::downgrade(&view));

        proxy.did_receive(&ScriptMessage::new("bridge", json!("ping"), None));

        let guard = view.read().unwrap();
        assert!(guard.filtered()[0].raw_description.contains("frameInfo: unknown"));
        // String bodies are recorded verbatim, not re-quoted.
        assert!(guard.filtered()[0].raw_description.contains("body: ping"));
    }
}
