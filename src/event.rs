//! Normalized web view events
//!
//! Every intercepted delegate callback and script message is converted into an
//! immutable [`Event`] at the moment it fires: a unique id, a UTC timestamp,
//! the event kind, the hook method name, and an ordered list of display-ready
//! detail pairs. `raw_description` is derived from the details once, at
//! creation, and is what search and export operate on.
//!
//! Normalization never fails. Values the renderer does not treat specially
//! fall through to their generic string form.
//!
//! # Example
//!
//! ```rust
//! use url::Url;
//! use webscope::event::{DetailValue, Event, EventKind};
//!
//! let url = Url::parse("https://example.com/login").unwrap();
//! let event = Event::new(
//!     EventKind::Navigation,
//!     "didStartProvisionalNavigation",
//!     vec![("url", DetailValue::Url(url))],
//! );
//!
//! assert_eq!(event.raw_description, "url: https://example.com/login");
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// The closed set of lifecycle event kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Navigation delegate callbacks (policy decisions, load lifecycle)
    Navigation,
    /// Messages posted from page scripts to a registered host handler
    ScriptMessage,
    /// UI delegate callbacks (dialogs, window management, permissions)
    UiDelegate,
}

impl EventKind {
    /// Every known kind, in display order
    pub const ALL: [EventKind; 3] = [
        EventKind::Navigation,
        EventKind::ScriptMessage,
        EventKind::UiDelegate,
    ];

    /// Human-readable name, used in export and matched by search
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Navigation => "Navigation",
            EventKind::ScriptMessage => "Script Message",
            EventKind::UiDelegate => "UI Delegate",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Navigation delegate hook names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // variants mirror the engine's method names
pub enum NavigationMethod {
    DecidePolicyForNavigationAction,
    DecidePolicyForNavigationResponse,
    DidStartProvisionalNavigation,
    DidReceiveServerRedirectForProvisionalNavigation,
    DidFailProvisionalNavigation,
    DidCommitNavigation,
    DidFinishNavigation,
    DidFailNavigation,
    DidReceiveAuthenticationChallenge,
    WebContentProcessDidTerminate,
}

impl NavigationMethod {
    /// The hook's method name as recorded in event labels
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DecidePolicyForNavigationAction => "decidePolicyForNavigationAction",
            Self::DecidePolicyForNavigationResponse => "decidePolicyForNavigationResponse",
            Self::DidStartProvisionalNavigation => "didStartProvisionalNavigation",
            Self::DidReceiveServerRedirectForProvisionalNavigation => {
                "didReceiveServerRedirectForProvisionalNavigation"
            }
            Self::DidFailProvisionalNavigation => "didFailProvisionalNavigation",
            Self::DidCommitNavigation => "didCommitNavigation",
            Self::DidFinishNavigation => "didFinishNavigation",
            Self::DidFailNavigation => "didFailNavigation",
            Self::DidReceiveAuthenticationChallenge => "didReceiveAuthenticationChallenge",
            Self::WebContentProcessDidTerminate => "webContentProcessDidTerminate",
        }
    }
}

/// UI delegate hook names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)] // variants mirror the engine's method names
pub enum UiDelegateMethod {
    CreateWebView,
    WebViewDidClose,
    RunJavaScriptAlertPanel,
    RunJavaScriptConfirmPanel,
    RunJavaScriptTextInputPanel,
    RequestMediaCapturePermission,
    RequestDeviceOrientationAndMotionPermission,
}

impl UiDelegateMethod {
    /// The hook's method name as recorded in event labels
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateWebView => "createWebViewWithConfiguration",
            Self::WebViewDidClose => "webViewDidClose",
            Self::RunJavaScriptAlertPanel => "runJavaScriptAlertPanelWithMessage",
            Self::RunJavaScriptConfirmPanel => "runJavaScriptConfirmPanelWithMessage",
            Self::RunJavaScriptTextInputPanel => "runJavaScriptTextInputPanelWithPrompt",
            Self::RequestMediaCapturePermission => "requestMediaCapturePermission",
            Self::RequestDeviceOrientationAndMotionPermission => {
                "requestDeviceOrientationAndMotionPermission"
            }
        }
    }
}

/// A raw detail value captured by a hook, prior to display rendering
///
/// Rendering precedence is fixed: URLs render in absolute form, errors as
/// their message, request/response values as their target URL (or the
/// literal `no URL`), and everything else through generic string conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailValue {
    /// A resolved URL
    Url(Url),
    /// An error, carried as its human-readable message
    Error(String),
    /// A request-like value, identified by its target URL when known
    Request(Option<Url>),
    /// A response-like value, identified by its target URL when known
    Response(Option<Url>),
    /// Plain text
    Text(String),
    /// An integral value (status codes, enum raw values)
    Integer(i64),
    /// A boolean flag
    Bool(bool),
}

impl DetailValue {
    /// Convenience for hooks that may or may not know a URL
    pub fn opt_url(url: Option<Url>) -> Self {
        match url {
            Some(url) => DetailValue::Url(url),
            None => DetailValue::Text("no URL".to_string()),
        }
    }
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::Url(url) => f.write_str(url.as_str()),
            DetailValue::Error(message) => f.write_str(message),
            DetailValue::Request(url) | DetailValue::Response(url) => {
                f.write_str(url.as_ref().map_or("no URL", Url::as_str))
            }
            DetailValue::Text(text) => f.write_str(text),
            DetailValue::Integer(n) => write!(f, "{}", n),
            DetailValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<Url> for DetailValue {
    fn from(url: Url) -> Self {
        DetailValue::Url(url)
    }
}

impl From<&str> for DetailValue {
    fn from(text: &str) -> Self {
        DetailValue::Text(text.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(text: String) -> Self {
        DetailValue::Text(text)
    }
}

impl From<i64> for DetailValue {
    fn from(n: i64) -> Self {
        DetailValue::Integer(n)
    }
}

impl From<bool> for DetailValue {
    fn from(b: bool) -> Self {
        DetailValue::Bool(b)
    }
}

/// One normalized, immutable record of an intercepted web view callback
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    /// Process-unique identifier, assigned at creation
    pub id: Uuid,
    /// Creation time; non-decreasing across events in the same store
    pub timestamp: DateTime<Utc>,
    /// Which closed category of hook fired
    pub kind: EventKind,
    /// The hook method name
    pub label: String,
    /// Ordered display-ready detail pairs, in capture order
    pub detail: Vec<(String, String)>,
    /// Cached `key: value` rendering of `detail`, computed once at creation
    pub raw_description: String,
}

impl Event {
    /// Normalize a raw intercepted call into an immutable event
    pub fn new(
        kind: EventKind,
        label: impl Into<String>,
        details: Vec<(&'static str, DetailValue)>,
    ) -> Self {
        let detail: Vec<(String, String)> = details
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let raw_description = Self::format_details(&detail);

        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            kind,
            label: label.into(),
            detail,
            raw_description,
        }
    }

    fn format_details(detail: &[(String, String)]) -> String {
        let mut result = String::new();
        for (key, value) in detail {
            result.push_str(key);
            result.push_str(": ");
            result.push_str(value);
            result.push('\n');
        }
        result.trim().to_string()
    }

    /// Timestamp rendered as `HH:MM:SS.mmm`, as used in export
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%H:%M:%S%.3f").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_renders_absolute() {
        let url = Url::parse("https://example.com/a?b=1").unwrap();
        let event = Event::new(
            EventKind::Navigation,
            NavigationMethod::DidCommitNavigation.as_str(),
            vec![("url", DetailValue::Url(url))],
        );
        assert_eq!(event.raw_description, "url: https://example.com/a?b=1");
    }

    #[test]
    fn test_request_without_url_uses_sentinel() {
        let event = Event::new(
            EventKind::Navigation,
            NavigationMethod::DecidePolicyForNavigationAction.as_str(),
            vec![("request", DetailValue::Request(None))],
        );
        assert_eq!(event.raw_description, "request: no URL");
    }

    #[test]
    fn test_detail_order_is_preserved() {
        let event = Event::new(
            EventKind::UiDelegate,
            UiDelegateMethod::RunJavaScriptConfirmPanel.as_str(),
            vec![
                ("message", DetailValue::from("are you sure?")),
                ("isMainFrame", DetailValue::from(true)),
                ("statusCode", DetailValue::from(204)),
            ],
        );
        assert_eq!(
            event.raw_description,
            "message: are you sure?\nisMainFrame: true\nstatusCode: 204"
        );
        assert_eq!(event.detail[0].0, "message");
        assert_eq!(event.detail[2].1, "204");
    }

    #[test]
    fn test_error_renders_message() {
        let event = Event::new(
            EventKind::Navigation,
            NavigationMethod::DidFailNavigation.as_str(),
            vec![(
                "error",
                DetailValue::Error("The network connection was lost".to_string()),
            )],
        );
        assert!(event
            .raw_description
            .contains("error: The network connection was lost"));
    }

    #[test]
    fn test_empty_details_yield_empty_description() {
        let event = Event::new(EventKind::ScriptMessage, "handler", vec![]);
        assert!(event.raw_description.is_empty());
    }

    #[test]
    fn test_ids_are_unique_and_timestamps_non_decreasing() {
        let a = Event::new(EventKind::Navigation, "a", vec![]);
        let b = Event::new(EventKind::Navigation, "b", vec![]);
        assert_ne!(a.id, b.id);
        assert!(b.timestamp >= a.timestamp);
    }

    #[test]
    fn test_kind_display_names() {
        assert_eq!(EventKind::Navigation.as_str(), "Navigation");
        assert_eq!(EventKind::ScriptMessage.as_str(), "Script Message");
        assert_eq!(EventKind::UiDelegate.as_str(), "UI Delegate");
    }

    #[test]
    fn test_formatted_timestamp_shape() {
        let event = Event::new(EventKind::Navigation, "x", vec![]);
        let ts = event.formatted_timestamp();
        // HH:MM:SS.mmm
        assert_eq!(ts.len(), 12);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[8..9], ".");
    }
}
