//! Delegate capability traits and intercept-then-forward proxies
//!
//! The engine's native callback interfaces are modeled as capability traits
//! with safe default decisions. For each interface a proxy implements the
//! trait, normalizes every call into an [`Event`](crate::event::Event),
//! appends it to the (weakly held) events view, and forwards the call to an
//! optionally wrapped original, whose decision is authoritative. With no
//! original wrapped, the built-in defaults apply: navigation is allowed,
//! permission requests are denied, dialogs are dismissed with empty or
//! negative responses.
//!
//! Proxies hold the events view weakly; a torn-down view makes every hook a
//! silent pass-through.

mod navigation;
mod script;
mod ui;

pub use navigation::{NavigationDelegate, NavigationDelegateProxy};
pub use script::{ScriptMessageHandler, ScriptMessageProxy};
pub use ui::{UiDelegate, UiDelegateProxy};

use std::fmt;
use std::sync::{RwLock, Weak};

use url::Url;

use crate::event::Event;
use crate::view::EventsView;

/// Policy decision for a navigation action or response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavigationPolicy {
    /// Let the navigation proceed
    #[default]
    Allow,
    /// Cancel the navigation
    Cancel,
}

/// What triggered a navigation action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum NavigationType {
    LinkActivated,
    FormSubmitted,
    BackForward,
    Reload,
    FormResubmitted,
    Other,
}

impl NavigationType {
    /// The engine's raw value for this navigation type
    pub fn raw_value(self) -> i64 {
        match self {
            NavigationType::LinkActivated => 0,
            NavigationType::FormSubmitted => 1,
            NavigationType::BackForward => 2,
            NavigationType::Reload => 3,
            NavigationType::FormResubmitted => 4,
            NavigationType::Other => -1,
        }
    }
}

/// A pending navigation the engine asks a policy decision for
#[derive(Debug, Clone)]
pub struct NavigationAction {
    /// Target URL of the request, when known
    pub url: Option<Url>,
    /// What triggered the navigation
    pub navigation_type: NavigationType,
    /// Whether the navigation targets the main frame
    pub target_is_main_frame: bool,
}

/// A received navigation response the engine asks a policy decision for
#[derive(Debug, Clone)]
pub struct NavigationResponse {
    /// URL the response was received for, when known
    pub url: Option<Url>,
    /// Declared MIME type, when known
    pub mime_type: Option<String>,
    /// HTTP status code, when the response came over HTTP
    pub status_code: Option<u16>,
}

/// An authentication challenge from the engine's resource loader
#[derive(Debug, Clone)]
pub struct AuthenticationChallenge {
    /// Host of the protection space
    pub host: String,
    /// Authentication method identifier
    pub method: String,
}

/// Disposition for an authentication challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthChallengeDisposition {
    /// Let the engine handle the challenge its default way
    #[default]
    PerformDefaultHandling,
    /// Cancel the challenged request
    Cancel,
}

/// The frame a UI delegate call originated from
#[derive(Debug, Clone)]
pub struct FrameInfo {
    /// URL of the frame's request, when known
    pub url: Option<Url>,
    /// Whether this is the main frame
    pub is_main_frame: bool,
}

/// Origin requesting a permission
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub struct SecurityOrigin {
    pub protocol: String,
    pub host: String,
    pub port: u16,
}

impl fmt::Display for SecurityOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// Decision for a page permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionDecision {
    /// Ask the user
    Prompt,
    /// Grant without asking
    Grant,
    /// Deny without asking
    #[default]
    Deny,
}

/// What a media capture permission request asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MediaCaptureKind {
    Camera,
    Microphone,
    CameraAndMicrophone,
}

impl MediaCaptureKind {
    /// The engine's raw value for this capture kind
    pub fn raw_value(self) -> i64 {
        match self {
            MediaCaptureKind::Camera => 0,
            MediaCaptureKind::Microphone => 1,
            MediaCaptureKind::CameraAndMicrophone => 2,
        }
    }
}

/// Append a normalized event through a weak view handle
///
/// No-ops when the view is gone or its lock is poisoned: capture is
/// best-effort and must never take the host down.
pub(crate) fn emit(events: &Weak<RwLock<EventsView>>, event: Event) {
    crate::metrics::METRICS.record_event();
    if let Some(view) = events.upgrade() {
        if let Ok(mut view) = view.write() {
            view.append(event);
        }
    }
}
