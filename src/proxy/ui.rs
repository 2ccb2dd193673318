//! UI delegate proxy

use std::sync::{RwLock, Weak};

use url::Url;

use crate::event::{DetailValue, Event, EventKind, UiDelegateMethod};
use crate::view::EventsView;

use super::{emit, FrameInfo, MediaCaptureKind, NavigationAction, PermissionDecision, SecurityOrigin};

/// The engine's UI callback interface: dialogs, window management, permissions
///
/// Defaults dismiss every dialog with an empty or negative response and deny
/// every permission request.
#[allow(unused_variables)]
pub trait UiDelegate: Send {
    /// The page asked for a new web view (window.open and friends)
    ///
    /// Returns whether the host created one.
    fn create_web_view(&mut self, action: &NavigationAction) -> bool {
        false
    }

    /// The page closed its web view
    fn web_view_did_close(&mut self, url: Option<&Url>) {}

    /// `alert()`; completes once the user (or host) dismissed it
    fn run_javascript_alert(&mut self, message: &str, frame: &FrameInfo) {}

    /// `confirm()`; returns the user's choice
    fn run_javascript_confirm(&mut self, message: &str, frame: &FrameInfo) -> bool {
        false
    }

    /// `prompt()`; returns the entered text, or `None` for cancel
    fn run_javascript_prompt(
        &mut self,
        prompt: &str,
        default_text: Option<&str>,
        frame: &FrameInfo,
    ) -> Option<String> {
        None
    }

    /// The page requested camera/microphone access
    fn request_media_capture_permission(
        &mut self,
        origin: &SecurityOrigin,
        kind: MediaCaptureKind,
        frame: &FrameInfo,
    ) -> PermissionDecision {
        PermissionDecision::Deny
    }

    /// The page requested device orientation and motion access
    fn request_device_orientation_permission(
        &mut self,
        origin: &SecurityOrigin,
        frame: &FrameInfo,
    ) -> PermissionDecision {
        PermissionDecision::Deny
    }
}

/// Decorator that records every UI callback as an event and forwards it to an
/// optionally wrapped original delegate
pub struct UiDelegateProxy {
    original: Option<Box<dyn UiDelegate>>,
    events: Weak<RwLock<EventsView>>,
}

impl UiDelegateProxy {
    /// Wrap an optional original delegate
    pub fn new(original: Option<Box<dyn UiDelegate>>, events: Weak<RwLock<EventsView>>) -> Self {
        Self { original, events }
    }

    /// Whether an original delegate is wrapped
    pub fn has_original(&self) -> bool {
        self.original.is_some()
    }

    fn log(&self, method: UiDelegateMethod, details: Vec<(&'static str, DetailValue)>) {
        emit(
            &self.events,
            Event::new(EventKind::UiDelegate, method.as_str(), details),
        );
    }
}

impl UiDelegate for UiDelegateProxy {
    fn create_web_view(&mut self, action: &NavigationAction) -> bool {
        self.log(
            UiDelegateMethod::CreateWebView,
            vec![
                ("url", DetailValue::opt_url(action.url.clone())),
                ("navigationType", DetailValue::from(action.navigation_type.raw_value())),
                ("targetFrame", DetailValue::from(action.target_is_main_frame)),
            ],
        );

        match self.original.as_mut() {
            Some(original) => original.create_web_view(action),
            None => false,
        }
    }

    fn web_view_did_close(&mut self, url: Option<&Url>) {
        self.log(
            UiDelegateMethod::WebViewDidClose,
            vec![("url", DetailValue::opt_url(url.cloned()))],
        );
        if let Some(original) = self.original.as_mut() {
            original.web_view_did_close(url);
        }
    }

    fn run_javascript_alert(&mut self, message: &str, frame: &FrameInfo) {
        self.log(
            UiDelegateMethod::RunJavaScriptAlertPanel,
            vec![
                ("message", DetailValue::from(message)),
                ("sourceURL", DetailValue::opt_url(frame.url.clone())),
                ("isMainFrame", DetailValue::from(frame.is_main_frame)),
            ],
        );
        if let Some(original) = self.original.as_mut() {
            original.run_javascript_alert(message, frame);
        }
    }

    fn run_javascript_confirm(&mut self, message: &str, frame: &FrameInfo) -> bool {
        self.log(
            UiDelegateMethod::RunJavaScriptConfirmPanel,
            vec![
                ("message", DetailValue::from(message)),
                ("sourceURL", DetailValue::opt_url(frame.url.clone())),
                ("isMainFrame", DetailValue::from(frame.is_main_frame)),
            ],
        );

        match self.original.as_mut() {
            Some(original) => original.run_javascript_confirm(message, frame),
            None => false,
        }
    }

    fn run_javascript_prompt(
        &mut self,
        prompt: &str,
        default_text: Option<&str>,
        frame: &FrameInfo,
    ) -> Option<String> {
        self.log(
            UiDelegateMethod::RunJavaScriptTextInputPanel,
            vec![
                ("prompt", DetailValue::from(prompt)),
                ("defaultText", DetailValue::from(default_text.unwrap_or_default())),
                ("sourceURL", DetailValue::opt_url(frame.url.clone())),
                ("isMainFrame", DetailValue::from(frame.is_main_frame)),
            ],
        );

        match self.original.as_mut() {
            Some(original) => original.run_javascript_prompt(prompt, default_text, frame),
            None => None,
        }
    }

    fn request_media_capture_permission(
        &mut self,
        origin: &SecurityOrigin,
        kind: MediaCaptureKind,
        frame: &FrameInfo,
    ) -> PermissionDecision {
        self.log(
            UiDelegateMethod::RequestMediaCapturePermission,
            vec![
                ("origin", DetailValue::from(origin.to_string())),
                ("type", DetailValue::from(kind.raw_value())),
                ("sourceURL", DetailValue::opt_url(frame.url.clone())),
            ],
        );

        match self.original.as_mut() {
            Some(original) => original.request_media_capture_permission(origin, kind, frame),
            None => PermissionDecision::Deny,
        }
    }

    fn request_device_orientation_permission(
        &mut self,
        origin: &SecurityOrigin,
        frame: &FrameInfo,
    ) -> PermissionDecision {
        self.log(
            UiDelegateMethod::RequestDeviceOrientationAndMotionPermission,
            vec![
                ("origin", DetailValue::from(origin.to_string())),
                ("sourceURL", DetailValue::opt_url(frame.url.clone())),
            ],
        );

        match self.original.as_mut() {
            Some(original) => original.request_device_orientation_permission(origin, frame),
            None => PermissionDecision::Deny,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::shared_view;
    use std::sync::Arc;

    fn frame() -> FrameInfo {
        FrameInfo {
            url: Some(Url::parse("https://example.com/page").unwrap()),
            is_main_frame: true,
        }
    }

    fn origin() -> SecurityOrigin {
        SecurityOrigin {
            protocol: "https".to_string(),
            host: "example.com".to_string(),
            port: 443,
        }
    }

    struct GrantingDelegate;

    impl UiDelegate for GrantingDelegate {
        fn run_javascript_confirm(&mut self, _: &str, _: &FrameInfo) -> bool {
            true
        }

        fn run_javascript_prompt(
            &mut self,
            _: &str,
            default_text: Option<&str>,
            _: &FrameInfo,
        ) -> Option<String> {
            default_text.map(str::to_string)
        }

        fn request_media_capture_permission(
            &mut self,
            _: &SecurityOrigin,
            _: MediaCaptureKind,
            _: &FrameInfo,
        ) -> PermissionDecision {
            PermissionDecision::Grant
        }
    }

    #[test]
    fn test_dialogs_dismiss_safely_without_original() {
        let view = shared_view(1000);
        let mut proxy = UiDelegateProxy::new(None, Arc::downgrade(&view));

        assert!(!proxy.run_javascript_confirm("delete everything?", &frame()));
        assert_eq!(proxy.run_javascript_prompt("name?", Some("anon"), &frame()), None);
        assert_eq!(
            proxy.request_media_capture_permission(&origin(), MediaCaptureKind::Camera, &frame()),
            PermissionDecision::Deny
        );
        assert!(!proxy.create_web_view(&NavigationAction {
            url: None,
            navigation_type: crate::proxy::NavigationType::Other,
            target_is_main_frame: false,
        }));

        // Every call produced exactly one event.
        assert_eq!(view.read().unwrap().filtered().len(), 4);
    }

    #[test]
    fn test_original_answers_are_forwarded() {
        let view = shared_view(1000);
        let mut proxy = UiDelegateProxy::new(Some(Box::new(GrantingDelegate)), Arc::downgrade(&view));

        assert!(proxy.run_javascript_confirm("ok?", &frame()));
        assert_eq!(
            proxy.run_javascript_prompt("name?", Some("anon"), &frame()),
            Some("anon".to_string())
        );
        assert_eq!(
            proxy.request_media_capture_permission(&origin(), MediaCaptureKind::Microphone, &frame()),
            PermissionDecision::Grant
        );
    }

    #[test]
    fn test_permission_event_carries_origin() {
        let view = shared_view(1000);
        let mut proxy = UiDelegateProxy::new(None, Arc::downgrade(&view));

        proxy.request_media_capture_permission(&origin(), MediaCaptureKind::Camera, &frame());

        let guard = view.read().unwrap();
        let event = &guard.filtered()[0];
        assert_eq!(event.label, "requestMediaCapturePermission");
        assert!(event.raw_description.contains("origin: https://example.com:443"));
    }
}
