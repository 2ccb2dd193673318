//! Navigation delegate proxy

use std::sync::{RwLock, Weak};

use url::Url;

use crate::event::{DetailValue, Event, EventKind, NavigationMethod};
use crate::view::EventsView;

use super::{
    emit, AuthChallengeDisposition, AuthenticationChallenge, NavigationAction, NavigationPolicy,
    NavigationResponse,
};

/// The engine's navigation callback interface
///
/// Every method has a safe default so implementors override only what they
/// care about; decision methods default to letting the engine proceed.
#[allow(unused_variables)]
pub trait NavigationDelegate: Send {
    /// Decide whether a pending navigation action may proceed
    fn decide_policy_for_navigation_action(&mut self, action: &NavigationAction) -> NavigationPolicy {
        NavigationPolicy::Allow
    }

    /// Decide whether a received navigation response may be committed
    fn decide_policy_for_navigation_response(
        &mut self,
        response: &NavigationResponse,
    ) -> NavigationPolicy {
        NavigationPolicy::Allow
    }

    /// Main-frame load started
    fn did_start_provisional_navigation(&mut self, url: Option<&Url>) {}

    /// The server redirected the provisional load
    fn did_receive_server_redirect(&mut self, url: Option<&Url>) {}

    /// The provisional load failed
    fn did_fail_provisional_navigation(&mut self, url: Option<&Url>, error: &str) {}

    /// Content started arriving for the main frame
    fn did_commit_navigation(&mut self, url: Option<&Url>) {}

    /// The navigation finished loading
    fn did_finish_navigation(&mut self, url: Option<&Url>, title: Option<&str>) {}

    /// The committed navigation failed
    fn did_fail_navigation(&mut self, url: Option<&Url>, error: &str) {}

    /// The resource loader received an authentication challenge
    fn did_receive_authentication_challenge(
        &mut self,
        challenge: &AuthenticationChallenge,
    ) -> AuthChallengeDisposition {
        AuthChallengeDisposition::PerformDefaultHandling
    }

    /// The web content process was terminated
    fn web_content_process_did_terminate(&mut self, url: Option<&Url>) {}
}

/// Decorator that records every navigation callback as an event and forwards
/// it to an optionally wrapped original delegate
pub struct NavigationDelegateProxy {
    original: Option<Box<dyn NavigationDelegate>>,
    events: Weak<RwLock<EventsView>>,
}

impl NavigationDelegateProxy {
    /// Wrap an optional original delegate
    pub fn new(original: Option<Box<dyn NavigationDelegate>>, events: Weak<RwLock<EventsView>>) -> Self {
        Self { original, events }
    }

    /// Whether an original delegate is wrapped
    pub fn has_original(&self) -> bool {
        self.original.is_some()
    }

    fn log(&self, method: NavigationMethod, details: Vec<(&'static str, DetailValue)>) {
        emit(
            &self.events,
            Event::new(EventKind::Navigation, method.as_str(), details),
        );
    }
}

impl NavigationDelegate for NavigationDelegateProxy {
    fn decide_policy_for_navigation_action(&mut self, action: &NavigationAction) -> NavigationPolicy {
        self.log(
            NavigationMethod::DecidePolicyForNavigationAction,
            vec![
                ("url", DetailValue::opt_url(action.url.clone())),
                ("navigationType", DetailValue::from(action.navigation_type.raw_value())),
                ("targetFrame", DetailValue::from(action.target_is_main_frame)),
            ],
        );

        match self.original.as_mut() {
            Some(original) => original.decide_policy_for_navigation_action(action),
            None => NavigationPolicy::Allow,
        }
    }

    fn decide_policy_for_navigation_response(
        &mut self,
        response: &NavigationResponse,
    ) -> NavigationPolicy {
        let mut details = vec![
            ("url", DetailValue::opt_url(response.url.clone())),
            (
                "mimeType",
                DetailValue::from(response.mime_type.clone().unwrap_or_else(|| "unknown".to_string())),
            ),
        ];
        if let Some(status) = response.status_code {
            details.push(("statusCode", DetailValue::from(i64::from(status))));
        }
        self.log(NavigationMethod::DecidePolicyForNavigationResponse, details);

        match self.original.as_mut() {
            Some(original) => original.decide_policy_for_navigation_response(response),
            None => NavigationPolicy::Allow,
        }
    }

    fn did_start_provisional_navigation(&mut self, url: Option<&Url>) {
        self.log(
            NavigationMethod::DidStartProvisionalNavigation,
            vec![("url", DetailValue::opt_url(url.cloned()))],
        );
        if let Some(original) = self.original.as_mut() {
            original.did_start_provisional_navigation(url);
        }
    }

    fn did_receive_server_redirect(&mut self, url: Option<&Url>) {
        self.log(
            NavigationMethod::DidReceiveServerRedirectForProvisionalNavigation,
            vec![("url", DetailValue::opt_url(url.cloned()))],
        );
        if let Some(original) = self.original.as_mut() {
            original.did_receive_server_redirect(url);
        }
    }

    fn did_fail_provisional_navigation(&mut self, url: Option<&Url>, error: &str) {
        self.log(
            NavigationMethod::DidFailProvisionalNavigation,
            vec![
                ("url", DetailValue::opt_url(url.cloned())),
                ("error", DetailValue::Error(error.to_string())),
            ],
        );
        if let Some(original) = self.original.as_mut() {
            original.did_fail_provisional_navigation(url, error);
        }
    }

    fn did_commit_navigation(&mut self, url: Option<&Url>) {
        self.log(
            NavigationMethod::DidCommitNavigation,
            vec![("url", DetailValue::opt_url(url.cloned()))],
        );
        if let Some(original) = self.original.as_mut() {
            original.did_commit_navigation(url);
        }
    }

    fn did_finish_navigation(&mut self, url: Option<&Url>, title: Option<&str>) {
        self.log(
            NavigationMethod::DidFinishNavigation,
            vec![
                ("url", DetailValue::opt_url(url.cloned())),
                ("title", DetailValue::from(title.unwrap_or_default())),
            ],
        );
        if let Some(original) = self.original.as_mut() {
            original.did_finish_navigation(url, title);
        }
    }

    fn did_fail_navigation(&mut self, url: Option<&Url>, error: &str) {
        self.log(
            NavigationMethod::DidFailNavigation,
            vec![
                ("url", DetailValue::opt_url(url.cloned())),
                ("error", DetailValue::Error(error.to_string())),
            ],
        );
        if let Some(original) = self.original.as_mut() {
            original.did_fail_navigation(url, error);
        }
    }

    fn did_receive_authentication_challenge(
        &mut self,
        challenge: &AuthenticationChallenge,
    ) -> AuthChallengeDisposition {
        self.log(
            NavigationMethod::DidReceiveAuthenticationChallenge,
            vec![
                ("protectionSpace", DetailValue::from(challenge.host.as_str())),
                ("authenticationMethod", DetailValue::from(challenge.method.as_str())),
            ],
        );

        match self.original.as_mut() {
            Some(original) => original.did_receive_authentication_challenge(challenge),
            None => AuthChallengeDisposition::PerformDefaultHandling,
        }
    }

    fn web_content_process_did_terminate(&mut self, url: Option<&Url>) {
        self.log(
            NavigationMethod::WebContentProcessDidTerminate,
            vec![("url", DetailValue::opt_url(url.cloned()))],
        );
        if let Some(original) = self.original.as_mut() {
            original.web_content_process_did_terminate(url);
        }
    }
}
