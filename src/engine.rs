//! The seam to the embedded browser engine
//!
//! The crate never talks to a concrete engine. It consumes two narrow
//! contracts the host provides: an asynchronous [`ScriptEvaluator`] for
//! on-demand JavaScript evaluation, and [`ScriptMessage`] envelopes delivered
//! through the engine's page-to-host message channel.
//!
//! The debugger holds the evaluator weakly (the host view owns the engine's
//! lifetime), so a torn-down view turns every evaluation into "no data"
//! rather than an error.

use futures::future::BoxFuture;
use serde_json::Value;
use url::Url;

use crate::error::Result;

/// Asynchronous JavaScript evaluation provided by the host's engine binding
///
/// Object-safe so the debugger can hold `Weak<dyn ScriptEvaluator>`.
pub trait ScriptEvaluator: Send + Sync {
    /// Evaluate a script in the page and return its JSON-converted result
    fn evaluate(&self, script: &str) -> BoxFuture<'_, Result<Value>>;
}

/// A message posted from page scripts to a named host channel
#[derive(Debug, Clone)]
pub struct ScriptMessage {
    /// The channel name the page posted to
    pub name: String,
    /// The posted body, as loosely-typed JSON
    pub body: Value,
    /// URL of the frame that posted, when known
    pub frame_url: Option<Url>,
}

impl ScriptMessage {
    /// Create a message envelope
    pub fn new(name: impl Into<String>, body: Value, frame_url: Option<Url>) -> Self {
        Self {
            name: name.into(),
            body,
            frame_url,
        }
    }
}
