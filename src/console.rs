//! Console message capture
//!
//! The injected console intercept forwards every `log`/`warn`/`error`/`info`/
//! `debug` call to the host as a `{method, args}` payload. This module parses
//! those payloads into [`ConsoleMessage`] records and retains them in a
//! [`ConsoleLog`], the same bounded, batch-evicting design as the event
//! store.
//!
//! Parsing is total over well-formed input only: a payload missing `method`
//! or `args`, or naming an unknown severity, is dropped silently, never
//! appended, never an error.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::store::{BoundedLog, DEFAULT_EVICT_CHUNK};

/// The closed set of console severities the intercept recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)] // variants mirror the page-side console methods
pub enum ConsoleLevel {
    Log,
    Warn,
    Error,
    Info,
    Debug,
}

impl ConsoleLevel {
    /// Every known severity, in interception order
    pub const ALL: [ConsoleLevel; 5] = [
        ConsoleLevel::Log,
        ConsoleLevel::Warn,
        ConsoleLevel::Error,
        ConsoleLevel::Info,
        ConsoleLevel::Debug,
    ];

    /// The severity's page-side method name
    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleLevel::Log => "log",
            ConsoleLevel::Warn => "warn",
            ConsoleLevel::Error => "error",
            ConsoleLevel::Info => "info",
            ConsoleLevel::Debug => "debug",
        }
    }

    /// Parse a page-side method name
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "log" => Some(ConsoleLevel::Log),
            "warn" => Some(ConsoleLevel::Warn),
            "error" => Some(ConsoleLevel::Error),
            "info" => Some(ConsoleLevel::Info),
            "debug" => Some(ConsoleLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured console call
#[derive(Debug, Clone, Serialize)]
pub struct ConsoleMessage {
    /// Process-unique identifier
    pub id: Uuid,
    /// Severity of the intercepted call
    pub level: ConsoleLevel,
    /// The call's arguments, stringified and space-joined
    pub text: String,
    /// Capture time
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    /// Create a message with the current timestamp
    pub fn new(level: ConsoleLevel, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Parse a `{method, args}` payload posted by the console intercept
    ///
    /// Returns `None` for anything that is not a well-formed payload.
    pub fn from_payload(body: &Value) -> Option<Self> {
        let method = body.get("method")?.as_str()?;
        let level = ConsoleLevel::from_method(method)?;
        let args = body.get("args")?.as_array()?;

        let text = args
            .iter()
            .map(|arg| match arg {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");

        Some(Self::new(level, text))
    }
}

/// Bounded, insertion-ordered history of console messages
#[derive(Debug)]
pub struct ConsoleLog {
    log: BoundedLog<ConsoleMessage>,
}

impl ConsoleLog {
    /// Create a log with the given capacity and the default eviction batch
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            log: BoundedLog::new(capacity, DEFAULT_EVICT_CHUNK),
        }
    }

    /// Append a message, evicting the oldest batch if the bound is exceeded
    pub fn push(&mut self, message: ConsoleMessage) {
        let evicted = self.log.push(message);
        if evicted > 0 {
            debug!(evicted, retained = self.log.len(), "evicted oldest console messages");
        }
    }

    /// Drop every retained message
    pub fn clear(&mut self) {
        self.log.clear();
    }

    /// Iterate the retained messages in capture order
    pub fn messages(&self) -> impl Iterator<Item = &ConsoleMessage> {
        self.log.iter()
    }

    /// Clone the retained messages, oldest first
    pub fn snapshot(&self) -> Vec<ConsoleMessage> {
        self.log.snapshot()
    }

    /// Number of retained messages
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Whether the log holds no messages
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Total messages ever evicted by the capacity bound
    pub fn total_evicted(&self) -> u64 {
        self.log.total_evicted()
    }

    /// Messages matching an optional severity and a case-insensitive search
    ///
    /// The search matches the message text and the severity name; an empty
    /// search matches everything.
    pub fn filtered(&self, search: &str, level: Option<ConsoleLevel>) -> Vec<&ConsoleMessage> {
        let search = search.to_lowercase();
        self.log
            .iter()
            .filter(|m| level.map_or(true, |l| m.level == l))
            .filter(|m| {
                search.is_empty()
                    || m.text.to_lowercase().contains(&search)
                    || m.level.as_str().contains(&search)
            })
            .collect()
    }
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::with_capacity(crate::config::DEFAULT_MAX_CONSOLE_MESSAGES)
    }
}

/// Shared handle for producers on the engine's callback thread
pub type SharedConsoleLog = std::sync::Arc<std::sync::RwLock<ConsoleLog>>;

/// Create a shared console log with the given capacity
pub fn shared_console_log(capacity: usize) -> SharedConsoleLog {
    std::sync::Arc::new(std::sync::RwLock::new(ConsoleLog::with_capacity(capacity)))
}
