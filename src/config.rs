//! Configuration for the debugging features
//!
//! `DebuggerConfig` controls which instrumentation hooks are installed and how
//! much history the bounded logs retain. The `default` preset enables
//! everything; `minimal` keeps only console capture; `production` disables
//! every feature so a debugger constructed with it is inert.
//!
//! # Example
//!
//! ```rust
//! use webscope::config::DebuggerConfig;
//!
//! let config = DebuggerConfig::builder()
//!     .console_logging(true)
//!     .dom_inspection(false)
//!     .max_console_messages(500)
//!     .build();
//!
//! assert!(config.console_logging);
//! assert!(!config.dom_inspection);
//! ```

use std::collections::HashSet;

use crate::storage::WebStorageKind;

/// Default maximum number of console messages kept in memory
pub const DEFAULT_MAX_CONSOLE_MESSAGES: usize = 1000;

/// Default maximum number of lifecycle events kept in memory
pub const DEFAULT_MAX_EVENTS: usize = 1000;

/// Configuration for the debugging features
#[derive(Debug, Clone)]
pub struct DebuggerConfig {
    /// Intercept page console calls and record them
    pub console_logging: bool,
    /// Allow DOM tree snapshots
    pub dom_inspection: bool,
    /// Allow web storage snapshots
    pub storage_inspection: bool,
    /// Capture navigation, UI-delegate, and script-message events
    pub event_capture: bool,
    /// Which storage kinds a storage snapshot collects
    pub storage_kinds: HashSet<WebStorageKind>,
    /// Maximum number of console messages to keep in memory
    pub max_console_messages: usize,
    /// Maximum number of lifecycle events to keep in memory
    pub max_events: usize,
}

impl Default for DebuggerConfig {
    fn default() -> Self {
        Self {
            console_logging: true,
            dom_inspection: true,
            storage_inspection: true,
            event_capture: true,
            storage_kinds: WebStorageKind::all(),
            max_console_messages: DEFAULT_MAX_CONSOLE_MESSAGES,
            max_events: DEFAULT_MAX_EVENTS,
        }
    }
}

impl DebuggerConfig {
    /// Configuration with only console capture enabled
    pub fn minimal() -> Self {
        Self {
            console_logging: true,
            dom_inspection: false,
            storage_inspection: false,
            event_capture: false,
            ..Default::default()
        }
    }

    /// Configuration with every feature disabled
    pub fn production() -> Self {
        Self {
            console_logging: false,
            dom_inspection: false,
            storage_inspection: false,
            event_capture: false,
            ..Default::default()
        }
    }

    /// Create a fluent builder starting from the defaults
    pub fn builder() -> DebuggerConfigBuilder {
        DebuggerConfigBuilder::default()
    }
}

/// Builder for [`DebuggerConfig`]
#[derive(Debug, Clone, Default)]
pub struct DebuggerConfigBuilder {
    config: DebuggerConfig,
}

impl DebuggerConfigBuilder {
    /// Enable or disable console capture
    pub fn console_logging(mut self, enabled: bool) -> Self {
        self.config.console_logging = enabled;
        self
    }

    /// Enable or disable DOM snapshots
    pub fn dom_inspection(mut self, enabled: bool) -> Self {
        self.config.dom_inspection = enabled;
        self
    }

    /// Enable or disable storage snapshots
    pub fn storage_inspection(mut self, enabled: bool) -> Self {
        self.config.storage_inspection = enabled;
        self
    }

    /// Enable or disable lifecycle event capture
    pub fn event_capture(mut self, enabled: bool) -> Self {
        self.config.event_capture = enabled;
        self
    }

    /// Restrict which storage kinds are collected
    pub fn storage_kinds(mut self, kinds: HashSet<WebStorageKind>) -> Self {
        self.config.storage_kinds = kinds;
        self
    }

    /// Set the console history bound
    pub fn max_console_messages(mut self, count: usize) -> Self {
        self.config.max_console_messages = count;
        self
    }

    /// Set the event history bound
    pub fn max_events(mut self, count: usize) -> Self {
        self.config.max_events = count;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DebuggerConfig {
        self.config
    }
}
