//! Injected instrumentation scripts
//!
//! The page side of the capture pipeline: a console intercept installed
//! before any page content executes, plus snapshot scripts evaluated on
//! demand for DOM and storage inspection.
//!
//! The console intercept is idempotent (a marker flag on `window` makes a
//! second injection a no-op) and forwarding: every intercepted call still
//! invokes the original console method after posting to the host.

use serde::Serialize;

/// Name of the host message channel the console intercept posts to
pub const CONSOLE_HANDLER_NAME: &str = "webscope_console";

/// Marker flag the console intercept sets on `window` to guard reinjection
pub const INIT_MARKER: &str = "__webscope_initialized";

/// When an injected script runs relative to page content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionTime {
    /// Before any page content executes
    DocumentStart,
    /// After the document finishes parsing
    DocumentEnd,
}

/// A script the host must install into the web view
#[derive(Debug, Clone, Serialize)]
pub struct InjectedScript {
    /// JavaScript source
    pub source: String,
    /// When the engine should run it
    pub injection_time: InjectionTime,
    /// Whether to inject into the main frame only
    pub main_frame_only: bool,
}

/// Build the console intercept for the given host channel name
///
/// Wraps the five recognized severities, posting `{method, args}` with every
/// argument stringified (objects as pretty JSON) before delegating to the
/// original method.
pub fn console_capture_script(handler_name: &str) -> InjectedScript {
    let source = format!(
        r#"(function() {{
    if (window.{marker}) return;
    window.{marker} = true;

    const methods = ['log', 'warn', 'error', 'info', 'debug'];
    methods.forEach((method) => {{
        const original = console[method];
        console[method] = function(...args) {{
            window.webkit.messageHandlers.{handler}.postMessage({{
                method: method,
                args: args.map(arg => {{
                    try {{
                        if (typeof arg === 'object') {{
                            return JSON.stringify(arg, null, 2);
                        }}
                        return String(arg);
                    }} catch {{
                        return String(arg);
                    }}
                }})
            }});
            original.apply(console, args);
        }};
    }});
}})();"#,
        marker = INIT_MARKER,
        handler = handler_name,
    );

    InjectedScript {
        source,
        injection_time: InjectionTime::DocumentStart,
        main_frame_only: false,
    }
}

/// Snapshot of the element tree under `document.body`, serialized to JSON
///
/// Each node carries its tag, id, class, the text directly inside it (leaf
/// nodes fall back to their rendered text), and its children.
pub const DOM_SNAPSHOT_SCRIPT: &str = r#"(function() {
    function getDomTree(element) {
        let directText = "";
        for (let node of element.childNodes) {
            if (node.nodeType === Node.TEXT_NODE) {
                const text = node.textContent.trim();
                if (text) {
                    directText += (directText ? " " : "") + text;
                }
            }
        }

        const obj = {
            tag: element.tagName || "",
            id: element.id || "",
            className: (typeof element.className === 'string' ? element.className : element.className?.baseVal || "") || "",
            innerText: element.children.length === 0 ? (directText || element.innerText?.trim() || null) : (directText || null),
            children: []
        };

        for (let child of element.children) {
            obj.children.push(getDomTree(child));
        }
        return obj;
    }
    return JSON.stringify(getDomTree(document.body));
})()"#;

/// `localStorage` entries as `[key, value]` pairs; `[]` when unavailable
pub const LOCAL_STORAGE_SCRIPT: &str = r#"(function() {
    try {
        return Object.entries(localStorage || {});
    } catch(e) {
        return [];
    }
})();"#;

/// `sessionStorage` entries as `[key, value]` pairs; `[]` when unavailable
pub const SESSION_STORAGE_SCRIPT: &str = r#"(function() {
    try {
        return Object.entries(sessionStorage || {});
    } catch(e) {
        return [];
    }
})();"#;

/// The document's cookie string
pub const COOKIE_SCRIPT: &str = "document.cookie || '';";
