//! Web storage snapshot model
//!
//! Storage inspection collects `localStorage` and `sessionStorage` entries
//! (returned by the injected scripts as `[key, value]` pair arrays) and the
//! `document.cookie` string. Malformed fragments are skipped, never errors.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kinds of web storage a snapshot can collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum WebStorageKind {
    LocalStorage,
    SessionStorage,
    Cookies,
}

impl WebStorageKind {
    /// Every storage kind
    pub fn all() -> HashSet<WebStorageKind> {
        [
            WebStorageKind::LocalStorage,
            WebStorageKind::SessionStorage,
            WebStorageKind::Cookies,
        ]
        .into_iter()
        .collect()
    }

    /// Human-readable label
    pub fn as_str(self) -> &'static str {
        match self {
            WebStorageKind::LocalStorage => "Local Storage",
            WebStorageKind::SessionStorage => "Session Storage",
            WebStorageKind::Cookies => "Cookies",
        }
    }
}

impl fmt::Display for WebStorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One key/value entry from a storage snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[allow(missing_docs)]
pub struct WebStorageItem {
    pub key: String,
    pub value: String,
    pub kind: WebStorageKind,
}

impl WebStorageItem {
    /// Create an entry
    pub fn new(key: impl Into<String>, value: impl Into<String>, kind: WebStorageKind) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            kind,
        }
    }
}

/// Parse the `[[key, value], …]` array an `Object.entries` script returns
///
/// Entries that are not two-element string pairs are skipped.
pub fn parse_entries(value: &Value, kind: WebStorageKind) -> Vec<WebStorageItem> {
    let Some(entries) = value.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let pair = entry.as_array()?;
            if pair.len() != 2 {
                return None;
            }
            let key = pair[0].as_str()?;
            let value = pair[1].as_str()?;
            Some(WebStorageItem::new(key, value, kind))
        })
        .collect()
}

/// Parse a `document.cookie` string into cookie entries
///
/// Cookies are `;`-separated `name=value` fragments; the value keeps any
/// embedded `=`. Fragments without a `=` are skipped.
pub fn parse_cookie_string(cookies: &str) -> Vec<WebStorageItem> {
    cookies
        .split(';')
        .filter_map(|pair| {
            let trimmed = pair.trim();
            let (key, value) = trimmed.split_once('=')?;
            Some(WebStorageItem::new(key, value, WebStorageKind::Cookies))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_entries() {
        let value = json!([["theme", "dark"], ["token", "abc"]]);
        let items = parse_entries(&value, WebStorageKind::LocalStorage);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], WebStorageItem::new("theme", "dark", WebStorageKind::LocalStorage));
    }

    #[test]
    fn test_parse_entries_skips_malformed() {
        let value = json!([["ok", "1"], ["only-key"], [1, 2], "junk", ["a", "b", "c"]]);
        let items = parse_entries(&value, WebStorageKind::SessionStorage);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].key, "ok");
    }

    #[test]
    fn test_parse_entries_non_array() {
        assert!(parse_entries(&json!({"a": 1}), WebStorageKind::LocalStorage).is_empty());
    }

    #[test]
    fn test_parse_cookie_string() {
        let items = parse_cookie_string("session=abc123; theme=dark;flag");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].key, "session");
        assert_eq!(items[0].value, "abc123");
        assert_eq!(items[1].key, "theme");
    }

    #[test]
    fn test_parse_cookie_value_keeps_embedded_equals() {
        let items = parse_cookie_string("token=a=b=c");
        assert_eq!(items[0].value, "a=b=c");
    }

    #[test]
    fn test_parse_empty_cookie_string() {
        assert!(parse_cookie_string("").is_empty());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(WebStorageKind::LocalStorage.as_str(), "Local Storage");
        assert_eq!(WebStorageKind::all().len(), 3);
    }
}
