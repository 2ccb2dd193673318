//! DOM snapshot model
//!
//! The DOM inspector works on a point-in-time JSON snapshot produced by the
//! injected snapshot script, decoded here into a [`DomNode`] tree. The tree
//! renders back to an HTML-ish outline for display and export.

use serde::Deserialize;

use crate::error::Result;

/// One element in a DOM snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct DomNode {
    /// Element tag name, as reported by the page (usually uppercase)
    pub tag: String,
    /// The element's `id` attribute, empty when absent
    #[serde(rename = "id", default)]
    pub id_attr: String,
    /// The element's `class` attribute, empty when absent
    #[serde(rename = "className", default)]
    pub class_name: String,
    /// Direct text content; `None` when the element has none of its own
    #[serde(rename = "innerText", default)]
    pub inner_text: Option<String>,
    /// Child elements in document order
    #[serde(default)]
    pub children: Vec<DomNode>,
}

impl DomNode {
    /// Decode a snapshot from the JSON string the snapshot script returns
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Total number of elements in this subtree, including this node
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DomNode::node_count).sum::<usize>()
    }

    /// Render the subtree as an indented HTML-ish outline
    ///
    /// Tags are lowercased, id/class attributes included when present,
    /// childless text-less elements rendered self-closing.
    pub fn to_raw_text(&self, indent: usize) -> String {
        let indent_string = "  ".repeat(indent);
        let mut result = format!("{}<{}", indent_string, self.tag.to_lowercase());

        if !self.id_attr.is_empty() {
            result.push_str(&format!(" id=\"{}\"", self.id_attr));
        }

        if !self.class_name.is_empty() {
            result.push_str(&format!(" class=\"{}\"", self.class_name));
        }

        let text = self.inner_text.as_deref().unwrap_or("");
        if self.children.is_empty() && text.is_empty() {
            result.push_str(" />");
        } else {
            result.push('>');

            if self.children.is_empty() && !text.is_empty() {
                result.push_str(text);
            }

            for child in &self.children {
                result.push('\n');
                result.push_str(&child.to_raw_text(indent + 1));
            }

            if !self.children.is_empty() {
                result.push('\n');
                result.push_str(&indent_string);
            }
            result.push_str(&format!("</{}>", self.tag.to_lowercase()));
        }

        result
    }
}
