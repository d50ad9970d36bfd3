//! The DOM seam.
//!
//! Anchoring code never touches a concrete document model directly; it goes
//! through [`Page`]. [`HtmlPage`] implements it over parsed HTML.

use scraper::Selector;

mod html_page;

pub use html_page::{HtmlPage, HIGHLIGHT_STYLE};

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;

/// Handle to a node of a specific page revision.
///
/// Handles are positions in document order. They stop resolving once the
/// page re-renders, so a stale handle is simply "not found".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle {
    revision: u64,
    index: usize,
}

impl NodeHandle {
    pub fn new(revision: u64, index: usize) -> Self {
        Self { revision, index }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Position of the node in document order.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Read access to document structure plus the cosmetic writes anchoring needs.
///
/// Implementations must never reorder or delete nodes on behalf of callers;
/// the only mutation is the highlight treatment and scroll position.
pub trait Page: Send + 'static {
    /// Bumped whenever the document is re-rendered.
    fn revision(&self) -> u64;

    /// Elements matching `selector`, each once, in document order.
    fn select(&self, selector: &Selector) -> Vec<NodeHandle>;

    /// First element whose attribute `name` equals `value`.
    fn element_by_attr(&self, name: &str, value: &str) -> Option<NodeHandle>;

    /// First element with the given `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<NodeHandle> {
        self.element_by_attr("id", id)
    }

    /// Text nodes under `<body>` with their raw text, in document order.
    fn text_nodes(&self) -> Vec<(NodeHandle, String)>;

    /// Nearest ancestor that is an element.
    fn parent_element(&self, node: NodeHandle) -> Option<NodeHandle>;

    /// Lowercase tag name, `None` for non-elements or stale handles.
    fn tag_name(&self, node: NodeHandle) -> Option<String>;

    fn attr(&self, node: NodeHandle, name: &str) -> Option<String>;

    /// Serialized children of an element.
    fn inner_html(&self, node: NodeHandle) -> Option<String>;

    fn scroll_into_view(&mut self, node: NodeHandle) -> bool;

    /// Apply or remove the highlight treatment. Returns false for stale handles.
    fn set_highlighted(&mut self, node: NodeHandle, on: bool) -> bool;

    fn is_highlighted(&self, node: NodeHandle) -> bool;

    /// Short `<tag id class>` description for logs.
    fn describe(&self, node: NodeHandle) -> String {
        let Some(tag) = self.tag_name(node) else {
            return format!("<stale #{}>", node.index());
        };
        let mut out = format!("<{tag}");
        if let Some(id) = self.attr(node, "id") {
            out.push_str(&format!(" id=\"{id}\""));
        }
        if let Some(class) = self.attr(node, "class") {
            out.push_str(&format!(" class=\"{class}\""));
        }
        out.push('>');
        out
    }
}
