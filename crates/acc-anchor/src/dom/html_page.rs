//! `Page` implementation over parsed HTML.
//!
//! The document is parsed once into a flat node arena (pre-order, so arena
//! positions equal document order). Selector matching re-parses the retained
//! source; parsing is deterministic, so positions line up with the arena.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Node, Selector};

use super::{NodeHandle, Page};

/// Inline declarations applied while a node is highlighted.
pub const HIGHLIGHT_STYLE: &str =
    "transition: all 0.5s; background-color: #fef3c7; box-shadow: 0 0 0 4px #fef3c7; border-radius: 4px";

#[derive(Debug, Clone)]
enum DomNodeKind {
    Document,
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Other,
}

#[derive(Debug, Clone)]
struct DomNode {
    kind: DomNodeKind,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl DomNode {
    fn from_scraper(node: &Node, parent: Option<usize>) -> Self {
        let kind = match node {
            Node::Document => DomNodeKind::Document,
            Node::Element(el) => DomNodeKind::Element {
                tag: el.name().to_ascii_lowercase(),
                attrs: el
                    .attrs()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
            Node::Text(text) => DomNodeKind::Text(String::from(&**text)),
            _ => DomNodeKind::Other,
        };
        Self {
            kind,
            parent,
            children: Vec::new(),
        }
    }

    fn tag(&self) -> Option<&str> {
        match &self.kind {
            DomNodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        match &self.kind {
            DomNodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }
}

/// An HTML document with a highlight overlay.
#[derive(Debug, Clone)]
pub struct HtmlPage {
    source: String,
    nodes: Vec<DomNode>,
    revision: u64,
    highlighted: HashSet<usize>,
    scrolled_to: Option<NodeHandle>,
}

impl HtmlPage {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let nodes = build_arena(&source);
        Self {
            source,
            nodes,
            revision: 0,
            highlighted: HashSet::new(),
            scrolled_to: None,
        }
    }

    /// Replace the document, as when the host application re-renders.
    ///
    /// Outstanding handles go stale and the overlay is discarded.
    pub fn set_content(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.nodes = build_arena(&self.source);
        self.revision += 1;
        self.highlighted.clear();
        self.scrolled_to = None;
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The node most recently scrolled into view.
    pub fn scrolled_to(&self) -> Option<NodeHandle> {
        self.scrolled_to
    }

    /// Effective inline style: the element's own `style` plus the highlight
    /// treatment while it is applied.
    pub fn inline_style(&self, node: NodeHandle) -> Option<String> {
        let own = self.node(node)?.attr("style").map(str::to_string);
        if !self.highlighted.contains(&node.index()) {
            return own;
        }
        Some(match own {
            Some(own) if !own.trim().is_empty() => {
                format!("{}; {HIGHLIGHT_STYLE}", own.trim().trim_end_matches(';'))
            }
            _ => HIGHLIGHT_STYLE.to_string(),
        })
    }

    /// Currently highlighted nodes, in document order.
    pub fn highlighted(&self) -> Vec<NodeHandle> {
        let mut out: Vec<_> = self
            .highlighted
            .iter()
            .map(|&i| NodeHandle::new(self.revision, i))
            .collect();
        out.sort();
        out
    }

    fn node(&self, handle: NodeHandle) -> Option<&DomNode> {
        if handle.revision() != self.revision {
            return None;
        }
        self.nodes.get(handle.index())
    }

    fn handle(&self, index: usize) -> NodeHandle {
        NodeHandle::new(self.revision, index)
    }

    fn body(&self) -> Option<usize> {
        self.nodes.iter().position(|n| n.tag() == Some("body"))
    }

    fn is_within(&self, mut index: usize, ancestor: usize) -> bool {
        loop {
            if index == ancestor {
                return true;
            }
            match self.nodes[index].parent {
                Some(parent) => index = parent,
                None => return false,
            }
        }
    }
}

/// Pre-order walk of the parsed tree into a flat arena.
fn build_arena(source: &str) -> Vec<DomNode> {
    let html = Html::parse_document(source);
    let mut nodes: Vec<DomNode> = Vec::new();
    let mut stack = vec![(html.tree.root(), None::<usize>)];

    while let Some((node, parent)) = stack.pop() {
        let index = nodes.len();
        nodes.push(DomNode::from_scraper(node.value(), parent));
        if let Some(parent) = parent {
            nodes[parent].children.push(index);
        }
        let children: Vec<_> = node.children().collect();
        for child in children.into_iter().rev() {
            stack.push((child, Some(index)));
        }
    }

    nodes
}

impl Page for HtmlPage {
    fn revision(&self) -> u64 {
        self.revision
    }

    fn select(&self, selector: &Selector) -> Vec<NodeHandle> {
        let html = Html::parse_document(&self.source);
        html.tree
            .root()
            .descendants()
            .enumerate()
            .filter(|(_, node)| ElementRef::wrap(*node).is_some_and(|el| selector.matches(&el)))
            .map(|(index, _)| self.handle(index))
            .collect()
    }

    fn element_by_attr(&self, name: &str, value: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .position(|n| n.attr(name) == Some(value))
            .map(|i| self.handle(i))
    }

    fn text_nodes(&self) -> Vec<(NodeHandle, String)> {
        let body = self.body();
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| match &n.kind {
                DomNodeKind::Text(text) => Some((i, text)),
                _ => None,
            })
            .filter(|(i, _)| body.is_none_or(|b| self.is_within(*i, b)))
            .map(|(i, text)| (self.handle(i), text.clone()))
            .collect()
    }

    fn parent_element(&self, node: NodeHandle) -> Option<NodeHandle> {
        let mut current = self.node(node)?.parent;
        while let Some(index) = current {
            if self.nodes[index].tag().is_some() {
                return Some(self.handle(index));
            }
            current = self.nodes[index].parent;
        }
        None
    }

    fn tag_name(&self, node: NodeHandle) -> Option<String> {
        self.node(node)?.tag().map(str::to_string)
    }

    fn attr(&self, node: NodeHandle, name: &str) -> Option<String> {
        self.node(node)?.attr(name).map(str::to_string)
    }

    fn inner_html(&self, node: NodeHandle) -> Option<String> {
        self.node(node)?.tag()?;
        let html = Html::parse_document(&self.source);
        html.tree
            .root()
            .descendants()
            .nth(node.index())
            .and_then(ElementRef::wrap)
            .map(|el| el.inner_html())
    }

    fn scroll_into_view(&mut self, node: NodeHandle) -> bool {
        if self.node(node).and_then(DomNode::tag).is_none() {
            return false;
        }
        self.scrolled_to = Some(node);
        true
    }

    fn set_highlighted(&mut self, node: NodeHandle, on: bool) -> bool {
        if self.node(node).and_then(DomNode::tag).is_none() {
            return false;
        }
        if on {
            self.highlighted.insert(node.index());
        } else {
            self.highlighted.remove(&node.index());
        }
        true
    }

    fn is_highlighted(&self, node: NodeHandle) -> bool {
        node.revision() == self.revision && self.highlighted.contains(&node.index())
    }
}
