//! Capture-time anchoring.
//!
//! Turns a source node (or a bare text selection) into content plus the
//! [`PositionDescriptor`] that will later bring the reader back to it.

use std::sync::Arc;

use tracing::debug;

use acc_protocols::{AnchorError, NewExcerpt, PositionDescriptor};

use crate::candidates::{enumerate_candidates, CandidateSelectors};
use crate::dom::{NodeHandle, Page};
use crate::fragment::encode_fragment;
use crate::text::{extract_fingerprint, text_fingerprint};

/// Tag attached to excerpts saved from a manual text selection.
pub const SELECTION_TAG: &str = "Selection";

/// Attribute carrying the host application's own message id.
pub const MESSAGE_ID_ATTR: &str = "data-message-id";

const AUTHOR_ROLE_ATTR: &str = "data-message-author-role";
const USER_CLASS_MARKERS: [&str; 5] = ["user", "human", "request", "mine", "flex-row-reverse"];
const USER_SCAN_DEPTH: usize = 8;
const MIN_CONTENT_CHARS: usize = 2;

/// Content and anchor captured from a page, ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub content: String,
    pub anchor: PositionDescriptor,
    pub tags: Vec<String>,
    pub title: Option<String>,
}

impl Capture {
    pub fn fragment(&self) -> String {
        encode_fragment(&self.anchor)
    }

    pub fn into_new_excerpt(self, source_url: impl Into<String>) -> NewExcerpt {
        let excerpt = NewExcerpt::new(self.content, source_url, self.anchor).with_tags(self.tags);
        match self.title {
            Some(title) => excerpt.with_title(title),
            None => excerpt,
        }
    }
}

/// Pick the strongest descriptor available for a node.
///
/// Stable ids beat candidate rank, which beats a text fingerprint. Reads the
/// page only.
pub fn encode_anchor<P: Page + ?Sized>(
    page: &P,
    node: Option<NodeHandle>,
    candidates: &[NodeHandle],
    content: &str,
) -> PositionDescriptor {
    if let Some(node) = node {
        let stable_id = page
            .attr(node, MESSAGE_ID_ATTR)
            .filter(|v| !v.is_empty())
            .or_else(|| page.attr(node, "id").filter(|v| !v.is_empty()));
        if let Some(id) = stable_id {
            return PositionDescriptor::StableId(id);
        }
        if let Some(rank) = candidates.iter().position(|c| *c == node) {
            return PositionDescriptor::PositionalIndex(rank);
        }
    }
    PositionDescriptor::TextFingerprint(extract_fingerprint(content))
}

/// Whether the node sits inside a message authored by the user.
///
/// Looks at the node and up to seven ancestors, stopping at `<body>`.
pub fn is_user_message<P: Page + ?Sized>(page: &P, node: NodeHandle) -> bool {
    let mut current = Some(node);
    for _ in 0..USER_SCAN_DEPTH {
        let Some(el) = current else { break };
        if page.tag_name(el).as_deref() == Some("body") {
            break;
        }
        let class = page.attr(el, "class").unwrap_or_default().to_lowercase();
        if USER_CLASS_MARKERS.iter().any(|m| class.contains(m))
            || page.attr(el, AUTHOR_ROLE_ATTR).as_deref() == Some("user")
        {
            return true;
        }
        current = page.parent_element(el);
    }
    false
}

/// Builds captures using a fixed candidate selector set.
#[derive(Debug, Clone)]
pub struct Encoder {
    selectors: Arc<CandidateSelectors>,
}

impl Encoder {
    pub fn new(selectors: Arc<CandidateSelectors>) -> Self {
        Self { selectors }
    }

    pub fn selectors(&self) -> &CandidateSelectors {
        &self.selectors
    }

    /// Candidates the page currently offers for saving, user messages excluded.
    pub fn saveable_nodes<P: Page + ?Sized>(&self, page: &P) -> Vec<NodeHandle> {
        enumerate_candidates(page, &self.selectors)
            .into_iter()
            .filter(|n| !is_user_message(page, *n))
            .collect()
    }

    /// Capture a rendered message node.
    pub fn capture_node<P: Page + ?Sized>(
        &self,
        page: &P,
        node: NodeHandle,
    ) -> Result<Capture, AnchorError> {
        let content = page.inner_html(node).unwrap_or_default();
        if content.trim().chars().count() < MIN_CONTENT_CHARS {
            return Err(AnchorError::EmptyContent);
        }
        let candidates = enumerate_candidates(page, &self.selectors);
        let anchor = encode_anchor(page, Some(node), &candidates, &content);
        debug!(node = %page.describe(node), kind = %anchor.kind(), "Captured node");
        Ok(Capture {
            content,
            anchor,
            tags: Vec::new(),
            title: None,
        })
    }

    /// Capture a manual text selection. Only a fingerprint is possible.
    pub fn capture_selection(&self, text: &str) -> Result<Capture, AnchorError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AnchorError::EmptySelection);
        }
        if text.chars().count() < MIN_CONTENT_CHARS {
            return Err(AnchorError::EmptyContent);
        }
        Ok(Capture {
            content: text.to_string(),
            anchor: PositionDescriptor::TextFingerprint(text_fingerprint(text)),
            tags: vec![SELECTION_TAG.to_string()],
            title: None,
        })
    }
}

#[cfg(test)]
#[path = "encoder_tests.rs"]
mod tests;
