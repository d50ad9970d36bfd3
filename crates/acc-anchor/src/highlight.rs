//! Self-reverting highlight effect.
//!
//! Every application takes a fresh token. The revert task only clears a node
//! whose current token is still its own, so re-highlighting refreshes the
//! effect and an older revert never cuts a newer highlight short.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::dom::{NodeHandle, Page};

/// A live highlight.
#[derive(Debug)]
pub struct HighlightHandle {
    pub node: NodeHandle,
    pub token: u64,

    /// Resolves to whether this application's revert cleared the node.
    pub revert: JoinHandle<bool>,
}

/// Applies and reverts the highlight treatment on a shared page.
pub struct Highlighter<P: Page> {
    /// Page the revert tasks write back to.
    page: Arc<Mutex<P>>,

    /// How long the treatment stays on.
    duration: Duration,

    /// Current token per highlighted node.
    tokens: Arc<Mutex<HashMap<NodeHandle, u64>>>,

    next_token: Arc<AtomicU64>,
}

impl<P: Page> Clone for Highlighter<P> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
            duration: self.duration,
            tokens: self.tokens.clone(),
            next_token: self.next_token.clone(),
        }
    }
}

impl<P: Page> Highlighter<P> {
    pub fn new(page: Arc<Mutex<P>>, duration: Duration) -> Self {
        Self {
            page,
            duration,
            tokens: Arc::new(Mutex::new(HashMap::new())),
            next_token: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Scroll to `node`, highlight it and schedule the revert.
    ///
    /// Takes the already-locked page so callers can locate and highlight under
    /// one lock. Must be called inside a tokio runtime. Returns `None` if the
    /// handle is stale.
    pub fn apply(&self, page: &mut P, node: NodeHandle) -> Option<HighlightHandle> {
        if !page.scroll_into_view(node) || !page.set_highlighted(node, true) {
            debug!(index = node.index(), "Highlight skipped for stale node");
            return None;
        }

        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.tokens.lock().insert(node, token);
        trace!(node = %page.describe(node), token, "Highlight applied");

        let page = self.page.clone();
        let tokens = self.tokens.clone();
        let duration = self.duration;
        let revert = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // Lock order is page then tokens, same as `apply` callers.
            let mut page = page.lock();
            let mut tokens = tokens.lock();
            if tokens.get(&node) != Some(&token) {
                return false;
            }
            tokens.remove(&node);
            page.set_highlighted(node, false);
            trace!(index = node.index(), token, "Highlight reverted");
            true
        });

        Some(HighlightHandle {
            node,
            token,
            revert,
        })
    }

    /// Nodes with a pending revert.
    pub fn active(&self) -> usize {
        self.tokens.lock().len()
    }
}
