//! Page-side capture agent.

use std::sync::Arc;

use tracing::{debug, info};

use acc_anchor::{Capture, Encoder, NodeHandle, Page};
use acc_protocols::{Request, Response};

use crate::router::Router;

/// Captures excerpts on a page and submits them through the router.
pub struct CaptureAgent {
    router: Arc<Router>,
    encoder: Encoder,
}

impl CaptureAgent {
    pub fn new(router: Arc<Router>, encoder: Encoder) -> Self {
        Self { router, encoder }
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// Nodes a save control would be offered on.
    pub fn saveable_nodes<P: Page + ?Sized>(&self, page: &P) -> Vec<NodeHandle> {
        self.encoder.saveable_nodes(page)
    }

    /// Save a rendered message node.
    pub async fn save_node<P: Page + Sync + ?Sized>(
        &self,
        page: &P,
        node: NodeHandle,
        source_url: &str,
    ) -> Response {
        match self.encoder.capture_node(page, node) {
            Ok(capture) => self.submit(capture, source_url).await,
            Err(e) => {
                debug!("Capture refused: {}", e);
                Response::error(e.to_string())
            }
        }
    }

    /// Save a manual text selection.
    pub async fn save_selection(&self, text: &str, source_url: &str) -> Response {
        match self.encoder.capture_selection(text) {
            Ok(capture) => self.submit(capture, source_url).await,
            Err(e) => {
                debug!("Selection refused: {}", e);
                Response::error(e.to_string())
            }
        }
    }

    pub async fn submit(&self, capture: Capture, source_url: &str) -> Response {
        let fragment = capture.fragment();
        let response = self
            .router
            .handle(Request::AddEntry(capture.into_new_excerpt(source_url)))
            .await;
        if let Some(id) = &response.id {
            info!("Saved excerpt {} ({})", id, fragment);
        }
        response
    }
}
