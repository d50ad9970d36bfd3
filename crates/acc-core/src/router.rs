//! Message router.
//!
//! Single owner of the entry store. Every surface talks to it with tagged
//! JSON requests and gets a `{ ok, ... }` reply; failures become error
//! replies and never escape as panics or transport errors.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use acc_protocols::{EntryStore, Notification, Request, Response, RouterError};

/// Buffered notifications per subscriber before the oldest are dropped.
const NOTIFICATION_CAPACITY: usize = 64;

/// Dispatches requests to the store.
pub struct Router {
    store: Arc<dyn EntryStore>,
    notifications: broadcast::Sender<Notification>,
}

impl Router {
    pub fn new(store: Arc<dyn EntryStore>) -> Self {
        let (notifications, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            store,
            notifications,
        }
    }

    pub fn store(&self) -> &Arc<dyn EntryStore> {
        &self.store
    }

    /// Receive a [`Notification::DataChanged`] after every successful change.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.notifications.subscribe()
    }

    /// Handle a request, folding any failure into an error reply.
    pub async fn handle(&self, request: Request) -> Response {
        let kind = request.type_name();
        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request {} failed: {}", kind, e);
                Response::error(e.to_string())
            }
        }
    }

    /// Wire form of [`Router::handle`].
    pub async fn handle_json(&self, json: &str) -> String {
        let response = match Request::parse(json) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                warn!("Rejected message: {}", e);
                Response::error(e.to_string())
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            serde_json::json!({ "ok": false, "error": e.to_string() }).to_string()
        })
    }

    /// Dispatch a request, surfacing store errors.
    pub async fn dispatch(&self, request: Request) -> Result<Response, RouterError> {
        let kind = request.type_name();
        let mutation = request.is_mutation();
        debug!("Dispatching {}", kind);

        let response = match request {
            Request::AddEntry(entry) => Response::created(self.store.create(entry).await?),
            Request::Search { keyword } => Response::results(self.store.search(&keyword).await?),
            Request::DeleteEntry { id } => {
                self.store.delete_one(&id).await?;
                Response::ok()
            }
            Request::BatchDelete { ids } => {
                self.store.delete_many(&ids).await?;
                Response::ok()
            }
            Request::ClearAll => {
                self.store.clear_all().await?;
                Response::ok()
            }
            Request::SetTitle { id, title } => {
                self.store.set_title(&id, title.as_deref()).await?;
                Response::ok()
            }
        };

        if mutation {
            // No subscribers is fine.
            let _ = self.notifications.send(Notification::DataChanged);
        }
        Ok(response)
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
