use super::*;
use acc_protocols::{ExcerptId, NewExcerpt, PositionDescriptor, SavedExcerpt, StoreError};
use acc_store_sqlite::SqliteEntryStore;
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::TryRecvError;

async fn router() -> Router {
    Router::new(Arc::new(SqliteEntryStore::in_memory().await.unwrap()))
}

fn new_excerpt(content: &str) -> NewExcerpt {
    NewExcerpt::new(
        content,
        "https://chat.example.com/c/1",
        PositionDescriptor::PositionalIndex(2),
    )
}

async fn add(router: &Router, content: &str) -> ExcerptId {
    let response = router.handle(Request::AddEntry(new_excerpt(content))).await;
    assert!(response.ok, "{:?}", response.error);
    response.id.unwrap()
}

/// Store whose every operation fails.
struct BrokenStore;

#[async_trait]
impl EntryStore for BrokenStore {
    fn id(&self) -> &str {
        "broken"
    }

    async fn create(&self, _entry: NewExcerpt) -> Result<ExcerptId, StoreError> {
        Err(StoreError::StorageError("disk full".to_string()))
    }

    async fn get(&self, _id: &str) -> Result<Option<SavedExcerpt>, StoreError> {
        Err(StoreError::StorageError("disk full".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<SavedExcerpt>, StoreError> {
        Err(StoreError::StorageError("disk full".to_string()))
    }

    async fn search(&self, _keyword: &str) -> Result<Vec<SavedExcerpt>, StoreError> {
        Err(StoreError::StorageError("disk full".to_string()))
    }

    async fn delete_one(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::StorageError("disk full".to_string()))
    }

    async fn delete_many(&self, _ids: &[ExcerptId]) -> Result<(), StoreError> {
        Err(StoreError::StorageError("disk full".to_string()))
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        Err(StoreError::StorageError("disk full".to_string()))
    }

    async fn set_title(&self, _id: &str, _title: Option<&str>) -> Result<(), StoreError> {
        Err(StoreError::StorageError("disk full".to_string()))
    }
}

#[tokio::test]
async fn test_add_then_search() {
    let router = router().await;
    let id = add(&router, "<p>Borrow checker notes</p>").await;

    let response = router
        .handle(Request::Search {
            keyword: "borrow".to_string(),
        })
        .await;
    assert!(response.ok);
    let results = response.results.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, id);
}

#[tokio::test]
async fn test_mutations_broadcast_data_changed() {
    let router = router().await;
    let mut rx = router.subscribe();

    let id = add(&router, "one").await;
    assert_eq!(rx.try_recv().unwrap(), Notification::DataChanged);

    router
        .handle(Request::SetTitle {
            id: id.clone(),
            title: Some("Named".into()),
        })
        .await;
    assert_eq!(rx.try_recv().unwrap(), Notification::DataChanged);

    router.handle(Request::DeleteEntry { id }).await;
    assert_eq!(rx.try_recv().unwrap(), Notification::DataChanged);

    router.handle(Request::ClearAll).await;
    assert_eq!(rx.try_recv().unwrap(), Notification::DataChanged);
}

#[tokio::test]
async fn test_search_does_not_broadcast() {
    let router = router().await;
    let mut rx = router.subscribe();
    router
        .handle(Request::Search {
            keyword: String::new(),
        })
        .await;
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_failed_request_does_not_broadcast() {
    let router = Router::new(Arc::new(BrokenStore));
    let mut rx = router.subscribe();
    let response = router.handle(Request::AddEntry(new_excerpt("x y"))).await;
    assert!(!response.ok);
    assert!(response.error.unwrap().contains("disk full"));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_batch_delete() {
    let router = router().await;
    let a = add(&router, "a a").await;
    let b = add(&router, "b b").await;
    let c = add(&router, "c c").await;
    let keep = add(&router, "keep").await;

    let response = router
        .handle(Request::BatchDelete {
            ids: vec![a, b, c],
        })
        .await;
    assert!(response.ok);

    let all = router.store().list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, keep);
}

#[tokio::test]
async fn test_set_title_unknown_id_is_error_reply() {
    let router = router().await;
    let response = router
        .handle(Request::SetTitle {
            id: "missing".into(),
            title: Some("x".into()),
        })
        .await;
    assert!(!response.ok);
    assert!(response.error.unwrap().contains("missing"));
}

#[tokio::test]
async fn test_dispatch_surfaces_store_errors() {
    let router = Router::new(Arc::new(BrokenStore));
    let err = router.dispatch(Request::ClearAll).await.unwrap_err();
    assert!(matches!(err, RouterError::Store(StoreError::StorageError(_))));
}

#[tokio::test]
async fn test_json_round_trip() {
    let router = router().await;

    let reply: Value = serde_json::from_str(
        &router
            .handle_json(
                &json!({
                    "type": "ACC_ADD_ENTRY",
                    "payload": {
                        "content": "<p>Wire saved</p>",
                        "source_url": "https://chat.example.com/c/3#acc-index=0",
                        "tags": ["wire"],
                        "anchor": { "kind": "index", "value": 0 }
                    }
                })
                .to_string(),
            )
            .await,
    )
    .unwrap();
    assert_eq!(reply["ok"], json!(true));
    let id = reply["id"].as_str().unwrap().to_string();

    let reply: Value = serde_json::from_str(
        &router
            .handle_json(r#"{"type":"ACC_SEARCH","payload":{"keyword":"WIRE"}}"#)
            .await,
    )
    .unwrap();
    assert_eq!(reply["ok"], json!(true));
    assert_eq!(reply["results"][0]["id"], json!(id));
    assert_eq!(
        reply["results"][0]["source_url"],
        json!("https://chat.example.com/c/3")
    );

    let reply: Value = serde_json::from_str(
        &router
            .handle_json(r#"{"type":"ACC_CLEAR_ALL_ENTRIES"}"#)
            .await,
    )
    .unwrap();
    assert_eq!(reply, json!({ "ok": true }));
}

#[tokio::test]
async fn test_search_without_payload_returns_everything() {
    let router = router().await;
    add(&router, "first entry").await;
    add(&router, "second entry").await;

    let reply: Value =
        serde_json::from_str(&router.handle_json(r#"{"type":"ACC_SEARCH"}"#).await).unwrap();
    assert_eq!(reply["ok"], json!(true));
    assert_eq!(reply["results"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_batch_delete_without_payload_is_a_no_op() {
    let router = router().await;
    add(&router, "kept entry").await;

    let reply: Value = serde_json::from_str(
        &router
            .handle_json(r#"{"type":"ACC_BATCH_DELETE"}"#)
            .await,
    )
    .unwrap();
    assert_eq!(reply, json!({ "ok": true }));
    assert_eq!(router.store().list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_unknown_type_reply() {
    let router = router().await;
    let reply = router.handle_json(r#"{"type":"ACC_EXPORT"}"#).await;
    assert_eq!(
        serde_json::from_str::<Value>(&reply).unwrap(),
        json!({ "ok": false, "error": "Unknown message type: ACC_EXPORT" })
    );
}

#[tokio::test]
async fn test_garbage_is_error_reply() {
    let router = router().await;
    for input in ["not json", "{}", r#"{"type":"ACC_DELETE_ENTRY","payload":{}}"#] {
        let reply: Value = serde_json::from_str(&router.handle_json(input).await).unwrap();
        assert_eq!(reply["ok"], json!(false));
        assert!(reply["error"].is_string());
    }
}
