//! Contract tests for the remote queue client boundary.

use super::*;
use crate::remote::InMemoryRemoteQueue;
use std::sync::Arc;

/// Contract test helper: a sent body comes back intact on receive
async fn test_client_round_trips_body<C: RemoteQueueClient>(client: &C) {
    // Arrange
    let body = r#"{"address":"user@example.com"}"#;

    // Act
    let sent_id = client.send(body).await.expect("send should succeed");
    let messages = client
        .receive(1, Duration::seconds(1))
        .await
        .expect("receive should succeed");

    // Assert
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].message_id, sent_id);
    assert_eq!(messages[0].body, body);
}

/// Contract test helper: delete consumes the delivery's receipt handle
async fn test_client_delete_consumes_receipt<C: RemoteQueueClient>(client: &C) {
    client.send("{}").await.expect("send should succeed");
    let messages = client
        .receive(1, Duration::seconds(1))
        .await
        .expect("receive should succeed");
    let receipt = &messages[0].receipt_handle;

    assert!(client.delete(receipt).await.is_ok());
    assert!(
        client.delete(receipt).await.is_err(),
        "Second delete with the same receipt should be rejected"
    );
}

#[tokio::test]
async fn test_in_memory_queue_honors_contract() {
    let client = InMemoryRemoteQueue::new();
    test_client_round_trips_body(&client).await;
}

#[tokio::test]
async fn test_in_memory_queue_delete_contract() {
    let client = InMemoryRemoteQueue::new();
    test_client_delete_consumes_receipt(&client).await;
}

#[tokio::test]
async fn test_trait_is_object_safe() {
    // Drivers hold the client as Arc<dyn RemoteQueueClient>.
    let client: Arc<dyn RemoteQueueClient> = Arc::new(InMemoryRemoteQueue::new());
    let id = client.send("{}").await.unwrap();
    assert!(!id.as_str().is_empty());
}
