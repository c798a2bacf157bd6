//! Tests for the in-memory remote queue.

use super::*;

fn short_visibility() -> InMemoryRemoteQueue {
    InMemoryRemoteQueue::new().with_visibility_timeout(Duration::milliseconds(60))
}

#[tokio::test]
async fn test_send_then_receive_delivers_in_order() {
    let queue = InMemoryRemoteQueue::new();
    let first = queue.send(r#"{"n":1}"#).await.unwrap();
    let second = queue.send(r#"{"n":2}"#).await.unwrap();
    assert_ne!(first, second);

    let messages = queue.receive(10, Duration::zero()).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].message_id, first);
    assert_eq!(messages[0].body, r#"{"n":1}"#);
    assert_eq!(messages[1].message_id, second);
}

#[tokio::test]
async fn test_receive_respects_max_messages() {
    let queue = InMemoryRemoteQueue::new();
    queue.send("{}").await.unwrap();
    queue.send("{}").await.unwrap();

    let messages = queue.receive(1, Duration::zero()).await.unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(queue.available_len(), 1);
    assert_eq!(queue.in_flight_len(), 1);
}

#[tokio::test]
async fn test_empty_queue_yields_nothing_after_wait() {
    let queue = InMemoryRemoteQueue::new();

    let started = std::time::Instant::now();
    let messages = queue
        .receive(1, Duration::milliseconds(80))
        .await
        .unwrap();

    assert!(messages.is_empty());
    assert!(started.elapsed() >= std::time::Duration::from_millis(80));
}

#[tokio::test]
async fn test_receive_waits_for_late_send() {
    let queue = std::sync::Arc::new(InMemoryRemoteQueue::new());

    let sender = std::sync::Arc::clone(&queue);
    let send_task = tokio::spawn(async move {
        tokio::time::sleep(std::time::Duration::from_millis(40)).await;
        sender.send(r#"{"late":true}"#).await.unwrap();
    });

    let messages = queue.receive(1, Duration::seconds(2)).await.unwrap();
    send_task.await.unwrap();

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].body, r#"{"late":true}"#);
}

#[tokio::test]
async fn test_in_flight_message_is_invisible() {
    let queue = InMemoryRemoteQueue::new();
    queue.send("{}").await.unwrap();
    queue.receive(1, Duration::zero()).await.unwrap();

    let messages = queue.receive(1, Duration::zero()).await.unwrap();

    assert!(messages.is_empty());
    assert_eq!(queue.in_flight_len(), 1);
}

#[tokio::test]
async fn test_delete_removes_in_flight_message() {
    let queue = InMemoryRemoteQueue::new();
    queue.send("{}").await.unwrap();
    let messages = queue.receive(1, Duration::zero()).await.unwrap();

    queue.delete(&messages[0].receipt_handle).await.unwrap();

    assert_eq!(queue.available_len(), 0);
    assert_eq!(queue.in_flight_len(), 0);
}

#[tokio::test]
async fn test_delete_rejects_unknown_receipt() {
    let queue = InMemoryRemoteQueue::new();

    let err = queue
        .delete(&ReceiptHandle::new("made-up".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(err, RemoteQueueError::InvalidReceipt { .. }));
}

#[tokio::test]
async fn test_expired_delivery_returns_with_fresh_receipt() {
    let queue = short_visibility();
    queue.send(r#"{"n":1}"#).await.unwrap();

    let first = queue.receive(1, Duration::zero()).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let second = queue.receive(1, Duration::zero()).await.unwrap();

    // Same message, new delivery: id is stable, the handle rotates.
    assert_eq!(second[0].message_id, first[0].message_id);
    assert_eq!(second[0].body, first[0].body);
    assert_ne!(second[0].receipt_handle, first[0].receipt_handle);
}

#[tokio::test]
async fn test_stale_receipt_is_rejected_after_redelivery() {
    let queue = short_visibility();
    queue.send("{}").await.unwrap();

    let first = queue.receive(1, Duration::zero()).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let second = queue.receive(1, Duration::zero()).await.unwrap();

    let err = queue.delete(&first[0].receipt_handle).await.unwrap_err();
    assert!(matches!(err, RemoteQueueError::InvalidReceipt { .. }));

    // The current delivery's handle still works.
    queue.delete(&second[0].receipt_handle).await.unwrap();
    assert_eq!(queue.available_len(), 0);
    assert_eq!(queue.in_flight_len(), 0);
}

#[tokio::test]
async fn test_lapsed_delivery_counts_as_available() {
    let queue = short_visibility();
    queue.send("{}").await.unwrap();
    queue.receive(1, Duration::zero()).await.unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    assert_eq!(queue.available_len(), 1);
    assert_eq!(queue.in_flight_len(), 0);
}
