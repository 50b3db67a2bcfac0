//! Tests for the in-memory queue transport.

use super::*;
use crate::provider::InMemoryConfig;

fn queue() -> QueueName {
    QueueName::new("red-widgets".to_string()).unwrap()
}

/// Transport with a zero wait window everywhere a test does not care about
/// waiting, plus the queue already provisioned.
async fn transport() -> InMemoryTransport {
    let transport = InMemoryTransport::default();
    transport.ensure_queue(&queue()).await.unwrap();
    transport
}

fn no_wait() -> Duration {
    Duration::zero()
}

// ============================================================================
// Enqueue / Lease Tests
// ============================================================================

#[tokio::test]
async fn test_enqueue_then_lease_round_trips_body() {
    let transport = transport().await;

    transport
        .enqueue(&queue(), Bytes::from("hello"))
        .await
        .unwrap();

    let leased = transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .expect("message should be available");

    assert_eq!(leased.body, Bytes::from("hello"));
    assert!(!leased.lock_token.token().is_empty());
    assert_eq!(leased.lock_token.queue(), &queue());
}

#[tokio::test]
async fn test_lease_from_empty_queue_returns_none() {
    let transport = transport().await;

    let leased = transport.lease_receive(&queue(), no_wait()).await.unwrap();
    assert!(leased.is_none());
}

#[tokio::test]
async fn test_lease_preserves_fifo_order() {
    let transport = transport().await;
    for body in ["a", "b", "c"] {
        transport.enqueue(&queue(), Bytes::from(body)).await.unwrap();
    }

    for expected in ["a", "b", "c"] {
        let leased = transport
            .lease_receive(&queue(), no_wait())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(leased.body, Bytes::from(expected));
    }
}

#[tokio::test]
async fn test_leased_message_is_invisible() {
    let transport = transport().await;
    transport.enqueue(&queue(), Bytes::from("only")).await.unwrap();

    let _held = transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .unwrap();

    // The message is locked: not visible and not countable.
    assert!(transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .is_none());
    assert_eq!(transport.queue_depth(&queue()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_lease_on_unknown_queue_fails() {
    let transport = InMemoryTransport::default();
    let result = transport.lease_receive(&queue(), no_wait()).await;

    assert!(matches!(result, Err(QueueError::QueueNotFound { .. })));
}

#[tokio::test]
async fn test_enqueue_provisions_queue() {
    let transport = InMemoryTransport::default();
    transport.enqueue(&queue(), Bytes::from("x")).await.unwrap();

    assert_eq!(transport.queue_depth(&queue()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_enqueue_rejects_oversized_body() {
    let transport = InMemoryTransport::new(InMemoryConfig {
        max_message_size: 8,
        ..InMemoryConfig::default()
    });

    let result = transport.enqueue(&queue(), Bytes::from("way past limit")).await;
    assert!(matches!(
        result,
        Err(QueueError::MessageTooLarge { size: 14, max_size: 8 })
    ));
}

// ============================================================================
// Acknowledge Tests
// ============================================================================

#[tokio::test]
async fn test_ack_complete_removes_message() {
    let transport = transport().await;
    transport.enqueue(&queue(), Bytes::from("done")).await.unwrap();

    let leased = transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .unwrap();
    transport.ack_complete(&leased.lock_token).await.unwrap();

    assert_eq!(transport.queue_depth(&queue()).await.unwrap(), 0);
    assert!(transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_second_ack_is_invalid() {
    let transport = transport().await;
    transport.enqueue(&queue(), Bytes::from("once")).await.unwrap();

    let leased = transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .unwrap();
    transport.ack_complete(&leased.lock_token).await.unwrap();

    let second = transport.ack_complete(&leased.lock_token).await;
    assert!(matches!(second, Err(QueueError::InvalidLock { .. })));
}

#[tokio::test]
async fn test_lapsed_lease_is_invalid_and_message_returns() {
    let transport = InMemoryTransport::new(InMemoryConfig {
        lock_duration_secs: 0,
        ..InMemoryConfig::default()
    });
    transport.ensure_queue(&queue()).await.unwrap();
    transport.enqueue(&queue(), Bytes::from("slow")).await.unwrap();

    let leased = transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .unwrap();

    // The zero-length lease lapsed immediately, so the ack must fail and the
    // message must be receivable again with the same body.
    let ack = transport.ack_complete(&leased.lock_token).await;
    assert!(matches!(ack, Err(QueueError::InvalidLock { .. })));

    let redelivered = transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(redelivered.body, Bytes::from("slow"));
}

// ============================================================================
// Batch Lease Tests
// ============================================================================

#[tokio::test]
async fn test_lease_batch_respects_max() {
    let transport = transport().await;
    for i in 0..5 {
        transport
            .enqueue(&queue(), Bytes::from(format!("m{}", i)))
            .await
            .unwrap();
    }

    let batch = transport.lease_batch(&queue(), 3).await.unwrap();
    assert_eq!(batch.len(), 3);
    assert_eq!(transport.queue_depth(&queue()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_lease_batch_returns_what_is_available() {
    let transport = transport().await;
    transport.enqueue(&queue(), Bytes::from("only")).await.unwrap();

    let batch = transport.lease_batch(&queue(), 100).await.unwrap();
    assert_eq!(batch.len(), 1);
}

#[tokio::test]
async fn test_lease_batch_rejects_oversized_request() {
    let transport = transport().await;

    let result = transport.lease_batch(&queue(), 101).await;
    assert!(matches!(
        result,
        Err(QueueError::BatchTooLarge { size: 101, max_size: 100 })
    ));
}

// ============================================================================
// Dead-Letter Tests
// ============================================================================

#[tokio::test]
async fn test_dead_letter_moves_message_to_companion() {
    let transport = transport().await;
    transport.enqueue(&queue(), Bytes::from("poison")).await.unwrap();

    let leased = transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .unwrap();
    transport.dead_letter(&leased.lock_token).await.unwrap();

    let companion = queue().dead_letter_of();
    assert_eq!(transport.queue_depth(&queue()).await.unwrap(), 0);
    assert_eq!(transport.queue_depth(&companion).await.unwrap(), 1);

    // The companion is an ordinary queue: the body is receivable from it.
    let dead = transport
        .lease_receive(&companion, no_wait())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dead.body, Bytes::from("poison"));
}

#[tokio::test]
async fn test_dead_letter_with_consumed_token_is_invalid() {
    let transport = transport().await;
    transport.enqueue(&queue(), Bytes::from("gone")).await.unwrap();

    let leased = transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .unwrap();
    transport.ack_complete(&leased.lock_token).await.unwrap();

    let result = transport.dead_letter(&leased.lock_token).await;
    assert!(matches!(result, Err(QueueError::InvalidLock { .. })));
}

// ============================================================================
// Depth / Provisioning Tests
// ============================================================================

#[tokio::test]
async fn test_queue_depth_counts_visible_only() {
    let transport = transport().await;
    for i in 0..3 {
        transport
            .enqueue(&queue(), Bytes::from(format!("m{}", i)))
            .await
            .unwrap();
    }

    let _held = transport
        .lease_receive(&queue(), no_wait())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(transport.queue_depth(&queue()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_ensure_queue_is_idempotent() {
    let transport = InMemoryTransport::default();
    transport.ensure_queue(&queue()).await.unwrap();
    transport.enqueue(&queue(), Bytes::from("kept")).await.unwrap();

    // A second ensure must not disturb existing contents.
    transport.ensure_queue(&queue()).await.unwrap();
    assert_eq!(transport.queue_depth(&queue()).await.unwrap(), 1);
}
