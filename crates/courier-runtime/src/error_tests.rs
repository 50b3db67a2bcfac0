//! Tests for transport error types.

use super::*;

#[test]
fn test_transport_unavailable_is_transient() {
    let error = QueueError::TransportUnavailable {
        message: "connection refused".to_string(),
    };
    assert!(error.is_transient());
    assert_eq!(error.retry_after(), Some(Duration::seconds(5)));
}

#[test]
fn test_invalid_lock_is_not_transient() {
    let error = QueueError::InvalidLock {
        token: "abc".to_string(),
    };
    assert!(!error.is_transient());
    assert_eq!(error.retry_after(), None);
}

#[test]
fn test_queue_not_found_is_not_transient() {
    let error = QueueError::QueueNotFound {
        queue_name: "red-widgets".to_string(),
    };
    assert!(!error.is_transient());
}

#[test]
fn test_invalid_lock_display_names_token() {
    let error = QueueError::InvalidLock {
        token: "abc-123".to_string(),
    };
    assert!(error.to_string().contains("abc-123"));
}

#[test]
fn test_serialization_error_wraps_json() {
    let json_error = serde_json::from_str::<u32>("not json").unwrap_err();
    let error = QueueError::from(SerializationError::from(json_error));
    assert!(!error.is_transient());
    assert!(matches!(error, QueueError::Serialization(_)));
}
