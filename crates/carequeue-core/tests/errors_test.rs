use carequeue_core::errors::*;

#[test]
fn persistence_error_is_distinct() {
    let err: CarequeueError = QueueError::Persistence {
        reason: "disk full".into(),
    }
    .into();
    assert!(err.is_persistence());
    assert!(!err.is_transport_failure());
    assert_eq!(err.error_code(), error_code::PERSISTENCE_ERROR);
    assert_eq!(err.coded_string(), "[PERSISTENCE_ERROR] persistence failed: disk full");
}

#[test]
fn transport_errors_keep_their_codes() {
    let err: CarequeueError = TransportError::Timeout { after_ms: 1500 }.into();
    assert!(err.is_transport_failure());
    assert_eq!(err.error_code(), error_code::TRANSPORT_TIMEOUT);
    assert_eq!(err.to_string(), "request timed out after 1500ms");
}

#[test]
fn reentrant_sync_has_its_own_code() {
    let err: CarequeueError = SyncError::AlreadyRunning.into();
    assert_eq!(err.error_code(), error_code::SYNC_IN_PROGRESS);
}
