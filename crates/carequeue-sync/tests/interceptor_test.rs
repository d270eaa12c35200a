//! Write interceptor: pass-through, offline queueing, and persistence failure.

mod common;

use std::sync::Arc;

use serde_json::json;

use carequeue_core::constants::{QUEUED_MESSAGE, SYNTHETIC_QUEUED_STATUS};
use carequeue_core::errors::TransportError;
use carequeue_core::models::*;
use carequeue_core::traits::DurableQueue;
use carequeue_core::CarequeueError;
use carequeue_storage::QueueStore;
use carequeue_sync::{EventBus, QueueEvent, WriteInterceptor};

use common::{FakeTransport, FullQueue};

fn setup(transport: FakeTransport) -> (Arc<QueueStore>, Arc<FakeTransport>, EventBus, WriteInterceptor) {
    let store = Arc::new(QueueStore::open_in_memory().unwrap());
    let transport = Arc::new(transport);
    let events = EventBus::default();
    let interceptor = WriteInterceptor::new(store.clone(), transport.clone(), events.clone());
    (store, transport, events, interceptor)
}

#[tokio::test]
async fn server_error_responses_pass_through_unqueued() {
    let (store, _, _, interceptor) =
        setup(FakeTransport::new(|_| Ok(ApiResponse::new(422, b"{\"error\":\"invalid\"}".to_vec()))));

    let resp = interceptor
        .post("/patients", json!({"name": ""}), &AuthContext::bearer("tok"))
        .await
        .unwrap();

    assert_eq!(resp.status, 422);
    assert!(!resp.is_queued());
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn transport_failure_on_post_is_queued_with_soft_success() {
    let (store, _, events, interceptor) = setup(FakeTransport::dead());
    let mut rx = events.subscribe();

    let resp = interceptor
        .post("/patients", json!({"name": "Jane"}), &AuthContext::bearer("tok-jane"))
        .await
        .unwrap();

    assert_eq!(resp.status, SYNTHETIC_QUEUED_STATUS);
    assert!(resp.is_queued());
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["queued"], json!(true));
    assert_eq!(body["message"], json!(QUEUED_MESSAGE));

    let records = store.list_all().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(Some(records[0].id), resp.queued);
    assert_eq!(records[0].method, MutationMethod::Create);
    assert_eq!(records[0].target, "/patients");
    assert_eq!(records[0].payload.to_json().unwrap(), json!({"name": "Jane"}));
    assert_eq!(records[0].auth.bearer_token.as_deref(), Some("tok-jane"));
    assert_eq!(records[0].attempts, 0);

    assert_eq!(rx.try_recv().unwrap(), QueueEvent::QueueChanged);
}

#[tokio::test]
async fn each_mutating_verb_maps_to_its_method() {
    let (store, _, _, interceptor) = setup(FakeTransport::dead());
    let auth = AuthContext::anonymous();

    interceptor.put("/patients/1", json!({"name": "A"}), &auth).await.unwrap();
    interceptor.patch("/patients/1", json!({"dob": "1990-01-01"}), &auth).await.unwrap();
    interceptor.delete("/patients/1", &auth).await.unwrap();

    let records = store.list_all().await.unwrap();
    let methods: Vec<_> = records.iter().map(|r| r.method).collect();
    assert_eq!(
        methods,
        vec![MutationMethod::Update, MutationMethod::Patch, MutationMethod::Delete]
    );
    assert!(records[2].payload.is_empty());
}

#[tokio::test]
async fn reads_are_never_queued() {
    let (store, _, events, interceptor) = setup(FakeTransport::dead());
    let mut rx = events.subscribe();

    let err = interceptor
        .get("/patients", &AuthContext::anonymous())
        .await
        .unwrap_err();

    assert!(err.is_transport_failure());
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn persistence_failure_surfaces_the_original_transport_error() {
    let transport = Arc::new(FakeTransport::dead());
    let events = EventBus::default();
    let mut rx = events.subscribe();
    let interceptor = WriteInterceptor::new(Arc::new(FullQueue), transport, events.clone());

    let err = interceptor
        .post("/invoices", json!({"amount": 120}), &AuthContext::anonymous())
        .await
        .unwrap_err();

    match err {
        CarequeueError::Transport(TransportError::Unreachable { reason }) => {
            assert_eq!(reason, "connection refused");
        }
        other => panic!("expected the transport failure, got {other:?}"),
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn successful_write_is_returned_as_is() {
    let (store, transport, _, interceptor) = setup(FakeTransport::new(|_| {
        Ok(ApiResponse::new(201, b"{\"id\":7}".to_vec()))
    }));

    let resp = interceptor
        .execute(
            ApiRequest::new(HttpMethod::Post, "/claims")
                .with_body(json!({"code": "99213"}))
                .with_auth(AuthContext::bearer("tok")),
        )
        .await
        .unwrap();

    assert_eq!(resp.status, 201);
    assert_eq!(resp.json::<serde_json::Value>().unwrap(), json!({"id": 7}));
    assert_eq!(transport.calls().len(), 1);
    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn request_that_cannot_be_built_is_not_queued() {
    let (store, _, events, interceptor) = setup(FakeTransport::new(|_| {
        Err(TransportError::InvalidRequest {
            reason: "relative URL without a base".to_string(),
        })
    }));
    let mut rx = events.subscribe();

    let err = interceptor
        .post("not a url", json!({"name": "Jane"}), &AuthContext::bearer("tok"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CarequeueError::Transport(TransportError::InvalidRequest { .. })
    ));
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(rx.try_recv().is_err());
}
