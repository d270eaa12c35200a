use carequeue_core::constants::{PAYLOAD_SCHEMA_VERSION, SYNTHETIC_QUEUED_STATUS};
use carequeue_core::models::*;
use serde_json::json;

#[test]
fn http_verbs_map_to_mutation_methods() {
    assert_eq!(MutationMethod::from_http(HttpMethod::Post), Some(MutationMethod::Create));
    assert_eq!(MutationMethod::from_http(HttpMethod::Put), Some(MutationMethod::Update));
    assert_eq!(MutationMethod::from_http(HttpMethod::Delete), Some(MutationMethod::Delete));
    assert_eq!(MutationMethod::from_http(HttpMethod::Patch), Some(MutationMethod::Patch));
    assert_eq!(MutationMethod::from_http(HttpMethod::Get), None);
    assert!(!HttpMethod::Get.is_mutating());

    for method in [
        MutationMethod::Create,
        MutationMethod::Update,
        MutationMethod::Delete,
        MutationMethod::Patch,
    ] {
        assert_eq!(MutationMethod::from_http(method.to_http()), Some(method));
        assert_eq!(method.as_str().parse::<MutationMethod>().unwrap(), method);
    }
    assert!("MERGE".parse::<MutationMethod>().is_err());
}

#[test]
fn payload_encodes_json_with_schema_version() {
    let payload = Payload::from_json(&json!({"name": "Jane"})).unwrap();
    assert_eq!(payload.schema_version, PAYLOAD_SCHEMA_VERSION);
    assert_eq!(payload.to_json().unwrap(), json!({"name": "Jane"}));
}

#[test]
fn empty_payload_decodes_to_null() {
    let payload = Payload::empty();
    assert!(payload.is_empty());
    assert_eq!(payload.to_json().unwrap(), serde_json::Value::Null);
}

#[test]
fn queued_response_is_a_soft_success() {
    let response = ApiResponse::queued(MutationId(12));
    assert_eq!(response.status, SYNTHETIC_QUEUED_STATUS);
    assert!(response.is_success());
    assert!(response.is_queued());

    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["queued"], json!(true));
    assert_eq!(body["id"], json!(12));
    assert!(body["message"].as_str().unwrap().contains("offline"));
}

#[test]
fn response_status_classes() {
    assert!(ApiResponse::new(204, vec![]).is_success());
    assert!(ApiResponse::new(404, vec![]).is_client_error());
    let server_error = ApiResponse::new(503, vec![]);
    assert!(!server_error.is_success());
    assert!(!server_error.is_client_error());
}

#[test]
fn banner_reflects_connectivity_state() {
    let mut state = ConnectivityState::new(false, 2);
    assert_eq!(state.banner(), StatusBanner::Offline { pending: 2 });

    state.is_online = true;
    assert_eq!(state.banner(), StatusBanner::Pending { count: 2 });

    state.is_syncing = true;
    assert_eq!(state.banner(), StatusBanner::Syncing { pending: 2 });

    state.is_syncing = false;
    state.pending_count = 0;
    assert_eq!(state.banner(), StatusBanner::Idle);
}

#[test]
fn summary_retained_counts_failures_still_queued() {
    let summary = SyncSummary {
        synced: 3,
        failed: 2,
        total: 5,
        dropped: 1,
        path: SyncPath::Fallback,
    };
    assert_eq!(summary.retained(), 1);
    assert!(!summary.is_clean());
    assert!(SyncSummary::empty().is_clean());
}

#[test]
fn drop_reason_serializes_with_kind_tag() {
    let reason = DropReason::ClientError { status: 422 };
    let value = serde_json::to_value(&reason).unwrap();
    assert_eq!(value, json!({"kind": "client_error", "status": 422}));
    assert!(reason.describe().contains("422"));
}
