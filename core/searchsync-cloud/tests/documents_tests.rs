use pretty_assertions::assert_eq;
use searchsync_cloud::{CloudSearchConfig, DocumentBatchClient, Mode};
use searchsync_types::{FieldPayload, FieldValue, IndexDocumentId, SyncOperation};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_config(server: &MockServer) -> CloudSearchConfig {
    CloudSearchConfig::new("recipes").with_endpoint(server.uri())
}

fn ok_body() -> serde_json::Value {
    json!({ "status": "success", "adds": 1, "deletes": 0 })
}

// ── Wire format ─────────────────────────────────────────────────

#[tokio::test]
async fn add_item_posts_single_element_array() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2011-02-01/documents/batch"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!([
            { "type": "add", "id": "13", "fields": { "name": "fritters" } }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = DocumentBatchClient::new(mock_config(&server)).unwrap();
    client
        .add("13", FieldPayload::new().with("name", "fritters"))
        .await
        .unwrap();
}

#[tokio::test]
async fn remove_item_posts_delete() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2011-02-01/documents/batch"))
        .and(body_json(json!([{ "type": "delete", "id": "13" }])))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = DocumentBatchClient::new(mock_config(&server)).unwrap();
    client.delete("13").await.unwrap();
    // The service treats a delete of an absent id as a success.
    client.delete("13").await.unwrap();
}

#[tokio::test]
async fn add_drops_blank_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2011-02-01/documents/batch"))
        .and(body_json(json!([
            { "type": "add", "id": "1", "fields": { "name": "fritters", "qty": 0 } }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = DocumentBatchClient::new(mock_config(&server)).unwrap();
    let fields = FieldPayload::new()
        .with("name", "fritters")
        .with("qty", 0_i64)
        .with("description", "")
        .with("notes", FieldValue::Null);
    client.add("1", fields).await.unwrap();
}

#[tokio::test]
async fn update_sends_fields_as_given() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2011-02-01/documents/batch"))
        .and(body_json(json!([
            { "type": "add", "id": "1", "fields": { "name": "fritters", "notes": null } }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = DocumentBatchClient::new(mock_config(&server)).unwrap();
    let fields = FieldPayload::new()
        .with("name", "fritters")
        .with("notes", FieldValue::Null);
    client.update("1", fields).await.unwrap();
}

#[tokio::test]
async fn submit_sends_one_request_for_many_operations() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2011-02-01/documents/batch"))
        .and(body_json(json!([
            { "type": "add", "id": "item_1", "fields": { "name": "a" } },
            { "type": "delete", "id": "item_2" }
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = DocumentBatchClient::new(mock_config(&server)).unwrap();
    let ops = vec![
        SyncOperation::add(IndexDocumentId::new("item", 1), FieldPayload::new().with("name", "a")),
        SyncOperation::delete(IndexDocumentId::new("item", 2)),
    ];
    client.submit(&ops).await.unwrap();
}

#[tokio::test]
async fn empty_submit_makes_no_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = DocumentBatchClient::new(mock_config(&server)).unwrap();
    client.submit(&[]).await.unwrap();
}

// ── Failures ────────────────────────────────────────────────────

#[tokio::test]
async fn non_200_is_document_update_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2011-02-01/documents/batch"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/2011-02-01/documents/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body()))
        .mount(&server)
        .await;

    let client = DocumentBatchClient::new(mock_config(&server)).unwrap();

    let err = client.delete("13").await.unwrap_err();
    assert!(err.is_document_update());
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "document update failed: 400: Bad Request");

    // Failures are per call.
    client.delete("14").await.unwrap();
}

#[tokio::test]
async fn transport_failure_is_document_update_failure() {
    let config = CloudSearchConfig::new("recipes").with_endpoint("http://127.0.0.1:9");
    let client = DocumentBatchClient::new(config).unwrap();

    let err = client.delete("13").await.unwrap_err();
    assert!(err.is_document_update());
    assert_eq!(err.status(), None);
    assert!(std::error::Error::source(&err).is_some());
}

// ── Sandbox ─────────────────────────────────────────────────────

#[tokio::test]
async fn sandbox_makes_no_calls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let client =
        DocumentBatchClient::new(mock_config(&server).with_mode(Mode::Sandbox)).unwrap();

    client
        .add("13", FieldPayload::new().with("name", "fritters"))
        .await
        .unwrap();
    client
        .update("13", FieldPayload::new().with("name", "fritters"))
        .await
        .unwrap();
    client.delete("13").await.unwrap();
}
