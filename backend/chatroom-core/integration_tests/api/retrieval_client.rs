use chatroom_core::api::wire::{RememberRequest, UploadFields, UploadOutcome};
use chatroom_core::api::{RetrievalClient, UploadDocument};
use chatroom_core::error::ApiClientError;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn default_fields() -> UploadFields {
    UploadFields {
        domain: "General".to_string(),
        user_tag: String::new(),
    }
}

/// **VALUE**: Uploads are multipart with the file, domain and user tag parts.
///
/// **BUG THIS CATCHES**: Would catch sending JSON instead of a form, a renamed
/// part, or a lost file name (the backend stores documents under it).
#[tokio::test]
async fn given_document_when_uploading_then_posts_multipart_form() {
    // GIVEN: An ingestion endpoint expecting all three parts
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains(r#"name="file"; filename="doc.pdf""#))
        .and(body_string_contains("application/pdf"))
        .and(body_string_contains(r#"name="domain""#))
        .and(body_string_contains("General"))
        .and(body_string_contains(r#"name="user_tag""#))
        .and(body_string_contains("%PDF-1.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 2,
            "fail": 1,
            "filename": "doc.pdf"
        })))
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Uploading a PDF
    let client = RetrievalClient::new(&server.uri()).unwrap();
    let document = UploadDocument::new("doc.pdf", b"%PDF-1.4 test".to_vec()).unwrap();
    let outcome = client.upload_file(document, &default_fields()).await.unwrap();

    // THEN: Counts come back
    assert_eq!(
        outcome,
        UploadOutcome::Ingested {
            filename: "doc.pdf".to_string(),
            success: 2,
            fail: 1,
        }
    );
}

#[tokio::test]
async fn given_error_body_when_uploading_then_rejected_not_err() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "unsupported format" })),
        )
        .mount(&server)
        .await;

    let client = RetrievalClient::new(&server.uri()).unwrap();
    let document = UploadDocument::new("notes.txt", b"hello".to_vec()).unwrap();
    let outcome = client.upload_file(document, &default_fields()).await.unwrap();

    assert_eq!(
        outcome,
        UploadOutcome::Rejected {
            message: "unsupported format".to_string()
        }
    );
}

/// **VALUE**: A 2xx with an empty body is still a successful ingestion.
///
/// **BUG THIS CATCHES**: Would catch decoding the body strictly, which turns a
/// document the backend accepted into "File upload failed".
#[tokio::test]
async fn given_empty_success_body_when_uploading_then_ingested_with_defaults() {
    // GIVEN: An ingestion endpoint answering 200 with no body
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // WHEN: Uploading
    let client = RetrievalClient::new(&server.uri()).unwrap();
    let document = UploadDocument::new("notes.txt", b"hello".to_vec()).unwrap();
    let outcome = client.upload_file(document, &default_fields()).await.unwrap();

    // THEN: Ingested, zero counts, empty file name
    assert_eq!(
        outcome,
        UploadOutcome::Ingested {
            filename: String::new(),
            success: 0,
            fail: 0,
        }
    );
}

#[tokio::test]
async fn given_float_counts_when_uploading_then_counts_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 2.0,
            "fail": 1,
            "filename": "doc.pdf"
        })))
        .mount(&server)
        .await;

    let client = RetrievalClient::new(&server.uri()).unwrap();
    let document = UploadDocument::new("doc.pdf", b"%PDF-1.4".to_vec()).unwrap();
    let outcome = client.upload_file(document, &default_fields()).await.unwrap();

    assert_eq!(
        outcome,
        UploadOutcome::Ingested {
            filename: "doc.pdf".to_string(),
            success: 2,
            fail: 1,
        }
    );
}

#[tokio::test]
async fn given_error_next_to_odd_fields_when_uploading_then_error_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "unsupported format",
            "success": "n/a",
            "filename": null
        })))
        .mount(&server)
        .await;

    let client = RetrievalClient::new(&server.uri()).unwrap();
    let document = UploadDocument::new("doc.pdf", b"%PDF-1.4".to_vec()).unwrap();
    let outcome = client.upload_file(document, &default_fields()).await.unwrap();

    assert_eq!(
        outcome,
        UploadOutcome::Rejected {
            message: "unsupported format".to_string()
        }
    );
}

#[tokio::test]
async fn given_plain_text_success_body_when_uploading_then_ingested_with_defaults() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let client = RetrievalClient::new(&server.uri()).unwrap();
    let document = UploadDocument::new("notes.txt", b"hello".to_vec()).unwrap();
    let outcome = client.upload_file(document, &default_fields()).await.unwrap();

    assert!(matches!(
        outcome,
        UploadOutcome::Ingested { success: 0, fail: 0, .. }
    ));
}

#[tokio::test]
async fn given_failing_status_when_uploading_then_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload_file"))
        .respond_with(ResponseTemplate::new(413))
        .mount(&server)
        .await;

    let client = RetrievalClient::new(&server.uri()).unwrap();
    let document = UploadDocument::new("big.pdf", vec![0; 16]).unwrap();
    let result = client.upload_file(document, &default_fields()).await;

    match result {
        Err(err @ ApiClientError::Server { .. }) => {
            assert!(err.summary().starts_with("HTTP 413 - "))
        }
        other => panic!("Expected Server error, got {other:?}"),
    }
}

#[tokio::test]
async fn given_memory_entry_when_remembering_then_posts_fact_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/remember"))
        .and(body_json(json!({
            "text": "User: hi\nAI: hello",
            "type": "fact",
            "tag": ["manual"],
            "domain": "chat",
            "user": "user1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = RetrievalClient::new(&server.uri()).unwrap();
    let request = RememberRequest::manual_fact("User: hi\nAI: hello", "chat", "user1");

    client.remember(&request).await.unwrap();
}
