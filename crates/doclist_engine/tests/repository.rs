use std::time::Duration;

use doclist_engine::{
    DocumentRecord, DocumentRepository, FailureKind, RepositoryError, RepositorySettings,
    ReqwestRepository, UploadFile,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{any, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn repository(server: &MockServer) -> ReqwestRepository {
    ReqwestRepository::new(RepositorySettings {
        base_url: server.uri(),
        ..RepositorySettings::default()
    })
    .expect("repository")
}

fn record(id: &str, name: &str, size: u64) -> DocumentRecord {
    DocumentRecord {
        id: id.to_string(),
        name: name.to_string(),
        size,
    }
}

fn fixture_body() -> serde_json::Value {
    json!([
        {"id": "1", "name": "foo", "size": 180},
        {"id": "2", "name": "bar", "size": 300},
        {"id": "3", "name": "baz", "size": 520},
        {"id": "4", "name": "qux", "size": 320}
    ])
}

#[tokio::test]
async fn list_all_returns_documents_in_server_order() {
    doclist_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture_body()))
        .mount(&server)
        .await;

    let documents = repository(&server).list_all().await.expect("list ok");

    assert_eq!(
        documents,
        vec![
            record("1", "foo", 180),
            record("2", "bar", 300),
            record("3", "baz", 520),
            record("4", "qux", 320),
        ]
    );
}

#[tokio::test]
async fn list_all_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = repository(&server).list_all().await.unwrap_err();

    assert_eq!(
        err,
        RepositoryError::LoadFailure {
            cause: FailureKind::HttpStatus(500)
        }
    );
    assert_eq!(err.to_string(), "There was an error loading the documents.");
}

#[tokio::test]
async fn list_all_fails_on_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = repository(&server).list_all().await.unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::LoadFailure {
            cause: FailureKind::Decode(_)
        }
    ));
}

#[tokio::test]
async fn list_all_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(fixture_body()),
        )
        .mount(&server)
        .await;

    let repo = ReqwestRepository::new(RepositorySettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..RepositorySettings::default()
    })
    .unwrap();

    let err = repo.list_all().await.unwrap_err();
    assert_eq!(
        err,
        RepositoryError::LoadFailure {
            cause: FailureKind::Timeout
        }
    );
}

#[tokio::test]
async fn list_all_rejects_oversized_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture_body()))
        .mount(&server)
        .await;

    let repo = ReqwestRepository::new(RepositorySettings {
        base_url: server.uri(),
        max_response_bytes: 16,
        ..RepositorySettings::default()
    })
    .unwrap();

    let err = repo.list_all().await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::LoadFailure {
            cause: FailureKind::TooLarge { max_bytes: 16, .. }
        }
    ));
}

#[tokio::test]
async fn search_sends_raw_text_as_name_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("name", "baz"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "3", "name": "baz", "size": 520}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let documents = repository(&server).search_by_name("baz").await.expect("search ok");

    assert_eq!(documents, vec![record("3", "baz", 520)]);
}

#[tokio::test]
async fn search_encodes_special_characters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .and(query_param("name", "a&b c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let documents = repository(&server).search_by_name("a&b c").await.expect("search ok");

    assert!(documents.is_empty());
}

#[tokio::test]
async fn search_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/documents"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = repository(&server).search_by_name("baz").await.unwrap_err();

    assert_eq!(
        err,
        RepositoryError::SearchFailure {
            cause: FailureKind::HttpStatus(503)
        }
    );
    assert_eq!(
        err.to_string(),
        "There was an error while searching documents. Please try again."
    );
}

#[tokio::test]
async fn delete_succeeds_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents/4"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    repository(&server).delete_by_id("4").await.expect("delete ok");
}

#[tokio::test]
async fn delete_client_error_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents/4"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({"status": 422})))
        .mount(&server)
        .await;

    let err = repository(&server).delete_by_id("4").await.unwrap_err();

    assert_eq!(
        err,
        RepositoryError::DeleteRejected {
            id: "4".to_string(),
            status: 422
        }
    );
    assert_eq!(
        err.to_string(),
        "An error occured while trying to delete this document. Please try again."
    );
}

#[tokio::test]
async fn delete_server_error_fails() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents/4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = repository(&server).delete_by_id("4").await.unwrap_err();

    assert_eq!(
        err,
        RepositoryError::DeleteFailed {
            id: "4".to_string(),
            cause: FailureKind::HttpStatus(500)
        }
    );
    assert_eq!(err.to_string(), "Please try again.");
}

#[tokio::test]
async fn delete_transport_error_fails_with_id() {
    let repo = ReqwestRepository::new(RepositorySettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        ..RepositorySettings::default()
    })
    .unwrap();

    let err = repo.delete_by_id("4").await.unwrap_err();

    match err {
        RepositoryError::DeleteFailed { id, .. } => assert_eq!(id, "4"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn upload_posts_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/document"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"google.jpg\""))
        .and(body_string_contains("image/jpeg"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"name": "google.jpg", "id": "8", "size": 100})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let file = UploadFile::new("google.jpg", "image/jpeg", "jpeg bytes".as_bytes().to_vec());
    let created = repository(&server).upload(file).await.expect("upload ok");

    assert_eq!(created, record("8", "google.jpg", 100));
}

#[tokio::test]
async fn upload_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/document"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({})))
        .mount(&server)
        .await;

    let file = UploadFile::new("google.jpg", "image/jpeg", "jpeg bytes".as_bytes().to_vec());
    let err = repository(&server).upload(file).await.unwrap_err();

    assert_eq!(
        err,
        RepositoryError::UploadFailed {
            cause: FailureKind::HttpStatus(422)
        }
    );
    assert_eq!(
        err.to_string(),
        "There was an error uploading the file. Please try again."
    );
}

#[tokio::test]
async fn oversized_upload_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let file = UploadFile::new("huge.jpg", "image/jpeg", vec![0u8; 11 * 1024 * 1024]);
    let err = repository(&server).upload(file).await.unwrap_err();

    assert_eq!(err.to_string(), "File size is too large.");
    assert!(err.is_validation());
}

#[tokio::test]
async fn invalid_file_type_never_reaches_network() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let file = UploadFile::new("notes.txt", "text/plain", "hello".as_bytes().to_vec());
    let err = repository(&server).upload(file).await.unwrap_err();

    assert_eq!(
        err,
        RepositoryError::InvalidFileType {
            mime_type: "text/plain".to_string()
        }
    );
}
