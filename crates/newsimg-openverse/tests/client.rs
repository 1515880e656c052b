//! Integration tests for `OpenverseClient` using wiremock HTTP mocks.

use newsimg_openverse::{OpenverseClient, OpenverseError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> OpenverseClient {
    OpenverseClient::with_base_url(5, 5, "newsimg-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn search_returns_normalized_candidates() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "result_count": 2,
        "results": [
            {
                "id": "one",
                "title": "Snowflake bridge diagram",
                "creator": "Jane Doe",
                "license": "cc0",
                "license_url": "https://creativecommons.org/publicdomain/zero/1.0/",
                "provider": "wikimedia",
                "foreign_landing_url": "https://commons.wikimedia.org/wiki/File:Snowflake.png",
                "url": "https://upload.wikimedia.org/Snowflake.png",
                "width": 800,
                "height": 600,
                "tags": [{"name": "tor"}]
            },
            {
                "id": "two",
                "title": "unrelated photo",
                "license": "by-nc",
                "provider": "flickr",
                "url": "https://live.staticflickr.com/photo.jpg",
                "width": 2000,
                "height": 1500
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/v1/images/"))
        .and(query_param("q", "tor snowflake"))
        .and(query_param("page_size", "15"))
        .and(query_param("mature", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client
        .search_images("tor snowflake", 15)
        .await
        .expect("search should succeed");

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].title, "Snowflake bridge diagram");
    assert_eq!(candidates[0].provider, "wikimedia");
    assert_eq!(candidates[0].tags, vec!["tor".to_string()]);
    assert_eq!(candidates[1].license, "by-nc");
    assert!(candidates[1].creator.is_none());
}

#[tokio::test]
async fn empty_results_are_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/images/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let candidates = client.search_images("nothing", 15).await.expect("search");
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn server_error_surfaces_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/images/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_images("x", 15).await.unwrap_err();
    assert!(
        matches!(err, OpenverseError::UnexpectedStatus { status: 503, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn failed_search_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/images/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(client.search_images("x", 15).await.is_err());
}

#[tokio::test]
async fn malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/images/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.search_images("x", 15).await.unwrap_err();
    assert!(matches!(err, OpenverseError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn download_returns_bytes_and_sends_referer() {
    let server = MockServer::start().await;
    let expected_referer = server.uri();

    Mock::given(method("GET"))
        .and(path("/assets/photo.jpg"))
        .and(header("referer", expected_referer.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1_u8, 2, 3, 4]))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let bytes = client
        .download(&format!("{}/assets/photo.jpg", server.uri()))
        .await
        .expect("download");
    assert_eq!(bytes, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn download_not_found_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .download(&format!("{}/missing.jpg", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, OpenverseError::UnexpectedStatus { status: 404, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn oversized_download_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assets/huge.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0_u8; 2048]))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_max_download_bytes(1024);
    let err = client
        .download(&format!("{}/assets/huge.jpg", server.uri()))
        .await
        .unwrap_err();

    assert!(
        matches!(err, OpenverseError::TooLarge { limit: 1024, .. }),
        "expected TooLarge, got: {err:?}"
    );
}

#[tokio::test]
async fn download_at_the_limit_is_accepted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assets/exact.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7_u8; 1024]))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_max_download_bytes(1024);
    let bytes = client
        .download(&format!("{}/assets/exact.jpg", server.uri()))
        .await
        .expect("download within limit");
    assert_eq!(bytes.len(), 1024);
}
