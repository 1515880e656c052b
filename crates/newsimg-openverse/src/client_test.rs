use super::*;

fn test_client(base_url: &str) -> OpenverseClient {
    OpenverseClient::with_base_url(15, 20, "newsimg-test/0.1", base_url)
        .expect("client construction should not fail")
}

#[test]
fn search_url_appends_path_and_filters() {
    let client = test_client("https://api.openverse.engineering");
    let url = client.search_url("tor snowflake", 15).expect("url");
    assert_eq!(url.path(), "/v1/images/");

    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert!(pairs.contains(&("q".into(), "tor snowflake".into())));
    assert!(pairs.contains(&("page_size".into(), "15".into())));
    assert!(pairs.contains(&("license_type".into(), "commercial".into())));
    assert!(pairs.contains(&(
        "license".into(),
        "cc0,pdm,by,by-sa,by-nd,by-nc,by-nc-sa,by-nc-nd".into()
    )));
    assert!(pairs.contains(&("mature".into(), "false".into())));
}

#[test]
fn base_url_with_path_keeps_prefix() {
    let client = test_client("http://localhost:9000/proxy/");
    let url = client.search_url("x", 1).expect("url");
    assert_eq!(url.path(), "/proxy/v1/images/");
}

#[test]
fn search_url_encodes_special_characters() {
    let client = test_client("https://api.openverse.engineering/");
    let url = client.search_url("tor & vpn", 5).expect("url");
    assert!(
        url.as_str().contains("tor+%26+vpn") || url.as_str().contains("tor%20%26%20vpn"),
        "query param should be percent-encoded: {url}"
    );
}

#[test]
fn referer_is_api_origin() {
    let client = test_client("https://api.openverse.engineering/v1");
    assert_eq!(client.referer(), "https://api.openverse.engineering");
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = OpenverseClient::with_base_url(1, 1, "ua", "not a url").unwrap_err();
    assert!(matches!(err, OpenverseError::InvalidUrl { .. }), "got {err:?}");
}
