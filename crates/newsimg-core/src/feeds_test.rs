use std::io::Write;

use super::*;

fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write yaml");
    file
}

#[test]
fn default_feed_set_is_valid() {
    let feeds = FeedsFile::default();
    assert_eq!(feeds.feeds.len(), 5);
    validate_feeds(&feeds).expect("built-in feeds should validate");
}

#[test]
fn load_feeds_parses_yaml() {
    let file = write_yaml(
        "feeds:\n  - name: EFF\n    url: https://www.eff.org/rss/updates.xml\n  - name: Tor Project\n    url: https://blog.torproject.org/rss.xml\n",
    );
    let feeds = load_feeds(file.path()).expect("should load");
    assert_eq!(feeds.feeds.len(), 2);
    assert_eq!(feeds.feeds[0].name, "EFF");
    assert_eq!(feeds.feeds[1].url, "https://blog.torproject.org/rss.xml");
}

#[test]
fn load_feeds_missing_file_is_io_error() {
    let err = load_feeds(Path::new("/definitely/not/here/feeds.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileIo { .. }), "got: {err:?}");
}

#[test]
fn load_feeds_bad_yaml_is_parse_error() {
    let file = write_yaml("feeds: [unterminated");
    let err = load_feeds(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::FileParse { .. }), "got: {err:?}");
}

#[test]
fn empty_feed_list_fails_validation() {
    let file = write_yaml("feeds: []\n");
    let err = load_feeds(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn blank_name_fails_validation() {
    let feeds = FeedsFile {
        feeds: vec![FeedSource {
            name: "  ".to_string(),
            url: "https://example.com/rss".to_string(),
        }],
    };
    assert!(matches!(
        validate_feeds(&feeds),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn non_http_url_fails_validation() {
    let feeds = FeedsFile {
        feeds: vec![FeedSource {
            name: "Local".to_string(),
            url: "file:///tmp/feed.xml".to_string(),
        }],
    };
    let err = validate_feeds(&feeds).unwrap_err();
    assert!(err.to_string().contains("invalid url"), "got: {err}");
}

#[test]
fn duplicate_url_fails_validation_case_insensitively() {
    let feeds = FeedsFile {
        feeds: vec![
            FeedSource {
                name: "EFF".to_string(),
                url: "https://www.eff.org/rss/updates.xml".to_string(),
            },
            FeedSource {
                name: "EFF again".to_string(),
                url: "https://WWW.EFF.org/rss/updates.xml".to_string(),
            },
        ],
    };
    let err = validate_feeds(&feeds).unwrap_err();
    assert!(err.to_string().contains("duplicate feed url"), "got: {err}");
}

#[test]
fn shipped_feeds_file_matches_built_in_set() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/feeds.yaml");
    let loaded = load_feeds(&path).expect("config/feeds.yaml should load");
    assert_eq!(loaded.feeds, FeedsFile::default().feeds);
}
