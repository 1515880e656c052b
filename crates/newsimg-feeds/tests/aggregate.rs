//! Feed aggregation against wiremock-served feeds.

use newsimg_core::FeedSource;
use newsimg_feeds::{aggregate_feeds, FeedClient, ParseOptions};
use wiremock::matchers::{headers, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RSS_A: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>A</title>
  <item>
    <title>Shared story</title>
    <link>https://news.example/shared</link>
    <pubDate>Sun, 21 Sep 2025 08:00:00 +0000</pubDate>
    <description>Older copy</description>
  </item>
  <item>
    <title>Only in A</title>
    <link>https://news.example/a-only</link>
    <pubDate>Sat, 20 Sep 2025 08:00:00 +0000</pubDate>
  </item>
  <item>
    <title></title>
    <link>https://news.example/untitled</link>
  </item>
</channel></rss>"#;

const RSS_B: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>B</title>
  <item>
    <title>Shared story</title>
    <link>https://news.example/shared</link>
    <pubDate>Sun, 21 Sep 2025 10:00:00 +0000</pubDate>
    <description>Newer copy</description>
  </item>
</channel></rss>"#;

fn source(name: &str, url: String) -> FeedSource {
    FeedSource {
        name: name.to_string(),
        url,
    }
}

async fn mount_feed(server: &MockServer, feed_path: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(feed_path))
        .and(headers(
            "accept",
            vec!["application/rss+xml", "application/atom+xml", "*/*"],
        ))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn aggregates_dedups_and_skips_failing_feeds() {
    let server = MockServer::start().await;
    mount_feed(&server, "/a.xml", ResponseTemplate::new(200).set_body_string(RSS_A)).await;
    mount_feed(&server, "/b.xml", ResponseTemplate::new(200).set_body_string(RSS_B)).await;
    mount_feed(&server, "/down.xml", ResponseTemplate::new(503)).await;
    mount_feed(&server, "/junk.xml", ResponseTemplate::new(200).set_body_string("nope")).await;

    let feeds = vec![
        source("Feed A", format!("{}/a.xml", server.uri())),
        source("Down", format!("{}/down.xml", server.uri())),
        source("Feed B", format!("{}/b.xml", server.uri())),
        source("Junk", format!("{}/junk.xml", server.uri())),
    ];

    let client = FeedClient::new(5, "newsimg-test/0.1").expect("client");
    let feed = aggregate_feeds(&client, &feeds, ParseOptions::default()).await;

    let titles: Vec<&str> = feed.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["Shared story", "Only in A"]);
    assert_eq!(feed.items[0].source, "Feed B");
    assert_eq!(feed.items[0].summary, "Newer copy");
}

#[tokio::test]
async fn no_reachable_feeds_yields_empty_document() {
    let server = MockServer::start().await;
    mount_feed(&server, "/down.xml", ResponseTemplate::new(500)).await;

    let client = FeedClient::new(5, "newsimg-test/0.1").expect("client");
    let feed = aggregate_feeds(
        &client,
        &[source("Down", format!("{}/down.xml", server.uri()))],
        ParseOptions::default(),
    )
    .await;
    assert!(feed.items.is_empty());
}
