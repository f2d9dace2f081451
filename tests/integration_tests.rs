//! Integration tests for talk page extraction
use tedgrab::extractor::parse_talk_document;
use tedgrab::{slug_from_url, Config, ExtractError, TalkExtractor};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const BASE: &str = "https://www.ted.com";
const TALK_URL: &str = "https://www.ted.com/talks/test_talk";

/// A page resembling an older talk page: embedded player JSON plus
/// language-tagged subtitle anchors.
const FULL_PAGE: &str = r#"<html>
<head>
<script src="/assets/app.js"></script>
<script>
  talkPage.init({"playerData":{"talks":[{"player_talks":[{"resources":{"h264":[
    {"quality":"1080p","size":340000000,"file":"https://download.ted.com/talk-1080p.mp4"},
    {"quality":"720p","size":170000000,"file":"https://download.ted.com/talk-720p.mp4"}
  ]}}]}]}});
</script>
</head>
<body>
<h1>How to build for life in space</h1>
<h2>Ariel Ekblaw</h2>
<div class="subtitles">
  <a data-language="en" href="/talks/subtitles/en">English</a>
  <a data-language="zh-cn" href="/talks/subtitles/zh-cn">Chinese</a>
</div>
</body>
</html>"#;

#[test]
fn full_page_yields_videos_and_subtitles() {
    let talk = parse_talk_document(FULL_PAGE, TALK_URL, BASE).unwrap();

    assert_eq!(talk.title, "How to build for life in space");
    assert_eq!(talk.speaker, "Ariel Ekblaw");
    assert_eq!(talk.url, TALK_URL);

    // Formats keep source order; both qualities land in the URL map.
    assert_eq!(talk.video_formats.len(), 2);
    assert_eq!(talk.video_formats[0].quality, "1080p");
    assert_eq!(talk.video_formats[1].quality, "720p");
    assert_eq!(talk.video_urls["720p"], "https://download.ted.com/talk-720p.mp4");
    assert_eq!(talk.video_urls["1080p"], "https://download.ted.com/talk-1080p.mp4");

    assert_eq!(talk.subtitle_urls.len(), 2);
    assert_eq!(talk.subtitle_urls["en"], "https://www.ted.com/talks/subtitles/en");
    assert_eq!(talk.subtitle_urls["zh-cn"], "https://www.ted.com/talks/subtitles/zh-cn");
    assert!(talk.has_media());
}

#[test]
fn subtitles_alone_are_enough() {
    let page = r#"<html><body><h1>T</h1><h2>S</h2>
        <a data-language="en" href="/talks/subtitles/en">English</a>
    </body></html>"#;
    let talk = parse_talk_document(page, TALK_URL, BASE).unwrap();
    assert!(talk.video_urls.is_empty());
    assert!(talk.has_media());
}

#[test]
fn page_without_media_fails_with_no_data() {
    let page = "<html><body><h1>Just a title</h1><h2>Someone</h2><p>prose</p></body></html>";
    let err = parse_talk_document(page, TALK_URL, BASE).unwrap_err();
    assert!(matches!(err, ExtractError::NoData));
}

/// Answer one HTTP request on `listener` with a 200 response carrying `body`
async fn serve_once(listener: &TcpListener, content_type: &str, body: &str) {
    let (mut stream, _) = listener.accept().await.unwrap();
    let mut buf = [0u8; 8192];
    let _ = stream.read(&mut buf).await.unwrap();
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        content_type,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.unwrap();
    stream.shutdown().await.unwrap();
}

fn local_config(base: &str) -> Config {
    Config {
        base_url: base.to_string(),
        graphql_url: format!("{}/graphql", base),
        ..Config::default()
    }
}

#[tokio::test]
async fn graphql_error_payload_falls_back_to_markup() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        // First request: the shareLinks POST, answered with an error payload.
        serve_once(
            &listener,
            "application/json",
            r#"{"errors":[{"message":"upstream down"}]}"#,
        )
        .await;
        // Second request: the talk page fetched by the fallback path.
        serve_once(
            &listener,
            "text/html",
            r#"<html><body><h1>Fallback title</h1><h2>Fallback speaker</h2>
                <a data-language="en" href="/talks/subtitles/en">English</a></body></html>"#,
        )
        .await;
    });

    let mut extractor = TalkExtractor::with_config(local_config(&base));
    let talk = extractor
        .resolve_url(&format!("{}/talks/test_talk", base))
        .await
        .unwrap();

    assert_eq!(talk.title, "Fallback title");
    assert_eq!(talk.speaker, "Fallback speaker");
    assert_eq!(
        talk.subtitle_urls["en"],
        format!("{}/talks/subtitles/en", base)
    );
    server.await.unwrap();
}

#[tokio::test]
async fn graphql_zero_nodes_then_empty_page_is_no_data() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        serve_once(
            &listener,
            "application/json",
            r#"{"data":{"videos":{"nodes":[]}}}"#,
        )
        .await;
        serve_once(
            &listener,
            "text/html",
            "<html><body><h1>Just a title</h1><h2>Someone</h2></body></html>",
        )
        .await;
    });

    let mut extractor = TalkExtractor::with_config(local_config(&base));
    let err = extractor
        .resolve_url(&format!("{}/talks/test_talk", base))
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractError::NoData));
    server.await.unwrap();
}

#[test]
fn invalid_urls_are_rejected_before_any_request() {
    for url in [
        "https://www.ted.com",
        "https://www.ted.com/",
        "https://www.ted.com/speakers/brene_brown",
        "https://www.ted.com/talks/index.html",
        "",
    ] {
        assert!(
            matches!(slug_from_url(url), Err(ExtractError::InvalidUrl(_))),
            "expected InvalidUrl for {:?}",
            url
        );
    }

    assert_eq!(
        slug_from_url("https://www.ted.com/talks/test_talk?language=en").unwrap(),
        "test_talk"
    );
}
