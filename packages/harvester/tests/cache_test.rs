//! Tests for the cached HTTP client against a mock server.
//!
//! The client is blocking, so every request runs on a blocking task.

use std::path::PathBuf;

use tempfile::tempdir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spectrum_harvester::cache::{CacheStats, CachedClient, Fetch, Response};
use spectrum_harvester::config::HarvestOptions;
use spectrum_harvester::{harvest, HarvesterError};

/// Fetch each URL in order through a fresh client on `cache_dir`.
async fn fetch_all(
    cache_dir: PathBuf,
    urls: Vec<String>,
) -> (Vec<Result<Response, HarvesterError>>, CacheStats) {
    tokio::task::spawn_blocking(move || {
        let client = CachedClient::open(&cache_dir).unwrap();
        let responses = urls.iter().map(|url| client.get(url)).collect();
        (responses, client.close())
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_request_served_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/spectrum/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>page</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let url = format!("{}/spectrum/", server.uri());
    let (responses, stats) = fetch_all(dir.path().to_path_buf(), vec![url.clone(), url]).await;

    for response in responses {
        assert_eq!(response.unwrap(), Response::ok("<html>page</html>"));
    }
    assert_eq!(
        stats,
        CacheStats {
            hits: 1,
            misses: 1,
            stored: 1,
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cache_survives_new_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/unit/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>unit</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let url = format!("{}/unit/", server.uri());
    let (_, first) = fetch_all(dir.path().to_path_buf(), vec![url.clone()]).await;
    let (responses, second) = fetch_all(dir.path().to_path_buf(), vec![url]).await;

    assert_eq!(first.misses, 1);
    assert_eq!(second.hits, 1);
    assert_eq!(second.misses, 0);
    assert_eq!(responses[0].as_ref().unwrap().body, "<html>unit</html>");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let url = format!("{}/missing/", server.uri());
    let (responses, stats) = fetch_all(dir.path().to_path_buf(), vec![url.clone(), url]).await;

    for response in responses {
        assert_eq!(response.unwrap().status, 404);
    }
    assert_eq!(stats.stored, 0);
    assert_eq!(stats.misses, 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_redirect_is_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old/"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new/", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>moved</html>"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let (responses, _) =
        fetch_all(dir.path().to_path_buf(), vec![format!("{}/old/", server.uri())]).await;

    assert_eq!(responses[0].as_ref().unwrap().body, "<html>moved</html>");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let (responses, stats) =
        fetch_all(dir.path().to_path_buf(), vec![format!("{}/flaky/", server.uri())]).await;

    assert_eq!(responses[0].as_ref().unwrap().body, "<html>ok</html>");
    assert_eq!(stats.stored, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_harvest_through_mock_site() {
    let server = MockServer::start().await;
    let index = r#"<main class="site-main"><ul>
        <li class="untranslated"><a href="/appendix/">Object information</a></li>
    </ul></main>"#;
    let appendix = r#"<main class="site-main"><h1>Appendix</h1>
        <div class="further-description"><p>Intro.</p>
        <p><a href="/group/">Identity</a> Identifies.</p></div></main>"#;
    let group = r#"<main class="site-main"><div id="unitlist"><ul>
        <li><a href="/unit/">Object number</a></li></ul></div></main>"#;
    let unit = r#"<main class="site-main"><h1>Object number</h1><div class="entry-content">
        <div id="unit-definition"><h2>Definition</h2>
<p>A number.</p></div></div></main>"#;
    for (route, body) in [
        ("/index/", index),
        ("/appendix/", appendix),
        ("/group/", group),
        ("/unit/", unit),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let dir = tempdir().unwrap();
    let cache_dir = dir.path().to_path_buf();
    let origin = server.uri();
    let (counts, stats) = tokio::task::spawn_blocking(move || {
        let client = CachedClient::open(&cache_dir).unwrap();
        let options = HarvestOptions::default()
            .with_site_origin(origin.clone())
            .with_index_url(format!("{origin}/index/"));
        let result = harvest(&client, options).unwrap();
        (result.spectrum.counts(), client.close())
    })
    .await
    .unwrap();

    assert_eq!(counts.group_types, 1);
    assert_eq!(counts.groups, 1);
    assert_eq!(counts.units, 1);
    assert_eq!(stats.stored, 4);
}
