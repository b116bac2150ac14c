//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use sumi_harvest::config::{Config, CrawlRequest};
use sumi_harvest::crawler::{run_crawl, Coordinator};
use sumi_harvest::output::{content_hash, OutputError, OutputResult, PageRecord, RecordSink};
use sumi_harvest::state::PageState;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML page containing one anchor per href
fn links_page(title: &str, hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, anchors
    )
}

/// Mounts an HTML page that must be requested exactly `times` times
async fn mount_page(server: &MockServer, route: &str, body: String, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts a failing route that must be requested exactly `times` times
async fn mount_failure(server: &MockServer, route: &str, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

/// Creates a crawl request for the mock server's root with no delay
fn create_request(
    server: &MockServer,
    output: &Path,
    configure: impl FnOnce(&mut Config),
) -> CrawlRequest {
    let mut config = Config::default();
    config.crawler.rate_limit = 0.0;
    config.output.directory = output.display().to_string();
    configure(&mut config);
    CrawlRequest::from_config(&format!("{}/", server.uri()), &config)
        .expect("Failed to build request")
}

/// Directory the JSON records for the mock server land in
fn domain_dir(output: &Path, server: &MockServer) -> PathBuf {
    let netloc = server.uri().trim_start_matches("http://").to_string();
    output.join(content_hash(&netloc))
}

/// Sink keeping records in memory, optionally failing for some URLs
#[derive(Clone, Default)]
struct MemorySink {
    saved: Arc<Mutex<Vec<PageRecord>>>,
    fail_on: Option<String>,
    cancel_after_save: Option<CancellationToken>,
}

impl MemorySink {
    fn urls(&self) -> Vec<String> {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.metadata.url.clone())
            .collect()
    }
}

impl RecordSink for MemorySink {
    fn save(&mut self, record: &PageRecord) -> OutputResult<PathBuf> {
        if let Some(fragment) = &self.fail_on {
            if record.metadata.url.ends_with(fragment.as_str()) {
                return Err(OutputError::Write {
                    path: PathBuf::from(&record.metadata.url),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
                });
            }
        }
        self.saved.lock().unwrap().push(record.clone());
        if let Some(cancel) = &self.cancel_after_save {
            cancel.cancel();
        }
        Ok(PathBuf::from(&record.metadata.url))
    }
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <!-- navigation -->
            <h1>Welcome</h1>
            <img src="/logo.png">
            <a href="/page1">Page 1</a>
            <a href="page2">Page 2</a>
        </body></html>"#
            .to_string(),
        1,
    )
    .await;
    mount_page(&server, "/page1", "<html><body>Content 1</body></html>".to_string(), 1).await;
    mount_page(&server, "/page2", links_page("Page 2", &[]), 1).await;

    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 2);
    let outcome = run_crawl(request, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.stats.pages_crawled, 3);
    assert_eq!(outcome.stats.links_found, 2);
    assert_eq!(outcome.stats.errors, 0);
    assert!(!outcome.cancelled);

    let dir = domain_dir(output.path(), &server);
    let seed = format!("{}/", server.uri());
    let seed_file = dir.join(format!("{}.json", content_hash(&seed)));
    let record: PageRecord =
        serde_json::from_str(&std::fs::read_to_string(seed_file).unwrap()).unwrap();

    assert_eq!(record.metadata.url, seed);
    assert_eq!(record.metadata.title, "Home");
    assert_eq!(
        record.text_elements,
        vec!["Home", "Welcome", "Page 1", "Page 2"]
    );
    assert_eq!(record.image_links, vec![format!("{}/logo.png", server.uri())]);

    let page1_file = dir.join(format!("{}.json", content_hash(&format!("{}/page1", server.uri()))));
    let page1: PageRecord =
        serde_json::from_str(&std::fs::read_to_string(page1_file).unwrap()).unwrap();
    assert_eq!(page1.metadata.title, "Untitled");

    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 3);
}

#[tokio::test]
async fn test_link_cap_at_depth_one() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        links_page("Home", &["/p1", "/p2", "/p3", "mailto:someone@example.test", "/p4", "/p5"]),
        1,
    )
    .await;
    for route in ["/p1", "/p2", "/p3", "/p4", "/p5"] {
        mount_page(&server, route, links_page("Child", &[]), 0).await;
    }

    let request = create_request(&server, output.path(), |c| {
        c.crawler.max_depth = 1;
        c.crawler.max_links_per_page = 2;
    });
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    // two links descended into at depth 0, neither fetched
    assert_eq!(outcome.stats.pages_crawled, 1);
    assert_eq!(outcome.stats.links_found, 2);
    assert_eq!(outcome.visited.len(), 1);
}

#[tokio::test]
async fn test_link_cap_at_depth_two() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &server,
        "/",
        links_page("Home", &["mailto:someone@example.test", "/p1", "/p2", "/p3", "/p4", "/p5"]),
        1,
    )
    .await;
    mount_page(&server, "/p1", links_page("One", &[]), 1).await;
    mount_page(&server, "/p2", links_page("Two", &[]), 1).await;
    for route in ["/p3", "/p4", "/p5"] {
        mount_page(&server, route, links_page("Child", &[]), 0).await;
    }

    let request = create_request(&server, output.path(), |c| {
        c.crawler.max_depth = 2;
        c.crawler.max_links_per_page = 2;
    });
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.stats.pages_crawled, 3);
    assert_eq!(outcome.stats.links_found, 2);
    assert!(outcome.visited.urls().all(|u| !u.starts_with("mailto:")));
}

#[tokio::test]
async fn test_excluded_prefix_is_never_dispatched() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("Home", &["/private/page", "/public"]), 1).await;
    mount_page(&server, "/private/page", links_page("Secret", &[]), 0).await;
    mount_page(&server, "/public", links_page("Public", &[]), 1).await;

    let request = create_request(&server, output.path(), |c| {
        c.crawler.max_depth = 2;
        c.crawler.exclude_paths = vec!["/private".to_string()];
    });
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.stats.pages_crawled, 2);
    assert_eq!(outcome.stats.links_found, 1);
}

#[tokio::test]
async fn test_seed_failure_counts_error_and_writes_nothing() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_failure(&server, "/", 500, 1).await;

    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 3);
    let outcome = run_crawl(request, CancellationToken::new())
        .await
        .expect("Seed failure must not fail the run");

    assert_eq!(outcome.stats.errors, 1);
    assert_eq!(outcome.stats.pages_crawled, 0);
    assert_eq!(outcome.stats.links_found, 0);

    let dir = domain_dir(output.path(), &server);
    assert_eq!(std::fs::read_dir(dir).unwrap().count(), 0);

    let seed = format!("{}/", server.uri());
    assert_eq!(outcome.visited.state(&seed), Some(PageState::Failed));
}

#[tokio::test]
async fn test_duplicate_anchors_are_not_double_counted() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let absolute_a = format!("{}/a", server.uri());
    mount_page(
        &server,
        "/",
        links_page("Home", &["/a", "/a", absolute_a.as_str(), "/b", "/c"]),
        1,
    )
    .await;
    mount_page(&server, "/a", links_page("A", &["/"]), 1).await;
    mount_page(&server, "/b", links_page("B", &[]), 1).await;
    mount_page(&server, "/c", links_page("C", &[]), 0).await;

    let request = create_request(&server, output.path(), |c| {
        c.crawler.max_depth = 2;
        c.crawler.max_links_per_page = 2;
    });
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    // the repeated /a anchors do not use up the cap, so /b is reached
    assert_eq!(outcome.stats.pages_crawled, 3);
    assert_eq!(outcome.stats.links_found, 2);
}

#[tokio::test]
async fn test_cycles_fetch_each_url_once() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("Home", &["/a", "/b"]), 1).await;
    mount_page(&server, "/a", links_page("A", &["/", "/b", "/a"]), 1).await;
    mount_page(&server, "/b", links_page("B", &["/", "/a"]), 1).await;

    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 5);
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.stats.pages_crawled, 3);
    assert_eq!(outcome.visited.len(), 3);
    // / -> /a, /a -> /b; /b's links are all visited and / finds nothing new
    assert_eq!(outcome.stats.links_found, 2);
}

#[tokio::test]
async fn test_depth_bounds_the_chain() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("0", &["/1"]), 1).await;
    mount_page(&server, "/1", links_page("1", &["/2"]), 1).await;
    mount_page(&server, "/2", links_page("2", &["/3"]), 1).await;
    mount_page(&server, "/3", links_page("3", &["/4"]), 0).await;

    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 3);
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.stats.pages_crawled, 3);
    assert_eq!(outcome.stats.links_found, 3);
    assert_eq!(std::fs::read_dir(domain_dir(output.path(), &server)).unwrap().count(), 3);
}

#[tokio::test]
async fn test_traversal_is_depth_first_in_document_order() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("Home", &["/a", "/b"]), 1).await;
    mount_page(&server, "/a", links_page("A", &["/c"]), 1).await;
    mount_page(&server, "/b", links_page("B", &[]), 1).await;
    mount_page(&server, "/c", links_page("C", &[]), 1).await;

    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 3);
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    let base = server.uri();
    let order: Vec<String> = outcome.visited.urls().map(str::to_string).collect();
    assert_eq!(
        order,
        vec![
            format!("{}/", base),
            format!("{}/a", base),
            format!("{}/c", base),
            format!("{}/b", base),
        ]
    );
}

#[tokio::test]
async fn test_child_failure_does_not_stop_siblings() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("Home", &["/broken", "/missing", "/ok"]), 1).await;
    mount_failure(&server, "/broken", 500, 1).await;
    mount_page(&server, "/ok", links_page("OK", &[]), 1).await;
    // /missing is unmocked and gets wiremock's default 404

    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 2);
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.stats.pages_crawled, 2);
    assert_eq!(outcome.stats.errors, 2);
    assert_eq!(outcome.stats.links_found, 3);
    assert_eq!(outcome.stats.dispatched(), outcome.visited.len() as u64);
    assert_eq!(outcome.visited.count(PageState::Succeeded), 2);
    assert_eq!(outcome.visited.count(PageState::Failed), 2);
}

#[tokio::test]
async fn test_external_links_are_not_followed() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;
    let output = TempDir::new().unwrap();

    let external = format!("{}/elsewhere", other.uri());
    mount_page(&server, "/", links_page("Home", &[external.as_str(), "/inside"]), 1).await;
    mount_page(&server, "/inside", links_page("Inside", &[]), 1).await;
    mount_page(&other, "/elsewhere", links_page("Other", &[]), 0).await;

    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 2);
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.stats.pages_crawled, 2);
    assert_eq!(outcome.stats.links_found, 1);
}

#[tokio::test]
async fn test_save_failure_is_isolated() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("Home", &["/a", "/b"]), 1).await;
    mount_page(&server, "/a", links_page("A", &["/c"]), 1).await;
    mount_page(&server, "/b", links_page("B", &[]), 1).await;
    mount_page(&server, "/c", links_page("C", &[]), 1).await;

    let sink = MemorySink {
        fail_on: Some("/a".to_string()),
        ..MemorySink::default()
    };
    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 3);
    let coordinator =
        Coordinator::with_sink(request, Box::new(sink.clone()), CancellationToken::new()).unwrap();
    let outcome = coordinator.run().await;

    assert_eq!(outcome.stats.pages_crawled, 4);
    assert_eq!(outcome.stats.save_errors, 1);
    assert_eq!(outcome.stats.errors, 0);

    let base = server.uri();
    assert_eq!(
        sink.urls(),
        vec![
            format!("{}/", base),
            format!("{}/c", base),
            format!("{}/b", base),
        ]
    );
}

#[tokio::test]
async fn test_cancellation_stops_new_dispatches() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("Home", &["/a", "/b"]), 1).await;
    mount_page(&server, "/a", links_page("A", &[]), 0).await;
    mount_page(&server, "/b", links_page("B", &[]), 0).await;

    let cancel = CancellationToken::new();
    let sink = MemorySink {
        cancel_after_save: Some(cancel.clone()),
        ..MemorySink::default()
    };
    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 2);
    let outcome = Coordinator::with_sink(request, Box::new(sink.clone()), cancel)
        .unwrap()
        .run()
        .await;

    assert!(outcome.cancelled);
    assert_eq!(outcome.stats.pages_crawled, 1);
    assert_eq!(outcome.stats.links_found, 0);
    assert_eq!(sink.urls(), vec![format!("{}/", server.uri())]);
}

#[tokio::test]
async fn test_cancellation_interrupts_delay() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("Home", &[]), 0).await;

    let cancel = CancellationToken::new();
    let request = create_request(&server, output.path(), |c| c.crawler.rate_limit = 60.0);

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let outcome = run_crawl(request, cancel).await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(outcome.cancelled);
    assert!(outcome.visited.is_empty());
}

#[tokio::test]
async fn test_delay_before_every_request() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("Home", &["/gone"]), 1).await;
    mount_failure(&server, "/gone", 404, 1).await;

    let request = create_request(&server, output.path(), |c| {
        c.crawler.max_depth = 2;
        c.crawler.rate_limit = 0.1;
    });

    let start = Instant::now();
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.stats.dispatched(), 2);
    assert!(start.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_configured_method_is_used() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(links_page("Posted", &[])))
        .expect(1)
        .mount(&server)
        .await;

    let request = create_request(&server, output.path(), |c| {
        c.request.http_method = "post".to_string();
    });
    let outcome = run_crawl(request, CancellationToken::new()).await.unwrap();

    assert_eq!(outcome.stats.pages_crawled, 1);
}

#[tokio::test]
async fn test_rerun_overwrites_same_files() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", links_page("Home", &["/a"]), 2).await;
    mount_page(&server, "/a", links_page("A", &[]), 2).await;

    let dir = domain_dir(output.path(), &server);
    let snapshot = |dir: &Path| {
        let mut files: Vec<(String, String)> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| {
                let path = entry.unwrap().path();
                (
                    path.file_name().unwrap().to_string_lossy().to_string(),
                    std::fs::read_to_string(&path).unwrap(),
                )
            })
            .collect();
        files.sort();
        files
    };

    let request = create_request(&server, output.path(), |c| c.crawler.max_depth = 2);
    run_crawl(request.clone(), CancellationToken::new()).await.unwrap();
    let first = snapshot(&dir);

    run_crawl(request, CancellationToken::new()).await.unwrap();
    let second = snapshot(&dir);

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unwritable_output_is_a_setup_error() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let blocker = output.path().join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    mount_page(&server, "/", links_page("Home", &[]), 0).await;

    let request = create_request(&server, &blocker, |_| {});
    let result = run_crawl(request, CancellationToken::new()).await;

    assert!(matches!(
        result,
        Err(sumi_harvest::HarvestError::Config(
            sumi_harvest::ConfigError::OutputDirectory {
                source: OutputError::Write { .. },
                ..
            }
        ))
    ));
}
