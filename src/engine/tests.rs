//! Tests for the collation engine

use super::*;
use crate::fetch::PageFetcher;
use crate::http::{HttpClient, HttpClientConfig, RetryPolicy};
use crate::output::JsonArrayWriter;
use crate::pagination::PagePathPaginator;
use crate::shutdown::ShutdownSignal;
use pretty_assertions::assert_eq;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_page(server: &MockServer, page: u32, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/page/{page}")))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

fn collator(server: &MockServer, total_pages: u32) -> Collator {
    let config = HttpClientConfig::builder()
        .retry(RetryPolicy::new(2, Duration::from_millis(5)))
        .no_rate_limit()
        .build();
    let client = HttpClient::with_config(config).unwrap();
    Collator::new(
        PageFetcher::new(client, "token"),
        Box::new(PagePathPaginator::new(server.uri(), total_pages)),
    )
}

async fn run_to_string(collator: &Collator) -> (String, RunStats) {
    let writer = JsonArrayWriter::new(Vec::new()).unwrap();
    let (sink, stats) = collator.run(writer).await.unwrap();
    (String::from_utf8(sink).unwrap(), stats)
}

#[test]
fn test_checkpoints() {
    assert_eq!(PROGRESS_INTERVAL, 10);
    assert!(is_checkpoint(10, Some(23)));
    assert!(is_checkpoint(23, Some(23)));
    assert!(!is_checkpoint(11, Some(23)));
    assert!(!is_checkpoint(7, None));
}

#[tokio::test]
async fn test_collator_end_to_end_example() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 200, "[1,2]").await;
    mount_page(&server, 2, 200, "[]").await;
    mount_page(&server, 3, 200, "[3]").await;

    let (output, stats) = run_to_string(&collator(&server, 3)).await;

    assert_eq!(output, "[1,2,3]");
    assert_eq!(stats.pages_fetched, 3);
    assert_eq!(stats.groups_written, 2);
    assert_eq!(stats.empty_pages, vec![2]);
    assert!(stats.malformed_pages.is_empty());
    assert_eq!(stats.bytes_written, output.len() as u64);
}

#[tokio::test]
async fn test_collator_leading_empty_pages_do_not_consume_first_slot() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 200, "[]").await;
    mount_page(&server, 2, 200, " [ ] ").await;
    mount_page(&server, 3, 200, "[{\"id\":1}]").await;
    mount_page(&server, 4, 200, "[]").await;

    let (output, stats) = run_to_string(&collator(&server, 4)).await;

    assert_eq!(output, "[{\"id\":1}]");
    assert_eq!(stats.empty_pages, vec![1, 2, 4]);
}

#[tokio::test]
async fn test_collator_output_is_valid_json() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 200, "[{\"a\":1},{\"a\":2}]").await;
    mount_page(&server, 2, 200, "\n[ {\"a\":3} ]\n").await;
    mount_page(&server, 3, 200, "[[4,5],\"six\"]").await;

    let (output, _) = run_to_string(&collator(&server, 3)).await;

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([{"a":1},{"a":2},{"a":3},[4,5],"six"])
    );
}

#[tokio::test]
async fn test_collator_malformed_page_does_not_abort() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 200, "[1]").await;
    mount_page(&server, 2, 200, "{\"error\":\"x\"}").await;
    mount_page(&server, 3, 200, "[2]").await;

    let (output, stats) = run_to_string(&collator(&server, 3)).await;

    assert_eq!(output, "[1,{\"error\":\"x\"},2]");
    assert_eq!(stats.malformed_pages, vec![2]);
    assert_eq!(stats.pages_fetched, 3);
}

#[tokio::test]
async fn test_collator_zero_pages() {
    let server = MockServer::start().await;
    let (output, stats) = run_to_string(&collator(&server, 0)).await;

    assert_eq!(output, "[]");
    assert_eq!(stats.pages_fetched, 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_collator_fetches_pages_in_order() {
    let server = MockServer::start().await;
    for page in 1..=5 {
        mount_page(&server, page, 200, &format!("[{page}]")).await;
    }

    let (output, _) = run_to_string(&collator(&server, 5)).await;
    assert_eq!(output, "[1,2,3,4,5]");

    let paths: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        paths,
        vec!["/page/1", "/page/2", "/page/3", "/page/4", "/page/5"]
    );
}

#[tokio::test]
async fn test_collator_aborts_on_terminal_failure() {
    let server = MockServer::start().await;
    for page in 1..=4 {
        mount_page(&server, page, 200, &format!("[{page}]")).await;
    }
    mount_page(&server, 5, 404, "gone").await;
    for page in 6..=10 {
        mount_page(&server, page, 200, &format!("[{page}]")).await;
    }

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.json");
    let err = collator(&server, 10).run_to_file(&out).await.unwrap_err();

    match err {
        Error::PageFailed { page, source } => {
            assert_eq!(page, 5);
            assert!(matches!(*source, Error::HttpStatus { status: 404, .. }));
        }
        other => panic!("expected PageFailed, got {other:?}"),
    }

    // Truncated on purpose: no closing bracket
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "[1,2,3,4");
    let requested = server.received_requests().await.unwrap().len();
    assert_eq!(requested, 5);
}

#[tokio::test]
async fn test_collator_aborts_after_retries_exhausted() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 200, "[1]").await;
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let writer = JsonArrayWriter::new(Vec::new()).unwrap();
    let err = collator(&server, 3).run(writer).await.unwrap_err();

    assert!(matches!(err, Error::PageFailed { page: 2, .. }));
}

/// Sink whose writes start failing after a fixed number of calls
#[derive(Debug)]
struct FailingSink {
    writes_left: usize,
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.writes_left == 0 {
            return Err(std::io::Error::other("disk full"));
        }
        self.writes_left -= 1;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_collator_write_failure_names_page() {
    let server = MockServer::start().await;
    for page in 1..=3 {
        mount_page(&server, page, 200, &format!("[{page}]")).await;
    }

    // "[" and "1" succeed; the separator before page 2 fails
    let writer = JsonArrayWriter::new(FailingSink { writes_left: 2 }).unwrap();
    let err = collator(&server, 3).run(writer).await.unwrap_err();

    match err {
        Error::PageFailed { page, source } => {
            assert_eq!(page, 2);
            assert!(source.to_string().contains("disk full"));
            assert!(matches!(*source, Error::Output { .. }));
        }
        other => panic!("expected PageFailed, got {other:?}"),
    }
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_collator_progress_every_interval_and_final_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[0]"))
        .mount(&server)
        .await;

    let (_, stats) = run_to_string(&collator(&server, 23)).await;

    let pages: Vec<u32> = stats.progress.iter().map(|p| p.page).collect();
    assert_eq!(pages, vec![10, 20, 23]);
    assert!(stats.progress.iter().all(|p| p.total_pages == Some(23)));
    assert!(stats.progress[0].elapsed <= stats.progress[2].elapsed);
}

#[tokio::test]
async fn test_collator_final_page_on_interval_reported_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[0]"))
        .mount(&server)
        .await;

    let (_, stats) = run_to_string(&collator(&server, 20)).await;
    let pages: Vec<u32> = stats.progress.iter().map(|p| p.page).collect();
    assert_eq!(pages, vec![10, 20]);
}

#[tokio::test]
async fn test_collator_cancellation_aborts_run() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 200, "[1]").await;
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[2]")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let shutdown = ShutdownSignal::new();
    let client = HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build())
        .unwrap()
        .with_shutdown(shutdown.clone());
    let collator = Collator::new(
        PageFetcher::new(client, "token"),
        Box::new(PagePathPaginator::new(server.uri(), 3)),
    );

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.json");

    let trigger = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        shutdown.request_shutdown();
    });
    let err = collator.run_to_file(&out).await.unwrap_err();
    trigger.await.unwrap();

    assert!(err.is_cancelled());
    assert!(matches!(err, Error::PageFailed { page: 2, .. }));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "[1");
}

#[tokio::test]
async fn test_collator_run_to_file_summary() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 200, "[1,2]").await;
    mount_page(&server, 2, 200, "[3]").await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("summary.json");
    let summary = collator(&server, 2).run_to_file(&out).await.unwrap();

    assert!(summary.path.is_absolute());
    assert_eq!(summary.file_size, "[1,2,3]".len() as u64);
    assert_eq!(summary.stats.pages_fetched, 2);
    assert_eq!(summary.stats.bytes_written, summary.file_size);
    assert!(summary.to_string().contains("Wrote 2 pages (7 bytes)"));
}
