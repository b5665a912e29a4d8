//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and a recording
//! renderer to exercise the full crawl cycle end-to-end.

use async_trait::async_trait;
use menu_crawler::artifact::{ArtifactKind, RenderSession, Renderer};
use menu_crawler::config::Config;
use menu_crawler::crawler::{discover, Coordinator, FrontierEngine};
use menu_crawler::output::FailureStage;
use menu_crawler::state::{Page, PageState};
use menu_crawler::url::KeywordClassifier;
use menu_crawler::RenderError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ORLYPARK_HOME: &str = "http://orlypark.com.ua/";
const ORLYPARK_FIXTURE: &[u8] = include_bytes!("../fixtures/orlypark_home.html");

/// Renderer that writes a placeholder document and counts session lifecycles
#[derive(Debug, Default)]
struct RecordingRenderer {
    started: Arc<AtomicUsize>,
    torn_down: Arc<AtomicUsize>,
    rendered: Arc<Mutex<Vec<String>>>,
    fail_suffix: Option<String>,
}

impl RecordingRenderer {
    fn failing_on(suffix: &str) -> Self {
        Self {
            fail_suffix: Some(suffix.to_string()),
            ..Self::default()
        }
    }
}

struct RecordingSession {
    torn_down: Arc<AtomicUsize>,
    rendered: Arc<Mutex<Vec<String>>>,
    fail_suffix: Option<String>,
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn start(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(RecordingSession {
            torn_down: Arc::clone(&self.torn_down),
            rendered: Arc::clone(&self.rendered),
            fail_suffix: self.fail_suffix.clone(),
        }))
    }
}

#[async_trait]
impl RenderSession for RecordingSession {
    async fn render_to_document(&mut self, url: &str, output: &Path) -> Result<(), RenderError> {
        if let Some(suffix) = &self.fail_suffix {
            if url.ends_with(suffix.as_str()) {
                return Err(RenderError::Failed {
                    status: "exit status: 1".to_string(),
                });
            }
        }

        tokio::fs::write(output, format!("%PDF {}", url))
            .await
            .map_err(|e| RenderError::MissingOutput(e.to_string()))?;
        self.rendered.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn teardown(&mut self) {
        self.torn_down.fetch_add(1, Ordering::SeqCst);
    }
}

/// Creates a test configuration writing into `data_root`
fn create_test_config(data_root: &Path, max_concurrent: u32) -> Config {
    let mut config = Config::default();
    config.crawler.data_root = data_root.to_path_buf();
    config.crawler.max_concurrent_pages = max_concurrent;
    config.crawler.fetch_timeout_ms = 5_000;
    config
}

fn html(body: impl Into<String>) -> ResponseTemplate {
    let body: String = body.into();
    ResponseTemplate::new(200).set_body_raw(body, "text/html")
}

async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

/// Mounts a small menu site:
///
/// ```text
/// /                -> /menu/, /menu/bar/, /contacts/, /menu/missing/, img /images/menu/1.png
/// /menu/           -> /menu/bar/, /menu/sushi/, img /images/menu/1.png
/// /menu/bar/       -> (no links)
/// /menu/sushi/     -> application/pdf
/// /menu/missing/   -> 404
/// ```
async fn mount_menu_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        html(
            r#"<html><body>
            <a href="/menu/">Menu</a>
            <a href="/menu/bar/">Bar</a>
            <a href="/contacts/">Contacts</a>
            <a href="/menu/missing/">Old menu</a>
            <img src="/images/menu/1.png">
            <img src="/images/logo.png">
            </body></html>"#,
        ),
    )
    .await;

    mount_page(
        server,
        "/menu/",
        html(
            r#"<html><body>
            <a href="/menu/bar/">Bar</a>
            <a href="/menu/sushi/">Sushi</a>
            <a href="/">Home</a>
            <img src="/images/menu/1.png">
            </body></html>"#,
        ),
    )
    .await;

    mount_page(server, "/menu/bar/", html("<html><body>Bar</body></html>")).await;

    mount_page(
        server,
        "/menu/sushi/",
        ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4 sushi".to_vec(), "application/pdf"),
    )
    .await;

    mount_page(server, "/menu/missing/", ResponseTemplate::new(404)).await;

    mount_page(
        server,
        "/images/menu/1.png",
        ResponseTemplate::new(200).set_body_raw(b"\x89PNG menu".to_vec(), "image/png"),
    )
    .await;
}

fn site_dir(data_root: &Path, server: &MockServer) -> PathBuf {
    let host = server.uri().trim_start_matches("http://").to_string();
    data_root.join(host)
}

#[tokio::test]
async fn test_full_crawl_produces_artifacts() {
    let server = MockServer::start().await;
    mount_menu_site(&server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 4);
    let renderer = Arc::new(RecordingRenderer::default());
    let coordinator = Coordinator::new(&config, renderer.clone()).unwrap();

    let home = format!("{}/", server.uri());
    let report = coordinator.crawl(&home).await;

    assert!(report.is_success());
    assert_eq!(report.home_url, home);
    assert_eq!(report.root_state, PageState::Completed);
    assert_eq!(report.pages.len(), 5);
    assert_eq!(report.pages_in_state(PageState::Completed), 4);

    let root = report.page(&home).unwrap();
    assert_eq!(
        root.frontier,
        vec![
            format!("{}menu/", home),
            format!("{}menu/bar/", home),
            format!("{}menu/missing/", home),
        ]
    );

    let dir = site_dir(temp.path(), &server);
    let mut documents: Vec<_> = report
        .artifacts_of_kind(ArtifactKind::Document)
        .map(|a| a.path.clone())
        .collect();
    documents.sort();
    assert_eq!(documents, vec![dir.join("bar.pdf"), dir.join("menu.pdf")]);

    let mut binaries: Vec<_> = report
        .artifacts_of_kind(ArtifactKind::Binary)
        .map(|a| a.path.clone())
        .collect();
    binaries.sort();
    assert_eq!(binaries, vec![dir.join("1.png"), dir.join("sushi.pdf")]);

    assert_eq!(std::fs::read(dir.join("sushi.pdf")).unwrap(), b"%PDF-1.4 sushi");
    assert_eq!(std::fs::read(dir.join("1.png")).unwrap(), b"\x89PNG menu");
    assert!(dir.join("menu.pdf").is_file());

    // Home page and binary responses are never converted
    let rendered = renderer.rendered.lock().unwrap().clone();
    assert_eq!(rendered.len(), 2);
    assert!(!rendered.contains(&home));
    assert_eq!(renderer.started.load(Ordering::SeqCst), 2);
    assert_eq!(renderer.torn_down.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_child_failure_does_not_abort_siblings() {
    let server = MockServer::start().await;
    mount_menu_site(&server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 4);
    let coordinator = Coordinator::new(&config, Arc::new(RecordingRenderer::default())).unwrap();

    let home = format!("{}/", server.uri());
    let report = coordinator.crawl(&home).await;

    let missing = format!("{}menu/missing/", home);
    assert_eq!(report.page(&missing).unwrap().state, PageState::Failed);

    let failures: Vec<_> = report.failures_for(&missing).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].stage, FailureStage::Fetch);
    assert!(failures[0].reason.contains("404"));

    assert_eq!(
        report.page(&format!("{}menu/bar/", home)).unwrap().state,
        PageState::Completed
    );
    assert!(report.is_success());
    assert_eq!(report.failures.len(), 1);
}

#[tokio::test]
async fn test_no_url_fetched_twice() {
    let server = MockServer::start().await;

    // Both menu pages link each other and a shared grand-child
    mount_page(
        &server,
        "/",
        html(r#"<a href="/menu/a/">A</a><a href="/menu/b/">B</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/menu/a/",
        html(r#"<a href="/menu/b/">B</a><a href="/menu/shared/">S</a><a href="/menu/a/">self</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/menu/b/",
        html(r#"<a href="/menu/a/">A</a><a href="/menu/shared/">S</a>"#),
    )
    .await;
    mount_page(&server, "/menu/shared/", html("<p>shared</p>")).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 4);
    let coordinator = Coordinator::new(&config, Arc::new(RecordingRenderer::default())).unwrap();

    let report = coordinator.crawl(&format!("{}/", server.uri())).await;

    assert!(report.is_success());
    assert_eq!(report.pages.len(), 4);

    let mut urls: Vec<_> = report.pages.iter().map(|p| p.url.clone()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), 4);

    // Each mock expects exactly one request
    server.verify().await;
}

#[tokio::test]
async fn test_concurrency_ceiling_respected() {
    let server = MockServer::start().await;

    let links: String = (0..6)
        .map(|i| format!(r#"<a href="/menu/{}/">{}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", html(links)).await;

    for i in 0..6 {
        mount_page(
            &server,
            &format!("/menu/{}/", i),
            html("<p>dish</p>").set_delay(Duration::from_millis(200)),
        )
        .await;
    }

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 2);
    let coordinator = Coordinator::new(&config, Arc::new(RecordingRenderer::default())).unwrap();

    let started = Instant::now();
    let report = coordinator.crawl(&format!("{}/", server.uri())).await;
    let elapsed = started.elapsed();

    assert!(report.is_success());
    assert!(report.peak_concurrency <= 2);
    assert!(report.peak_concurrency >= 1);
    assert_eq!(report.pages.len(), 7);
    assert!(report.pages.iter().all(|p| p.state.is_terminal()));
    assert_eq!(report.pages_in_state(PageState::Completed), 7);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 7);

    // Six 200ms responses, two at a time: three rounds at least
    assert!(elapsed >= Duration::from_millis(600), "took {:?}", elapsed);
    // One at a time would need 1200ms
    assert!(elapsed < Duration::from_millis(1200), "took {:?}", elapsed);
}

#[tokio::test]
async fn test_fetch_timeout_fails_only_that_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html(r#"<a href="/menu/slow/">Slow</a><a href="/menu/fast/">Fast</a>"#),
    )
    .await;
    mount_page(
        &server,
        "/menu/slow/",
        html("<p>late</p>").set_delay(Duration::from_millis(800)),
    )
    .await;
    mount_page(&server, "/menu/fast/", html("<p>dish</p>")).await;

    let temp = TempDir::new().unwrap();
    let mut config = create_test_config(temp.path(), 4);
    config.crawler.fetch_timeout_ms = 200;
    let coordinator = Coordinator::new(&config, Arc::new(RecordingRenderer::default())).unwrap();

    let home = format!("{}/", server.uri());
    let report = coordinator.crawl(&home).await;

    let slow = format!("{}menu/slow/", home);
    assert_eq!(report.page(&slow).unwrap().state, PageState::Failed);

    let failures: Vec<_> = report.failures_for(&slow).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].stage, FailureStage::Fetch);
    assert!(failures[0].reason.contains("timeout"), "{}", failures[0].reason);

    assert_eq!(
        report.page(&format!("{}menu/fast/", home)).unwrap().state,
        PageState::Completed
    );
    assert_eq!(report.root_state, PageState::Completed);
    assert!(report.is_success());
    assert_eq!(report.failures.len(), 1);
}

#[tokio::test]
async fn test_linked_image_fetched_once() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        html(r#"<a href="/menu/1.jpg"><img src="/menu/1.jpg"></a>"#),
    )
    .await;
    mount_page(
        &server,
        "/menu/1.jpg",
        ResponseTemplate::new(200).set_body_raw(b"\xFF\xD8 menu".to_vec(), "image/jpeg"),
    )
    .await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 4);
    let coordinator = Coordinator::new(&config, Arc::new(RecordingRenderer::default())).unwrap();

    let home = format!("{}/", server.uri());
    let report = coordinator.crawl(&home).await;

    assert!(report.is_success());
    assert_eq!(report.pages.len(), 1);
    assert_eq!(
        report.page(&home).unwrap().frontier,
        vec![format!("{}menu/1.jpg", home)]
    );

    let binaries: Vec<_> = report
        .artifacts_of_kind(ArtifactKind::Binary)
        .map(|a| a.path.clone())
        .collect();
    assert_eq!(binaries, vec![site_dir(temp.path(), &server).join("1.jpg")]);
    assert!(report.failures.is_empty());

    server.verify().await;
}

#[tokio::test]
async fn test_render_failure_still_tears_down() {
    let server = MockServer::start().await;
    mount_menu_site(&server).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 4);
    let renderer = Arc::new(RecordingRenderer::failing_on("/menu/bar/"));
    let coordinator = Coordinator::new(&config, renderer.clone()).unwrap();

    let home = format!("{}/", server.uri());
    let report = coordinator.crawl(&home).await;

    assert!(report.is_success());

    let bar = format!("{}menu/bar/", home);
    let failures: Vec<_> = report.failures_for(&bar).collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].stage, FailureStage::Render);
    assert_eq!(report.page(&bar).unwrap().state, PageState::Completed);

    assert_eq!(report.artifacts_of_kind(ArtifactKind::Document).count(), 1);
    assert_eq!(
        renderer.started.load(Ordering::SeqCst),
        renderer.torn_down.load(Ordering::SeqCst)
    );
}

#[tokio::test]
async fn test_unreachable_home_fails_crawl() {
    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 2);
    let coordinator = Coordinator::new(&config, Arc::new(RecordingRenderer::default())).unwrap();

    let report = coordinator.crawl("http://127.0.0.1:9/").await;

    assert!(!report.is_success());
    assert_eq!(report.root_state, PageState::Failed);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].stage, FailureStage::Fetch);
    assert!(report.artifacts.is_empty());
}

#[tokio::test]
async fn test_site_folder_not_created_without_artifacts() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html(r#"<a href="/contacts/">Contacts</a>"#)).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(temp.path(), 2);
    let coordinator = Coordinator::new(&config, Arc::new(RecordingRenderer::default())).unwrap();

    let report = coordinator.crawl(&format!("{}/", server.uri())).await;

    assert!(report.is_success());
    assert_eq!(report.pages.len(), 1);
    assert!(!site_dir(temp.path(), &server).exists());
}

#[test]
fn test_orlypark_home_classification() {
    let engine = FrontierEngine::new(Arc::new(KeywordClassifier::default()));
    let page = Page::root(ORLYPARK_HOME);

    let found = discover(ORLYPARK_FIXTURE, ORLYPARK_HOME);
    let result = engine.classify(&page, &found.links);

    let expected: Vec<String> = [
        "menu/",
        "menu/kuhnya/",
        "menu/detskoe-menyu/",
        "menu/sushi/",
        "menu/deserti/",
        "menu/bar/",
    ]
    .iter()
    .map(|p| format!("{}{}", ORLYPARK_HOME, p))
    .collect();

    assert_eq!(result.frontier.iter().cloned().collect::<Vec<_>>(), expected);
    assert_eq!(result.seen.len(), 16);
    assert!(result.seen.contains(ORLYPARK_HOME));
    assert!(result.seen.contains("https://www.facebook.com/orlypark"));
    assert!(result.frontier.iter().all(|u| !result.seen.contains(u)));

    // Same input, same classification
    assert_eq!(engine.classify(&page, &found.links), result);
}

#[test]
fn test_keywordless_page_expands_nothing() {
    let home = "https://gist.github.com/";
    let mut body = String::from("<html><body>");
    for i in 0..72 {
        body.push_str(&format!(r#"<a href="/octocat/{:032x}">gist {}</a>"#, i, i));
    }
    body.push_str(r#"<a href="https://gist.github.com/">All gists</a>"#);
    body.push_str("</body></html>");

    let engine = FrontierEngine::new(Arc::new(KeywordClassifier::default()));
    let found = discover(body.as_bytes(), home);
    let result = engine.classify(&Page::root(home), &found.links);

    assert!(result.frontier.is_empty());
    assert_eq!(result.seen.len(), 73);
}
