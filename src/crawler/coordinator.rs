//! Crawler coordinator - recursive crawl orchestration
//!
//! This module drives every page of a site through its state machine:
//! - Waiting for an admission slot and fetching the page
//! - Saving binary responses, or classifying links and menu images
//! - Spawning one child crawl per frontier entry
//! - Producing the page's artifacts concurrently with its children
//! - Aggregating records, artifacts and failures into a report
//!
//! A page completes once all of its children and artifact jobs have settled.
//! Failures stay local to the page or artifact that produced them.

use crate::artifact::{
    extension_for_content_type, render_document, Artifact, ArtifactKind, ArtifactStore, Renderer,
};
use crate::config::Config;
use crate::crawler::frontier::{spawn_children, FrontierEngine};
use crate::crawler::parser::discover;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::{build_http_client, fetch_url, FetchedResource};
use crate::output::{CrawlReport, FailureStage, PageFailure, PageRecord};
use crate::state::{Page, PageState};
use crate::url::{normalize, KeywordClassifier, LinkClassifier};
use chrono::Utc;
use futures::future::{join, join_all, BoxFuture};
use reqwest::Client;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Main crawler coordinator structure
///
/// One coordinator can crawl any number of sites; each call to
/// [`crawl`](Coordinator::crawl) gets its own admission ceiling and ledger.
#[derive(Debug)]
pub struct Coordinator {
    client: Client,
    classifier: Arc<dyn LinkClassifier>,
    frontier: FrontierEngine,
    store: ArtifactStore,
    renderer: Arc<dyn Renderer>,
    max_concurrent: usize,
}

/// Shared bookkeeping of a single site crawl
#[derive(Default)]
struct Ledger {
    pages: Vec<PageRecord>,
    artifacts: Vec<Artifact>,
    failures: Vec<PageFailure>,
    /// Every URL handed to a page crawl or an image download, across all subtrees
    claimed: HashSet<String>,
}

struct CrawlRun {
    scheduler: Scheduler,
    ledger: Mutex<Ledger>,
}

impl CrawlRun {
    async fn fail(&self, url: &str, stage: FailureStage, reason: String) {
        tracing::warn!("{} failed at {}: {}", url, stage, reason);
        self.ledger.lock().await.failures.push(PageFailure {
            url: url.to_string(),
            stage,
            reason,
        });
    }

    async fn store(&self, artifact: Artifact) {
        self.ledger.lock().await.artifacts.push(artifact);
    }
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `renderer` - Renderer used for page-to-document conversion
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &Config, renderer: Arc<dyn Renderer>) -> crate::Result<Self> {
        let client = build_http_client(&config.user_agent, config.crawler.fetch_timeout())?;
        let classifier: Arc<dyn LinkClassifier> =
            Arc::new(KeywordClassifier::from_config(&config.classifier));

        Ok(Self {
            client,
            frontier: FrontierEngine::new(Arc::clone(&classifier)),
            classifier,
            store: ArtifactStore::new(config.crawler.data_root.clone()),
            renderer,
            max_concurrent: config.crawler.max_concurrent_pages as usize,
        })
    }

    /// Crawls one site from its home page and reports the outcome
    ///
    /// Never fails as a whole: page and artifact failures are collected in
    /// the report, and the report's success follows the home page.
    pub async fn crawl(&self, start_url: &str) -> CrawlReport {
        let home_url = normalize(start_url);
        let started_at = Utc::now();
        tracing::info!("Starting crawl of {}", home_url);

        let run = CrawlRun {
            scheduler: Scheduler::new(self.max_concurrent),
            ledger: Mutex::new(Ledger::default()),
        };
        run.ledger.lock().await.claimed.insert(home_url.clone());

        let root_state = self.crawl_page(&run, Page::root(&home_url)).await;

        let peak_concurrency = run.scheduler.peak();
        let ledger = run.ledger.into_inner();
        let report = CrawlReport {
            home_url,
            started_at,
            finished_at: Utc::now(),
            root_state,
            pages: ledger.pages,
            artifacts: ledger.artifacts,
            failures: ledger.failures,
            peak_concurrency,
        };

        tracing::info!(
            "Crawl of {} finished: {} pages, {} artifacts, {} failures in {}ms",
            report.home_url,
            report.pages.len(),
            report.artifacts.len(),
            report.failures.len(),
            report.duration().num_milliseconds()
        );

        report
    }

    /// Processes one page and, recursively, its whole subtree
    fn crawl_page<'a>(&'a self, run: &'a CrawlRun, mut page: Page) -> BoxFuture<'a, PageState> {
        Box::pin(async move {
            let mut state = PageState::Pending;
            tracing::info!("Crawling {}", page.url());

            let fetched = {
                let _permit = run.scheduler.acquire().await;
                state = advance(page.url(), state, PageState::Fetching);
                fetch_url(&self.client, page.url()).await
            };

            let resource = match fetched {
                Ok(resource) => resource,
                Err(e) => {
                    run.fail(page.url(), FailureStage::Fetch, e.to_string()).await;
                    state = advance(page.url(), state, PageState::Failed);
                    self.record(run, &page, state).await;
                    return state;
                }
            };

            state = advance(page.url(), state, PageState::Classifying);
            let jobs = self.classify(run, &mut page, resource).await;
            let children = self.claim_children(run, &page).await;

            if children.is_empty() {
                state = advance(page.url(), state, PageState::Terminal);
                join_all(jobs).await;
            } else {
                state = advance(page.url(), state, PageState::Expanding);
                let child_crawls = children
                    .into_iter()
                    .map(|child| self.crawl_page(run, child));
                join(join_all(child_crawls), join_all(jobs)).await;
            }

            state = advance(page.url(), state, PageState::Completed);
            self.record(run, &page, state).await;
            state
        })
    }

    /// Classifies a fetched page and returns its pending artifact jobs
    ///
    /// Storable binaries are saved as-is and never parsed. Other bodies are
    /// parsed for links and menu images; non-home pages are also queued for
    /// document conversion.
    async fn classify<'a>(
        &'a self,
        run: &'a CrawlRun,
        page: &mut Page,
        resource: FetchedResource,
    ) -> Vec<BoxFuture<'a, ()>> {
        let home_url = page.home_url().to_string();
        let url = page.url().to_string();
        let content_type = resource.content_type.clone();

        if content_type
            .as_deref()
            .and_then(extension_for_content_type)
            .is_some()
        {
            self.frontier.apply(page, std::iter::empty::<&str>());
            let save: BoxFuture<'a, ()> =
                Box::pin(self.save_binary(run, home_url, url, resource));
            return vec![save];
        }

        let discovered = discover(&resource.body, &home_url);
        self.frontier.apply(page, &discovered.links);

        let mut jobs: Vec<BoxFuture<'a, ()>> = Vec::new();
        if !page.is_home() {
            jobs.push(Box::pin(self.convert(run, home_url.clone(), url)));
        }

        for image_url in self.claim_images(run, &home_url, discovered.images).await {
            jobs.push(Box::pin(self.download_image(run, home_url.clone(), image_url)));
        }

        jobs
    }

    /// Keeps the menu images not yet fetched during this run
    ///
    /// Images share the page claim set, so an image that is also linked as a
    /// page is fetched once, as an image.
    async fn claim_images(
        &self,
        run: &CrawlRun,
        home_url: &str,
        images: Vec<String>,
    ) -> Vec<String> {
        let candidates: Vec<String> = images
            .into_iter()
            .filter(|src| self.classifier.is_expandable(src, home_url))
            .map(|src| normalize(&src))
            .filter(|src| !src.is_empty())
            .collect();

        let mut ledger = run.ledger.lock().await;
        candidates
            .into_iter()
            .filter(|src| ledger.claimed.insert(src.clone()))
            .collect()
    }

    /// Spawns the page's children, skipping URLs another subtree already crawls
    async fn claim_children(&self, run: &CrawlRun, page: &Page) -> Vec<Page> {
        let mut ledger = run.ledger.lock().await;
        spawn_children(page)
            .into_iter()
            .filter(|child| {
                let fresh = ledger.claimed.insert(child.url().to_string());
                if !fresh {
                    tracing::debug!("{} already crawled elsewhere", child.url());
                }
                fresh
            })
            .collect()
    }

    async fn save_binary(
        &self,
        run: &CrawlRun,
        home_url: String,
        url: String,
        resource: FetchedResource,
    ) {
        let saved = self
            .store
            .save_binary(
                &home_url,
                &url,
                resource.content_type.as_deref(),
                &resource.body,
            )
            .await;

        match saved {
            Ok(Some(artifact)) => run.store(artifact).await,
            Ok(None) => {}
            Err(e) => run.fail(&url, FailureStage::Artifact, e.to_string()).await,
        }
    }

    async fn convert(&self, run: &CrawlRun, home_url: String, url: String) {
        let path = match self.store.prepare_document(&home_url, &url).await {
            Ok(path) => path,
            Err(e) => {
                run.fail(&url, FailureStage::Artifact, e.to_string()).await;
                return;
            }
        };

        match render_document(self.renderer.as_ref(), &url, &path).await {
            Ok(()) => {
                tracing::info!("Rendered {} to {}", url, path.display());
                run.store(Artifact {
                    path,
                    kind: ArtifactKind::Document,
                    source_url: url,
                })
                .await;
            }
            Err(e) => run.fail(&url, FailureStage::Render, e.to_string()).await,
        }
    }

    async fn download_image(&self, run: &CrawlRun, home_url: String, url: String) {
        let fetched = {
            let _permit = run.scheduler.acquire().await;
            fetch_url(&self.client, &url).await
        };

        let resource = match fetched {
            Ok(resource) => resource,
            Err(e) => {
                run.fail(&url, FailureStage::Image, e.to_string()).await;
                return;
            }
        };

        let saved = self
            .store
            .save_binary(
                &home_url,
                &url,
                resource.content_type.as_deref(),
                &resource.body,
            )
            .await;

        match saved {
            Ok(Some(artifact)) => run.store(artifact).await,
            Ok(None) => tracing::debug!(
                "Skipping {}: {:?} is not a storable type",
                url,
                resource.content_type
            ),
            Err(e) => run.fail(&url, FailureStage::Image, e.to_string()).await,
        }
    }

    async fn record(&self, run: &CrawlRun, page: &Page, state: PageState) {
        run.ledger.lock().await.pages.push(PageRecord {
            url: page.url().to_string(),
            state,
            frontier: page.frontier().iter().cloned().collect(),
            seen_count: page.seen().len(),
        });
    }
}

/// Moves a page to its next state, logging the transition
fn advance(url: &str, state: PageState, next: PageState) -> PageState {
    match state.transition(next) {
        Ok(next) => {
            tracing::trace!("{}: {} -> {}", url, state, next);
            next
        }
        Err(e) => {
            tracing::error!("{}: {}", url, e);
            state
        }
    }
}

/// Crawls one site with a freshly built coordinator
///
/// # Example
///
/// ```no_run
/// use menu_crawler::artifact::CommandRenderer;
/// use menu_crawler::config::Config;
/// use menu_crawler::crawler::crawl_site;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let renderer = Arc::new(CommandRenderer::from_config(&config.renderer));
/// let report = crawl_site(&config, "http://orlypark.com.ua/", renderer).await?;
/// println!("{} artifacts", report.artifacts.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl_site(
    config: &Config,
    start_url: &str,
    renderer: Arc<dyn Renderer>,
) -> crate::Result<CrawlReport> {
    let coordinator = Coordinator::new(config, renderer)?;
    Ok(coordinator.crawl(start_url).await)
}

/// Crawls every starting URL in turn, one report per site
pub async fn run_crawl(
    config: &Config,
    start_urls: &[String],
    renderer: Arc<dyn Renderer>,
) -> crate::Result<Vec<CrawlReport>> {
    let coordinator = Coordinator::new(config, renderer)?;

    let mut reports = Vec::with_capacity(start_urls.len());
    for url in start_urls {
        reports.push(coordinator.crawl(url).await);
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_follows_state_machine() {
        let state = advance("http://site.ua/", PageState::Pending, PageState::Fetching);
        assert_eq!(state, PageState::Fetching);

        let state = advance("http://site.ua/", state, PageState::Classifying);
        assert_eq!(state, PageState::Classifying);
    }

    #[test]
    fn test_advance_rejects_illegal_transition() {
        let state = advance("http://site.ua/", PageState::Pending, PageState::Completed);
        assert_eq!(state, PageState::Pending);
    }

    #[tokio::test]
    async fn test_coordinator_creation() {
        let config = Config::default();
        let renderer = Arc::new(crate::artifact::CommandRenderer::from_config(&config.renderer));
        let coordinator = Coordinator::new(&config, renderer).unwrap();
        assert_eq!(coordinator.max_concurrent, 100);
    }
}
