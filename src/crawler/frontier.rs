//! Frontier and deduplication engine
//!
//! Splits the links found on a page into the page's `frontier` (menu links no
//! ancestor has seen) and its updated `seen` set (everything else, plus the
//! page itself), then hands every child an independent snapshot of both.
//!
//! Because each child starts with every sibling discovery already marked as
//! seen, siblings never re-discover each other, and a URL that some node put
//! into its `frontier ∪ seen` is never expanded again below that node.

use crate::state::{Page, UrlSet};
use crate::url::{normalize, LinkClassifier};
use std::sync::Arc;

/// Outcome of classifying one page's links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Menu links to expand, in order of first observation
    pub frontier: UrlSet,
    /// The inherited `seen` set plus every link not chosen for expansion
    pub seen: UrlSet,
}

/// Frontier engine bound to a classifier policy
#[derive(Debug, Clone)]
pub struct FrontierEngine {
    classifier: Arc<dyn LinkClassifier>,
}

impl FrontierEngine {
    pub fn new(classifier: Arc<dyn LinkClassifier>) -> Self {
        Self { classifier }
    }

    /// Classifies resolved links found on `page`
    ///
    /// Links are normalized first; empty ones are skipped. A link goes to the
    /// frontier when the classifier accepts it and it is not already seen;
    /// otherwise it is added to `seen`. The page's own URL always lands in
    /// `seen`, so self-links never re-expand. Repeated links are idempotent.
    pub fn classify<I, S>(&self, page: &Page, links: I) -> Classification
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frontier = UrlSet::new();
        let mut seen = page.seen().clone();
        seen.insert(page.url().to_string());

        for link in links {
            let link = normalize(link.as_ref());
            if link.is_empty() || frontier.contains(&link) || seen.contains(&link) {
                continue;
            }

            if self.classifier.is_expandable(&link, page.home_url()) {
                frontier.insert(link);
            } else {
                seen.insert(link);
            }
        }

        Classification { frontier, seen }
    }

    /// Classifies the links of `page` and stores the result on it
    pub fn apply<I, S>(&self, page: &mut Page, links: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let Classification { frontier, seen } = self.classify(page, links);
        tracing::debug!(
            "{}: {} to expand, {} seen",
            page.url(),
            frontier.len(),
            seen.len()
        );
        page.set_classification(frontier, seen);
    }
}

/// Creates one child page per frontier entry
///
/// Every child receives `frontier ∪ seen` of its parent, minus its own URL,
/// as an independent copy.
pub fn spawn_children(page: &Page) -> Vec<Page> {
    let mut shared = page.seen().clone();
    shared.extend(page.frontier().iter().cloned());

    page.frontier()
        .iter()
        .map(|url| {
            let mut seen = shared.clone();
            seen.shift_remove(url);
            Page::child(url.clone(), page.home_url_handle(), seen)
        })
        .collect()
}
