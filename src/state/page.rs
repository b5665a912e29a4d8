use indexmap::IndexSet;
use std::sync::Arc;

/// Insertion-ordered set of URL strings
pub type UrlSet = IndexSet<String>;

/// One crawl node: a single URL's fetch-and-expand unit of work
///
/// A page owns an independent copy of the `seen` set it inherited from its
/// parent, so sibling subtrees never observe each other's discoveries. Its
/// `frontier` and `seen` are written once, by the classification step of its
/// own fetch, and are disjoint.
#[derive(Debug, Clone)]
pub struct Page {
    url: String,
    home_url: Arc<str>,
    frontier: UrlSet,
    seen: UrlSet,
}

impl Page {
    /// Creates the root page of a crawl: the home page itself
    pub fn root(home_url: &str) -> Self {
        Self {
            url: home_url.to_string(),
            home_url: Arc::from(home_url),
            frontier: UrlSet::new(),
            seen: UrlSet::new(),
        }
    }

    /// Creates a child page with the `seen` snapshot handed down by its parent
    pub fn child(url: String, home_url: Arc<str>, seen: UrlSet) -> Self {
        debug_assert!(!seen.contains(&url), "child URL already seen: {}", url);

        Self {
            url,
            home_url,
            frontier: UrlSet::new(),
            seen,
        }
    }

    /// The URL this page fetches
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The site's home URL, shared by the whole crawl tree
    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    /// Shared handle to the home URL, for spawning children
    pub fn home_url_handle(&self) -> Arc<str> {
        Arc::clone(&self.home_url)
    }

    /// Menu links discovered on this page that no ancestor has seen
    pub fn frontier(&self) -> &UrlSet {
        &self.frontier
    }

    /// URLs already visited or ruled out along this page's ancestor chain
    pub fn seen(&self) -> &UrlSet {
        &self.seen
    }

    /// Returns true if this page is the site's home page
    pub fn is_home(&self) -> bool {
        self.url == *self.home_url
    }

    /// Stores the result of classifying this page's links
    pub(crate) fn set_classification(&mut self, frontier: UrlSet, seen: UrlSet) {
        debug_assert!(frontier.iter().all(|url| !seen.contains(url)));
        self.frontier = frontier;
        self.seen = seen;
    }
}
