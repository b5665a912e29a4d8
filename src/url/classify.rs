use crate::config::{ClassifierConfig, DEFAULT_MENU_KEYWORDS};
use std::fmt;

/// Policy deciding whether a discovered URL is worth expanding
///
/// The keyword heuristic is imprecise by nature; crawls take the policy as a
/// trait object so a different rule set can be plugged in.
pub trait LinkClassifier: Send + Sync + fmt::Debug {
    /// Returns true if `url` is a menu candidate within the site of `home_url`
    fn is_expandable(&self, url: &str, home_url: &str) -> bool;
}

/// Substring-keyword menu classifier
///
/// A URL is expandable when it contains the home site's bare domain and the
/// part after the domain contains at least one keyword.
///
/// Known limitation: this is a heuristic. `/menu-of-the-day-blog/` is a false
/// positive and a menu under `/food/` is a false negative.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
    case_sensitive: bool,
}

impl KeywordClassifier {
    /// Creates a classifier from a keyword list
    pub fn new<I, S>(keywords: I, case_sensitive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords = keywords
            .into_iter()
            .map(Into::into)
            .map(|k: String| if case_sensitive { k } else { k.to_lowercase() })
            .collect();

        Self {
            keywords,
            case_sensitive,
        }
    }

    /// Creates a classifier from the `[classifier]` configuration section
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.keywords.iter().cloned(), config.case_sensitive)
    }

    /// Returns the configured keywords
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_MENU_KEYWORDS.iter().copied(), true)
    }
}

impl LinkClassifier for KeywordClassifier {
    fn is_expandable(&self, url: &str, home_url: &str) -> bool {
        let remainder = match path_after_domain(url, home_url) {
            Some(rest) => rest,
            None => return false,
        };

        if self.case_sensitive {
            self.keywords.iter().any(|k| remainder.contains(k.as_str()))
        } else {
            let remainder = remainder.to_lowercase();
            self.keywords.iter().any(|k| remainder.contains(k.as_str()))
        }
    }
}

/// Classifies a URL with the default menu keywords
///
/// # Examples
///
/// ```
/// use menu_crawler::url::is_expandable;
///
/// assert!(is_expandable("http://orlypark.com.ua/menu/", "http://orlypark.com.ua/"));
/// assert!(!is_expandable("http://orlypark.com.ua/menu/", "http://www.puzatahata.ua/"));
/// assert!(!is_expandable("http://orlypark.com.ua/contacts/", "http://orlypark.com.ua/"));
/// ```
pub fn is_expandable(url: &str, home_url: &str) -> bool {
    KeywordClassifier::default().is_expandable(url, home_url)
}

/// Returns the part of `url` after the first occurrence of the home site's
/// bare domain, or `None` if the URL is empty or not on that site
fn path_after_domain<'a>(url: &'a str, home_url: &str) -> Option<&'a str> {
    if url.is_empty() {
        return None;
    }

    let domain = site_name(home_url);
    if domain.is_empty() {
        return None;
    }

    url.find(domain).map(|idx| &url[idx + domain.len()..])
}

/// Returns the bare host of a URL: scheme, `www.` and any path stripped
///
/// # Examples
///
/// ```
/// use menu_crawler::url::site_name;
///
/// assert_eq!(site_name("https://www.github.com/"), "github.com");
/// assert_eq!(site_name("http://orlypark.com.ua"), "orlypark.com.ua");
/// ```
pub fn site_name(url: &str) -> &str {
    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };

    let without_www = without_scheme
        .strip_prefix("www.")
        .unwrap_or(without_scheme);

    match without_www.find(&['/', '?', '#'][..]) {
        Some(idx) => &without_www[..idx],
        None => without_www,
    }
}
