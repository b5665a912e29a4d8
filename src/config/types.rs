use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Keywords that mark a URL as menu content when they follow the site domain
pub const DEFAULT_MENU_KEYWORDS: &[&str] =
    &["menyu", "menu", "kitchen", "sushi", "cuisine", "catering"];

/// Main configuration structure for Menu-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub classifier: ClassifierConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub renderer: RendererConfig,
    pub batch: BatchConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages fetching at the same time
    #[serde(rename = "max-concurrent-pages")]
    pub max_concurrent_pages: u32,

    /// Per-fetch timeout in milliseconds (0 disables the timeout)
    #[serde(rename = "fetch-timeout-ms")]
    pub fetch_timeout_ms: u64,

    /// URL used when no valid starting URL is given
    #[serde(rename = "default-url")]
    pub default_url: String,

    /// Directory that receives one sub-directory per crawled site
    #[serde(rename = "data-root")]
    pub data_root: PathBuf,
}

impl CrawlerConfig {
    /// Returns the fetch timeout, if one is configured
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_ms > 0).then(|| Duration::from_millis(self.fetch_timeout_ms))
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_pages: 100,
            fetch_timeout_ms: 30_000,
            default_url: "http://www.santori.com.ua/".to_string(),
            data_root: PathBuf::from("./data"),
        }
    }
}

/// Menu classifier policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Substrings that mark a same-site URL as menu content
    pub keywords: Vec<String>,

    /// Whether keyword matching is case sensitive
    #[serde(rename = "case-sensitive")]
    pub case_sensitive: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_MENU_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            case_sensitive: true,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "menu-crawler".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// External HTML-to-PDF renderer configuration
///
/// `{url}` and `{output}` in `args` are replaced with the page URL and the
/// destination path of the document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub program: String,
    pub args: Vec<String>,
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl RendererConfig {
    /// Returns the per-document timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "wkhtmltopdf".to_string(),
            args: vec![
                "--quiet".to_string(),
                "{url}".to_string(),
                "{output}".to_string(),
            ],
            timeout_ms: 120_000,
        }
    }
}

/// Persisted list of starting URLs
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Path to the SQLite database holding the list
    #[serde(rename = "database-path")]
    pub database_path: PathBuf,

    /// Query whose first column yields one website per row
    pub query: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./places.db"),
            query: r#"SELECT "Website" FROM "Websites""#.to_string(),
        }
    }
}
