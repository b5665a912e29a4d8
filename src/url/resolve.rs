/// Resolves a raw `href`/`src` attribute value against the site's home URL
///
/// # Resolution Rules
///
/// - Missing attribute, empty value, or a value of length 1 → empty string
/// - Value starting with a scheme (`http:`, `mailto:`, ...) → returned as-is
/// - Scheme-relative value (`//host/path`) → prefixed with the home URL's scheme
/// - Anything else is relative: appended to `home_url` with one leading `/`
///   stripped, so `"/menu/"` on `http://site.ua/` gives `http://site.ua/menu/`
///
/// `home_url` is expected to end with `/` (see [`normalize`](super::normalize)).
///
/// # Examples
///
/// ```
/// use menu_crawler::url::resolve_href;
///
/// let home = "http://orlypark.com.ua/";
/// assert_eq!(resolve_href(Some("/menu/"), home), "http://orlypark.com.ua/menu/");
/// assert_eq!(resolve_href(Some("//cdn.ua/a.png"), home), "http://cdn.ua/a.png");
/// assert_eq!(resolve_href(Some("#"), home), "");
/// assert_eq!(resolve_href(None, home), "");
/// ```
pub fn resolve_href(raw: Option<&str>, home_url: &str) -> String {
    let href = match raw.map(str::trim) {
        Some(href) if href.chars().count() > 1 => href,
        _ => return String::new(),
    };

    if let Some(rest) = href.strip_prefix("//") {
        return format!("{}://{}", url_scheme(home_url), rest);
    }

    if starts_with_scheme(href) {
        return href.to_string();
    }

    let relative = href.strip_prefix('/').unwrap_or(href);
    format!("{}{}", home_url, relative)
}

/// Returns the scheme of a URL, defaulting to `http`
///
/// ```
/// use menu_crawler::url::url_scheme;
///
/// assert_eq!(url_scheme("https://github.com/"), "https");
/// assert_eq!(url_scheme("github.com"), "http");
/// ```
pub fn url_scheme(url: &str) -> &str {
    match url.find("://") {
        Some(idx) if idx > 0 && is_scheme(&url[..idx]) => &url[..idx],
        _ => "http",
    }
}

/// Checks for a leading `scheme:` as defined by RFC 3986
fn starts_with_scheme(value: &str) -> bool {
    match value.find(':') {
        Some(idx) => is_scheme(&value[..idx]),
        None => false,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
