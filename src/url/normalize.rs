use percent_encoding::{utf8_percent_encode, CONTROLS};

/// Normalizes a raw URL string into the canonical form used by the crawl
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; blank input stays empty
/// 2. Percent-encode non-ASCII code points (ASCII, including existing
///    `%XX` escapes, is left untouched)
/// 3. Add the `http://` scheme when no `http`/`https` scheme is present
///    (scheme-relative `//host` input gets `http:`)
/// 4. Add a `/` path when the URL has no path after the host
///
/// Malformed input is never rejected: it normalizes to a best-effort literal
/// that fails classification later.
///
/// # Examples
///
/// ```
/// use menu_crawler::url::normalize;
///
/// assert_eq!(normalize("github.com"), "http://github.com/");
/// assert_eq!(normalize("https://github.com/gist"), "https://github.com/gist");
/// assert_eq!(normalize("http://site.ua/меню/"), "http://site.ua/%D0%BC%D0%B5%D0%BD%D1%8E/");
/// ```
pub fn normalize(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let encoded = encode_non_ascii(trimmed);

    let mut url = if has_http_scheme(&encoded) {
        encoded
    } else if let Some(rest) = encoded.strip_prefix("//") {
        format!("http://{}", rest)
    } else {
        format!("http://{}", encoded)
    };

    ensure_root_path(&mut url);
    url
}

/// Percent-encodes every non-ASCII code point of the input
///
/// Scraped links may embed native-language path segments that the transport
/// cannot carry unescaped. ASCII characters pass through unchanged.
pub fn encode_non_ascii(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());
    for (idx, c) in raw.char_indices() {
        if c.is_ascii() {
            encoded.push(c);
        } else {
            encoded.extend(utf8_percent_encode(&raw[idx..idx + c.len_utf8()], CONTROLS));
        }
    }
    encoded
}

/// Returns true if the URL starts with `http://` or `https://` (any case)
fn has_http_scheme(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Inserts a `/` right after the authority when the URL has no path
fn ensure_root_path(url: &mut String) {
    let authority_start = match url.find("://") {
        Some(idx) => idx + 3,
        None => return,
    };

    match url[authority_start..].find(&['/', '?', '#'][..]) {
        Some(offset) => {
            let idx = authority_start + offset;
            if !url[idx..].starts_with('/') {
                url.insert(idx, '/');
            }
        }
        None => url.push('/'),
    }
}

/// Checks whether a raw starting URL looks like a website address
///
/// Accepts an optional `http://`/`https://` prefix (with optional `www.`),
/// lowercase alphanumeric labels joined by single `-` or `.`, a top-level
/// domain of 2 to 5 letters, an optional `:port` of 1 to 5 digits and an
/// optional path.
///
/// # Examples
///
/// ```
/// use menu_crawler::url::is_valid_url;
///
/// assert!(is_valid_url("github.com"));
/// assert!(is_valid_url("http://git-hub.com"));
/// assert!(!is_valid_url("htt://www.github.com"));
/// assert!(!is_valid_url("http://g.c"));
/// ```
pub fn is_valid_url(raw: &str) -> bool {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw);

    let authority = match rest.find('/') {
        Some(idx) => &rest[..idx],
        None => rest,
    };

    let host = match authority.split_once(':') {
        Some((host, port)) => {
            if port.is_empty() || port.len() > 5 || !port.bytes().all(|b| b.is_ascii_digit()) {
                return false;
            }
            host
        }
        None => authority,
    };

    is_valid_host(host)
}

/// Validates `label(.label)*.tld` where labels may contain single hyphens
fn is_valid_host(host: &str) -> bool {
    let (name, tld) = match host.rsplit_once('.') {
        Some(parts) => parts,
        None => return false,
    };

    if tld.len() < 2 || tld.len() > 5 || !tld.bytes().all(|b| b.is_ascii_lowercase()) {
        return false;
    }

    let is_word = |part: &str| {
        !part.is_empty()
            && part
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
    };

    name.split('.')
        .all(|label| label.split('-').all(|word| is_word(word)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_http_scheme() {
        assert_eq!(normalize("www.github.com/"), "http://www.github.com/");
        assert_eq!(normalize("github.com"), "http://github.com/");
    }

    #[test]
    fn test_keeps_existing_scheme() {
        assert_eq!(normalize("https://github.com/"), "https://github.com/");
        assert_eq!(normalize("HTTP://GITHUB.COM/"), "HTTP://GITHUB.COM/");
    }

    #[test]
    fn test_scheme_relative_input() {
        assert_eq!(normalize("//cdn.site.ua/menu.jpg"), "http://cdn.site.ua/menu.jpg");
    }

    #[test]
    fn test_adds_root_slash_only_without_path() {
        assert_eq!(normalize("http://www.github.com"), "http://www.github.com/");
        assert_eq!(normalize("http://site.ua/menu.pdf"), "http://site.ua/menu.pdf");
        assert_eq!(normalize("http://site.ua/menu"), "http://site.ua/menu");
    }

    #[test]
    fn test_root_slash_before_query() {
        assert_eq!(normalize("http://site.ua?lang=ua"), "http://site.ua/?lang=ua");
        assert_eq!(normalize("http://site.ua#top"), "http://site.ua/#top");
    }

    #[test]
    fn test_encodes_non_ascii_path() {
        assert_eq!(
            normalize("http://orlypark.com.ua/меню/"),
            "http://orlypark.com.ua/%D0%BC%D0%B5%D0%BD%D1%8E/"
        );
    }

    #[test]
    fn test_ascii_passes_through_unencoded() {
        assert_eq!(
            encode_non_ascii("/a\tb c\n/меню"),
            "/a\tb c\n/%D0%BC%D0%B5%D0%BD%D1%8E"
        );
        assert_eq!(encode_non_ascii("/menu/?q=1&x=%20"), "/menu/?q=1&x=%20");
    }

    #[test]
    fn test_keeps_existing_escapes() {
        let url = "http://orlypark.com.ua/%D0%BC%D0%B5%D0%BD%D1%8E/?q=a%20b";
        assert_eq!(normalize(url), url);
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_malformed_input_is_best_effort() {
        assert_eq!(normalize("not a url"), "http://not a url/");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "github.com",
            "https://www.github.com",
            "http://site.ua?x=1",
            "//cdn.site.ua",
            "http://site.ua/кухня/суші",
            "  http://site.ua/menu/  ",
            "ftp://files.site.ua",
            "not a url",
            "",
        ];

        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_scheme_added_when_missing() {
        for input in ["github.com", "www.site.ua/menu", "site.ua:8080"] {
            assert!(normalize(input).starts_with("http://"), "{}", input);
        }
    }

    #[test]
    fn test_is_valid_url_accepts() {
        assert!(is_valid_url("https://www.github.com/"));
        assert!(is_valid_url("http://www.github.com/"));
        assert!(is_valid_url("www.github.com"));
        assert!(is_valid_url("github.com"));
        assert!(is_valid_url("http://git-hub.com"));
        assert!(is_valid_url("http://orlypark.com.ua/menu/"));
        assert!(is_valid_url("http://localhost.dev:8080/"));
    }

    #[test]
    fn test_is_valid_url_rejects() {
        assert!(!is_valid_url("htt://www.github.com"));
        assert!(!is_valid_url("://www.github.com"));
        assert!(!is_valid_url("http://g.c"));
        assert!(!is_valid_url("http://github"));
        assert!(!is_valid_url("http://git--hub.com"));
        assert!(!is_valid_url("http://github.com:123456/"));
        assert!(!is_valid_url("http://GitHub.com"));
        assert!(!is_valid_url(""));
    }
}
