//! HTML parser for extracting links and images
//!
//! This module yields the raw attribute values found in markup:
//! - `href` of every `<a>` element
//! - `src` of every `<img>` element
//!
//! Values are returned unresolved; resolution against the home URL happens in
//! [`resolve_href`](crate::url::resolve_href). Elements without the attribute
//! are still reported (with `None`) so callers see exactly what the page holds.

use crate::url::resolve_href;
use scraper::{Html, Selector};

/// Raw `href` value of an `<a>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub href: Option<String>,
}

/// Raw `src` value of an `<img>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub src: Option<String>,
}

/// Parsed view of a fetched page body
pub struct ParsedPage {
    document: Html,
}

impl ParsedPage {
    /// Parses raw bytes as HTML; invalid UTF-8 is replaced, never rejected
    pub fn parse(body: &[u8]) -> Self {
        let html = String::from_utf8_lossy(body);
        Self {
            document: Html::parse_document(&html),
        }
    }

    /// Returns the `href` of every anchor in document order
    pub fn links(&self) -> Vec<RawLink> {
        self.attribute_values("a", "href")
            .into_iter()
            .map(|href| RawLink { href })
            .collect()
    }

    /// Returns the `src` of every image in document order
    pub fn images(&self) -> Vec<RawImage> {
        self.attribute_values("img", "src")
            .into_iter()
            .map(|src| RawImage { src })
            .collect()
    }

    fn attribute_values(&self, tag: &str, attribute: &str) -> Vec<Option<String>> {
        let selector = match Selector::parse(tag) {
            Ok(selector) => selector,
            Err(_) => return Vec::new(),
        };

        self.document
            .select(&selector)
            .map(|element| element.value().attr(attribute).map(str::to_string))
            .collect()
    }
}

/// Extracts all anchor targets from a page body
///
/// # Example
///
/// ```
/// use menu_crawler::crawler::extract_links;
///
/// let links = extract_links(br#"<a href="/menu/">Menu</a><a name="top"></a>"#);
/// assert_eq!(links.len(), 2);
/// assert_eq!(links[0].href.as_deref(), Some("/menu/"));
/// assert_eq!(links[1].href, None);
/// ```
pub fn extract_links(body: &[u8]) -> Vec<RawLink> {
    ParsedPage::parse(body).links()
}

/// Extracts all image sources from a page body
pub fn extract_images(body: &[u8]) -> Vec<RawImage> {
    ParsedPage::parse(body).images()
}

/// Link and image targets of a page, resolved against the home URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    pub links: Vec<String>,
    pub images: Vec<String>,
}

/// Parses a page body and resolves every anchor and image target
///
/// Targets that resolve to an empty string are dropped. The parsed document
/// does not outlive this call.
pub fn discover(body: &[u8], home_url: &str) -> Discovered {
    let page = ParsedPage::parse(body);
    let resolve = |raw: Option<String>| {
        let resolved = resolve_href(raw.as_deref(), home_url);
        (!resolved.is_empty()).then_some(resolved)
    };

    Discovered {
        links: page.links().into_iter().filter_map(|l| resolve(l.href)).collect(),
        images: page.images().into_iter().filter_map(|i| resolve(i.src)).collect(),
    }
}
