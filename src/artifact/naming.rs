//! Artifact filename derivation
//!
//! Pure functions mapping a URL to the file it is stored under inside a
//! site's folder, plus the content-type table deciding which responses are
//! saved as raw binaries.

use crate::crawler::media_type;
use crate::url::site_name;
use std::path::{Path, PathBuf};

/// Source-document extensions dropped from page base names
const SOURCE_EXTENSIONS: &[&str] = &[".html", ".php"];

/// Extension given to rendered documents
pub const DOCUMENT_EXTENSION: &str = ".pdf";

/// Returns the file extension for a storable binary content type
///
/// Parameters after `;` are ignored and matching is case-insensitive.
/// Unknown types yield `None`: such a response is not a storable binary.
///
/// # Examples
///
/// ```
/// use menu_crawler::artifact::extension_for_content_type;
///
/// assert_eq!(extension_for_content_type("image/vnd.ms-modi"), Some(".mdi"));
/// assert_eq!(extension_for_content_type("image/jpeg; charset=binary"), Some(".jpg"));
/// assert_eq!(extension_for_content_type("text/html"), None);
/// ```
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let extension = match media_type(content_type).as_str() {
        "application/pdf" => ".pdf",
        "image/jpeg" | "image/x-citrix-jpeg" => ".jpg",
        "image/png" | "image/x-citrix-png" | "image/x-png" => ".png",
        "image/bmp" => ".bmp",
        "image/tiff" => ".tiff",
        "image/svg+xml" => ".svg",
        "image/gif" => ".gif",
        "image/vnd.ms-modi" => ".mdi",
        "image/pjpeg" => ".pjpeg",
        "image/x-icon" => ".ico",
        _ => return None,
    };

    Some(extension)
}

/// Derives the base name (no folder, no added extension) for a URL
///
/// The last path segment is used with `.html`/`.php` removed; a query
/// string is folded in as `_key_value` pairs. URLs without a path segment,
/// such as the home page, map to the site name.
///
/// # Examples
///
/// ```
/// use menu_crawler::artifact::page_base_name;
///
/// assert_eq!(page_base_name("https://www.github.com/"), "github.com");
/// assert_eq!(page_base_name("http://orlypark.com.ua/menu/bar/"), "bar");
/// assert_eq!(page_base_name("http://site.ua/menu.php?cat=1&x=2"), "menu_cat_1_x_2");
/// ```
pub fn page_base_name(url: &str) -> String {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_fragment, None),
    };

    let without_scheme = match path.find("://") {
        Some(idx) => &path[idx + 3..],
        None => path,
    };
    let trimmed = without_scheme.trim_end_matches('/');

    let segment = match trimmed.rfind('/') {
        Some(idx) => strip_source_extension(&trimmed[idx + 1..]),
        None => "",
    };

    let mut name = if segment.is_empty() {
        site_name(url).to_string()
    } else {
        segment.to_string()
    };

    if let Some(query) = query.filter(|q| !q.is_empty()) {
        name.push_str(&sanitize_query(query));
    }

    name
}

/// Path of the rendered document for a page: `{folder}/{base}.pdf`
///
/// # Examples
///
/// ```
/// use menu_crawler::artifact::document_filename;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     document_filename("https://github.com/", Path::new("/tmp")),
///     PathBuf::from("/tmp/github.com.pdf")
/// );
/// ```
pub fn document_filename(url: &str, folder: &Path) -> PathBuf {
    folder.join(format!("{}{}", page_base_name(url), DOCUMENT_EXTENSION))
}

/// Path of a raw binary save; `extension` is appended unless already present
pub fn binary_filename(url: &str, folder: &Path, extension: &str) -> PathBuf {
    let base = page_base_name(url);
    let has_extension = base
        .to_ascii_lowercase()
        .ends_with(&extension.to_ascii_lowercase());

    if has_extension {
        folder.join(base)
    } else {
        folder.join(format!("{}{}", base, extension))
    }
}

fn strip_source_extension(segment: &str) -> &str {
    SOURCE_EXTENSIONS
        .iter()
        .find_map(|ext| segment.strip_suffix(ext))
        .unwrap_or(segment)
}

fn sanitize_query(query: &str) -> String {
    query
        .split(|c: char| c == '&' || c == '=')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let cleaned: String = part
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                        c
                    } else {
                        '_'
                    }
                })
                .collect();
            format!("_{}", cleaned)
        })
        .collect()
}
