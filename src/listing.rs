//! Directory-listing scraping.
//!
//! When the manifest is unavailable, the client falls back to the HTML
//! index pages that Apache, nginx (`autoindex`) and `python -m http.server`
//! generate for directories. Every such page is a list of `<a href="...">`
//! links, one per entry, with subdirectories ending in `/`.
//!
//! Only relative hrefs naming a direct child are considered. Sort-order
//! links (`?C=N;O=D`), parent links (`../`), and absolute links are ignored.
//! Returned hrefs are still percent-encoded, ready to be appended to the
//! listing's URL; decode them with [`crate::naming::decode_name`] for display.

use crate::classify;
use crate::naming::decode_name;
use regex::Regex;
use std::sync::LazyLock;

// `href` must start an attribute name: `data-href` and `hx-href` do not match.
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s(?:[^>]*?\s)?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("href pattern is valid")
});

/// Every `href` attribute of an `<a>` tag, in document order.
///
/// `&amp;` is unescaped; other entities are left alone.
pub fn hrefs(html: &str) -> Vec<String> {
    HREF_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| m.as_str().replace("&amp;", "&"))
        .collect()
}

/// Strip a leading `./` and reject anything that is not a plain relative
/// child reference.
fn relative_child(href: &str) -> Option<&str> {
    let href = href.strip_prefix("./").unwrap_or(href);
    if href.is_empty()
        || href.starts_with('/')
        || href.starts_with('?')
        || href.starts_with('#')
        || href.starts_with("..")
        || href.contains("://")
    {
        return None;
    }
    Some(href)
}

/// Subdirectory names linked from a listing, without the trailing slash.
///
/// Duplicates (some servers link each entry twice, icon and name) are
/// dropped, keeping first-seen order.
pub fn subfolder_candidates(html: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for href in hrefs(html) {
        let Some(child) = relative_child(&href) else {
            continue;
        };
        let Some(name) = child.strip_suffix('/') else {
            continue;
        };
        if name.is_empty() || name == "." || name.contains('/') {
            continue;
        }
        if !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Image files linked from a listing, as raw hrefs in first-seen order.
pub fn image_links(html: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for href in hrefs(html) {
        let Some(child) = relative_child(&href) else {
            continue;
        };
        if child.contains('/') || child.contains('?') {
            continue;
        }
        if !classify::is_image(&decode_name(child)) {
            continue;
        }
        if !out.iter().any(|existing| existing == child) {
            out.push(child.to_string());
        }
    }
    out
}
