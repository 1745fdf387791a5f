//! Filename predicates shared by the generator and the client.
//!
//! Every decision about "is this a photo we show" goes through here, whether
//! the name came from `read_dir` or from an `href` in a directory listing.
//! All checks are case-insensitive and purely lexical: no file is opened.
//!
//! | Predicate | Rule |
//! |-----------|------|
//! | [`is_image`] | extension is one of `jpg jpeg png webp gif` |
//! | [`is_thumbnail`] | whole name is `thumb.jpg` |
//! | [`is_excluded_from_hero`] | name contains `thumb` or `logo` anywhere |

use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// Name of the file that marks a project's representative image.
pub const THUMBNAIL_NAME: &str = "thumb.jpg";

const HERO_EXCLUDED_MARKERS: &[&str] = &["thumb", "logo"];

/// True if the filename has one of the displayable image extensions.
pub fn is_image(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// True if the filename is exactly `thumb.jpg`, ignoring case.
///
/// `thumb.png` or `my-thumb.jpg` are ordinary images.
pub fn is_thumbnail(filename: &str) -> bool {
    filename.to_lowercase() == THUMBNAIL_NAME
}

/// True if the filename must never appear in the hero banner.
///
/// Substring match, so it is broader than [`is_thumbnail`]: `thumb-hero.jpg`
/// and `logo-small.png` are both excluded.
pub fn is_excluded_from_hero(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    HERO_EXCLUDED_MARKERS.iter().any(|m| lower.contains(m))
}
