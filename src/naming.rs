//! Folder-name conventions for project display names and categories.
//!
//! Project folders carry their own display names. The convention used by the
//! site editors is `English Name-الاسم العربي`: the English title, a hyphen,
//! then the Arabic title. Folders that only have one language still work, the
//! missing side is synthesized:
//!
//! - `Villa Compound-فيلا كومباوند` → ar "فيلا كومباوند", en "Villa Compound"
//! - `برج الشروق` → ar "برج الشروق", en "Project برج الشروق"
//! - `Office Tower` → ar "مشروع Office Tower", en "Office Tower"
//!
//! Folder names often arrive percent-encoded (uploaded through web file
//! managers, or scraped from directory-listing `href`s), so they are decoded
//! first. A name that does not decode is used as-is.
//!
//! ## Categories
//!
//! The category is inferred from keywords in the raw folder name, see
//! [`detect_category`].

use crate::types::Category;
use tracing::debug;

/// Arabic word for "project", used to prefix names that have no Arabic part.
const ARABIC_PROJECT_PREFIX: &str = "مشروع";

/// English prefix for names that only have an Arabic part.
const ENGLISH_PROJECT_PREFIX: &str = "Project";

const COMMERCIAL_KEYWORDS: &[&str] = &["commercial", "shop", "mall", "compound", "complex"];
const RESTORATION_KEYWORDS: &[&str] = &["restoration", "renovation", "repair"];

/// Display names of a project in both site languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName {
    pub ar: String,
    pub en: String,
}

/// Derive the bilingual display name from a raw folder name.
///
/// Only the first hyphen splits the name: `Office-Tower-برج` becomes
/// en "Office", ar "Tower-برج". A hyphen at position 0 never splits.
pub fn normalize(folder_name: &str) -> ProjectName {
    let cleaned = clean_name(&decode_name(folder_name));

    if let Some(pos) = cleaned.find('-').filter(|&p| p > 0) {
        let english = cleaned[..pos].trim();
        let arabic = cleaned[pos + 1..].trim();
        if has_arabic(arabic) && !english.is_empty() && !arabic.is_empty() {
            return ProjectName {
                ar: arabic.to_string(),
                en: english.to_string(),
            };
        }
    }

    if has_arabic(&cleaned) {
        return ProjectName {
            en: format!("{ENGLISH_PROJECT_PREFIX} {cleaned}"),
            ar: cleaned,
        };
    }

    ProjectName {
        ar: format!("{ARABIC_PROJECT_PREFIX} {cleaned}"),
        en: cleaned,
    }
}

/// Percent-decode a name, falling back to the raw input when an escape is
/// malformed (`%` not followed by two hex digits) or the escapes do not form
/// valid UTF-8. Either failure keeps the whole name raw.
pub fn decode_name(raw: &str) -> String {
    if has_malformed_escape(raw) {
        debug!(folder = raw, "malformed percent escape, using folder name as-is");
        return raw.to_string();
    }
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(e) => {
            debug!(folder = raw, error = %e, "could not decode folder name, using it as-is");
            raw.to_string()
        }
    }
}

fn has_malformed_escape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !matches!(
                bytes.get(i + 1..i + 3),
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
    })
}

/// Replace leftover `%20` (double-encoded names), collapse whitespace runs, trim.
fn clean_name(name: &str) -> String {
    name.replace("%20", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True if the text has at least one code point in the Arabic block (U+0600–U+06FF).
pub fn has_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// Infer the project category from keywords in the raw folder name.
///
/// Case-insensitive substring match. Commercial keywords are checked before
/// restoration keywords; anything else is residential.
pub fn detect_category(folder_name: &str) -> Category {
    let name = folder_name.to_lowercase();
    if COMMERCIAL_KEYWORDS.iter().any(|k| name.contains(k)) {
        Category::Commercial
    } else if RESTORATION_KEYWORDS.iter().any(|k| name.contains(k)) {
        Category::Restoration
    } else {
        Category::Residential
    }
}
