//! CLI output formatting.
//!
//! # Information-First Display
//!
//! The primary display for every project is its identity (id and display
//! names) with filesystem and URL details shown as indented context lines.
//! The report reads as a content inventory of the site while still letting
//! editors trace every entry back to a folder.
//!
//! # Output Format
//!
//! ## Generate / Check
//!
//! ```text
//! Projects
//! 001 Villa Compound / فيلا كومباوند (2 photos)
//!     Category: commercial
//!     Source: Villa Compound-فيلا كومباوند/
//!     Thumb: Gallery/Villa Compound-فيلا كومباوند/thumb.jpg
//!
//! Hero Images
//!     banner1.jpg (2.0 KB)
//!
//! Manifest written: manifest.json
//!     Projects: 1
//!     Project images: 2
//!     Hero images: 1
//! ```
//!
//! ## Resolve
//!
//! ```text
//! Language: ar (rtl)
//!
//! Projects (directory listing)
//! 001 فيلا كومباوند (2 photos)
//!     Thumb: Gallery/Villa%20Compound-.../thumb.jpg
//!
//! Hero Images (manifest)
//!     images/banner1.jpg
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::client::{Resolved, SiteView};
use crate::types::{Language, Manifest, Project};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format an id as 3-digit zero-padded.
fn format_index(pos: u32) -> String {
    format!("{:0>3}", pos)
}

/// Sizes are shown in kilobytes with one decimal.
fn format_size_kb(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

fn photo_count(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{} photos", n)
    }
}

// ============================================================================
// Scan report
// ============================================================================

/// Format the inventory of a freshly built manifest.
pub fn format_scan_report(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push("Projects".to_string());
    if manifest.projects.is_empty() {
        lines.push("    (none)".to_string());
    }
    for project in &manifest.projects {
        lines.push(format!(
            "{} {} / {} ({})",
            format_index(project.id),
            project.name_en,
            project.name,
            photo_count(project.image_count)
        ));
        lines.push(format!("    Category: {}", project.category));
        lines.push(format!("    Source: {}/", project.folder));
        lines.push(format!("    Thumb: {}", project.thumb));
    }

    lines.push(String::new());
    lines.push("Hero Images".to_string());
    for hero in &manifest.hero_images {
        lines.push(format!("    {} ({})", hero.name, format_size_kb(hero.size)));
    }
    if manifest.hero_images.is_empty() {
        lines.push("    WARNING: no hero images found".to_string());
        lines.push("    Add JPG/PNG images to the images directory".to_string());
    }

    lines
}

/// Format the closing summary. `output` is `None` when nothing was written.
pub fn format_generate_summary(manifest: &Manifest, output: Option<&Path>) -> Vec<String> {
    let header = match output {
        Some(path) => format!("Manifest written: {}", path.display()),
        None => "Check complete (manifest not written)".to_string(),
    };
    vec![
        header,
        format!("    Projects: {}", manifest.stats.total_projects),
        format!("    Project images: {}", manifest.stats.total_images),
        format!("    Hero images: {}", manifest.stats.total_hero_images),
    ]
}

/// Print the scan report followed by the summary.
pub fn print_generate_output(manifest: &Manifest, output: Option<&Path>) {
    for line in format_scan_report(manifest) {
        println!("{}", line);
    }
    println!();
    for line in format_generate_summary(manifest, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Resolution report
// ============================================================================

fn state_header<T>(title: &str, resolved: &Resolved<T>) -> String {
    match resolved {
        Resolved::Loaded { source, .. } => format!("{} ({})", title, source),
        Resolved::Empty => format!("{}: nothing to show", title),
        Resolved::Error { reason } => format!("{}: unavailable ({})", title, reason),
    }
}

fn project_lines(project: &Project, lang: Language) -> [String; 2] {
    [
        format!(
            "{} {} ({})",
            format_index(project.id),
            project.display_name(lang),
            photo_count(project.image_count)
        ),
        format!("    Thumb: {}", project.thumb),
    ]
}

/// Format what a visitor would see, in the given language.
pub fn format_resolution(view: &SiteView, lang: Language) -> Vec<String> {
    let mut lines = vec![
        format!("Language: {} ({})", lang_code(lang), lang.dir()),
        String::new(),
    ];

    lines.push(state_header("Projects", &view.projects));
    for project in view.projects.items() {
        lines.extend(project_lines(project, lang));
    }

    lines.push(String::new());
    lines.push(state_header("Hero Images", &view.hero_images));
    for hero in view.hero_images.items() {
        lines.push(format!("    {}", hero.path));
    }

    lines
}

/// Format a single project lookup.
pub fn format_project(project: Option<&Project>, folder: &str, lang: Language) -> Vec<String> {
    let Some(project) = project else {
        return vec![format!("Project not found: {}", folder)];
    };
    let mut lines: Vec<String> = project_lines(project, lang).into();
    lines.push(format!("    Category: {}", project.category));
    for image in &project.images {
        lines.push(format!("    {}", image.path));
    }
    lines
}

fn lang_code(lang: Language) -> &'static str {
    match lang {
        Language::Ar => "ar",
        Language::En => "en",
    }
}

pub fn print_resolution(view: &SiteView, lang: Language) {
    for line in format_resolution(view, lang) {
        println!("{}", line);
    }
}

pub fn print_project(project: Option<&Project>, folder: &str, lang: Language) {
    for line in format_project(project, folder, lang) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
