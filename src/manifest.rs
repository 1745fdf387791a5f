//! Manifest assembly and persistence.
//!
//! Generation runs both scanners, derives the summary counts, stamps the
//! current time, and replaces the manifest file in a single rename. Readers
//! (the site, or a concurrent `resolve`) therefore see either the previous
//! manifest or the new one, never a half-written file.

use crate::scan::{self, ScanLayout};
use crate::source::SourceTree;
use crate::types::Manifest;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scan the tree and assemble a manifest stamped with the current time.
pub fn build<T: SourceTree + ?Sized>(tree: &T, layout: &ScanLayout) -> Manifest {
    build_at(tree, layout, Utc::now())
}

/// Same as [`build`] with an explicit generation time.
pub fn build_at<T: SourceTree + ?Sized>(
    tree: &T,
    layout: &ScanLayout,
    now: DateTime<Utc>,
) -> Manifest {
    let projects = scan::collect_projects(tree, layout);
    let hero_images = scan::collect_hero_images(tree, layout);
    let manifest = Manifest::new(projects, hero_images, timestamp(now));
    info!(
        projects = manifest.stats.total_projects,
        images = manifest.stats.total_images,
        hero_images = manifest.stats.total_hero_images,
        "manifest assembled"
    );
    manifest
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T09:30:00.000Z`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Write the manifest as pretty JSON, replacing `path` atomically.
///
/// The document goes to a temp file in the target directory first and is
/// renamed over `path` once fully flushed. Missing parent directories are
/// created.
pub fn persist(manifest: &Manifest, path: &Path) -> Result<(), ManifestError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    serde_json::to_writer_pretty(&mut tmp, manifest)?;
    tmp.write_all(b"\n")?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), "manifest written");
    Ok(())
}

/// Build and persist in one step. Returns the manifest that was written.
pub fn generate<T: SourceTree + ?Sized>(
    tree: &T,
    layout: &ScanLayout,
    output: &Path,
) -> Result<Manifest, ManifestError> {
    let manifest = build(tree, layout);
    persist(&manifest, output)?;
    Ok(manifest)
}

/// Parse a manifest document.
pub fn parse(text: &str) -> Result<Manifest, ManifestError> {
    Ok(serde_json::from_str(text)?)
}

/// Read a previously written manifest.
pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}
