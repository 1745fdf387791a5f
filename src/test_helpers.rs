//! Shared test utilities for the gallery-manifest test suite.
//!
//! Provides fixture setup and lookup helpers for manifests built from the
//! `fixtures/site` tree. Directory enumeration order on a real filesystem is
//! not fixed, so tests look entries up by folder or name instead of by index.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = manifest::build(&LocalTree, &fixture_layout(tmp.path()));
//!
//! let villa = find_project(&manifest, "Villa Compound-فيلا كومباوند");
//! assert_eq!(villa.image_count, 2);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::ScanLayout;
use crate::types::{HeroImage, Manifest, Project};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/site/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/site");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Default layout rooted at `root`.
pub fn fixture_layout(root: &Path) -> ScanLayout {
    ScanLayout {
        gallery_dir: root.join("Gallery"),
        images_dir: root.join("images"),
        gallery_url: "Gallery".to_string(),
        images_url: "images".to_string(),
    }
}

// =========================================================================
// Manifest lookups: panic with a clear message on miss
// =========================================================================

/// Find a project by folder name. Panics if not found.
pub fn find_project<'a>(manifest: &'a Manifest, folder: &str) -> &'a Project {
    manifest
        .projects
        .iter()
        .find(|p| p.folder == folder)
        .unwrap_or_else(|| {
            let folders = project_folders(manifest);
            panic!("project '{folder}' not found. Available: {folders:?}")
        })
}

/// Find a hero image by file name. Panics if not found.
pub fn find_hero<'a>(manifest: &'a Manifest, name: &str) -> &'a HeroImage {
    manifest
        .hero_images
        .iter()
        .find(|h| h.name == name)
        .unwrap_or_else(|| {
            let names = hero_names(manifest);
            panic!("hero image '{name}' not found. Available: {names:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All project folders, sorted.
pub fn project_folders(manifest: &Manifest) -> Vec<&str> {
    let mut folders: Vec<&str> = manifest.projects.iter().map(|p| p.folder.as_str()).collect();
    folders.sort();
    folders
}

/// All hero image names, sorted.
pub fn hero_names(manifest: &Manifest) -> Vec<&str> {
    let mut names: Vec<&str> = manifest.hero_images.iter().map(|h| h.name.as_str()).collect();
    names.sort();
    names
}
