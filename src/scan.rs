//! Filesystem scanning: projects and hero images.
//!
//! The generator expects this layout at the site root:
//!
//! ```text
//! Gallery/                                   # One folder per project
//! ├── Villa Compound-فيلا كومباوند/
//! │   ├── thumb.jpg                          # Representative image (optional)
//! │   ├── 1.jpg
//! │   └── interior/                          # Nested folders are walked too
//! │       └── 2.png
//! └── برج الشروق/
//!     └── facade.webp                        # No thumb.jpg → first image is the thumbnail
//! images/                                    # Flat hero banner images
//! ├── banner1.jpg
//! ├── logo.png                               # Excluded ("logo" in name)
//! └── archive/                               # Subdirectories are ignored
//! ```
//!
//! ## Projects
//!
//! Each immediate subdirectory of the gallery root becomes one [`Project`]:
//! every image below it is collected by [`walk`], the thumbnail is picked by
//! [`select_thumbnail`], and the display names and category come from
//! [`crate::naming`]. Folders without a single image are dropped.
//!
//! Project ids are the folder's position in the gallery root listing plus
//! one. Every entry of the listing counts, so a dropped folder (or a stray
//! file) leaves a gap in the id sequence. Folders are scanned in parallel,
//! but results are collected in listing order, so ids never depend on which
//! scan finishes first.
//!
//! ## Missing directories
//!
//! Neither root is required. A missing root is created so the editors have
//! somewhere to drop photos, and the scan yields an empty collection.

use crate::classify;
use crate::config::SiteConfig;
use crate::naming;
use crate::source::{EntryKind, SourceTree};
use crate::types::{HeroImage, ImageEntry, Project};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Where the scanners read from and how discovered paths are published.
///
/// `*_dir` are filesystem locations; `*_url` are the site-relative prefixes
/// written into the manifest (`Gallery/<folder>/1.jpg`, `images/banner.jpg`).
#[derive(Debug, Clone)]
pub struct ScanLayout {
    pub gallery_dir: PathBuf,
    pub images_dir: PathBuf,
    pub gallery_url: String,
    pub images_url: String,
}

impl ScanLayout {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            gallery_dir: PathBuf::from(&config.paths.gallery),
            images_dir: PathBuf::from(&config.paths.images),
            gallery_url: config.urls.gallery.clone(),
            images_url: config.urls.images.clone(),
        }
    }

    fn gallery_path(&self, rel: &str) -> String {
        join_rel(self.gallery_url.trim_end_matches('/'), rel)
    }

    fn images_path(&self, rel: &str) -> String {
        join_rel(self.images_url.trim_end_matches('/'), rel)
    }
}

/// Join relative path segments with `/`, whatever the host separator is.
pub fn join_rel(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Recursively collect every image file below `root`.
///
/// Paths are `prefix` joined with the path below `root`. Subdirectories are
/// walked depth-first in enumeration order. A missing root yields nothing.
pub fn walk<T: SourceTree + ?Sized>(tree: &T, root: &Path, prefix: &str) -> Vec<ImageEntry> {
    let mut entries = Vec::new();
    if !tree.is_dir(root) {
        warn!(dir = %root.display(), "directory not found");
        return entries;
    }
    walk_into(tree, root, prefix, &mut entries);
    entries
}

fn walk_into<T: SourceTree + ?Sized>(
    tree: &T,
    dir: &Path,
    prefix: &str,
    out: &mut Vec<ImageEntry>,
) {
    let listing = match tree.list_dir(dir) {
        Ok(l) => l,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "could not read directory");
            return;
        }
    };

    for entry in listing {
        let rel = join_rel(prefix, &entry.name);
        match entry.kind {
            EntryKind::Dir => walk_into(tree, &dir.join(&entry.name), &rel, out),
            EntryKind::File if classify::is_image(&entry.name) => out.push(ImageEntry {
                name: entry.name,
                path: rel,
                size: entry.size,
            }),
            _ => {}
        }
    }
}

/// Split discovered images into `(thumbnail, remaining images)`.
///
/// The thumbnail is the first entry named `thumb.jpg`, or else the first
/// entry. Returns `None` when there are no images at all.
pub fn select_thumbnail(mut images: Vec<ImageEntry>) -> Option<(ImageEntry, Vec<ImageEntry>)> {
    if images.is_empty() {
        return None;
    }
    let pos = images
        .iter()
        .position(|img| classify::is_thumbnail(&img.name))
        .unwrap_or(0);
    let thumb = images.remove(pos);
    Some((thumb, images))
}

/// Project id for the entry at `index` in its listing: `index + 1`, or
/// `None` if that does not fit a `u32`.
pub fn project_id(index: usize) -> Option<u32> {
    index.checked_add(1).and_then(|id| u32::try_from(id).ok())
}

/// Build one project per gallery folder.
pub fn collect_projects<T: SourceTree + ?Sized>(tree: &T, layout: &ScanLayout) -> Vec<Project> {
    let root = &layout.gallery_dir;
    if !ensure_dir(tree, root) {
        return Vec::new();
    }

    let listing = match tree.list_dir(root) {
        Ok(l) => l,
        Err(e) => {
            warn!(dir = %root.display(), error = %e, "could not read gallery directory");
            return Vec::new();
        }
    };

    let folders: Vec<(usize, String)> = listing
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry.kind {
            EntryKind::Dir => Some((index, entry.name)),
            _ => {
                debug!(entry = %entry.name, "not a project folder");
                None
            }
        })
        .collect();

    folders
        .par_iter()
        .filter_map(|(index, folder)| build_project(tree, layout, *index, folder))
        .collect()
}

fn build_project<T: SourceTree + ?Sized>(
    tree: &T,
    layout: &ScanLayout,
    index: usize,
    folder: &str,
) -> Option<Project> {
    let Some(id) = project_id(index) else {
        warn!(folder, index, "project id out of range, project skipped");
        return None;
    };
    info!(folder, "scanning project");
    let found = walk(tree, &layout.gallery_dir.join(folder), folder);

    let Some((thumb, images)) = select_thumbnail(found) else {
        warn!(folder, "no images found, project skipped");
        return None;
    };

    let names = naming::normalize(folder);
    let images: Vec<ImageEntry> = images
        .into_iter()
        .map(|img| ImageEntry {
            path: layout.gallery_path(&img.path),
            ..img
        })
        .collect();

    debug!(folder, images = images.len(), thumb = %thumb.path, "project collected");

    Some(Project {
        id,
        folder: folder.to_string(),
        name: names.ar,
        name_en: names.en,
        thumb: layout.gallery_path(&thumb.path),
        image_count: images.len(),
        images,
        category: naming::detect_category(folder),
    })
}

/// Collect banner images from the flat hero directory.
///
/// Only direct children are considered; subdirectories are skipped, not
/// walked. Thumbnails and logos (by name) are excluded.
pub fn collect_hero_images<T: SourceTree + ?Sized>(tree: &T, layout: &ScanLayout) -> Vec<HeroImage> {
    let root = &layout.images_dir;
    if !ensure_dir(tree, root) {
        return Vec::new();
    }

    let listing = match tree.list_dir(root) {
        Ok(l) => l,
        Err(e) => {
            warn!(dir = %root.display(), error = %e, "could not read images directory");
            return Vec::new();
        }
    };
    debug!(dir = %root.display(), entries = listing.len(), "scanning hero images");

    let mut heroes = Vec::new();
    for entry in listing {
        match entry.kind {
            EntryKind::Dir => debug!(entry = %entry.name, "skipping directory"),
            EntryKind::File if !classify::is_image(&entry.name) => {
                debug!(entry = %entry.name, "skipping non-image")
            }
            EntryKind::File if classify::is_excluded_from_hero(&entry.name) => {
                debug!(entry = %entry.name, "skipping thumbnail/logo")
            }
            EntryKind::File => heroes.push(HeroImage {
                path: layout.images_path(&entry.name),
                name: entry.name,
                size: entry.size,
            }),
            EntryKind::Other => {}
        }
    }

    if heroes.is_empty() {
        warn!(dir = %root.display(), "no hero images found");
    }
    heroes
}

/// Returns true if `dir` already exists. Otherwise creates it (best effort)
/// and returns false: a freshly created directory has nothing to scan.
fn ensure_dir<T: SourceTree + ?Sized>(tree: &T, dir: &Path) -> bool {
    if tree.is_dir(dir) {
        return true;
    }
    warn!(dir = %dir.display(), "directory not found, creating it");
    if let Err(e) = tree.create_dir_all(dir) {
        warn!(dir = %dir.display(), error = %e, "could not create directory");
    }
    false
}
