//! Presentation-time resolution of projects and hero images.
//!
//! A visitor's page has three ways to find out what to show, tried in order:
//!
//! 1. **Manifest**: `GET manifest.json`. If it downloads and parses, it is
//!    authoritative: its projects are shown, or the "no projects" placeholder
//!    if it lists none. No further requests are made.
//! 2. **Listing**: scrape the server's directory index of the gallery (or
//!    hero) directory and every project folder linked from it.
//! 3. **Guess**: load conventional names (`job1/thumb.jpg`, `hero1.jpg`, ...)
//!    as images. A successful load is taken as proof the file exists.
//!
//! Each resolution ends in one of the [`Resolved`] states. `Error` is kept
//! for a site that never answered at all; a reachable site with nothing to
//! show is `Empty`. None of the tiers' failures escape as errors.

use crate::config::{ClientConfig, GuessConfig, SiteConfig, UrlsConfig};
use crate::fetch::{FetchError, Fetcher};
use crate::listing;
use crate::manifest;
use crate::naming::{self, decode_name};
use crate::scan::{join_rel, project_id, select_thumbnail};
use crate::types::{HeroImage, ImageEntry, Manifest, Project};
use std::fmt;
use tracing::{debug, info, warn};

/// Which tier produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Manifest,
    Listing,
    Guess,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Source::Manifest => "manifest",
            Source::Listing => "directory listing",
            Source::Guess => "name guessing",
        };
        f.write_str(s)
    }
}

/// Terminal state of a resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<T> {
    Loaded { source: Source, items: Vec<T> },
    /// The site answered but there is nothing to show.
    Empty,
    /// The site could not be reached at all.
    Error { reason: String },
}

impl<T> Resolved<T> {
    /// Resolved items; empty unless `Loaded`.
    pub fn items(&self) -> &[T] {
        match self {
            Resolved::Loaded { items, .. } => items,
            _ => &[],
        }
    }

    pub fn source(&self) -> Option<Source> {
        match self {
            Resolved::Loaded { source, .. } => Some(*source),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Resolved::Loaded { .. })
    }
}

/// Everything a visitor's landing page needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteView {
    pub projects: Resolved<Project>,
    pub hero_images: Resolved<HeroImage>,
}

/// Tracks whether any request reached the server, and the last failure.
#[derive(Debug, Clone, Default)]
struct Trail {
    reached: bool,
    last_error: Option<String>,
}

impl Trail {
    fn success(&mut self) {
        self.reached = true;
    }

    fn failure(&mut self, error: &FetchError) {
        if error.server_responded() {
            self.reached = true;
        }
        self.last_error = Some(error.to_string());
    }

    fn loaded<T>(self, source: Source, items: Vec<T>) -> Resolved<T> {
        Resolved::Loaded { source, items }
    }

    fn exhausted<T>(self) -> Resolved<T> {
        if self.reached {
            Resolved::Empty
        } else {
            let reason = self
                .last_error
                .unwrap_or_else(|| "no request was attempted".to_string());
            warn!(%reason, "site unreachable");
            Resolved::Error { reason }
        }
    }
}

/// Resolves what a visitor sees, falling back tier by tier.
pub struct ManifestClient<F: Fetcher> {
    fetcher: F,
    urls: UrlsConfig,
    settings: ClientConfig,
}

impl<F: Fetcher> ManifestClient<F> {
    pub fn new(fetcher: F, config: &SiteConfig) -> Self {
        Self {
            fetcher,
            urls: config.urls.clone(),
            settings: config.client.clone(),
        }
    }

    fn guess(&self) -> &GuessConfig {
        &self.settings.guess
    }

    fn gallery_path(&self, rel: &str) -> String {
        join_rel(self.urls.gallery.trim_end_matches('/'), rel)
    }

    fn images_path(&self, rel: &str) -> String {
        join_rel(self.urls.images.trim_end_matches('/'), rel)
    }

    // =========================================================================
    // Public entry points
    // =========================================================================

    /// Resolve the project list.
    pub async fn resolve_projects(&self) -> Resolved<Project> {
        let mut trail = Trail::default();
        match self.load_manifest(&mut trail).await {
            Some(manifest) => projects_from_manifest(trail, manifest),
            None => self.projects_without_manifest(trail).await,
        }
    }

    /// Resolve the hero banner images.
    pub async fn resolve_hero_images(&self) -> Resolved<HeroImage> {
        let mut trail = Trail::default();
        match self.load_manifest(&mut trail).await {
            Some(manifest) => heroes_from_manifest(trail, manifest),
            None => self.heroes_without_manifest(trail).await,
        }
    }

    /// Resolve projects and hero images, fetching the manifest only once.
    pub async fn resolve_site(&self) -> SiteView {
        let mut trail = Trail::default();
        match self.load_manifest(&mut trail).await {
            Some(manifest) => SiteView {
                hero_images: heroes_from_manifest(trail.clone(), manifest.clone()),
                projects: projects_from_manifest(trail, manifest),
            },
            None => SiteView {
                projects: self.projects_without_manifest(trail.clone()).await,
                hero_images: self.heroes_without_manifest(trail).await,
            },
        }
    }

    /// Look up a single project by its folder name.
    ///
    /// Searches the resolved project list first, then tries the folder's
    /// own listing. Returns `None` when neither finds it.
    pub async fn resolve_project(&self, folder: &str) -> Option<Project> {
        let resolved = self.resolve_projects().await;
        if let Some(project) = resolved.items().iter().find(|p| p.folder == folder) {
            return Some(project.clone());
        }

        debug!(folder, "project not in resolved set, scraping its folder");
        let segment = urlencoding::encode(folder);
        let mut trail = Trail::default();
        self.scrape_project(&segment, 1, &mut trail).await
    }

    // =========================================================================
    // Tier 1: manifest
    // =========================================================================

    async fn load_manifest(&self, trail: &mut Trail) -> Option<Manifest> {
        let path = &self.urls.manifest;
        let text = match self.fetcher.fetch_text(path).await {
            Ok(text) => {
                trail.success();
                text
            }
            Err(e) => {
                info!(error = %e, "manifest unavailable, falling back to directory listing");
                trail.failure(&e);
                return None;
            }
        };
        match manifest::parse(&text) {
            Ok(manifest) => {
                debug!(projects = manifest.projects.len(), "manifest loaded");
                Some(manifest)
            }
            Err(e) => {
                info!(error = %e, "manifest unreadable, falling back to directory listing");
                trail.last_error = Some(e.to_string());
                None
            }
        }
    }

    // =========================================================================
    // Projects: tiers 2 and 3
    // =========================================================================

    async fn projects_without_manifest(&self, mut trail: Trail) -> Resolved<Project> {
        let scraped = self.scrape_projects(&mut trail).await;
        if !scraped.is_empty() {
            info!(count = scraped.len(), "projects found via directory listing");
            return trail.loaded(Source::Listing, scraped);
        }

        info!("no projects from directory listing, guessing folder names");
        let guessed = self.guess_projects(&mut trail).await;
        if !guessed.is_empty() {
            info!(count = guessed.len(), "projects found by guessing");
            return trail.loaded(Source::Guess, guessed);
        }
        trail.exhausted()
    }

    async fn scrape_projects(&self, trail: &mut Trail) -> Vec<Project> {
        let listing_path = format!("{}/", self.urls.gallery.trim_end_matches('/'));
        let html = match self.fetcher.fetch_text(&listing_path).await {
            Ok(html) => {
                trail.success();
                html
            }
            Err(e) => {
                debug!(error = %e, "gallery listing unavailable");
                trail.failure(&e);
                return Vec::new();
            }
        };

        let mut projects = Vec::new();
        for candidate in listing::subfolder_candidates(&html) {
            let Some(id) = project_id(projects.len()) else {
                warn!("too many projects in gallery listing, rest skipped");
                break;
            };
            match self.scrape_project(&candidate, id, trail).await {
                Some(project) => projects.push(project),
                None => debug!(folder = %decode_name(&candidate), "candidate folder skipped"),
            }
        }
        projects
    }

    /// Build a project from one folder's listing. `segment` is the folder
    /// name as it appears in a URL (percent-encoded).
    async fn scrape_project(&self, segment: &str, id: u32, trail: &mut Trail) -> Option<Project> {
        let folder_path = self.gallery_path(segment);
        let html = match self.fetcher.fetch_text(&format!("{folder_path}/")).await {
            Ok(html) => {
                trail.success();
                html
            }
            Err(e) => {
                debug!(folder = segment, error = %e, "folder listing unavailable");
                trail.failure(&e);
                return None;
            }
        };

        let found = listing::image_links(&html)
            .into_iter()
            .map(|href| ImageEntry {
                name: decode_name(&href),
                path: join_rel(&folder_path, &href),
                size: 0,
            })
            .collect();
        assemble_project(id, segment, found)
    }

    async fn guess_projects(&self, trail: &mut Trail) -> Vec<Project> {
        let mut projects = Vec::new();
        for folder in &self.guess().folders {
            let segment = urlencoding::encode(folder);
            let folder_path = self.gallery_path(&segment);
            let mut found = Vec::new();
            for name in self.guess().thumb_names.iter().chain(&self.guess().image_names) {
                let path = join_rel(&folder_path, name);
                if self.probe(&path, trail).await {
                    found.push(ImageEntry {
                        name: name.clone(),
                        path,
                        size: 0,
                    });
                }
            }
            let Some(id) = project_id(projects.len()) else {
                break;
            };
            if let Some(project) = assemble_project(id, &segment, found) {
                debug!(folder = %folder, "guessed folder exists");
                projects.push(project);
            }
        }
        projects
    }

    // =========================================================================
    // Hero images: tiers 2 and 3
    // =========================================================================

    async fn heroes_without_manifest(&self, mut trail: Trail) -> Resolved<HeroImage> {
        let scraped = self.scrape_heroes(&mut trail).await;
        if !scraped.is_empty() {
            info!(count = scraped.len(), "hero images found via directory listing");
            return trail.loaded(Source::Listing, scraped);
        }

        info!("no hero images from directory listing, guessing names");
        let guessed = self.guess_heroes(&mut trail).await;
        if !guessed.is_empty() {
            return trail.loaded(Source::Guess, guessed);
        }
        trail.exhausted()
    }

    async fn scrape_heroes(&self, trail: &mut Trail) -> Vec<HeroImage> {
        let listing_path = format!("{}/", self.urls.images.trim_end_matches('/'));
        let html = match self.fetcher.fetch_text(&listing_path).await {
            Ok(html) => {
                trail.success();
                html
            }
            Err(e) => {
                debug!(error = %e, "images listing unavailable");
                trail.failure(&e);
                return Vec::new();
            }
        };

        listing::image_links(&html)
            .into_iter()
            .filter(|href| !crate::classify::is_excluded_from_hero(&decode_name(href)))
            .map(|href| HeroImage {
                name: decode_name(&href),
                path: self.images_path(&href),
                size: 0,
            })
            .collect()
    }

    async fn guess_heroes(&self, trail: &mut Trail) -> Vec<HeroImage> {
        let mut found = Vec::new();
        for name in &self.guess().hero_names {
            if let Some(hero) = self.probe_hero(name, trail).await {
                found.push(hero);
            }
        }
        if found.is_empty() {
            for name in &self.guess().hero_fallback {
                if let Some(hero) = self.probe_hero(name, trail).await {
                    found.push(hero);
                    break;
                }
            }
        }
        found
    }

    async fn probe_hero(&self, name: &str, trail: &mut Trail) -> Option<HeroImage> {
        let path = self.images_path(name);
        self.probe(&path, trail).await.then(|| HeroImage {
            name: name.to_string(),
            path,
            size: 0,
        })
    }

    /// Load `path` as an image, giving up after the probe timeout.
    async fn probe(&self, path: &str, trail: &mut Trail) -> bool {
        let timeout = self.settings.probe_timeout();
        match tokio::time::timeout(timeout, self.fetcher.load_image(path)).await {
            Ok(Ok(())) => {
                trail.success();
                true
            }
            Ok(Err(e)) => {
                trail.failure(&e);
                false
            }
            Err(_) => {
                debug!(path, ?timeout, "image probe timed out");
                trail.failure(&FetchError::Timeout {
                    url: path.to_string(),
                });
                false
            }
        }
    }
}

fn projects_from_manifest(trail: Trail, manifest: Manifest) -> Resolved<Project> {
    if manifest.projects.is_empty() {
        info!("manifest lists no projects");
        return Resolved::Empty;
    }
    trail.loaded(Source::Manifest, manifest.projects)
}

fn heroes_from_manifest(trail: Trail, manifest: Manifest) -> Resolved<HeroImage> {
    if manifest.hero_images.is_empty() {
        info!("manifest lists no hero images");
        return Resolved::Empty;
    }
    trail.loaded(Source::Manifest, manifest.hero_images)
}

/// Turn discovered images into a project, or `None` if there are none.
fn assemble_project(id: u32, segment: &str, found: Vec<ImageEntry>) -> Option<Project> {
    let (thumb, images) = select_thumbnail(found)?;
    let folder = decode_name(segment);
    let names = naming::normalize(&folder);
    Some(Project {
        id,
        category: naming::detect_category(&folder),
        folder,
        name: names.ar,
        name_en: names.en,
        thumb: thumb.path,
        image_count: images.len(),
        images,
    })
}
