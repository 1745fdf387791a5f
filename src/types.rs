//! Shared types serialized into `manifest.json`.
//!
//! The generator writes these and the client reads them back, so both sides
//! use the same definitions. Field names follow the camelCase wire format the
//! site's JavaScript expects (`nameEn`, `imageCount`, `generatedAt`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A discoverable image file.
///
/// `path` is relative and always uses forward slashes so a browser can use it
/// as a URL regardless of the OS the manifest was generated on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub name: String,
    pub path: String,
    /// File size in bytes. Zero when the image was discovered over HTTP.
    pub size: u64,
}

/// A standalone banner image from the flat hero directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroImage {
    pub name: String,
    pub path: String,
    pub size: u64,
}

/// Project category, inferred from keywords in the folder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Commercial,
    Restoration,
    Residential,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Category::Commercial => "commercial",
            Category::Restoration => "restoration",
            Category::Residential => "residential",
        };
        f.write_str(s)
    }
}

/// One gallery entry, built from one top-level project folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u32,
    /// Raw folder name (may contain spaces, Arabic, URL-reserved characters).
    pub folder: String,
    /// Arabic display name.
    pub name: String,
    /// English display name.
    pub name_en: String,
    pub thumb: String,
    /// All images except the thumbnail, in discovery order.
    pub images: Vec<ImageEntry>,
    pub image_count: usize,
    pub category: Category,
}

impl Project {
    /// Display name in the requested language.
    pub fn display_name(&self, lang: Language) -> &str {
        match lang {
            Language::Ar => &self.name,
            Language::En => &self.name_en,
        }
    }
}

/// Summary counts stored alongside the manifest content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_projects: usize,
    pub total_images: usize,
    pub total_hero_images: usize,
}

impl Stats {
    pub fn compute(projects: &[Project], hero_images: &[HeroImage]) -> Self {
        Self {
            total_projects: projects.len(),
            total_images: projects.iter().map(|p| p.image_count).sum(),
            total_hero_images: hero_images.len(),
        }
    }
}

/// Manifest format version written by this generator.
pub const MANIFEST_VERSION: &str = "1.0";

/// The persisted description of every project and hero image.
///
/// Always regenerated wholesale; never patched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub version: String,
    /// ISO-8601 UTC timestamp with millisecond precision.
    pub generated_at: String,
    pub projects: Vec<Project>,
    #[serde(default)]
    pub hero_images: Vec<HeroImage>,
    #[serde(default)]
    pub stats: Stats,
}

impl Manifest {
    /// Assemble a manifest, deriving `stats` from the collections.
    pub fn new(projects: Vec<Project>, hero_images: Vec<HeroImage>, generated_at: String) -> Self {
        let stats = Stats::compute(&projects, &hero_images);
        Self {
            version: MANIFEST_VERSION.to_string(),
            generated_at,
            projects,
            hero_images,
            stats,
        }
    }

    /// True if `stats` agrees with the collections it summarizes.
    pub fn stats_consistent(&self) -> bool {
        self.stats == Stats::compute(&self.projects, &self.hero_images)
    }
}

/// Site display language. Arabic is the site default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ar,
    En,
}

impl Language {
    /// Text direction attribute for this language.
    pub fn dir(self) -> &'static str {
        match self {
            Language::Ar => "rtl",
            Language::En => "ltr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: u32, image_count: usize) -> Project {
        Project {
            id,
            folder: format!("p{id}"),
            name: format!("مشروع p{id}"),
            name_en: format!("p{id}"),
            thumb: format!("Gallery/p{id}/thumb.jpg"),
            images: (0..image_count)
                .map(|i| ImageEntry {
                    name: format!("{i}.jpg"),
                    path: format!("Gallery/p{id}/{i}.jpg"),
                    size: 10,
                })
                .collect(),
            image_count,
            category: Category::Residential,
        }
    }

    #[test]
    fn stats_sum_image_counts() {
        let projects = vec![project(1, 2), project(3, 0), project(4, 5)];
        let stats = Stats::compute(&projects, &[]);
        assert_eq!(stats.total_projects, 3);
        assert_eq!(stats.total_images, 7);
        assert_eq!(stats.total_hero_images, 0);
    }

    #[test]
    fn project_serializes_camel_case() {
        let json = serde_json::to_value(project(2, 1)).unwrap();
        assert_eq!(json["nameEn"], "p2");
        assert_eq!(json["imageCount"], 1);
        assert_eq!(json["category"], "residential");
        assert!(json.get("name_en").is_none());
    }

    #[test]
    fn manifest_wire_shape() {
        let manifest = Manifest::new(vec![project(1, 1)], vec![], "2024-01-01T00:00:00.000Z".into());
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["generatedAt"], "2024-01-01T00:00:00.000Z");
        assert_eq!(json["heroImages"], serde_json::json!([]));
        assert_eq!(json["stats"]["totalProjects"], 1);
        assert_eq!(json["stats"]["totalImages"], 1);
        assert_eq!(json["stats"]["totalHeroImages"], 0);
    }

    #[test]
    fn tampered_stats_detected() {
        let mut manifest = Manifest::new(vec![project(1, 3)], vec![], String::new());
        assert!(manifest.stats_consistent());
        manifest.stats.total_images = 99;
        assert!(!manifest.stats_consistent());
    }

    #[test]
    fn display_name_follows_language() {
        let p = project(1, 0);
        assert_eq!(p.display_name(Language::Ar), "مشروع p1");
        assert_eq!(p.display_name(Language::En), "p1");
        assert_eq!(Language::default(), Language::Ar);
        assert_eq!(Language::Ar.dir(), "rtl");
    }
}
