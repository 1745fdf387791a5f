//! Site configuration module.
//!
//! Handles loading, validating, and merging the optional `site.toml` file.
//! Stock defaults match the layout the site has always used, so most sites
//! need no configuration file at all.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]                     # Filesystem locations (generation only)
//! gallery = "Gallery"
//! images = "images"
//! output = "manifest.json"
//!
//! [urls]                      # Site-relative URL prefixes
//! gallery = "Gallery"
//! images = "images"
//! manifest = "manifest.json"
//!
//! [processing]
//! max_processes = 4           # Parallel folder scans (omit for auto = CPU cores)
//!
//! [client]
//! probe_timeout_ms = 2000     # Image probe gives up after this long
//! request_timeout_ms = 10000  # Manifest and listing requests
//!
//! [client.guess]              # Names probed when nothing else works
//! folders = ["job1", "project1", "work1"]
//! thumb_names = ["thumb.jpg"]
//! image_names = ["1.jpg", "2.jpg"]
//! hero_names = ["hero1.jpg", "banner1.jpg"]
//! hero_fallback = ["image1.jpg", "image1.png"]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [client]
//! probe_timeout_ms = 500
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Filesystem locations read and written by the generator.
    pub paths: PathsConfig,
    /// Site-relative URL prefixes published in the manifest.
    pub urls: UrlsConfig,
    /// Parallel scan settings.
    pub processing: ProcessingConfig,
    /// Fallback client settings.
    pub client: ClientConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("urls.gallery", &self.urls.gallery),
            ("urls.images", &self.urls.images),
            ("urls.manifest", &self.urls.manifest),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
            if value.starts_with('/') || value.contains("://") {
                return Err(ConfigError::Validation(format!(
                    "{key} must be relative to the site root"
                )));
            }
        }
        if self.client.probe_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "client.probe_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.client.request_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "client.request_timeout_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Filesystem locations, relative to the working directory unless absolute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Directory with one subdirectory per project.
    pub gallery: String,
    /// Flat directory of hero banner images.
    pub images: String,
    /// Where the manifest is written.
    pub output: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            gallery: "Gallery".to_string(),
            images: "images".to_string(),
            output: "manifest.json".to_string(),
        }
    }
}

/// URL prefixes relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UrlsConfig {
    pub gallery: String,
    pub images: String,
    pub manifest: String,
}

impl Default for UrlsConfig {
    fn default() -> Self {
        Self {
            gallery: "Gallery".to_string(),
            images: "images".to_string(),
            manifest: "manifest.json".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of project folders scanned in parallel.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Fallback client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// How long an image probe may take before it counts as "not found".
    pub probe_timeout_ms: u64,
    /// Timeout for manifest and directory-listing requests.
    pub request_timeout_ms: u64,
    /// Conventional names tried by the last fallback tier.
    pub guess: GuessConfig,
}

impl ClientConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 2000,
            request_timeout_ms: 10_000,
            guess: GuessConfig::default(),
        }
    }
}

/// Names probed by the heuristic tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuessConfig {
    /// Project folder names to try under the gallery URL.
    pub folders: Vec<String>,
    /// Thumbnail file names probed inside each folder.
    pub thumb_names: Vec<String>,
    /// Ordinary image names probed inside each folder.
    pub image_names: Vec<String>,
    /// Hero image names probed under the images URL.
    pub hero_names: Vec<String>,
    /// Tried in order when no hero name hit; the first hit wins.
    pub hero_fallback: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for GuessConfig {
    fn default() -> Self {
        let folders = ["job", "project", "work"]
            .iter()
            .flat_map(|stem| (1..=5).map(move |n| format!("{stem}{n}")))
            .collect();
        Self {
            folders,
            thumb_names: strings(&["thumb.jpg"]),
            image_names: strings(&["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"]),
            hero_names: strings(&[
                "hero1.jpg",
                "hero2.jpg",
                "hero3.jpg",
                "slide1.jpg",
                "slide2.jpg",
                "slide3.jpg",
                "background1.jpg",
                "background2.jpg",
                "banner1.jpg",
                "banner2.jpg",
            ]),
            hero_fallback: strings(&["image1.jpg", "image1.jpeg", "image1.png", "image1.webp"]),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file, falling back to stock defaults when the
/// file is absent.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Manifest Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Filesystem locations (used by `generate` and `check`)
# ---------------------------------------------------------------------------
[paths]
# One subdirectory per project; images inside, optionally a thumb.jpg.
gallery = "Gallery"

# Flat directory of hero banner images. Files with "thumb" or "logo" in
# their name are ignored.
images = "images"

# Where the manifest is written.
output = "manifest.json"

# ---------------------------------------------------------------------------
# Site-relative URLs (written into the manifest, used by `resolve`)
# ---------------------------------------------------------------------------
[urls]
gallery = "Gallery"
images = "images"
manifest = "manifest.json"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum number of project folders scanned in parallel.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Fallback client
# ---------------------------------------------------------------------------
[client]
# An image probe that takes longer than this counts as "not found".
probe_timeout_ms = 2000

# Timeout for manifest and directory-listing requests.
request_timeout_ms = 10000

# Names probed when neither the manifest nor a directory listing is available.
[client.guess]
folders = [
    "job1", "job2", "job3", "job4", "job5",
    "project1", "project2", "project3", "project4", "project5",
    "work1", "work2", "work3", "work4", "work5",
]
thumb_names = ["thumb.jpg"]
image_names = ["1.jpg", "2.jpg", "3.jpg", "4.jpg", "5.jpg"]
hero_names = [
    "hero1.jpg", "hero2.jpg", "hero3.jpg",
    "slide1.jpg", "slide2.jpg", "slide3.jpg",
    "background1.jpg", "background2.jpg",
    "banner1.jpg", "banner2.jpg",
]
# Tried in order only if no hero name was found; the first hit is used.
hero_fallback = ["image1.jpg", "image1.jpeg", "image1.png", "image1.webp"]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_site_layout() {
        let config = SiteConfig::default();
        assert_eq!(config.paths.gallery, "Gallery");
        assert_eq!(config.paths.images, "images");
        assert_eq!(config.paths.output, "manifest.json");
        assert_eq!(config.urls.manifest, "manifest.json");
        assert_eq!(config.client.probe_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn default_guess_folders() {
        let guess = GuessConfig::default();
        assert_eq!(guess.folders.len(), 15);
        assert_eq!(guess.folders[0], "job1");
        assert_eq!(guess.folders[5], "project1");
        assert_eq!(guess.folders[14], "work5");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[client]
probe_timeout_ms = 500
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.client.probe_timeout_ms, 500);
        // Defaults preserved
        assert_eq!(config.client.request_timeout_ms, 10_000);
        assert_eq!(config.client.guess.thumb_names, vec!["thumb.jpg"]);
        assert_eq!(config.paths.gallery, "Gallery");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(config.paths.gallery, "Gallery");
        assert_eq!(config.client.probe_timeout_ms, 2000);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(
            &path,
            r#"
[paths]
gallery = "public/Gallery"

[client.guess]
folders = ["villa"]
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.paths.gallery, "public/Gallery");
        assert_eq!(config.client.guess.folders, vec!["villa"]);
        // Unspecified values should be defaults
        assert_eq!(config.paths.images, "images");
        assert_eq!(config.client.guess.image_names.len(), 5);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(&path);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[client]
probe_timeout = 90
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[pathz]\ngallery = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[urls]\ngalery = \"G\"\n").unwrap();
        assert!(load_config(&path).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_absolute_url_prefix() {
        let mut config = SiteConfig::default();
        config.urls.gallery = "/Gallery".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("urls.gallery"));

        config.urls.gallery = "https://cdn.example.com/Gallery".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_url_prefix() {
        let mut config = SiteConfig::default();
        config.urls.images = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeouts() {
        let mut config = SiteConfig::default();
        config.client.probe_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = SiteConfig::default();
        config.client.request_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[client]\nprobe_timeout_ms = 0\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_zero_means_one() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("timeout = 90").unwrap();
        let overlay: toml::Value = toml::from_str("timeout = 70").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("timeout").unwrap().as_integer(), Some(70));
    }

    #[test]
    fn merge_toml_deep_nested() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[client.guess]
folders = ["a", "b"]
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let guess = merged.get("client").unwrap().get("guess").unwrap();
        assert_eq!(guess.get("folders").unwrap().as_array().unwrap().len(), 2);
        // Sibling keys in the nested table survive
        assert!(guess.get("hero_names").is_some());
        assert!(merged.get("client").unwrap().get("probe_timeout_ms").is_some());
    }

    // =========================================================================
    // stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.paths.gallery, defaults.paths.gallery);
        assert_eq!(config.urls.manifest, defaults.urls.manifest);
        assert_eq!(config.client.probe_timeout_ms, defaults.client.probe_timeout_ms);
        assert_eq!(config.client.guess.folders, defaults.client.guess.folders);
        assert_eq!(config.client.guess.hero_names, defaults.client.guess.hero_names);
        assert_eq!(config.client.guess.hero_fallback, defaults.client.guess.hero_fallback);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        assert!(val.is_table());
        for section in ["paths", "urls", "processing", "client"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}
