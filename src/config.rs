//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; the user's `config.toml` in the content root is merged on
//! top of them key by key, so a file only needs the values it changes.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml      # optional, overrides stock defaults
//! ├── catalog.json
//! ├── about.md
//! └── thumbnails/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Portfolio"
//! headline = "Video Editor & Color Grader"
//! tagline = "Transforming visions into cinematic reality"
//!
//! [gallery]
//! page_size = 6             # Records per page on mobile
//! mobile_breakpoint = 768   # Viewport widths below this are mobile
//! header_offset = 64        # Fixed header height (px) kept above the list
//!
//! [carousel]
//! visibility_threshold = 0.1  # Intersection ratio that counts as visible
//!
//! [thumbnails]
//! dir = "/thumbnails"
//! primary_extension = "jpg"
//! fallback_extension = "png"
//!
//! [ordering]
//! projects = []             # Standard titles in display order
//! reels = []                # Reel titles in display order
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only pin two projects to the front
//! [ordering]
//! projects = ["Tempto", "BZAAT"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::carousel::DEFAULT_VISIBILITY_THRESHOLD;
use crate::paginate::DEFAULT_PAGE_SIZE;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Static text for the header and hero.
    pub site: SiteSection,
    /// Grid pagination and viewport classification.
    pub gallery: GalleryConfig,
    /// Reel and color-group strips.
    pub carousel: CarouselConfig,
    /// Title-derived thumbnail paths.
    pub thumbnails: ThumbnailsConfig,
    /// Display precedence lists.
    pub ordering: OrderingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.page_size == 0 {
            return Err(ConfigError::Validation(
                "gallery.page_size must be at least 1".into(),
            ));
        }
        if self.gallery.mobile_breakpoint == 0 {
            return Err(ConfigError::Validation(
                "gallery.mobile_breakpoint must be non-zero".into(),
            ));
        }
        let threshold = self.carousel.visibility_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Validation(
                "carousel.visibility_threshold must be in (0, 1]".into(),
            ));
        }
        let thumbs = &self.thumbnails;
        if thumbs.primary_extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::Validation(
                "thumbnails.primary_extension must not be empty".into(),
            ));
        }
        if thumbs.primary_extension.trim_start_matches('.')
            == thumbs.fallback_extension.trim_start_matches('.')
        {
            return Err(ConfigError::Validation(
                "thumbnails.fallback_extension must differ from primary_extension".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub title: String,
    pub headline: String,
    pub tagline: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            headline: "Video Editor & Color Grader".to_string(),
            tagline: "Transforming visions into cinematic reality".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Records per page in the paginated (mobile) grid.
    pub page_size: usize,
    /// Viewport widths strictly below this are classified mobile.
    pub mobile_breakpoint: u32,
    /// Height of the fixed header; page changes scroll the list this far
    /// below the top edge.
    pub header_offset: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            mobile_breakpoint: 768,
            header_offset: 64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    pub visibility_threshold: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
        }
    }
}

/// Thumbnail path convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Web path of the thumbnail directory.
    pub dir: String,
    pub primary_extension: String,
    /// Tried once when the primary image fails to load.
    pub fallback_extension: String,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            dir: "/thumbnails".to_string(),
            primary_extension: "jpg".to_string(),
            fallback_extension: "png".to_string(),
        }
    }
}

/// Hand-curated title precedence, one list per track.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrderingConfig {
    pub projects: Vec<String>,
    pub reels: Vec<String>,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, arrays included.
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

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
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

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(
        page_size = config.gallery.page_size,
        breakpoint = config.gallery.mobile_breakpoint,
        "config loaded"
    );
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Reelfolio Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at content/config.toml. Only the keys you want to change
# are needed. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site text
# ---------------------------------------------------------------------------
[site]
title = "Portfolio"
headline = "Video Editor & Color Grader"
tagline = "Transforming visions into cinematic reality"

# ---------------------------------------------------------------------------
# Project grid
# ---------------------------------------------------------------------------
[gallery]
# Records per page when the grid is paginated (mobile viewports).
page_size = 6

# Viewport widths (px) below this value get the paginated grid.
mobile_breakpoint = 768

# Height (px) of the fixed header. Changing page scrolls the list to sit
# just below it.
header_offset = 64

# ---------------------------------------------------------------------------
# Carousels (reels, color groups)
# ---------------------------------------------------------------------------
[carousel]
# Fraction of a strip that must be on screen before it snaps back to its
# first card. Must be in (0, 1].
visibility_threshold = 0.1

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Records without an explicit thumbnail use {dir}/{title}.{extension}.
dir = "/thumbnails"
primary_extension = "jpg"

# Tried once if the primary image fails. Must differ from the primary.
fallback_extension = "png"

# ---------------------------------------------------------------------------
# Display order
# ---------------------------------------------------------------------------
[ordering]
# Titles listed here come first, in this order. Everything else follows in
# catalog order. Matching is exact and case-sensitive.
projects = []
reels = []
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.gallery.page_size, 6);
        assert_eq!(config.gallery.mobile_breakpoint, 768);
        assert_eq!(config.carousel.visibility_threshold, 0.1);
        assert_eq!(config.thumbnails.dir, "/thumbnails");
        assert!(config.ordering.projects.is_empty());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[gallery]
page_size = 4
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.gallery.page_size, 4);
        // Unspecified values use defaults
        assert_eq!(config.gallery.header_offset, 64);
        assert_eq!(config.site.title, "Portfolio");
    }

    #[test]
    fn parse_ordering_lists() {
        let toml = r#"
[ordering]
projects = ["Tempto", "BZAAT"]
reels = ["Reel B"]
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.ordering.projects, vec!["Tempto", "BZAAT"]);
        assert_eq!(config.ordering.reels, vec!["Reel B"]);
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.gallery.page_size, 6);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[site]
title = "Shay Cohen"

[thumbnails]
primary_extension = "webp"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Shay Cohen");
        assert_eq!(config.site.headline, "Video Editor & Color Grader");
        assert_eq!(config.thumbnails.primary_extension, "webp");
        assert_eq!(config.thumbnails.fallback_extension, "png");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[gallery\npage_size = ").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[gallery]
page_size = 6
header_offset = 64
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[gallery]
page_size = 3
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let gallery = merged.get("gallery").unwrap();
        assert_eq!(gallery.get("page_size").unwrap().as_integer(), Some(3));
        assert_eq!(gallery.get("header_offset").unwrap().as_integer(), Some(64));
    }

    #[test]
    fn merge_toml_replaces_arrays() {
        let base: toml::Value = toml::from_str(r#"projects = ["A", "B", "C"]"#).unwrap();
        let overlay: toml::Value = toml::from_str(r#"projects = ["Z"]"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("projects").unwrap().as_array().unwrap().len(), 1);
    }

    #[test]
    fn merge_toml_preserves_base_keys() {
        let base: toml::Value = toml::from_str(
            r#"
a = 1
b = 2
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(r#"a = 10"#).unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(10));
        assert_eq!(merged.get("b").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Unknown key rejection tests
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[gallery]
pagesize = 4
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let toml_str = r#"
[galery]
page_size = 4
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[ordering]
project = ["Tempto"]
"#,
        )
        .unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_page_size() {
        let mut config = SiteConfig::default();
        config.gallery.page_size = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_threshold_range() {
        let mut config = SiteConfig::default();
        config.carousel.visibility_threshold = 1.0;
        assert!(config.validate().is_ok());
        config.carousel.visibility_threshold = 0.0;
        assert!(config.validate().is_err());
        config.carousel.visibility_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_same_extensions_rejected() {
        let mut config = SiteConfig::default();
        config.thumbnails.fallback_extension = ".jpg".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("fallback_extension"));
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let base = stock_defaults_value();
        let overlay: toml::Value = toml::from_str(
            r#"
[gallery]
page_size = 0
"#,
        )
        .unwrap();
        let result = resolve_config(base, Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // load_raw_config / stock config tests
    // =========================================================================

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.site.tagline, defaults.site.tagline);
        assert_eq!(config.gallery.page_size, defaults.gallery.page_size);
        assert_eq!(config.gallery.mobile_breakpoint, 768);
        assert_eq!(config.carousel.visibility_threshold, 0.1);
        assert_eq!(config.thumbnails.fallback_extension, "png");
        assert!(config.ordering.reels.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[site]", "[gallery]", "[carousel]", "[thumbnails]", "[ordering]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        for key in ["site", "gallery", "carousel", "thumbnails", "ordering"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
