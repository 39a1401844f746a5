//! Thumbnail resolution.
//!
//! Records without an explicit `thumbnail` use a path derived from their
//! title: `{dir}/{escaped title}.{primary extension}`. If that image fails to
//! load, the secondary extension is tried exactly once; after that the card
//! simply shows no image.
//!
//! At build time an [`AssetIndex`] of the thumbnail directory lets the
//! generator settle the choice up front, so the browser only has to fall back
//! when the index could not tell.

use crate::config::ThumbnailsConfig;
use crate::types::Record;
use std::collections::HashSet;
use std::path::Path;
use url::Url;
use walkdir::WalkDir;

/// Where a thumbnail is in its fallback sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Primary,
    Fallback,
    /// Every candidate failed; nothing more will be tried.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    primary: String,
    fallback: Option<String>,
    stage: Stage,
}

impl Thumbnail {
    /// Explicit override if the record has one, otherwise the title convention.
    pub fn for_record(record: &Record, config: &ThumbnailsConfig) -> Self {
        match &record.thumbnail {
            Some(explicit) => Self {
                primary: explicit.clone(),
                fallback: None,
                stage: Stage::Primary,
            },
            None => Self {
                primary: conventional_path(&config.dir, &record.title, &config.primary_extension),
                fallback: Some(conventional_path(
                    &config.dir,
                    &record.title,
                    &config.fallback_extension,
                )),
                stage: Stage::Primary,
            },
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Source to display now, `None` once exhausted.
    pub fn src(&self) -> Option<&str> {
        match self.stage {
            Stage::Primary => Some(&self.primary),
            Stage::Fallback => self.fallback.as_deref(),
            Stage::Exhausted => None,
        }
    }

    /// The source still available if the current one fails.
    pub fn pending_fallback(&self) -> Option<&str> {
        match self.stage {
            Stage::Primary => self.fallback.as_deref(),
            _ => None,
        }
    }

    /// The current source failed to load. Returns the replacement source the
    /// first time, `None` on every later failure.
    pub fn on_load_error(&mut self) -> Option<&str> {
        self.stage = match (self.stage, &self.fallback) {
            (Stage::Primary, Some(_)) => Stage::Fallback,
            _ => Stage::Exhausted,
        };
        match self.stage {
            Stage::Fallback => self.fallback.as_deref(),
            _ => None,
        }
    }

    /// Pre-resolve against the files known to exist. An empty index leaves
    /// the choice to the browser.
    pub fn settle(&mut self, index: &AssetIndex) {
        if index.is_empty() || self.stage != Stage::Primary || index.contains(&self.primary) {
            return;
        }
        let fallback_exists = self
            .fallback
            .as_deref()
            .is_some_and(|fallback| index.contains(fallback));
        if fallback_exists {
            self.on_load_error();
        } else {
            tracing::warn!(path = %self.primary, "no thumbnail asset found");
        }
    }
}

/// `{dir}/{escaped title}.{ext}`.
pub fn conventional_path(dir: &str, title: &str, extension: &str) -> String {
    format!(
        "{}/{}.{}",
        dir.trim_end_matches('/'),
        escape_segment(title),
        extension.trim_start_matches('.')
    )
}

/// Percent-encode one path segment (spaces, `/`, `?`, `#`, `%`, non-ASCII...).
pub fn escape_segment(segment: &str) -> String {
    let Ok(mut url) = Url::parse("asset:/") else {
        return segment.to_string();
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().push(segment);
    }
    url.path().trim_start_matches('/').to_string()
}

/// Web paths of the files under a thumbnail directory.
#[derive(Debug, Clone, Default)]
pub struct AssetIndex {
    paths: HashSet<String>,
}

impl AssetIndex {
    /// Index every file below `root`, keyed as `{web_prefix}/{escaped/relative/path}`.
    /// A missing directory yields an empty index.
    pub fn scan(root: &Path, web_prefix: &str) -> Self {
        let prefix = web_prefix.trim_end_matches('/');
        let paths = WalkDir::new(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let rel = entry.path().strip_prefix(root).ok()?;
                let escaped: Vec<String> = rel
                    .components()
                    .map(|c| escape_segment(&c.as_os_str().to_string_lossy()))
                    .collect();
                Some(format!("{}/{}", prefix, escaped.join("/")))
            })
            .collect();
        Self { paths }
    }

    pub fn contains(&self, web_path: &str) -> bool {
        self.paths.contains(web_path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::Role;
    use std::fs;
    use tempfile::TempDir;

    fn config() -> ThumbnailsConfig {
        ThumbnailsConfig::default()
    }

    // =========================================================================
    // Path convention
    // =========================================================================

    #[test]
    fn escape_segment_encodes_spaces_and_slashes() {
        assert_eq!(escape_segment("Project 1"), "Project%201");
        assert_eq!(escape_segment("AC/DC"), "AC%2FDC");
        assert_eq!(escape_segment("50% off?"), "50%25%20off%3F");
        assert_eq!(escape_segment("Ma Mère"), "Ma%20M%C3%A8re");
    }

    #[test]
    fn conventional_path_uses_dir_and_extension() {
        assert_eq!(
            conventional_path("/thumbnails/", "Project 1", ".jpg"),
            "/thumbnails/Project%201.jpg"
        );
    }

    #[test]
    fn record_without_override_uses_title_convention() {
        let thumb = Thumbnail::for_record(&record(1, "Dj Nati", &[Role::Directing]), &config());
        assert_eq!(thumb.src(), Some("/thumbnails/Dj%20Nati.jpg"));
        assert_eq!(thumb.pending_fallback(), Some("/thumbnails/Dj%20Nati.png"));
    }

    #[test]
    fn explicit_override_has_no_fallback() {
        let mut r = record(1, "Dj Nati", &[Role::Directing]);
        r.thumbnail = Some("https://cdn.example/x.webp".to_string());
        let mut thumb = Thumbnail::for_record(&r, &config());
        assert_eq!(thumb.src(), Some("https://cdn.example/x.webp"));
        assert_eq!(thumb.pending_fallback(), None);
        assert_eq!(thumb.on_load_error(), None);
        assert_eq!(thumb.stage(), Stage::Exhausted);
    }

    // =========================================================================
    // Fallback sequence
    // =========================================================================

    #[test]
    fn fallback_is_tried_exactly_once() {
        let mut thumb = Thumbnail::for_record(&record(1, "BZAAT", &[Role::Directing]), &config());
        assert_eq!(thumb.on_load_error(), Some("/thumbnails/BZAAT.png"));
        assert_eq!(thumb.src(), Some("/thumbnails/BZAAT.png"));
        assert_eq!(thumb.on_load_error(), None);
        assert_eq!(thumb.on_load_error(), None);
        assert_eq!(thumb.src(), None);
        assert_eq!(thumb.stage(), Stage::Exhausted);
    }

    // =========================================================================
    // Asset index
    // =========================================================================

    #[test]
    fn asset_index_scans_nested_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("reels")).unwrap();
        fs::write(tmp.path().join("Project 1.jpg"), b"").unwrap();
        fs::write(tmp.path().join("reels/Reel A.png"), b"").unwrap();

        let index = AssetIndex::scan(tmp.path(), "/thumbnails/");
        assert_eq!(index.len(), 2);
        assert!(index.contains("/thumbnails/Project%201.jpg"));
        assert!(index.contains("/thumbnails/reels/Reel%20A.png"));
    }

    #[test]
    fn asset_index_of_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let index = AssetIndex::scan(&tmp.path().join("nope"), "/thumbnails");
        assert!(index.is_empty());
    }

    #[test]
    fn settle_switches_to_fallback_when_only_fallback_exists() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("BZAAT.png"), b"").unwrap();
        let index = AssetIndex::scan(tmp.path(), "/thumbnails");

        let mut thumb = Thumbnail::for_record(&record(3, "BZAAT", &[Role::Directing]), &config());
        thumb.settle(&index);
        assert_eq!(thumb.src(), Some("/thumbnails/BZAAT.png"));
        assert_eq!(thumb.pending_fallback(), None);
    }

    #[test]
    fn settle_keeps_primary_when_present() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("BZAAT.jpg"), b"").unwrap();
        fs::write(tmp.path().join("BZAAT.png"), b"").unwrap();
        let index = AssetIndex::scan(tmp.path(), "/thumbnails");

        let mut thumb = Thumbnail::for_record(&record(3, "BZAAT", &[Role::Directing]), &config());
        thumb.settle(&index);
        assert_eq!(thumb.stage(), Stage::Primary);
        assert_eq!(thumb.src(), Some("/thumbnails/BZAAT.jpg"));
    }

    #[test]
    fn settle_with_nothing_on_disk_leaves_browser_fallback() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Other.jpg"), b"").unwrap();
        let index = AssetIndex::scan(tmp.path(), "/thumbnails");

        let mut thumb = Thumbnail::for_record(&record(3, "BZAAT", &[Role::Directing]), &config());
        thumb.settle(&index);
        assert_eq!(thumb.stage(), Stage::Primary);
        assert_eq!(thumb.pending_fallback(), Some("/thumbnails/BZAAT.png"));
    }
}
