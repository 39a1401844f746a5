//! Shared test utilities for the reelfolio test suite.
//!
//! Provides record builders, a sample catalog with overlapping roles, lookup
//! helpers that panic with useful messages, and a scripted [`Scroller`] for
//! driving carousels without a browser.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = sample_catalog();
//! let bzaat = find_record(&catalog, 3);
//! assert!(bzaat.has_role(Role::ColorGrading));
//!
//! let mut scroller = FakeScroller::with_cards(300.0, 16.0);
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

use crate::carousel::{ScrollBehavior, Scroller};
use crate::catalog::Catalog;
use crate::types::{ColorGroup, Format, Record, Role};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
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

// =========================================================================
// Builders
// =========================================================================

/// Standard-format record with a short-link video and no thumbnail override.
pub fn record(id: u32, title: &str, roles: &[Role]) -> Record {
    Record {
        id,
        title: title.to_string(),
        secondary_title: title.to_uppercase(),
        media_reference: format!("https://youtu.be/vid{id}"),
        roles: roles.iter().copied().collect::<BTreeSet<_>>(),
        format: Format::Standard,
        thumbnail: None,
    }
}

pub fn reel(id: u32, title: &str, roles: &[Role]) -> Record {
    Record {
        format: Format::Reel,
        ..record(id, title, roles)
    }
}

/// Nine standard projects, two reels, two color groups.
///
/// Role counts on the standard track: grading 5, editing 7, directing 1,
/// production 1.
pub fn sample_catalog() -> Catalog {
    use Role::*;
    let records = vec![
        record(1, "Psycho Path", &[ColorGrading]),
        record(2, "On My Dead Body", &[ColorGrading]),
        record(3, "BZAAT", &[ColorGrading, VideoEditing]),
        record(4, "Dj Nati", &[ColorGrading, VideoEditing]),
        record(5, "Shava Beshava", &[VideoEditing]),
        record(6, "Ma Mere", &[VideoEditing]),
        record(7, "Technoso", &[ColorGrading, VideoEditing]),
        record(8, "Masterclass", &[VideoEditing, Production]),
        record(9, "Tempto", &[VideoEditing, Directing]),
        reel(10, "Reel A", &[Directing]),
        reel(11, "Reel B", &[VideoEditing]),
    ];
    let groups = vec![
        ColorGroup {
            title: "Neon Nights".to_string(),
            cover: "/color/neon/cover.jpg".to_string(),
            images: (1..=3).map(|n| format!("/color/neon/{n}.jpg")).collect(),
        },
        ColorGroup {
            title: "Desert".to_string(),
            cover: "/color/desert/cover.jpg".to_string(),
            images: vec!["/color/desert/1.jpg".to_string()],
        },
    ];
    Catalog::new(records, groups).unwrap()
}

// =========================================================================
// Lookup helpers
// =========================================================================

/// Find a record by id. Panics with the available ids if not found.
pub fn find_record(catalog: &Catalog, id: u32) -> &Record {
    catalog.find(id).unwrap_or_else(|| {
        let ids: Vec<u32> = catalog.records().iter().map(|r| r.id).collect();
        panic!("record {id} not found. Available: {ids:?}")
    })
}

// =========================================================================
// Scroller double
// =========================================================================

/// Records every call a carousel makes against its scroll container.
#[derive(Debug, Clone, Default)]
pub struct FakeScroller {
    pub offset: f64,
    pub snap_enabled: bool,
    pub scrolled_by: Vec<(f64, ScrollBehavior)>,
    pub card_width: Option<f64>,
    pub gap: f64,
}

impl FakeScroller {
    /// Container with cards of `width` separated by `gap`, snap on.
    pub fn with_cards(width: f64, gap: f64) -> Self {
        Self {
            snap_enabled: true,
            card_width: Some(width),
            gap,
            ..Self::default()
        }
    }

    /// Container with no cards at all.
    pub fn empty() -> Self {
        Self {
            snap_enabled: true,
            ..Self::default()
        }
    }
}

impl Scroller for FakeScroller {
    fn scroll_left(&self) -> f64 {
        self.offset
    }

    fn set_scroll_left(&mut self, offset: f64) {
        self.offset = offset;
    }

    fn set_snap_enabled(&mut self, enabled: bool) {
        self.snap_enabled = enabled;
    }

    fn scroll_by(&mut self, delta: f64, behavior: ScrollBehavior) {
        self.scrolled_by.push((delta, behavior));
        self.offset += delta;
    }

    fn first_card_width(&self) -> Option<f64> {
        self.card_width
    }

    fn card_gap(&self) -> f64 {
        self.gap
    }
}
