//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each entity (project,
//! reel, color group) leads with its display position and title; links and
//! derived paths follow as indented context lines. The listing doubles as a
//! content inventory in the order visitors will see it.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Projects
//! 001 Tempto (video-editing, directing)
//!     Video: https://youtu.be/abc → https://www.youtube.com/embed/abc
//!     Thumbnail: /thumbnails/Tempto.jpg
//!
//! Reels
//! 001 Reel A (directing)
//!     ...
//!
//! Color Groups
//! 001 Neon Nights (3 stills)
//!     Cover: /color/neon/cover.jpg
//!
//! Filters
//!     all: 9
//!     color-grading: 5
//!
//! Catalog version: 3f2a9c1e04b7
//! ```
//!
//! ## Build
//!
//! ```text
//! index.html
//! all/ (3 pages)
//! watch/ (11 pages)
//!
//! Thumbnails: 4 files copied
//! Generated 31 pages → dist
//! ```
//!
//! ## Page
//!
//! ```text
//! Filter: color-grading (5 projects)
//! Viewport: mobile
//! 001 Psycho Path
//! 002 On My Dead Body
//! Pages: « ‹ 1 [2] 3 › »
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::SiteConfig;
use crate::embed::canonical_embed_url;
use crate::filter;
use crate::generate::GenerateSummary;
use crate::paginate::{PageControls, PageItem};
use crate::state::{Gallery, GalleryView, ViewportClass};
use crate::thumbnail::Thumbnail;
use crate::types::Record;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a record header: position, title and its roles.
///
/// ```text
/// 003 BZAAT (color-grading, video-editing)
/// ```
fn record_header(index: usize, record: &Record) -> String {
    let roles: Vec<&str> = record.roles.iter().map(|r| r.slug()).collect();
    format!("{} {} ({})", format_index(index), record.title, roles.join(", "))
}

/// Video line: the stored link, plus its embed form when that differs.
fn video_line(record: &Record) -> String {
    let embed = canonical_embed_url(&record.media_reference);
    if embed == record.media_reference {
        format!("{}Video: {}", indent(1), record.media_reference)
    } else {
        format!("{}Video: {} → {}", indent(1), record.media_reference, embed)
    }
}

fn record_lines(lines: &mut Vec<String>, records: &[&Record], config: &SiteConfig) {
    for (i, record) in records.iter().enumerate() {
        lines.push(record_header(i + 1, record));
        lines.push(video_line(record));
        let thumb = Thumbnail::for_record(record, &config.thumbnails);
        if let Some(src) = thumb.src() {
            lines.push(format!("{}Thumbnail: {}", indent(1), src));
        }
    }
}

/// Page strip as text: `« ‹ 1 … 4 [5] 6 … 10 › »`, disabled arrows dropped.
fn controls_line(controls: &PageControls) -> String {
    let mut parts: Vec<String> = Vec::new();
    if controls.prev_enabled {
        parts.push("«".into());
        parts.push("‹".into());
    }
    for item in &controls.items {
        parts.push(match item {
            PageItem::Page {
                number,
                current: true,
            } => format!("[{number}]"),
            PageItem::Page { number, .. } => number.to_string(),
            PageItem::Ellipsis => "…".into(),
        });
    }
    if controls.next_enabled {
        parts.push("›".into());
        parts.push("»".into());
    }
    parts.join(" ")
}

// ============================================================================
// check
// ============================================================================

/// Format the catalog inventory in display order.
pub fn format_check_output(gallery: &Gallery, config: &SiteConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let projects = gallery.projects();
    let reels = gallery.reels();
    let groups = gallery.catalog().color_groups();

    lines.push("Projects".to_string());
    record_lines(&mut lines, &projects, config);

    if !reels.is_empty() {
        lines.push(String::new());
        lines.push("Reels".to_string());
        record_lines(&mut lines, &reels, config);
    }

    if !groups.is_empty() {
        lines.push(String::new());
        lines.push("Color Groups".to_string());
        for (i, group) in groups.iter().enumerate() {
            lines.push(format!(
                "{} {} ({} stills)",
                format_index(i + 1),
                group.title,
                group.images.len()
            ));
            lines.push(format!("{}Cover: {}", indent(1), group.cover));
        }
    }

    lines.push(String::new());
    lines.push("Filters".to_string());
    for (filter, count) in filter::counts(&projects) {
        lines.push(format!("{}{}: {}", indent(1), filter.slug(), count));
    }

    lines.push(String::new());
    let digest = gallery.catalog().digest();
    lines.push(format!("Catalog version: {}", &digest[..12]));
    lines
}

pub fn print_check_output(gallery: &Gallery, config: &SiteConfig) {
    for line in format_check_output(gallery, config) {
        println!("{}", line);
    }
}

// ============================================================================
// build
// ============================================================================

/// Format the generated file tree, one line per top-level entry.
pub fn format_generate_output(summary: &GenerateSummary) -> Vec<String> {
    let mut lines = Vec::new();
    let mut dirs: Vec<(&str, usize)> = Vec::new();

    for page in &summary.pages {
        match page.split_once('/') {
            Some((dir, _)) => match dirs.iter_mut().find(|(d, _)| *d == dir) {
                Some((_, count)) => *count += 1,
                None => dirs.push((dir, 1)),
            },
            None => lines.push(page.clone()),
        }
    }
    for (dir, count) in dirs {
        let noun = if count == 1 { "page" } else { "pages" };
        lines.push(format!("{}/ ({} {})", dir, count, noun));
    }

    lines.push(String::new());
    if summary.thumbnails > 0 {
        lines.push(format!("Thumbnails: {} files copied", summary.thumbnails));
    }
    lines.push(format!(
        "Generated {} pages → {}",
        summary.pages.len(),
        summary.output.display()
    ));
    lines
}

pub fn print_generate_output(summary: &GenerateSummary) {
    for line in format_generate_output(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// page
// ============================================================================

/// Format one engine view: the visible projects and the page strip.
pub fn format_page_view(view: &GalleryView) -> Vec<String> {
    let mut lines = Vec::new();
    let noun = if view.filtered_count == 1 {
        "project"
    } else {
        "projects"
    };
    lines.push(format!(
        "Filter: {} ({} {})",
        view.filter.slug(),
        view.filtered_count,
        noun
    ));
    lines.push(format!(
        "Viewport: {}",
        match view.viewport {
            ViewportClass::Mobile => "mobile",
            ViewportClass::Desktop => "desktop",
        }
    ));
    for (i, record) in view.visible.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), record.title));
    }
    match &view.controls {
        Some(controls) => lines.push(format!("Pages: {}", controls_line(controls))),
        None if view.viewport == ViewportClass::Mobile => lines.push("Pages: none".to_string()),
        None => {}
    }
    lines
}

pub fn print_page_view(view: &GalleryView) {
    for line in format_page_view(view) {
        println!("{}", line);
    }
}
