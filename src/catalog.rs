//! Catalog loading and validation.
//!
//! The catalog is the static record list every view is derived from. It is
//! read once from `catalog.json` and never mutated afterwards.
//!
//! ## File Format
//!
//! ```json
//! {
//!   "projects": [
//!     {
//!       "id": 1,
//!       "title": "Project 1",
//!       "secondaryTitle": "PSYCHO PATH",
//!       "mediaReference": "https://youtu.be/abc123",
//!       "roles": ["color-grading", "video-editing"],
//!       "format": "standard",
//!       "thumbnail": "/thumbnails/custom.jpg"
//!     }
//!   ],
//!   "colorGroups": [
//!     { "title": "Neon Nights", "cover": "/color/neon/cover.jpg",
//!       "images": ["/color/neon/1.jpg", "/color/neon/2.jpg"] }
//!   ]
//! }
//! ```
//!
//! `format` defaults to `standard` and `thumbnail` is optional. Older catalogs
//! spell the media field `videoUrl` and tag records with a single `type`
//! string (`"colorGrading"`, `"videoEditing"`, or `"both"`); both are accepted
//! and folded into the role set.
//!
//! ## Validation
//!
//! - Record ids are unique
//! - Every record has a non-empty title and at least one known role
//! - Every color group has at least one image

use crate::types::{ColorGroup, Format, Record, Role};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Duplicate record id {0}")]
    DuplicateId(u32),
    #[error("Record {0} has an empty title")]
    EmptyTitle(u32),
    #[error("Record {0} has no roles")]
    EmptyRoles(u32),
    #[error("Record {id} has unknown role '{value}'")]
    UnknownRole { id: u32, value: String },
    #[error("Color group '{0}' has no images")]
    EmptyColorGroup(String),
    #[error("Color groups '{first}' and '{second}' share the slug '{slug}'")]
    DuplicateGroupSlug {
        slug: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCatalog {
    #[serde(default)]
    projects: Vec<RawRecord>,
    #[serde(default)]
    color_groups: Vec<ColorGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRecord {
    id: u32,
    title: String,
    #[serde(default)]
    secondary_title: String,
    #[serde(alias = "videoUrl")]
    media_reference: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default, rename = "type")]
    legacy_type: Option<LegacyType>,
    #[serde(default)]
    format: Format,
    #[serde(default)]
    thumbnail: Option<String>,
}

/// The old single-tag field: a string (possibly `"both"`) or a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LegacyType {
    One(String),
    Many(Vec<String>),
}

impl RawRecord {
    fn into_record(self) -> Result<Record, CatalogError> {
        if self.title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle(self.id));
        }

        let mut tags = self.roles;
        match self.legacy_type {
            Some(LegacyType::One(tag)) if tag == "both" => {
                tags.push(Role::ColorGrading.slug().to_string());
                tags.push(Role::VideoEditing.slug().to_string());
            }
            Some(LegacyType::One(tag)) => tags.push(tag),
            Some(LegacyType::Many(more)) => tags.extend(more),
            None => {}
        }

        let mut roles = BTreeSet::new();
        for tag in tags {
            let role = Role::parse(&tag).ok_or(CatalogError::UnknownRole {
                id: self.id,
                value: tag,
            })?;
            roles.insert(role);
        }
        if roles.is_empty() {
            return Err(CatalogError::EmptyRoles(self.id));
        }

        Ok(Record {
            id: self.id,
            title: self.title,
            secondary_title: self.secondary_title,
            media_reference: self.media_reference,
            roles,
            format: self.format,
            thumbnail: self.thumbnail.filter(|t| !t.trim().is_empty()),
        })
    }
}

/// The immutable, validated record collection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<Record>,
    color_groups: Vec<ColorGroup>,
}

impl Catalog {
    /// Build a catalog from already-typed parts, enforcing every invariant.
    pub fn new(records: Vec<Record>, color_groups: Vec<ColorGroup>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(record.id) {
                return Err(CatalogError::DuplicateId(record.id));
            }
            if record.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle(record.id));
            }
            if record.roles.is_empty() {
                return Err(CatalogError::EmptyRoles(record.id));
            }
        }
        if let Some(group) = color_groups.iter().find(|g| g.images.is_empty()) {
            return Err(CatalogError::EmptyColorGroup(group.title.clone()));
        }
        // Each group owns one `/color/{slug}/` directory.
        let mut slugs: HashMap<String, String> = HashMap::new();
        for (idx, group) in color_groups.iter().enumerate() {
            let slug = group.slug_at(idx);
            if let Some(first) = slugs.insert(slug.clone(), group.title.clone()) {
                return Err(CatalogError::DuplicateGroupSlug {
                    slug,
                    first,
                    second: group.title.clone(),
                });
            }
        }
        Ok(Self {
            records,
            color_groups,
        })
    }

    /// Parse and validate catalog JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        let records = raw
            .projects
            .into_iter()
            .map(RawRecord::into_record)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(records, raw.color_groups)
    }

    /// Read `catalog.json` from a content directory.
    pub fn load(root: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(root.join("catalog.json"))?;
        let catalog = Self::from_json(&content)?;
        tracing::debug!(
            records = catalog.records.len(),
            color_groups = catalog.color_groups.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// All records in catalog (insertion) order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Records in the grid/page track, catalog order.
    pub fn standard(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| !r.is_reel())
    }

    /// Records in the reel carousel track, catalog order.
    pub fn reels(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(|r| r.is_reel())
    }

    pub fn color_groups(&self) -> &[ColorGroup] {
        &self.color_groups
    }

    pub fn find(&self, id: u32) -> Option<&Record> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.color_groups.is_empty()
    }

    /// SHA-256 over every field that affects rendering, as lowercase hex.
    ///
    /// Changes whenever a record or group changes; stable across loads of the
    /// same content.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for record in &self.records {
            hasher.update(record.id.to_le_bytes());
            for field in [
                record.title.as_str(),
                record.secondary_title.as_str(),
                record.media_reference.as_str(),
                record.thumbnail.as_deref().unwrap_or(""),
            ] {
                hasher.update(field.as_bytes());
                hasher.update([0]);
            }
            for role in &record.roles {
                hasher.update(role.slug().as_bytes());
            }
            hasher.update([record.is_reel() as u8]);
        }
        for group in &self.color_groups {
            hasher.update(group.title.as_bytes());
            hasher.update([0]);
            hasher.update(group.cover.as_bytes());
            for image in &group.images {
                hasher.update([0]);
                hasher.update(image.as_bytes());
            }
            hasher.update([1]);
        }
        format!("{:x}", hasher.finalize())
    }
}
