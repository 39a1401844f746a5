//! Shared types used across the engine and the site generator.
//!
//! These are the validated, load-time forms of catalog entries. Raw JSON is
//! decoded by [`crate::catalog`], which enforces the invariants documented
//! here before any [`Record`] or [`ColorGroup`] exists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A category tag from the fixed role vocabulary.
///
/// A record may carry several roles at once (a project can be both edited
/// and graded by the same person).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    ColorGrading,
    VideoEditing,
    Directing,
    Production,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 4] = [
        Role::ColorGrading,
        Role::VideoEditing,
        Role::Directing,
        Role::Production,
    ];

    /// URL-safe identifier, also used as the filter directory name.
    pub fn slug(self) -> &'static str {
        match self {
            Role::ColorGrading => "color-grading",
            Role::VideoEditing => "video-editing",
            Role::Directing => "directing",
            Role::Production => "production",
        }
    }

    /// Human-readable label for badges and filter buttons.
    pub fn label(self) -> &'static str {
        match self {
            Role::ColorGrading => "Color Grading",
            Role::VideoEditing => "Video Editing",
            Role::Directing => "Directing",
            Role::Production => "Production",
        }
    }

    /// Lenient lookup: accepts `color-grading`, `colorGrading`, `color_grading`
    /// and `Color Grading` alike.
    pub fn parse(value: &str) -> Option<Role> {
        let folded: String = value
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        match folded.as_str() {
            "colorgrading" | "colourgrading" => Some(Role::ColorGrading),
            "videoediting" | "editing" => Some(Role::VideoEditing),
            "directing" | "director" => Some(Role::Directing),
            "production" | "producer" => Some(Role::Production),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Returned when a string names no role in the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

/// Which presentation track a record belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Grid (desktop) or paginated list (mobile).
    #[default]
    Standard,
    /// Horizontal carousel; never role-filtered.
    Reel,
}

/// A project or media item.
///
/// Invariants (enforced by [`crate::catalog::Catalog`]): `id` is unique within
/// the catalog and `roles` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u32,
    /// Display name; also the thumbnail and ordering lookup key.
    pub title: String,
    pub secondary_title: String,
    /// Externally hosted video, as written in the catalog.
    pub media_reference: String,
    pub roles: BTreeSet<Role>,
    pub format: Format,
    /// Explicit thumbnail path overriding the title convention.
    pub thumbnail: Option<String>,
}

impl Record {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_reel(&self) -> bool {
        self.format == Format::Reel
    }
}

/// A named set of related stills shown as one card in the color gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorGroup {
    pub title: String,
    /// Image shown on the carousel card.
    pub cover: String,
    /// Ordered stills; never empty once loaded.
    pub images: Vec<String>,
}

impl ColorGroup {
    /// URL slug derived from the title: lowercase ASCII alphanumerics with
    /// runs of anything else collapsed to a single dash.
    pub fn slug(&self) -> String {
        let mut slug = String::with_capacity(self.title.len());
        let mut pending_dash = false;
        for c in self.title.chars() {
            if c.is_ascii_alphanumeric() {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c.to_ascii_lowercase());
            } else {
                pending_dash = true;
            }
        }
        slug
    }

    /// Directory name under `/color/` for the group at `index`; titles with
    /// no usable characters fall back to their 1-based position.
    pub fn slug_at(&self, index: usize) -> String {
        let slug = self.slug();
        if slug.is_empty() {
            format!("group-{}", index + 1)
        } else {
            slug
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_accepts_legacy_spellings() {
        assert_eq!(Role::parse("colorGrading"), Some(Role::ColorGrading));
        assert_eq!(Role::parse("color-grading"), Some(Role::ColorGrading));
        assert_eq!(Role::parse("Video Editing"), Some(Role::VideoEditing));
        assert_eq!(Role::parse("video_editing"), Some(Role::VideoEditing));
        assert_eq!(Role::parse("Directing"), Some(Role::Directing));
        assert_eq!(Role::parse("both"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn role_from_str_reports_input() {
        let err = "sound-design".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "unknown role 'sound-design'");
    }

    #[test]
    fn role_slug_roundtrips_through_parse() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.slug()), Some(role));
        }
    }

    #[test]
    fn format_defaults_to_standard() {
        assert_eq!(Format::default(), Format::Standard);
    }

    #[test]
    fn format_deserializes_lowercase() {
        let f: Format = serde_json::from_str(r#""reel""#).unwrap();
        assert_eq!(f, Format::Reel);
    }

    #[test]
    fn color_group_slug_collapses_separators() {
        let group = ColorGroup {
            title: "  Night / Neon -- Tel Aviv ".to_string(),
            cover: "c.jpg".to_string(),
            images: vec!["a.jpg".to_string()],
        };
        assert_eq!(group.slug(), "night-neon-tel-aviv");
    }

    #[test]
    fn color_group_slug_drops_non_ascii() {
        let group = ColorGroup {
            title: "Été 2024".to_string(),
            cover: "c.jpg".to_string(),
            images: vec!["a.jpg".to_string()],
        };
        assert_eq!(group.slug(), "t-2024");
    }

    #[test]
    fn color_group_slug_at_falls_back_to_position() {
        let group = ColorGroup {
            title: "***".to_string(),
            cover: "c.jpg".to_string(),
            images: vec!["a.jpg".to_string()],
        };
        assert_eq!(group.slug_at(1), "group-2");
        let named = ColorGroup {
            title: "Neon".to_string(),
            ..group
        };
        assert_eq!(named.slug_at(1), "neon");
    }
}
