//! Role filtering over the standard track.
//!
//! Filtering is a pure projection: it never touches records and never
//! reorders them, so applying it to an already-sorted slice yields a sorted
//! result. Reels are not part of the input and are never role-filtered.

use crate::types::{Record, Role, UnknownRole};
use std::fmt;
use std::str::FromStr;

/// The active filter of the project grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RoleFilter {
    #[default]
    All,
    Role(Role),
}

impl RoleFilter {
    /// `All` followed by every role, the order filter buttons appear in.
    pub fn options() -> impl Iterator<Item = RoleFilter> {
        std::iter::once(RoleFilter::All).chain(Role::ALL.into_iter().map(RoleFilter::Role))
    }

    pub fn matches(self, record: &Record) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Role(role) => record.has_role(role),
        }
    }

    /// Directory name used for this filter in the generated site.
    pub fn slug(self) -> &'static str {
        match self {
            RoleFilter::All => "all",
            RoleFilter::Role(role) => role.slug(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RoleFilter::All => "All",
            RoleFilter::Role(role) => role.label(),
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for RoleFilter {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(RoleFilter::All);
        }
        s.parse().map(RoleFilter::Role)
    }
}

/// Records of `standard` matching `filter`, in input order.
pub fn apply<'a>(standard: &[&'a Record], filter: RoleFilter) -> Vec<&'a Record> {
    standard
        .iter()
        .copied()
        .filter(|r| filter.matches(r))
        .collect()
}

/// How many records each filter option would show, in [`RoleFilter::options`] order.
pub fn counts(standard: &[&Record]) -> Vec<(RoleFilter, usize)> {
    RoleFilter::options()
        .map(|f| (f, standard.iter().filter(|r| f.matches(r)).count()))
        .collect()
}
