//! Manual display precedence for catalog records.
//!
//! An [`OrderingList`] is a hand-curated list of titles. A record's sort key is
//! the position of its title in the list; titles that are not listed get
//! [`UNLISTED`] and sort after everything listed. Sorting is stable, so
//! unlisted records keep their catalog order.
//!
//! The standard grid and the reel carousel each have their own list
//! ([`Ordering::projects`] and [`Ordering::reels`]).

use crate::types::Record;
use std::collections::HashMap;

/// Sort key for titles missing from an ordering list.
pub const UNLISTED: usize = usize::MAX;

/// A named precedence list of titles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderingList {
    positions: HashMap<String, usize>,
    len: usize,
}

impl OrderingList {
    /// Build a list. If a title appears twice, its first position wins.
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positions = HashMap::new();
        let mut len = 0;
        for (idx, title) in titles.into_iter().enumerate() {
            positions.entry(title.into()).or_insert(idx);
            len = idx + 1;
        }
        Self { positions, len }
    }

    /// Index of `title` in the list, or [`UNLISTED`].
    pub fn sort_key(&self, title: &str) -> usize {
        self.positions.get(title).copied().unwrap_or(UNLISTED)
    }

    pub fn contains(&self, title: &str) -> bool {
        self.positions.contains_key(title)
    }

    /// Number of entries the list was built from (duplicates included).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Sort records by this list. Stable: equal keys keep input order.
    pub fn sort<'a, I>(&self, records: I) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut sorted: Vec<&Record> = records.into_iter().collect();
        sorted.sort_by_key(|r| self.sort_key(&r.title));
        sorted
    }
}

/// The two precedence lists, one per presentation track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ordering {
    pub projects: OrderingList,
    pub reels: OrderingList,
}

impl Ordering {
    pub fn from_config(config: &crate::config::OrderingConfig) -> Self {
        Self {
            projects: OrderingList::new(config.projects.iter().cloned()),
            reels: OrderingList::new(config.reels.iter().cloned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use crate::types::Role;

    fn titles<'a>(records: &[&'a Record]) -> Vec<&'a str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn sort_key_is_list_index() {
        let list = OrderingList::new(["Tempto", "BZAAT", "Dj Nati"]);
        assert_eq!(list.sort_key("Tempto"), 0);
        assert_eq!(list.sort_key("Dj Nati"), 2);
        assert_eq!(list.sort_key("Nowhere"), UNLISTED);
    }

    #[test]
    fn sort_key_is_case_sensitive() {
        let list = OrderingList::new(["Tempto"]);
        assert_eq!(list.sort_key("tempto"), UNLISTED);
    }

    #[test]
    fn duplicate_title_keeps_first_position() {
        let list = OrderingList::new(["A", "B", "A"]);
        assert_eq!(list.sort_key("A"), 0);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn listed_records_follow_list_order() {
        let records = vec![
            record(1, "A", &[Role::Directing]),
            record(2, "B", &[Role::Directing]),
            record(3, "C", &[Role::Directing]),
        ];
        let list = OrderingList::new(["C", "A", "B"]);
        assert_eq!(titles(&list.sort(&records)), vec!["C", "A", "B"]);
    }

    #[test]
    fn unlisted_records_go_last_in_catalog_order() {
        let records = vec![
            record(1, "X", &[Role::Directing]),
            record(2, "Listed2", &[Role::Directing]),
            record(3, "Y", &[Role::Directing]),
            record(4, "Listed1", &[Role::Directing]),
            record(5, "Z", &[Role::Directing]),
        ];
        let list = OrderingList::new(["Listed1", "Listed2"]);
        assert_eq!(
            titles(&list.sort(&records)),
            vec!["Listed1", "Listed2", "X", "Y", "Z"]
        );
    }

    #[test]
    fn empty_list_preserves_catalog_order() {
        let records = vec![
            record(1, "B", &[Role::Directing]),
            record(2, "A", &[Role::Directing]),
        ];
        let list = OrderingList::default();
        assert!(list.is_empty());
        assert_eq!(titles(&list.sort(&records)), vec!["B", "A"]);
    }

    #[test]
    fn tracks_are_ordered_independently() {
        let catalog = sample_catalog();
        let ordering = Ordering {
            projects: OrderingList::new(["Dj Nati"]),
            reels: OrderingList::new(["Reel B"]),
        };
        let projects = ordering.projects.sort(catalog.standard());
        let reels = ordering.reels.sort(catalog.reels());
        assert_eq!(projects[0].title, "Dj Nati");
        assert_eq!(titles(&reels), vec!["Reel B", "Reel A"]);
    }
}
