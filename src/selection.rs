use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::SiteRecord;

/// Site ids currently included in the comparison chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    /// Every known site starts out selected.
    pub fn all(sites: &[SiteRecord]) -> Self {
        Self::from_ids(sites.iter().map(|s| s.id.as_str()))
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns a copy with `id` flipped.
    pub fn toggle(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.toggle_in_place(id);
        next
    }

    /// Flips `id` and reports whether it is selected afterwards.
    pub fn toggle_in_place(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn insert(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    pub fn remove(&mut self, id: &str) {
        self.ids.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dev_tools::mock_data::sample_sites;

    #[test]
    fn test_initial_selection_contains_every_site() {
        let sites = sample_sites();
        let selected = SelectionSet::all(&sites);
        assert_eq!(selected.len(), sites.len());
        assert!(sites.iter().all(|s| selected.contains(&s.id)));
    }

    #[test]
    fn test_toggle_twice_is_noop() {
        let start = SelectionSet::from_ids(["1", "3"]);
        for id in ["1", "2", "3", "unknown"] {
            assert_eq!(start.toggle(id).toggle(id), start);
        }
        assert_eq!(SelectionSet::default().toggle("x").toggle("x"), SelectionSet::default());
    }

    #[test]
    fn test_toggle_leaves_other_members() {
        let start = SelectionSet::from_ids(["1", "2", "3"]);
        let next = start.toggle("2");
        assert!(!next.contains("2"));
        assert!(next.contains("1") && next.contains("3"));

        let back = next.toggle("2");
        assert!(back.contains("2"));
        assert_eq!(back.len(), 3);
    }

    #[test]
    fn test_toggle_in_place_reports_state() {
        let mut selection = SelectionSet::from_ids(["1"]);
        assert!(!selection.toggle_in_place("1"));
        assert!(selection.toggle_in_place("1"));
        assert!(selection.toggle_in_place("9"));
        assert_eq!(selection, SelectionSet::from_ids(["1", "9"]));
    }

    #[test]
    fn test_serializes_as_sorted_array() {
        let selection = SelectionSet::from_ids(["3", "1"]);
        assert_eq!(serde_json::to_string(&selection).unwrap(), r#"["1","3"]"#);
    }
}
