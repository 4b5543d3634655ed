//! Per-feature catalog of distinct training values.

use std::collections::{BTreeMap, BTreeSet};

use crate::feature::Sample;

/// Maps each feature name to the distinct values observed for it.
///
/// Names iterate in lexicographic order and each value set in ascending
/// order; tree construction selects features and split values by position in
/// these orderings. Individual samples are not kept, only the marginal value
/// set of every feature.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    values: BTreeMap<String, BTreeSet<u64>>,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one value for `name`, creating the entry if needed.
    pub fn insert(&mut self, name: &str, value: u64) {
        match self.values.get_mut(name) {
            Some(set) => {
                set.insert(value);
            }
            None => {
                self.values.insert(name.to_string(), BTreeSet::from([value]));
            }
        }
    }

    /// Record every feature of `sample`.
    pub fn absorb(&mut self, sample: &Sample) {
        for feature in sample.features() {
            self.insert(feature.name(), feature.value());
        }
    }

    /// Return the value set for `name`, if the feature has been seen.
    #[must_use]
    pub fn values(&self, name: &str) -> Option<&BTreeSet<u64>> {
        self.values.get(name)
    }

    /// Return `true` if `value` was observed for `name`.
    #[must_use]
    pub fn contains(&self, name: &str, value: u64) -> bool {
        self.values.get(name).is_some_and(|set| set.contains(&value))
    }

    /// Iterate over feature names in order.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Return the number of distinct feature names.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.values.len()
    }

    /// Return `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Materialize every value set as an ascending slice.
    pub(crate) fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            entries: self
                .values
                .iter()
                .map(|(name, set)| (name.as_str(), set.iter().copied().collect()))
                .collect(),
        }
    }
}

/// Sorted copy of a catalog that construction views borrow from.
#[derive(Debug)]
pub(crate) struct Snapshot<'a> {
    entries: Vec<(&'a str, Vec<u64>)>,
}

impl Snapshot<'_> {
    /// View covering every value of every feature.
    pub(crate) fn view(&self) -> CatalogView<'_> {
        CatalogView {
            entries: self
                .entries
                .iter()
                .map(|(name, values)| (*name, values.as_slice()))
                .collect(),
        }
    }
}

/// The shrinking catalog seen by one recursion step of tree construction.
///
/// A split only ever keeps the values strictly below or strictly above the
/// chosen one, so every entry stays a contiguous, ascending sub-slice of the
/// snapshot.
#[derive(Debug, Clone)]
pub(crate) struct CatalogView<'a> {
    entries: Vec<(&'a str, &'a [u64])>,
}

impl<'a> CatalogView<'a> {
    pub(crate) fn n_features(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entry(&self, index: usize) -> (&'a str, &'a [u64]) {
        self.entries[index]
    }

    /// Copy of this view with entry `index` narrowed to `values`.
    pub(crate) fn with_values(&self, index: usize, values: &'a [u64]) -> Self {
        let mut next = self.clone();
        next.entries[index].1 = values;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::feature::Sample;

    #[test]
    fn duplicate_values_collapse() {
        let mut c = Catalog::new();
        c.absorb(&Sample::new("a").with_feature("a", 5));
        c.absorb(&Sample::new("b").with_feature("a", 5));
        assert_eq!(c.values("a").map(|s| s.len()), Some(1));
    }

    #[test]
    fn distinct_values_accumulate() {
        let mut c = Catalog::new();
        c.absorb(&Sample::new("a").with_feature("a", 5));
        c.absorb(&Sample::new("b").with_feature("a", 7));
        c.absorb(&Sample::new("c").with_feature("a", 7));
        assert_eq!(c.values("a").map(|s| s.len()), Some(2));
        assert!(c.contains("a", 5));
        assert!(c.contains("a", 7));
        assert!(!c.contains("a", 6));
    }

    #[test]
    fn names_are_ordered() {
        let mut c = Catalog::new();
        c.absorb(
            &Sample::new("s")
                .with_feature("zeta", 1)
                .with_feature("alpha", 2)
                .with_feature("mid", 3),
        );
        let names: Vec<&str> = c.feature_names().collect();
        assert_eq!(names, ["alpha", "mid", "zeta"]);
        assert_eq!(c.n_features(), 3);
    }

    #[test]
    fn view_values_are_ascending() {
        let mut c = Catalog::new();
        for v in [9, 2, 5, 2] {
            c.insert("x", v);
        }
        c.insert("y", 1);
        let snapshot = c.snapshot();
        let view = snapshot.view();
        assert_eq!(view.n_features(), 2);
        assert_eq!(view.entry(0), ("x", &[2, 5, 9][..]));
    }

    #[test]
    fn with_values_leaves_other_entries() {
        let mut c = Catalog::new();
        c.insert("x", 1);
        c.insert("x", 2);
        c.insert("y", 3);
        let snapshot = c.snapshot();
        let view = snapshot.view();
        let shrunk = view.with_values(0, &[]);
        assert_eq!(shrunk.entry(0).1, &[] as &[u64]);
        assert_eq!(shrunk.entry(1), ("y", &[3][..]));
        assert_eq!(view.entry(0).1, &[1, 2]);
    }

    #[test]
    fn empty_catalog() {
        let c = Catalog::new();
        assert!(c.is_empty());
        assert!(c.values("x").is_none());
    }
}
