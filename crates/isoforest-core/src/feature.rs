//! Named numeric attributes and the observations built from them.

use std::fmt;

/// A named unsigned attribute of one observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Feature {
    name: String,
    value: u64,
}

impl Feature {
    /// Create a feature with the given name and value.
    pub fn new(name: impl Into<String>, value: u64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Return the feature name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the feature value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// One observation: a name plus its features in insertion order.
///
/// Feature names are not required to be unique. Lookups during scoring take
/// the first feature carrying the requested name.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Sample {
    name: String,
    features: Vec<Feature>,
}

impl Sample {
    /// Create an empty sample.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            features: Vec::new(),
        }
    }

    /// Append a single feature.
    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Append several features, keeping their order.
    pub fn add_features(&mut self, features: impl IntoIterator<Item = Feature>) {
        self.features.extend(features);
    }

    /// Builder-style variant of [`Sample::add_feature`].
    #[must_use]
    pub fn with_feature(mut self, name: impl Into<String>, value: u64) -> Self {
        self.features.push(Feature::new(name, value));
        self
    }

    /// Return the sample name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the features in insertion order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Return the first feature named `name`, if any.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.name == name)
    }

    /// Return the number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Return `true` if the sample carries no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Feature, Sample};

    #[test]
    fn feature_accessors() {
        let f = Feature::new("x", 7);
        assert_eq!(f.name(), "x");
        assert_eq!(f.value(), 7);
    }

    #[test]
    fn feature_display() {
        assert_eq!(format!("{}", Feature::new("price", 12)), "price=12");
    }

    #[test]
    fn sample_keeps_insertion_order() {
        let mut s = Sample::new("s");
        s.add_feature(Feature::new("b", 1));
        s.add_features([Feature::new("a", 2), Feature::new("c", 3)]);
        let names: Vec<&str> = s.features().iter().map(Feature::name).collect();
        assert_eq!(names, ["b", "a", "c"]);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn first_name_match_wins() {
        let s = Sample::new("dup").with_feature("x", 1).with_feature("x", 9);
        assert_eq!(s.feature("x").map(Feature::value), Some(1));
    }

    #[test]
    fn missing_feature_lookup() {
        let s = Sample::new("s").with_feature("x", 1);
        assert!(s.feature("y").is_none());
    }

    #[test]
    fn empty_sample() {
        let s = Sample::default();
        assert!(s.is_empty());
        assert_eq!(s.name(), "");
    }
}
