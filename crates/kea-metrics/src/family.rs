// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Metric families accumulated during one collection pass

use std::collections::{BTreeMap, HashMap};

use crate::table::MetricDeclaration;

/// A named set of same-shape samples
///
/// Samples are keyed by their label values in declaration order, so
/// iteration is sorted and repeated passes over the same data produce the
/// same sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFamily {
    name: String,
    help: String,
    label_names: Vec<String>,
    samples: BTreeMap<Vec<String>, f64>,
}

impl MetricFamily {
    /// Create an empty family
    pub fn new(name: impl Into<String>, help: impl Into<String>, label_names: &[&str]) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            label_names: label_names.iter().map(|l| l.to_string()).collect(),
            samples: BTreeMap::new(),
        }
    }

    /// Create an empty family for a table declaration
    pub fn from_declaration(declaration: &MetricDeclaration) -> Self {
        Self::new(declaration.name, declaration.help, declaration.labels)
    }

    /// Record a sample
    ///
    /// Declared labels missing from `labels` are rendered as empty strings;
    /// keys the family does not declare are ignored. A second sample with the
    /// same label values replaces the first.
    pub fn add_sample(&mut self, labels: &HashMap<&str, String>, value: f64) {
        let values = self
            .label_names
            .iter()
            .map(|name| labels.get(name.as_str()).cloned().unwrap_or_default())
            .collect();
        self.samples.insert(values, value);
    }

    /// Family name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Label names in exposition order
    pub fn label_names(&self) -> &[String] {
        &self.label_names
    }

    /// Whether the family declares `label`
    pub fn has_label(&self, label: &str) -> bool {
        self.label_names.iter().any(|l| l == label)
    }

    /// Samples sorted by label values
    pub fn samples(&self) -> impl Iterator<Item = (&[String], f64)> {
        self.samples.iter().map(|(k, v)| (k.as_slice(), *v))
    }

    /// Value of the sample matching every given (label, value) pair
    ///
    /// Returns `None` unless exactly one sample matches.
    pub fn find(&self, matchers: &[(&str, &str)]) -> Option<f64> {
        let positions: Vec<(usize, &str)> = matchers
            .iter()
            .map(|(name, value)| {
                self.label_names
                    .iter()
                    .position(|l| l == name)
                    .map(|i| (i, *value))
            })
            .collect::<Option<_>>()?;

        let mut matching = self
            .samples
            .iter()
            .filter(|(labels, _)| positions.iter().all(|(i, v)| labels[*i] == *v));
        match (matching.next(), matching.next()) {
            (Some((_, value)), None) => Some(*value),
            _ => None,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no sample was recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_absent_labels_are_empty() {
        let mut family = MetricFamily::new("kea_test", "test", &["target", "server_tag", "pool"]);
        family.add_sample(&labels(&[("target", "a"), ("unknown", "x")]), 1.0);

        let (values, value) = family.samples().next().unwrap();
        assert_eq!(values, ["a".to_string(), String::new(), String::new()]);
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_same_labels_replace() {
        let mut family = MetricFamily::new("kea_test", "test", &["target"]);
        family.add_sample(&labels(&[("target", "a")]), 1.0);
        family.add_sample(&labels(&[("target", "a")]), 2.0);

        assert_eq!(family.len(), 1);
        assert_eq!(family.find(&[("target", "a")]), Some(2.0));
    }

    #[test]
    fn test_samples_are_sorted() {
        let mut family = MetricFamily::new("kea_test", "test", &["target"]);
        family.add_sample(&labels(&[("target", "b")]), 2.0);
        family.add_sample(&labels(&[("target", "a")]), 1.0);

        let order: Vec<_> = family.samples().map(|(l, _)| l[0].clone()).collect();
        assert_eq!(order, vec!["a", "b"]);
    }

    #[test]
    fn test_find_requires_unique_match() {
        let mut family = MetricFamily::new("kea_test", "test", &["target", "operation"]);
        family.add_sample(&labels(&[("target", "a"), ("operation", "ack")]), 1.0);
        family.add_sample(&labels(&[("target", "a"), ("operation", "nak")]), 2.0);

        assert_eq!(family.find(&[("target", "a")]), None);
        assert_eq!(family.find(&[("operation", "nak")]), Some(2.0));
        assert_eq!(family.find(&[("missing", "x")]), None);
        assert!(!family.is_empty());
        assert!(family.has_label("operation"));
    }
}
