//! # Class Probabilities
//!
//! An insertion-ordered label → percentage mapping. The service order is
//! significant: ranking breaks ties by it, so the map must survive a JSON
//! round trip through the session handoff without being re-sorted.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Per-class percentages in the order the classifier reported them.
///
/// Values are not assumed to sum to 100 and may be NaN.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Probabilities(Vec<(String, f64)>);

impl Probabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates a class. An existing label keeps its position.
    pub fn insert(&mut self, label: impl Into<String>, value: f64) {
        let label = label.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == label) {
            Some(entry) => entry.1 = value,
            None => self.0.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(existing, _)| existing == label)
            .map(|(_, value)| *value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(label, value)| (label.as_str(), *value))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Probabilities {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut probabilities = Self::new();
        for (label, value) in iter {
            probabilities.insert(label, value);
        }
        probabilities
    }
}

impl Serialize for Probabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, value) in &self.0 {
            let value = value.is_finite().then_some(*value);
            map.serialize_entry(label, &value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Probabilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ProbabilitiesVisitor)
    }
}

struct ProbabilitiesVisitor;

impl<'de> Visitor<'de> for ProbabilitiesVisitor {
    type Value = Probabilities;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of class labels to percentages")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut probabilities = Probabilities::new();
        while let Some((label, value)) = access.next_entry::<String, Option<f64>>()? {
            probabilities.insert(label, value.unwrap_or(f64::NAN));
        }
        Ok(probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_service_order_through_json() {
        let json = r#"{"Normal": 3.5, "Asthma": 80.0, "COPD": 3.5}"#;
        let probabilities: Probabilities = serde_json::from_str(json).unwrap();
        let labels: Vec<&str> = probabilities.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["Normal", "Asthma", "COPD"]);

        let back = serde_json::to_string(&probabilities).unwrap();
        assert_eq!(back, r#"{"Normal":3.5,"Asthma":80.0,"COPD":3.5}"#);
    }

    #[test]
    fn duplicate_label_keeps_first_position_and_last_value() {
        let json = r#"{"A": 1.0, "B": 2.0, "A": 7.0}"#;
        let probabilities: Probabilities = serde_json::from_str(json).unwrap();
        assert_eq!(probabilities.len(), 2);
        assert_eq!(probabilities.iter().next(), Some(("A", 7.0)));
    }

    #[test]
    fn null_value_reads_as_nan_and_writes_back_as_null() {
        let probabilities: Probabilities = serde_json::from_str(r#"{"A": null}"#).unwrap();
        assert!(probabilities.get("A").unwrap().is_nan());
        assert_eq!(serde_json::to_string(&probabilities).unwrap(), r#"{"A":null}"#);
    }

    #[test]
    fn rejects_non_numeric_values() {
        assert!(serde_json::from_str::<Probabilities>(r#"{"A": "high"}"#).is_err());
        assert!(serde_json::from_str::<Probabilities>("[1, 2]").is_err());
    }
}
