//! # Probability Ranking & Summary
//!
//! Orders the class probabilities for display and derives the top-three
//! summary. The ranking is computed independently of the classifier's own
//! `predicted_label`; when the two disagree the ranking wins for "top"
//! display.

use crate::probabilities::Probabilities;
use std::cmp::Ordering;

/// A borrowed view of one class and its score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEntry<'a> {
    pub label: &'a str,
    pub value: f64,
}

/// The ranks shown in the report summary. Missing ranks are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary<'a> {
    pub primary: Option<RankedEntry<'a>>,
    pub second: Option<RankedEntry<'a>>,
    pub third: Option<RankedEntry<'a>>,
}

/// Descending by value; NaN sorts after every number.
fn by_value_descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Ranks classes by score, highest first.
///
/// The sort is stable: equal scores keep the order the service reported
/// them in, so the output is deterministic.
pub fn rank(probabilities: &Probabilities) -> Vec<RankedEntry<'_>> {
    let mut entries: Vec<RankedEntry<'_>> = probabilities
        .iter()
        .map(|(label, value)| RankedEntry { label, value })
        .collect();
    entries.sort_by(|a, b| by_value_descending(a.value, b.value));
    entries
}

/// Picks ranks 0, 1 and 2 for the primary / 2nd likely / 3rd likely cards.
pub fn summarize<'a>(ranked: &[RankedEntry<'a>]) -> Summary<'a> {
    Summary {
        primary: ranked.first().copied(),
        second: ranked.get(1).copied(),
        third: ranked.get(2).copied(),
    }
}

/// The label shown as the top prediction.
///
/// The ranking's first entry when there is one, otherwise the classifier's
/// own label.
pub fn top_label<'a>(ranked: &[RankedEntry<'a>], predicted_label: &'a str) -> &'a str {
    ranked.first().map_or(predicted_label, |entry| entry.label)
}
