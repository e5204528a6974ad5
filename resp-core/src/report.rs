//! # Analysis Report
//!
//! Assembles everything the results screen shows from one
//! [`InferenceResult`]: the headline prediction, the guarded confidence,
//! the ranked probabilities, the summary cards, the waveform trace and the
//! spectrogram heatmap. Every number that reaches text goes through
//! [`crate::format`].

use crate::InferenceResult;
use crate::format;
use crate::ranking::{self, RankedEntry};
use crate::spectrogram::{self, Heatmap};
use crate::waveform::{self, WaveformPoint};

/// Fixed disclaimer printed under every report.
pub const DISCLAIMER: &str = "This analysis is for informational purposes only. Always consult with a qualified healthcare professional for medical diagnosis and treatment decisions.";

/// One bar of the probability chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityRow {
    pub label: String,
    pub value: f64,
    /// Guarded percentage text, e.g. `"72.50"`.
    pub percent: String,
}

/// One tile of the report summary.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCard {
    pub title: &'static str,
    pub headline: String,
    pub caption: String,
}

/// Display-ready view of one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// The classifier's own label, shown as reported.
    pub predicted_label: String,
    /// The highest-ranked class.
    pub top_label: String,
    pub confidence: String,
    /// Confidence gauge fill in `[0, 1]`.
    pub confidence_fill: f32,
    pub probabilities: Vec<ProbabilityRow>,
    pub summary: Vec<SummaryCard>,
    pub waveform: Vec<WaveformPoint>,
    pub heatmap: Option<Heatmap>,
    pub scale_caption: String,
    pub sample_rate: Option<u32>,
}

impl AnalysisReport {
    pub fn build(result: &InferenceResult) -> Self {
        let ranked = ranking::rank(&result.probabilities);
        let top_label = ranking::top_label(&ranked, &result.predicted_label).to_string();
        let confidence = format::percent(result.confidence);

        let grid = result.mel_grid();
        let heatmap = spectrogram::render(&grid);
        let scale_caption = grid.stats().caption();

        let summary = summary_cards(&ranked, &confidence);
        let probabilities = ranked
            .iter()
            .map(|entry| ProbabilityRow {
                label: entry.label.to_string(),
                value: entry.value,
                percent: format::percent(entry.value),
            })
            .collect();

        if top_label != result.predicted_label {
            tracing::debug!(
                predicted = %result.predicted_label,
                predicted_score = ?result.probabilities.get(&result.predicted_label),
                ranked_top = %top_label,
                "classifier label differs from ranked top"
            );
        }

        Self {
            predicted_label: result.predicted_label.clone(),
            top_label,
            confidence,
            confidence_fill: format::gauge_fraction(result.confidence),
            probabilities,
            summary,
            waveform: waveform::project(result.waveform()),
            heatmap,
            scale_caption,
            sample_rate: result.visualizations.sample_rate,
        }
    }
}

fn summary_cards(ranked: &[RankedEntry<'_>], confidence: &str) -> Vec<SummaryCard> {
    let summary = ranking::summarize(ranked);
    let mut cards = Vec::with_capacity(4);

    if let Some(primary) = summary.primary {
        cards.push(SummaryCard {
            title: "Primary Result",
            headline: primary.label.to_string(),
            caption: "Top prediction".to_string(),
        });
    }
    cards.push(SummaryCard {
        title: "Confidence",
        headline: format!("{confidence}%"),
        caption: "Model certainty".to_string(),
    });
    for (title, entry) in [("2nd Likely", summary.second), ("3rd Likely", summary.third)] {
        if let Some(entry) = entry {
            cards.push(SummaryCard {
                title,
                headline: entry.label.to_string(),
                caption: format!("{}%", format::percent(entry.value)),
            });
        }
    }
    cards
}
