//! # Results View
//!
//! Step two of the flow. Lays out an [`AnalysisReport`]: the headline
//! prediction with its confidence gauge, the probability chart, the
//! waveform, the mel spectrogram heatmap, the summary cards and the
//! disclaimer.

use iced::widget::{button, column, container, horizontal_space, progress_bar, row, scrollable, text, Row, Space};
use iced::{Alignment, Color, Element, Length};
use resp_core::report::{AnalysisReport, SummaryCard, DISCLAIMER};

use super::{heatmap, probability_chart, waveform_trace};
use crate::{Message, ResultsDisplay};

const MUTED_COLOR: Color = Color::from_rgb(0.6, 0.64, 0.7);
const ACCENT_COLOR: Color = Color::from_rgb(0.23, 0.51, 0.96);

/// Creates the complete results step.
pub fn create_results_view(results: &ResultsDisplay) -> Element<'static, Message> {
    let body = match results {
        ResultsDisplay::Ready(report) => create_report(report),
        ResultsDisplay::Unavailable(message) => create_unavailable(message),
    };

    container(scrollable(container(body).padding(30).width(Length::Fill)))
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Shown when there is nothing to present.
fn create_unavailable(message: &str) -> Element<'static, Message> {
    column![
        text("Analysis not available").size(28),
        text(message.to_string()).size(16).color(MUTED_COLOR),
        Space::with_height(10),
        button(text("Go to Upload")).on_press(Message::AnalyzeAnother),
    ]
    .spacing(10)
    .into()
}

fn create_report(report: &AnalysisReport) -> Element<'static, Message> {
    let header = row![
        column![
            text("Step 2 of 2").size(14).color(MUTED_COLOR),
            text("Analysis Results").size(28),
        ]
        .spacing(6),
        horizontal_space(),
        button(text("Analyze Another")).on_press(Message::AnalyzeAnother),
    ]
    .align_y(Alignment::Center);

    column![
        header,
        create_prediction_panel(report),
        row![
            panel("Probability Distribution", probability_chart::ProbabilityChart::new(report.probabilities.clone()).view()),
            Space::with_width(10),
            panel("Waveform", waveform_trace::WaveformTrace::new(report.waveform.clone()).view()),
        ],
        create_spectrogram_panel(report),
        create_summary_row(&report.summary),
        text(DISCLAIMER).size(13).color(MUTED_COLOR),
    ]
    .spacing(16)
    .into()
}

/// Headline label, confidence text and gauge.
fn create_prediction_panel(report: &AnalysisReport) -> Element<'static, Message> {
    let mut headline = column![
        text("Predicted Disease").size(14).color(MUTED_COLOR),
        row![
            text(report.top_label.clone()).size(32),
            Space::with_width(12),
            container(text("Top Prediction").size(12).color(ACCENT_COLOR)).padding([4, 8]).style(container::rounded_box),
        ]
        .align_y(Alignment::Center),
    ]
    .spacing(6);

    if report.predicted_label != report.top_label {
        headline = headline.push(
            text(format!("Classifier label: {}", report.predicted_label))
                .size(13)
                .color(MUTED_COLOR),
        );
    }

    let gauge = column![
        row![
            text("Confidence").size(14).color(MUTED_COLOR),
            horizontal_space(),
            text(format!("{}%", report.confidence)).size(20),
        ]
        .align_y(Alignment::Center),
        progress_bar(0.0..=1.0, report.confidence_fill).height(Length::Fixed(10.0)),
    ]
    .spacing(8)
    .width(Length::FillPortion(1));

    container(
        row![
            headline.width(Length::FillPortion(1)),
            Space::with_width(20),
            gauge,
        ]
        .align_y(Alignment::Center)
        .padding(20),
    )
    .style(container::rounded_box)
    .width(Length::Fill)
    .into()
}

fn create_spectrogram_panel(report: &AnalysisReport) -> Element<'static, Message> {
    let image: Element<'static, Message> = match &report.heatmap {
        Some(heatmap) => heatmap::HeatmapView::new(heatmap.clone()).view(),
        None => container(text("No spectrogram data").size(14).color(MUTED_COLOR))
            .width(Length::Fill)
            .height(Length::Fixed(240.0))
            .center_x(Length::Fill)
            .center_y(Length::Fixed(240.0))
            .into(),
    };

    let mut caption = row![text(report.scale_caption.clone()).size(13).color(MUTED_COLOR)];
    if let Some(rate) = report.sample_rate {
        caption = caption
            .push(horizontal_space())
            .push(text(format!("Sample rate: {rate} Hz")).size(13).color(MUTED_COLOR));
    }

    panel("Mel Spectrogram", column![image, caption].spacing(8).into())
}

fn create_summary_row(cards: &[SummaryCard]) -> Element<'static, Message> {
    let tiles = cards.iter().map(|card| {
        container(
            column![
                text(card.title).size(13).color(MUTED_COLOR),
                text(card.headline.clone()).size(20),
                text(card.caption.clone()).size(12).color(MUTED_COLOR),
            ]
            .spacing(4)
            .padding(14),
        )
        .style(container::rounded_box)
        .width(Length::FillPortion(1))
        .into()
    });

    Row::with_children(tiles).spacing(10).width(Length::Fill).into()
}

/// Titled, boxed panel around a chart.
fn panel(title: &'static str, content: Element<'static, Message>) -> Element<'static, Message> {
    container(column![text(title).size(18), content].spacing(10).padding(15))
        .style(container::rounded_box)
        .width(Length::FillPortion(1))
        .into()
}
