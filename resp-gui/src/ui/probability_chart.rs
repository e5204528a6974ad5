//! # Probability Chart Widget
//!
//! Vertical bar chart of the ranked class probabilities on a fixed 0-100
//! scale. Bars arrive already sorted; each carries its guarded percentage
//! text above it and its class label below.

use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, Text};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};
use resp_core::report::ProbabilityRow;

/// Upper bound of the value axis.
const VALUE_MAX: f64 = 100.0;
/// Height reserved under the plot for class labels.
const LABEL_BAND: f32 = 24.0;
/// Height reserved above the tallest bar for its value.
const VALUE_BAND: f32 = 18.0;

pub struct ProbabilityChart {
    rows: Vec<ProbabilityRow>,
}

impl ProbabilityChart {
    pub fn new(rows: Vec<ProbabilityRow>) -> Self {
        Self { rows }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(260.0)),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for ProbabilityChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let text_color = theme.palette().text;

        if !bounds.width.is_finite() || !bounds.height.is_finite() {
            return vec![frame.into_geometry()];
        }

        if self.rows.is_empty() {
            frame.fill_text(Text {
                content: "No probabilities reported".to_string(),
                position: frame.center(),
                color: text_color,
                size: 14.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Center,
                vertical_alignment: iced::alignment::Vertical::Center,
                ..Text::default()
            });
            return vec![frame.into_geometry()];
        }

        let baseline = bounds.height - LABEL_BAND;
        let plot_height = (baseline - VALUE_BAND).max(1.0);
        let slot_width = bounds.width / self.rows.len() as f32;
        let bar_width = (slot_width * 0.6).max(1.0);

        let axis = Path::line(Point::new(0.0, baseline), Point::new(bounds.width, baseline));
        frame.stroke(
            &axis,
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgba8(0x94, 0xA3, 0xB8, 0.5)),
        );

        for (i, row) in self.rows.iter().enumerate() {
            let center_x = (i as f32 + 0.5) * slot_width;
            let value = if row.value.is_finite() { row.value.clamp(0.0, VALUE_MAX) } else { 0.0 };
            let height = (value / VALUE_MAX) as f32 * plot_height;

            if height > 0.0 {
                frame.fill_rectangle(
                    Point::new(center_x - bar_width / 2.0, baseline - height),
                    Size::new(bar_width, height),
                    Color::from_rgb8(0x3B, 0x82, 0xF6),
                );
            }

            frame.fill_text(Text {
                content: format!("{}%", row.percent),
                position: Point::new(center_x, baseline - height - 4.0),
                color: text_color,
                size: 12.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Center,
                vertical_alignment: iced::alignment::Vertical::Bottom,
                ..Text::default()
            });

            frame.fill_text(Text {
                content: row.label.clone(),
                position: Point::new(center_x, baseline + 6.0),
                color: text_color,
                size: 12.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Center,
                vertical_alignment: iced::alignment::Vertical::Top,
                ..Text::default()
            });
        }

        vec![frame.into_geometry()]
    }
}
