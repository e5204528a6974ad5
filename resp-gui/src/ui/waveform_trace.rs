//! # Waveform Widget
//!
//! Draws the downsampled waveform as a single line over the fixed amplitude
//! domain, with a faint zero line behind it.

use iced::widget::canvas::{self, Geometry, Path, Stroke, Text};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Theme};
use resp_core::format;
use resp_core::waveform::{AMPLITUDE_DOMAIN, WaveformPoint};

/// Space kept free on the left for the amplitude labels.
const AXIS_MARGIN: f32 = 44.0;

pub struct WaveformTrace {
    points: Vec<WaveformPoint>,
}

impl WaveformTrace {
    pub fn new(points: Vec<WaveformPoint>) -> Self {
        Self { points }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(220.0)),
        )
        .into()
    }
}

impl<Message> canvas::Program<Message> for WaveformTrace {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        if !bounds.width.is_finite() || !bounds.height.is_finite() {
            return vec![frame.into_geometry()];
        }

        let text_color = theme.palette().text;
        let (low, high) = AMPLITUDE_DOMAIN;
        let plot_width = (bounds.width - AXIS_MARGIN).max(1.0);
        let to_y = |amplitude: f32| {
            let clamped = amplitude.clamp(low, high);
            (high - clamped) / (high - low) * bounds.height
        };

        // Axis labels at the domain edges and zero.
        for value in [high, 0.0, low] {
            let y = to_y(value);
            frame.fill_text(Text {
                content: format::amplitude(value),
                position: Point::new(AXIS_MARGIN - 6.0, y.clamp(8.0, bounds.height - 8.0)),
                color: text_color,
                size: 11.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Right,
                vertical_alignment: iced::alignment::Vertical::Center,
                ..Text::default()
            });
            let grid = Path::line(Point::new(AXIS_MARGIN, y), Point::new(bounds.width, y));
            frame.stroke(
                &grid,
                Stroke::default()
                    .with_width(1.0)
                    .with_color(Color::from_rgba8(0x94, 0xA3, 0xB8, 0.25)),
            );
        }

        if self.points.is_empty() {
            frame.fill_text(Text {
                content: "No waveform data".to_string(),
                position: frame.center(),
                color: text_color,
                size: 14.0.into(),
                horizontal_alignment: iced::alignment::Horizontal::Center,
                vertical_alignment: iced::alignment::Vertical::Center,
                ..Text::default()
            });
            return vec![frame.into_geometry()];
        }

        let last_index = self.points.len().saturating_sub(1).max(1) as f32;
        let trace = Path::new(|builder| {
            for (i, point) in self.points.iter().enumerate() {
                let x = AXIS_MARGIN + point.index as f32 / last_index * plot_width;
                let amplitude = if point.amplitude.is_finite() { point.amplitude } else { 0.0 };
                let position = Point::new(x, to_y(amplitude));
                if i == 0 {
                    builder.move_to(position);
                } else {
                    builder.line_to(position);
                }
            }
        });
        frame.stroke(
            &trace,
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgb8(0x25, 0x63, 0xEB)),
        );

        vec![frame.into_geometry()]
    }
}
