//! # Mel Spectrogram Heatmap Widget
//!
//! Paints a rendered [`Heatmap`] onto a canvas. Each heatmap pixel becomes a
//! filled cell scaled to the widget bounds, so the image stretches to the
//! panel the same way the service's image would.
//!
//! The cells are tessellated once into a [`canvas::Cache`] kept in the
//! widget state. The cache is cleared when the raster changes or the
//! bounds change.

use iced::widget::canvas::{self, Frame, Geometry};
use iced::widget::container;
use iced::{mouse, Color, Element, Point, Rectangle, Renderer, Size, Theme};
use resp_core::spectrogram::Heatmap;
use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub struct HeatmapView {
    heatmap: Heatmap,
    fingerprint: u64,
}

/// Geometry cached across redraws, tagged with the raster it was drawn from.
#[derive(Default)]
pub struct HeatmapState {
    cache: canvas::Cache,
    drawn: Cell<Option<u64>>,
}

impl HeatmapView {
    pub fn new(heatmap: Heatmap) -> Self {
        let fingerprint = fingerprint(&heatmap);
        Self { heatmap, fingerprint }
    }

    pub fn view(self) -> Element<'static, crate::Message> {
        container(
            canvas::Canvas::new(self)
                .width(iced::Length::Fill)
                .height(iced::Length::Fixed(240.0)),
        )
        .into()
    }

    fn paint(&self, frame: &mut Frame, bounds: Size) {
        let (width, height) = (self.heatmap.width(), self.heatmap.height());
        if !bounds.width.is_finite() || !bounds.height.is_finite() || width == 0 || height == 0 {
            return;
        }

        let cell_width = bounds.width / width as f32;
        let cell_height = bounds.height / height as f32;
        // Overlap neighbours by half a pixel so no seams show between cells.
        let cell = Size::new(cell_width + 0.5, cell_height + 0.5);

        for y in 0..height {
            for x in 0..width {
                let Some([r, g, b, a]) = self.heatmap.pixel(x, y) else {
                    continue;
                };
                frame.fill_rectangle(
                    Point::new(x as f32 * cell_width, y as f32 * cell_height),
                    cell,
                    Color::from_rgba8(r, g, b, f32::from(a) / 255.0),
                );
            }
        }
    }
}

/// Identifies a raster by its dimensions and pixel bytes.
fn fingerprint(heatmap: &Heatmap) -> u64 {
    let mut hasher = DefaultHasher::new();
    heatmap.width().hash(&mut hasher);
    heatmap.height().hash(&mut hasher);
    heatmap.pixels().hash(&mut hasher);
    hasher.finish()
}

impl<Message> canvas::Program<Message> for HeatmapView {
    type State = HeatmapState;

    fn draw(
        &self,
        state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        if state.drawn.get() != Some(self.fingerprint) {
            state.cache.clear();
            state.drawn.set(Some(self.fingerprint));
        }

        let geometry = state
            .cache
            .draw(renderer, bounds.size(), |frame| self.paint(frame, bounds.size()));
        vec![geometry]
    }
}
