//! # Spectrogram Heatmap Renderer
//!
//! Converts a mel-spectrogram (decibel magnitudes, rows = mel bins,
//! columns = time frames) into an RGBA raster with the same dimensions.
//!
//! ## Pipeline
//! - [`MelGrid::from_rows`] validates the raw rows once: the result is always
//!   rectangular, and empty or degenerate input becomes an empty grid
//! - [`MelGrid::stats`] is the dB range over every raw cell, falling back
//!   to `-80..0 dB` when the range is unusable
//! - [`render`] normalizes each cell into `[0, 1]` and maps it through the
//!   blue palette, flipping vertically so the first mel bin sits at the bottom
//!
//! Nothing in this module fails. The worst case is a blank or flat image.

use crate::format;

/// Value used for cells that are missing or non-finite.
const MISSING: f64 = f64::NAN;

/// Silence-to-peak span used when the grid has no usable dynamic range.
pub const FALLBACK_STATS: NormalizationStats = NormalizationStats {
    min: -80.0,
    max: 0.0,
};

/// Bytes per output pixel (RGBA).
pub const CHANNELS: usize = 4;

/// A rectangular grid of decibel values in row-major order.
///
/// Missing cells (from short rows) and non-finite cells are stored as NaN
/// and rendered at the bottom of the scale.
#[derive(Debug, Clone, PartialEq)]
pub struct MelGrid {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
    stats: NormalizationStats,
}

impl MelGrid {
    /// Validates raw rows into a rectangular grid.
    ///
    /// The width is taken from the first row. Longer rows are truncated and
    /// shorter rows are padded with missing cells. A grid with no rows, or
    /// with any zero-width row, is empty.
    ///
    /// The dB range is discovered over every raw cell before truncation, so
    /// a long row still widens the scale.
    pub fn from_rows(rows: &[Vec<f32>]) -> Self {
        let stats = NormalizationStats::discover(rows.iter().flatten().map(|&v| f64::from(v)));

        let cols = rows.first().map_or(0, Vec::len);
        if cols == 0 || rows.iter().any(Vec::is_empty) {
            if !rows.is_empty() {
                tracing::debug!(rows = rows.len(), "spectrogram has a zero-width row; nothing to render");
            }
            return Self {
                stats,
                ..Self::empty()
            };
        }

        let ragged = rows.iter().filter(|row| row.len() != cols).count();
        if ragged > 0 {
            tracing::warn!(ragged, expected_cols = cols, "spectrogram rows are ragged; missing cells render at minimum");
        }

        let cells = rows
            .iter()
            .flat_map(|row| {
                (0..cols).map(move |x| row.get(x).map_or(MISSING, |&v| f64::from(v)))
            })
            .collect();

        Self {
            rows: rows.len(),
            cols,
            cells,
            stats,
        }
    }

    pub fn empty() -> Self {
        Self {
            rows: 0,
            cols: 0,
            cells: Vec::new(),
            stats: FALLBACK_STATS,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// The cell at `(row, col)`, or `None` when it is out of bounds,
    /// missing, or non-finite.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        let value = self.cells[row * self.cols + col];
        value.is_finite().then_some(value)
    }

    /// The dB range over all finite cells of the raw rows.
    pub fn stats(&self) -> NormalizationStats {
        self.stats
    }
}

/// The dB range used to normalize one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationStats {
    pub min: f64,
    pub max: f64,
}

impl NormalizationStats {
    /// Scans values once for min and max, ignoring non-finite ones.
    ///
    /// Returns [`FALLBACK_STATS`] when there is no finite value or the
    /// range is flat, so normalization never divides by zero.
    pub fn discover(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
                (min.min(v), max.max(v))
            });

        if !min.is_finite() || !max.is_finite() || min == max {
            FALLBACK_STATS
        } else {
            Self { min, max }
        }
    }

    /// Maps a dB value into `[0, 1]`. Non-finite values map to 0.
    pub fn normalize(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        let range = self.max - self.min;
        if range <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }

    /// Legend text shown under the heatmap.
    pub fn caption(&self) -> String {
        format!(
            "Scale: {} dB → {} dB",
            format::fixed(self.min, 1),
            format::fixed(self.max, 1)
        )
    }
}

/// Maps a normalized value to the blue medical palette, fully opaque.
pub fn palette(t: f64) -> [u8; 4] {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    [
        (20.0 + 60.0 * t).round() as u8,
        (60.0 + 140.0 * t).round() as u8,
        (140.0 + 100.0 * t).round() as u8,
        255,
    ]
}

/// An RGBA raster, top-left origin, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    stats: NormalizationStats,
}

impl Heatmap {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn stats(&self) -> NormalizationStats {
        self.stats
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * CHANNELS;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.pixels[idx..idx + CHANNELS]);
        Some(rgba)
    }
}

/// Renders the grid into a heatmap of the same dimensions.
///
/// Returns `None` for an empty grid: there is nothing to draw, which is not
/// an error. Grid row 0 lands on the bottom raster row.
pub fn render(grid: &MelGrid) -> Option<Heatmap> {
    if grid.is_empty() {
        return None;
    }

    let stats = grid.stats();
    let (width, height) = (grid.cols(), grid.rows());
    let mut pixels = vec![0u8; width * height * CHANNELS];

    for y in 0..height {
        let source_row = height - 1 - y;
        for x in 0..width {
            let value = grid.get(source_row, x).unwrap_or(MISSING);
            let rgba = palette(stats.normalize(value));
            let idx = (y * width + x) * CHANNELS;
            pixels[idx..idx + CHANNELS].copy_from_slice(&rgba);
        }
    }

    tracing::debug!(width, height, min = stats.min, max = stats.max, "rendered spectrogram heatmap");
    Some(Heatmap {
        width,
        height,
        pixels,
        stats,
    })
}
