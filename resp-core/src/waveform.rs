//! Waveform projection for time-series rendering.

/// Vertical axis domain of the waveform trace.
pub const AMPLITUDE_DOMAIN: (f32, f32) = (-1.0, 1.0);

/// One plotted sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveformPoint {
    pub index: usize,
    pub amplitude: f32,
}

/// Pairs each sample with its 0-based position.
///
/// No resampling or filtering happens here; the service already decimated
/// the trace.
pub fn project(samples: &[f32]) -> Vec<WaveformPoint> {
    samples
        .iter()
        .enumerate()
        .map(|(index, &amplitude)| WaveformPoint { index, amplitude })
        .collect()
}
