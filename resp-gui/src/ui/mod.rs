//! # UI Module
//!
//! This module contains all UI components for the respiratory sound analysis application.

pub mod heatmap;
pub mod probability_chart;
pub mod results_view;
pub mod upload_view;
pub mod waveform_trace;
