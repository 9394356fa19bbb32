//! Render module - UI components for visualization

mod pad;
mod waveform_view;

pub use pad::{DirectionPad, PadClick, PadSettings};
pub use waveform_view::{WaveformSettings, WaveformView};
