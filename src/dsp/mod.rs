//! DSP module - the numeric core
//!
//! Three pure transforms, each a function of its arguments only:
//! - Pointer position to directional cue (angle + distance)
//! - Sample buffer to waveform preview trace
//! - Mono buffer + angle to pseudo-binaural stereo (ITD + ILD)

pub mod angle;
mod error;
pub mod spatializer;
pub mod waveform;

pub use angle::DirectionalCue;
pub use error::DspError;
pub use spatializer::{spatialize, StereoChannels};
pub use waveform::{downmix, render, WaveformTrace};

pub(crate) use error::check_finite;
