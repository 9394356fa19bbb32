//! Audio module - decoded buffers, file loading and playback
//!
//! This module provides:
//! - In-memory interleaved sample buffer
//! - Audio file decoding
//! - Output device playback

mod buffer;
mod file;
mod player;

pub use buffer::{AudioBuffer, BufferError};
pub use file::{load, AudioFileInfo, FileError, LoadedAudio};
pub use player::{AudioPlayer, PlaybackState};
