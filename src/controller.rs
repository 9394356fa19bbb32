//! Session state behind the window
//!
//! Holds the loaded audio and the last direction picked on the pad, and runs
//! the transform and preview steps on request. The numeric work all lives in
//! `dsp`; this layer only checks preconditions and swaps buffers.

use std::sync::Arc;

use thiserror::Error;

use crate::audio::{AudioBuffer, BufferError, LoadedAudio};
use crate::dsp::{self, angle, DirectionalCue, DspError, WaveformTrace};

/// Why a transform request was refused
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("No audio loaded")]
    NoAudio,

    #[error("No direction selected")]
    NoCue,

    #[error(transparent)]
    Dsp(#[from] DspError),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

impl TransformError {
    /// Text for the status line
    pub fn status_message(&self) -> String {
        match self {
            TransformError::NoAudio | TransformError::NoCue => {
                "Load a file and place green dot first".to_string()
            }
            other => format!("Transform Error: {}", other),
        }
    }
}

/// Explicit application state: what is loaded and where the source sits
#[derive(Default)]
pub struct Session {
    /// Name of the loaded file, if any
    pub filename: Option<String>,

    /// Current buffer; shared with the player so playback never copies it
    audio: Option<Arc<AudioBuffer>>,

    cue: Option<DirectionalCue>,

    /// Set once the buffer holds spatialized stereo
    transformed: bool,

    /// Bumped whenever the buffer is replaced
    revision: u64,

    /// Status line shown next to the load button
    pub status: String,
}

impl Session {
    pub fn new() -> Self {
        Self {
            status: "No file loaded".to_string(),
            ..Default::default()
        }
    }

    /// Replace the current audio with a freshly decoded file
    pub fn set_audio(&mut self, loaded: LoadedAudio) {
        self.status = format!("Loaded: {}", loaded.info.filename);
        self.filename = Some(loaded.info.filename);
        self.audio = Some(Arc::new(loaded.buffer));
        self.transformed = false;
        self.revision += 1;
    }

    pub fn audio(&self) -> Option<&Arc<AudioBuffer>> {
        self.audio.as_ref()
    }

    pub fn cue(&self) -> Option<DirectionalCue> {
        self.cue
    }

    pub fn is_transformed(&self) -> bool {
        self.transformed
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record a pad click at `pointer`, relative to the pad's `center`
    pub fn click(&mut self, pointer: (f64, f64), center: (f64, f64)) -> DirectionalCue {
        let cue = angle::compute(pointer.0, pointer.1, center.0, center.1);

        log::debug!("Cursor position: x={:.0}, y={:.0}", pointer.0, pointer.1);
        log::debug!("Distance to center: {:.2} px", cue.distance);
        log::debug!("Angle to vertical line: {:.4} * 2π", cue.angle_fraction());

        self.cue = Some(cue);
        cue
    }

    /// Spatialize the current audio towards the last picked direction
    ///
    /// The held buffer is only replaced when every step succeeds.
    pub fn transform(&mut self) -> Result<(), TransformError> {
        let audio = self.audio.as_ref().ok_or(TransformError::NoAudio)?;
        let cue = self.cue.ok_or(TransformError::NoCue)?;

        let mono = audio.to_mono();
        let stereo = dsp::spatialize(&mono, cue.angle_radians)?;
        let buffer = AudioBuffer::from_stereo(&stereo.left, &stereo.right, audio.sample_rate())?;

        log::info!(
            "Transformed {} frames: angle {:.1}°, ITD {} samples",
            buffer.frames(),
            cue.angle_degrees(),
            dsp::spatializer::itd_samples(cue.angle_radians)
        );

        self.audio = Some(Arc::new(buffer));
        self.transformed = true;
        self.revision += 1;
        self.status = "WAV transformed to stereo with spatial audio".to_string();
        Ok(())
    }

    /// Run `transform` and put the outcome on the status line
    pub fn transform_and_report(&mut self) -> bool {
        match self.transform() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Transform refused: {}", e);
                self.status = e.status_message();
                false
            }
        }
    }

    /// Preview trace for the current audio
    ///
    /// After a transform only the left channel is shown.
    pub fn preview(&self, width: i32, height: i32) -> Result<WaveformTrace, DspError> {
        let Some(audio) = self.audio.as_ref() else {
            return Ok(WaveformTrace::default());
        };

        if self.transformed {
            let left = audio.channel(0).unwrap_or_default();
            dsp::render(&left, 1, width, height)
        } else {
            dsp::render(audio.samples(), audio.channels() as usize, width, height)
        }
    }
}
