//! Audio file loading
//!
//! This module decodes a whole file into an `AudioBuffer` using symphonia.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use symphonia::core::audio::{AudioBuffer as DecodedBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::IntoSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use thiserror::Error;

use super::buffer::{AudioBuffer, BufferError};

/// Errors that can occur while loading an audio file
#[derive(Error, Debug)]
pub enum FileError {
    #[error("Failed to open file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to probe audio format: {0}")]
    ProbeError(String),

    #[error("No audio tracks found")]
    NoTracks,

    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(usize),

    #[error("Decoder error: {0}")]
    DecoderError(String),

    #[error("Invalid audio data: {0}")]
    InvalidData(#[from] BufferError),
}

/// Audio file metadata
#[derive(Debug, Clone)]
pub struct AudioFileInfo {
    pub path: PathBuf,
    pub filename: String,
    pub duration: Duration,
    pub sample_rate: u32,
    pub channels: u16,
    pub format: String,
}

/// A decoded file together with its metadata
#[derive(Debug, Clone)]
pub struct LoadedAudio {
    pub info: AudioFileInfo,
    pub buffer: AudioBuffer,
}

/// Decode an entire audio file into memory
pub fn load(path: impl AsRef<Path>) -> Result<LoadedAudio, FileError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    // Create media source stream
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    // Create hint from file extension
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| FileError::ProbeError(e.to_string()))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(FileError::NoTracks)?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let format_name = format!("{:?}", codec_params.codec).replace("CODEC_TYPE_", "");

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| FileError::DecoderError(e.to_string()))?;

    let mut sample_rate = codec_params.sample_rate.unwrap_or(44100);
    let mut channels = codec_params.channels.map(|c| c.count()).unwrap_or(0);
    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(FileError::DecoderError(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();
                if !(1..=2).contains(&channels) {
                    return Err(FileError::UnsupportedChannelCount(channels));
                }
                append_interleaved(&decoded, &mut samples);
            }
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Skipping undecodable packet: {}", e);
                continue;
            }
            Err(e) => return Err(FileError::DecoderError(e.to_string())),
        }
    }

    if !(1..=2).contains(&channels) {
        return Err(FileError::UnsupportedChannelCount(channels));
    }

    let buffer = AudioBuffer::new(sample_rate, channels as u16, samples)?;

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("Unknown")
        .to_string();

    let info = AudioFileInfo {
        path: path.to_path_buf(),
        filename,
        duration: buffer.duration(),
        sample_rate,
        channels: channels as u16,
        format: format_name,
    };

    log::info!(
        "Decoded {:?}: {} Hz, {} channel(s), {} frames",
        path,
        info.sample_rate,
        info.channels,
        buffer.frames()
    );

    Ok(LoadedAudio { info, buffer })
}

/// Append decoded audio as interleaved f32 samples
fn append_interleaved(decoded: &AudioBufferRef<'_>, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::U8(buf) => interleave(&**buf, out),
        AudioBufferRef::U16(buf) => interleave(&**buf, out),
        AudioBufferRef::U24(buf) => interleave(&**buf, out),
        AudioBufferRef::U32(buf) => interleave(&**buf, out),
        AudioBufferRef::S8(buf) => interleave(&**buf, out),
        AudioBufferRef::S16(buf) => interleave(&**buf, out),
        AudioBufferRef::S24(buf) => interleave(&**buf, out),
        AudioBufferRef::S32(buf) => interleave(&**buf, out),
        AudioBufferRef::F32(buf) => interleave(&**buf, out),
        AudioBufferRef::F64(buf) => interleave(&**buf, out),
    }
}

fn interleave<S>(buf: &DecodedBuffer<S>, out: &mut Vec<f32>)
where
    S: Sample + IntoSample<f32>,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    out.reserve(frames * channels);

    for frame in 0..frames {
        for ch in 0..channels {
            out.push(buf.chan(ch)[frame].into_sample());
        }
    }
}
