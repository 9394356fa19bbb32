//! Playback of an in-memory buffer
//!
//! A feeder thread pushes interleaved stereo frames into a lock-free ring
//! buffer and the cpal output callback drains it. The UI thread only touches
//! atomics, so it never blocks the audio callback.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapRb,
};
use thiserror::Error;

use super::buffer::AudioBuffer;

/// Errors that can occur when starting playback
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("No output device available")]
    NoOutputDevice,

    #[error("Failed to get output config: {0}")]
    Config(String),

    #[error("Failed to open output stream: {0}")]
    Stream(String),
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    fn to_u8(self) -> u8 {
        match self {
            PlaybackState::Stopped => 0,
            PlaybackState::Playing => 1,
            PlaybackState::Paused => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => PlaybackState::Playing,
            2 => PlaybackState::Paused,
            _ => PlaybackState::Stopped,
        }
    }
}

/// Ring capacity in interleaved stereo samples (~1 second at 48 kHz)
const RING_CAPACITY: usize = 48000 * 2;

/// Plays whole `AudioBuffer`s on the default output device
pub struct AudioPlayer {
    state: Arc<AtomicU8>,

    /// Frames handed to the ring so far
    position: Arc<AtomicU64>,

    total_frames: u64,

    sample_rate: u32,

    /// Feeder thread keeps going while this is set
    is_running: Arc<AtomicBool>,

    thread_handle: Option<thread::JoinHandle<()>>,

    output_stream: Option<cpal::Stream>,

    /// Shared volume for audio thread (AtomicU32 with f32 bits)
    volume_atomic: Arc<AtomicU32>,

    /// Volume/gain
    pub volume: f32,
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioPlayer {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(PlaybackState::Stopped.to_u8())),
            position: Arc::new(AtomicU64::new(0)),
            total_frames: 0,
            sample_rate: 44100,
            is_running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            output_stream: None,
            volume_atomic: Arc::new(AtomicU32::new(1.0_f32.to_bits())),
            volume: 1.0,
        }
    }

    /// Start playing `buffer` from the beginning
    ///
    /// Anything already playing is stopped first.
    pub fn play(&mut self, buffer: Arc<AudioBuffer>) -> Result<(), PlayerError> {
        self.stop();

        let rb = HeapRb::<f32>::new(RING_CAPACITY);
        let (mut prod, mut cons) = rb.split();

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(PlayerError::NoOutputDevice)?;

        let default_config = device
            .default_output_config()
            .map_err(|e| PlayerError::Config(e.to_string()))?;

        let channels = default_config.channels() as usize;
        let mut config: cpal::StreamConfig = default_config.into();
        if config.sample_rate.0 != buffer.sample_rate() {
            log::info!(
                "Requesting {} Hz output (device default {} Hz)",
                buffer.sample_rate(),
                config.sample_rate.0
            );
            config.sample_rate = cpal::SampleRate(buffer.sample_rate());
        }

        let callback_state = Arc::clone(&self.state);
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let paused = PlaybackState::from_u8(callback_state.load(Ordering::Relaxed))
                        == PlaybackState::Paused;
                    write_output(data, channels, &mut cons, paused);
                },
                |err| log::error!("Audio output error: {}", err),
                None,
            )
            .map_err(|e| PlayerError::Stream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PlayerError::Stream(e.to_string()))?;
        self.output_stream = Some(stream);

        self.total_frames = buffer.frames() as u64;
        self.sample_rate = buffer.sample_rate();
        self.position.store(0, Ordering::Relaxed);
        self.volume_atomic
            .store(self.volume.to_bits(), Ordering::Relaxed);
        self.is_running.store(true, Ordering::Relaxed);
        self.state
            .store(PlaybackState::Playing.to_u8(), Ordering::Relaxed);

        let state = Arc::clone(&self.state);
        let position = Arc::clone(&self.position);
        let is_running = Arc::clone(&self.is_running);
        let volume_atomic = Arc::clone(&self.volume_atomic);

        self.thread_handle = Some(thread::spawn(move || {
            let pause = Duration::from_millis(5);
            let mut frames = buffer.stereo_frames();

            while is_running.load(Ordering::Relaxed) {
                if PlaybackState::from_u8(state.load(Ordering::Relaxed)) == PlaybackState::Paused {
                    thread::sleep(Duration::from_millis(10));
                    continue;
                }

                if prod.vacant_len() < 2 {
                    thread::sleep(pause);
                    continue;
                }

                let Some((left, right)) = frames.next() else {
                    break;
                };

                // Room for both samples was checked above and this is the only producer
                let volume = f32::from_bits(volume_atomic.load(Ordering::Relaxed));
                let _ = prod.try_push(left * volume);
                let _ = prod.try_push(right * volume);
                position.fetch_add(1, Ordering::Relaxed);
            }

            // Let the device drain what is left before reporting the end
            while is_running.load(Ordering::Relaxed) && !prod.is_empty() {
                thread::sleep(pause);
            }

            is_running.store(false, Ordering::Relaxed);
            state.store(PlaybackState::Stopped.to_u8(), Ordering::Relaxed);
        }));

        log::info!(
            "Playback started: {} frames at {} Hz",
            self.total_frames,
            self.sample_rate
        );

        Ok(())
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state() == PlaybackState::Playing {
            self.state
                .store(PlaybackState::Paused.to_u8(), Ordering::Relaxed);
        }
    }

    /// Resume after `pause`
    pub fn resume(&mut self) {
        if self.state() == PlaybackState::Paused {
            self.state
                .store(PlaybackState::Playing.to_u8(), Ordering::Relaxed);
        }
    }

    /// Stop playback and release the output stream
    pub fn stop(&mut self) {
        self.is_running.store(false, Ordering::Relaxed);
        self.state
            .store(PlaybackState::Stopped.to_u8(), Ordering::Relaxed);

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }

        self.output_stream = None;
        self.position.store(0, Ordering::Relaxed);
    }

    /// Sync UI volume to audio thread
    pub fn sync_volume(&self) {
        self.volume_atomic
            .store(self.volume.to_bits(), Ordering::Relaxed);
    }

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        PlaybackState::from_u8(self.state.load(Ordering::Relaxed))
    }

    /// Get current position as fraction (0.0 - 1.0)
    pub fn position_fraction(&self) -> f32 {
        if self.total_frames == 0 {
            return 0.0;
        }
        self.position.load(Ordering::Relaxed) as f32 / self.total_frames as f32
    }

    /// Get current position as duration
    pub fn position_duration(&self) -> Duration {
        let frames = self.position.load(Ordering::Relaxed);
        Duration::from_secs_f64(frames as f64 / self.sample_rate as f64)
    }
}

/// Fill a device buffer from the ring of interleaved stereo samples
///
/// While paused the ring is left untouched and the device gets silence.
fn write_output<C>(data: &mut [f32], channels: usize, source: &mut C, paused: bool)
where
    C: Consumer<Item = f32>,
{
    if paused {
        data.fill(0.0);
        return;
    }

    for frame in data.chunks_mut(channels) {
        let left = source.try_pop().unwrap_or(0.0);
        let right = source.try_pop().unwrap_or(0.0);
        if channels >= 2 {
            frame[0] = left;
            frame[1] = right;
            for ch in frame.iter_mut().skip(2) {
                *ch = 0.0;
            }
        } else {
            frame[0] = (left + right) / 2.0;
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_encoding() {
        for state in [
            PlaybackState::Stopped,
            PlaybackState::Playing,
            PlaybackState::Paused,
        ] {
            assert_eq!(PlaybackState::from_u8(state.to_u8()), state);
        }
        assert_eq!(PlaybackState::from_u8(200), PlaybackState::Stopped);
    }

    fn filled_ring(samples: &[f32]) -> ringbuf::HeapCons<f32> {
        let (mut prod, cons) = HeapRb::<f32>::new(16).split();
        for &s in samples {
            prod.try_push(s).unwrap();
        }
        cons
    }

    #[test]
    fn test_output_while_paused_keeps_ring() {
        let mut cons = filled_ring(&[0.1, 0.2, 0.3, 0.4]);
        let mut data = [1.0_f32; 4];

        write_output(&mut data, 2, &mut cons, true);
        assert_eq!(data, [0.0; 4]);
        assert_eq!(cons.occupied_len(), 4);

        write_output(&mut data, 2, &mut cons, false);
        assert_eq!(data, [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(cons.occupied_len(), 0);
    }

    #[test]
    fn test_output_layouts() {
        // Mono device: frames are averaged
        let mut cons = filled_ring(&[0.2, 0.4]);
        let mut mono = [1.0_f32; 2];
        write_output(&mut mono, 1, &mut cons, false);
        assert!((mono[0] - 0.3).abs() < 1e-6);
        assert_eq!(mono[1], 0.0);

        // Extra device channels are silenced
        let mut cons = filled_ring(&[0.5, -0.5]);
        let mut quad = [1.0_f32; 4];
        write_output(&mut quad, 4, &mut cons, false);
        assert_eq!(quad, [0.5, -0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_idle_player() {
        let mut player = AudioPlayer::new();
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert_eq!(player.position_fraction(), 0.0);

        // Pause/resume without playback are no-ops
        player.pause();
        assert_eq!(player.state(), PlaybackState::Stopped);
        player.resume();
        assert_eq!(player.state(), PlaybackState::Stopped);

        player.stop();
        assert_eq!(player.position_duration(), Duration::ZERO);
    }
}
