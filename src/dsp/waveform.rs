//! Waveform preview geometry
//!
//! Turns a sample buffer into a list of points for the preview canvas:
//! downmix to mono, peak-normalize, keep every n-th sample, then map to
//! canvas coordinates. Painting the result is left to `render::waveform_view`.
//!
//! The decimation is plain strided picking with no low-pass filter, so the
//! preview aliases on dense material. The point count is `ceil(len / stride)`
//! which can exceed the canvas width by up to a factor of two.

use super::{check_finite, DspError};

/// Vertical padding between the peak and the canvas edge
pub const MARGIN: f32 = 5.0;

/// A point on the preview canvas, in canvas units (y grows downwards)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TracePoint {
    pub x: f32,
    pub y: f32,
}

impl TracePoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Computed preview: consecutive points are joined by line segments
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveformTrace {
    pub points: Vec<TracePoint>,
    /// Baseline for silence
    pub center_y: f32,
    /// Canvas width the trace was laid out for
    pub width: f32,
}

impl WaveformTrace {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// The N-1 segments between consecutive points
    pub fn segments(&self) -> impl Iterator<Item = (TracePoint, TracePoint)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Horizontal line through the baseline, spanning the canvas
    pub fn centerline(&self) -> (TracePoint, TracePoint) {
        (
            TracePoint::new(0.0, self.center_y),
            TracePoint::new(self.width, self.center_y),
        )
    }
}

/// Average interleaved frames down to one channel
pub fn downmix(samples: &[f32], channel_count: usize) -> Result<Vec<f32>, DspError> {
    if channel_count == 0 {
        return Err(DspError::InvalidChannelCount(channel_count));
    }
    if samples.len() % channel_count != 0 {
        return Err(DspError::MismatchedChannels {
            samples: samples.len(),
            channels: channel_count,
        });
    }
    if channel_count == 1 {
        return Ok(samples.to_vec());
    }

    // Accumulate in f64 so loud frames cannot overflow to infinity
    Ok(samples
        .chunks_exact(channel_count)
        .map(|frame| {
            let sum: f64 = frame.iter().map(|&s| s as f64).sum();
            (sum / channel_count as f64) as f32
        })
        .collect())
}

/// Scale so the loudest sample hits ±1; silence is left as is
pub fn normalize(samples: &mut [f32]) {
    let peak = samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
    if peak > 0.0 {
        for s in samples.iter_mut() {
            *s /= peak;
        }
    }
}

/// Keep every `len / width`-th sample (at least every sample)
pub fn decimate(samples: &[f32], width: usize) -> Vec<f32> {
    let stride = (samples.len() / width.max(1)).max(1);
    samples.iter().step_by(stride).copied().collect()
}

/// Build the preview trace for a canvas of `canvas_width` x `canvas_height`
///
/// A non-positive canvas dimension yields an empty trace.
pub fn render(
    samples: &[f32],
    channel_count: usize,
    canvas_width: i32,
    canvas_height: i32,
) -> Result<WaveformTrace, DspError> {
    check_finite(samples)?;
    let mut mono = downmix(samples, channel_count)?;

    if canvas_width <= 0 || canvas_height <= 0 {
        return Ok(WaveformTrace::default());
    }

    normalize(&mut mono);
    let kept = decimate(&mono, canvas_width as usize);

    let width = canvas_width as f32;
    let center_y = (canvas_height / 2) as f32;
    let amplitude = canvas_height as f32 / 2.0 - MARGIN;
    let n = kept.len() as f32;

    let points = kept
        .iter()
        .enumerate()
        .map(|(i, s)| TracePoint::new(i as f32 * width / n, center_y - s * amplitude))
        .collect();

    Ok(WaveformTrace {
        points,
        center_y,
        width,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(len: usize) -> Vec<f32> {
        (0..len).map(|i| (i as f32 / len as f32) * 2.0 - 1.0).collect()
    }

    #[test]
    fn test_stereo_cancellation_is_flat() {
        let samples = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let mono = downmix(&samples, 2).unwrap();
        assert_eq!(mono, vec![0.0, 0.0, 0.0]);

        let trace = render(&samples, 2, 100, 200).unwrap();
        assert_eq!(trace.len(), 3);
        assert!(trace.points.iter().all(|p| p.y == trace.center_y));
    }

    #[test]
    fn test_downmix_full_scale_frames() {
        let mono = downmix(&[f32::MAX, f32::MAX, 0.5, 0.5], 2).unwrap();
        assert_eq!(mono, vec![f32::MAX, 0.5]);

        let trace = render(&[f32::MAX, f32::MAX, 0.5, 0.5], 2, 100, 200).unwrap();
        assert_eq!(trace.len(), 2);
        assert!(trace.points.iter().all(|p| p.y.is_finite()));
        assert!(trace.points.iter().all(|p| p.y >= 0.0 && p.y <= 200.0));
        assert_eq!(trace.points[0].y, 5.0);
    }

    #[test]
    fn test_normalize_peak() {
        let mut samples = vec![0.1, -0.25, 0.2];
        normalize(&mut samples);
        let peak = samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-6);
        assert!((samples[0] - 0.4).abs() < 1e-6);
        assert!((samples[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_silence_untouched() {
        let mut samples = vec![0.0; 16];
        normalize(&mut samples);
        assert!(samples.iter().all(|&s| s == 0.0));

        let mut empty: Vec<f32> = Vec::new();
        normalize(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_decimate_stride() {
        let samples: Vec<f32> = (0..1000).map(|i| i as f32).collect();
        let kept = decimate(&samples, 100);
        assert_eq!(kept.len(), 100);
        assert_eq!(kept[0], 0.0);
        assert_eq!(kept[1], 10.0);
        assert_eq!(kept[99], 990.0);

        // Fewer samples than pixels: keep everything
        let short = decimate(&samples[..40], 100);
        assert_eq!(short.len(), 40);
    }

    #[test]
    fn test_decimate_truncating_stride() {
        // 250 / 100 truncates to a stride of 2, giving 125 points
        let samples: Vec<f32> = (0..250).map(|i| i as f32).collect();
        let kept = decimate(&samples, 100);
        assert_eq!(kept.len(), 125);
        assert_eq!(kept[124], 248.0);
    }

    #[test]
    fn test_point_mapping() {
        let trace = render(&[1.0, -1.0, 0.0, 0.5], 1, 400, 200).unwrap();
        assert_eq!(trace.center_y, 100.0);
        assert_eq!(trace.width, 400.0);

        let xs: Vec<f32> = trace.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 100.0, 200.0, 300.0]);

        let ys: Vec<f32> = trace.points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![5.0, 195.0, 100.0, 52.5]);
    }

    #[test]
    fn test_trace_bounds() {
        for (len, width) in [(10, 750), (750, 750), (1000, 750), (44100, 750), (250, 100)] {
            let samples = ramp(len);
            let trace = render(&samples, 1, width, 200).unwrap();

            assert!(trace.len() <= len);
            assert!(trace.len() < 2 * width as usize);
            if len % width as usize == 0 || len < width as usize {
                assert!(trace.len() <= len.min(width as usize));
            }

            for pair in trace.points.windows(2) {
                assert!(pair[1].x > pair[0].x);
            }
            assert!(trace.points.iter().all(|p| p.x < width as f32));
            assert!(trace.points.iter().all(|p| p.y >= 0.0 && p.y <= 200.0));
        }
    }

    #[test]
    fn test_segments_and_centerline() {
        let trace = render(&[0.0, 1.0, 0.0], 1, 30, 50).unwrap();
        assert_eq!(trace.segments().count(), 2);

        let (start, end) = trace.centerline();
        assert_eq!(start, TracePoint::new(0.0, 25.0));
        assert_eq!(end, TracePoint::new(30.0, 25.0));
    }

    #[test]
    fn test_degenerate_canvas() {
        let samples = ramp(100);
        assert!(render(&samples, 1, 0, 200).unwrap().is_empty());
        assert!(render(&samples, 1, 200, 0).unwrap().is_empty());
        assert!(render(&samples, 1, -5, -5).unwrap().is_empty());
    }

    #[test]
    fn test_empty_buffer() {
        let trace = render(&[], 1, 750, 200).unwrap();
        assert!(trace.is_empty());
        assert_eq!(trace.segments().count(), 0);
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(
            render(&[0.0, 1.0, 0.5], 2, 100, 100),
            Err(DspError::MismatchedChannels {
                samples: 3,
                channels: 2
            })
        );
        assert_eq!(
            render(&[0.0], 0, 100, 100),
            Err(DspError::InvalidChannelCount(0))
        );
        assert_eq!(
            render(&[0.0, f32::NAN], 1, 100, 100),
            Err(DspError::NonFiniteSample { index: 1 })
        );
        assert!(render(&[f32::INFINITY], 1, 0, 0).is_err());
    }
}
