//! Mono to pseudo-binaural stereo
//!
//! Uses a simple ITD/ILD model:
//! - ITD (Interaural Time Difference): one channel is shifted later by up to
//!   `MAX_ITD_SAMPLES`, scaled by `sin(angle)`
//! - ILD (Interaural Level Difference): a cosine curve on the half-angle
//!   splits the level between the channels
//!
//! The shift is length preserving: zeros are pushed in at the front and the
//! tail falls off the end. The delay is a fixed sample count, so its duration
//! in seconds depends on the sample rate of the material.

use super::{check_finite, DspError};

/// Largest channel shift, in samples
pub const MAX_ITD_SAMPLES: f64 = 100.0;

/// Left and right output, both as long as the mono input
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StereoChannels {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl StereoChannels {
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Signed channel shift for `angle_radians`
///
/// Positive delays the right channel, negative delays the left.
pub fn itd_samples(angle_radians: f64) -> i64 {
    (angle_radians.sin() * MAX_ITD_SAMPLES).round() as i64
}

/// `(left_gain, right_gain)` for `angle_radians`, each in [0, 1]
pub fn channel_gains(angle_radians: f64) -> (f32, f32) {
    let half = (angle_radians / 2.0).cos();
    let left = half * 0.5 + 0.5;
    let right = -half * 0.5 + 0.5;
    (left as f32, right as f32)
}

/// Shift `channel` later by `delay` samples, keeping its length
fn delay_in_place(channel: &mut [f32], delay: usize) {
    if delay >= channel.len() {
        channel.fill(0.0);
        return;
    }
    channel.rotate_right(delay);
    channel[..delay].fill(0.0);
}

fn apply_gain(channel: &mut [f32], gain: f32) {
    for s in channel.iter_mut() {
        *s *= gain;
    }
}

/// Render `mono` as stereo for a source at `angle_radians`
///
/// NaN or infinite input is rejected before any output is produced.
pub fn spatialize(mono: &[f32], angle_radians: f64) -> Result<StereoChannels, DspError> {
    if !angle_radians.is_finite() {
        return Err(DspError::NonFiniteAngle(angle_radians));
    }
    check_finite(mono)?;

    let itd = itd_samples(angle_radians);
    let (left_gain, right_gain) = channel_gains(angle_radians);

    let mut left = mono.to_vec();
    let mut right = mono.to_vec();

    if itd > 0 {
        delay_in_place(&mut right, itd as usize);
    } else if itd < 0 {
        delay_in_place(&mut left, itd.unsigned_abs() as usize);
    }

    apply_gain(&mut left, left_gain);
    apply_gain(&mut right, right_gain);

    Ok(StereoChannels { left, right })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    const EPS: f32 = 1e-4;

    fn counting(len: usize) -> Vec<f32> {
        (1..=len).map(|i| i as f32).collect()
    }

    #[test]
    fn test_straight_up() {
        assert_eq!(itd_samples(0.0), 0);
        assert_eq!(channel_gains(0.0), (1.0, 0.0));

        let mono = counting(300);
        let out = spatialize(&mono, 0.0).unwrap();
        assert_eq!(out.left, mono);
        assert!(out.right.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_quarter_turn_right() {
        assert_eq!(itd_samples(FRAC_PI_2), 100);
        let (left_gain, right_gain) = channel_gains(FRAC_PI_2);
        assert!((left_gain - 0.8536).abs() < EPS);
        assert!((right_gain - 0.1464).abs() < EPS);

        let mono = counting(300);
        let out = spatialize(&mono, FRAC_PI_2).unwrap();
        assert_eq!(out.left.len(), 300);
        assert_eq!(out.right.len(), 300);

        // Right: 100 zeros, then the first 200 input samples
        assert!(out.right[..100].iter().all(|&s| s == 0.0));
        assert!((out.right[100] - 1.0 * right_gain).abs() < EPS);
        assert!((out.right[299] - 200.0 * right_gain).abs() < EPS);

        // Left keeps its timing
        assert!((out.left[0] - 1.0 * left_gain).abs() < EPS);
        assert!((out.left[299] - 300.0 * left_gain).abs() < EPS);
    }

    #[test]
    fn test_quarter_turn_left_mirrors() {
        assert_eq!(itd_samples(-FRAC_PI_2), -100);
        let (left_gain, right_gain) = channel_gains(-FRAC_PI_2);
        assert!((left_gain - 0.8536).abs() < EPS);
        assert!((right_gain - 0.1464).abs() < EPS);

        let mono = counting(300);
        let out = spatialize(&mono, -FRAC_PI_2).unwrap();

        assert!(out.left[..100].iter().all(|&s| s == 0.0));
        assert!((out.left[100] - 1.0 * left_gain).abs() < EPS);
        assert!((out.right[0] - 1.0 * right_gain).abs() < EPS);
        assert!((out.right[299] - 300.0 * right_gain).abs() < EPS);
    }

    #[test]
    fn test_itd_rounds() {
        // sin(π/4) * 100 = 70.71
        assert_eq!(itd_samples(FRAC_PI_4), 71);
        assert_eq!(itd_samples(-FRAC_PI_4), -71);
        // sin(π) is a hair above zero
        assert_eq!(itd_samples(PI), 0);
    }

    #[test]
    fn test_gain_curve() {
        // Directly behind splits evenly
        let (left_gain, right_gain) = channel_gains(PI);
        assert!((left_gain - 0.5).abs() < EPS);
        assert!((right_gain - 0.5).abs() < EPS);

        // A full unwrapped turn lands fully on the right
        let (left_gain, right_gain) = channel_gains(2.0 * PI);
        assert!(left_gain.abs() < EPS);
        assert!((right_gain - 1.0).abs() < EPS);

        for i in -20..=20 {
            let (l, r) = channel_gains(i as f64 * 0.3);
            assert!((0.0..=1.0).contains(&l));
            assert!((0.0..=1.0).contains(&r));
            assert!((l + r - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn test_unwrapped_angle() {
        let a = spatialize(&counting(200), FRAC_PI_2).unwrap();
        let b = spatialize(&counting(200), FRAC_PI_2 + 4.0 * PI).unwrap();
        assert_eq!(a.right[..100], b.right[..100]);
        for (x, y) in a.left.iter().zip(&b.left) {
            assert!((x - y).abs() < 1e-3);
        }
    }

    #[test]
    fn test_shift_longer_than_buffer() {
        let out = spatialize(&counting(40), FRAC_PI_2).unwrap();
        assert_eq!(out.right.len(), 40);
        assert!(out.right.iter().all(|&s| s == 0.0));
        assert!(out.left.iter().all(|&s| s > 0.0));
    }

    #[test]
    fn test_empty_input() {
        let out = spatialize(&[], 1.0).unwrap();
        assert!(out.is_empty());
        assert!(out.right.is_empty());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(matches!(
            spatialize(&[0.0], f64::NAN),
            Err(DspError::NonFiniteAngle(_))
        ));
        assert_eq!(
            spatialize(&[0.0, 0.5, f32::NEG_INFINITY], 0.3),
            Err(DspError::NonFiniteSample { index: 2 })
        );
    }
}
