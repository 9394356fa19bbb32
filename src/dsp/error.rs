//! Errors reported by the numeric core

use thiserror::Error;

/// Ill-formed input rejected at the boundary of a transform
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DspError {
    #[error("Angle is not a finite number: {0}")]
    NonFiniteAngle(f64),

    #[error("Sample {index} is not a finite number")]
    NonFiniteSample { index: usize },

    #[error("Unsupported channel count: {0}")]
    InvalidChannelCount(usize),

    #[error("{samples} samples cannot be split evenly into {channels} channels")]
    MismatchedChannels { samples: usize, channels: usize },
}

/// Fail on the first NaN or infinite sample
pub(crate) fn check_finite(samples: &[f32]) -> Result<(), DspError> {
    match samples.iter().position(|s| !s.is_finite()) {
        Some(index) => Err(DspError::NonFiniteSample { index }),
        None => Ok(()),
    }
}
