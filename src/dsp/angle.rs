//! Pointer geometry for the direction pad
//!
//! Angles are measured from "straight up" on the pad (negative screen y) and
//! grow clockwise, so a click to the right of the centre gives +π/2 and a
//! click to the left gives -π/2.

use std::f64::consts::TAU;

/// Direction picked on the pad, relative to its centre
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalCue {
    /// Angle in radians; canonical range (-π, π] from `compute`, any finite value accepted
    pub angle_radians: f64,
    /// Distance from the centre in pad units (not used for gain)
    pub distance: f64,
}

impl DirectionalCue {
    pub fn new(angle_radians: f64, distance: f64) -> Self {
        Self {
            angle_radians,
            distance,
        }
    }

    /// Angle as a fraction of a full turn
    pub fn angle_fraction(&self) -> f64 {
        self.angle_radians / TAU
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle_radians.to_degrees()
    }
}

/// Convert a pointer position into an angle and distance from `center`
///
/// Screen coordinates are expected: y grows downwards.
pub fn compute(pointer_x: f64, pointer_y: f64, center_x: f64, center_y: f64) -> DirectionalCue {
    let dx = pointer_x - center_x;
    let dy = pointer_y - center_y;

    let distance = (dx * dx + dy * dy).sqrt();
    let angle_radians = dx.atan2(-dy);

    DirectionalCue {
        angle_radians,
        distance,
    }
}
