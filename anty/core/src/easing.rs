//! Easing Functions
//!
//! Maps linear phase progress (0.0–1.0) to eased progress. Timelines pick an
//! easing per phase; exact curve shapes are choreography flavor, not part of
//! the state-machine contract.

use serde::{Deserialize, Serialize};

/// Easing curve applied to a phase's progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    EaseOut,
    /// Slow start and end.
    EaseInOut,
    /// Cubic slow end (snappier than `EaseOut`).
    EaseOutCubic,
    /// Overshoot then settle.
    EaseOutBack,
    /// Springy wobble at the end.
    EaseOutElastic,
}

impl Easing {
    /// Apply the curve to a progress value, clamped to 0.0–1.0.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseOutBack => {
                let c1 = 1.701_58;
                let c3 = c1 + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u.powi(3) + c1 * u.powi(2)
            }
            Self::EaseOutElastic => {
                if t <= f32::EPSILON {
                    0.0
                } else if (t - 1.0).abs() < f32::EPSILON {
                    1.0
                } else {
                    let c4 = (2.0 * std::f32::consts::PI) / 3.0;
                    2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
                }
            }
        }
    }
}
