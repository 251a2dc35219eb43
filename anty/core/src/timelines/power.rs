//! Power Choreography Producer
//!
//! Power-off and wake-up sequences. These take explicit control of the
//! shadow and glow, so the controller pauses the per-frame trackers for the
//! duration and hands control back afterwards.
//!
//! Power-off runs three phases: climb (the body rises), snap (a quick
//! squash as the "tube" collapses), and fade (everything dims out).

use crate::easing::Easing;
use crate::stage::{ElementId, EyeShape, PropertyId};
use crate::timeline::{Phase, Timeline};

/// Height the body climbs to before collapsing, in stage units.
const CLIMB_HEIGHT: f32 = -9.0;

/// Build the power-off sequence.
#[must_use]
pub fn off() -> Timeline {
    Timeline::new(
        "power-off",
        false,
        vec![
            Phase::new("climb", 0, 400, Easing::EaseInOut).tween(
                ElementId::Body,
                PropertyId::Y,
                CLIMB_HEIGHT,
            ),
            Phase::new("snap", 400, 150, Easing::EaseOutBack)
                .tween(ElementId::Body, PropertyId::Scale, 0.82)
                .set_shape(ElementId::EyeLeft, EyeShape::Off)
                .set_shape(ElementId::EyeRight, EyeShape::Off),
            Phase::new("fade", 550, 500, Easing::EaseOut)
                .tween(ElementId::Body, PropertyId::Opacity, 0.0)
                .tween(ElementId::Glow, PropertyId::Opacity, 0.0)
                .tween(ElementId::Shadow, PropertyId::Opacity, 0.0)
                .tween(ElementId::Shadow, PropertyId::Scale, 0.6),
        ],
    )
}

/// Build the wake-up sequence: materialize high up, drop to the ground with
/// a settle, eyes open on landing.
#[must_use]
pub fn wake() -> Timeline {
    Timeline::new(
        "wake-up",
        false,
        vec![
            Phase::new("materialize", 0, 250, Easing::EaseOut)
                .tween(ElementId::Body, PropertyId::Opacity, 1.0)
                .tween(ElementId::Body, PropertyId::Scale, 1.0)
                .tween(ElementId::Glow, PropertyId::Opacity, 1.0),
            Phase::new("drop", 250, 500, Easing::EaseOutBack)
                .tween(ElementId::Body, PropertyId::Y, 0.0)
                .tween(ElementId::Shadow, PropertyId::Opacity, 1.0)
                .tween(ElementId::Shadow, PropertyId::Scale, 1.0),
            Phase::new("awaken", 700, 0, Easing::Linear)
                .set_shape(ElementId::EyeLeft, EyeShape::Open)
                .set_shape(ElementId::EyeRight, EyeShape::Open),
        ],
    )
}
