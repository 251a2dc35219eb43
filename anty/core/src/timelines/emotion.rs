//! Emotion Producer
//!
//! One-shot reactive expressions. Each emotion pairs an eye shape with a
//! short body choreography (hop, squash, settle) and always returns the
//! character to the rest pose so whatever follows starts clean.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;
use crate::stage::{ElementId, EyeShape, PropertyId};
use crate::timeline::{Phase, Timeline};

/// The emotion catalogue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    /// Cheerful bounce with arced eyes.
    Happy,
    /// Big energetic hop, sparkling eyes.
    Excited,
    /// Startled jump, wide eyes.
    Shocked,
    /// Head-tilt lean, questioning look.
    Curious,
    /// Slow droop, half-closed lids.
    Sleepy,
    /// Gentle sway with heart eyes.
    Love,
}

impl Emotion {
    /// All emotions.
    pub const ALL: [Self; 6] = [
        Self::Happy,
        Self::Excited,
        Self::Shocked,
        Self::Curious,
        Self::Sleepy,
        Self::Love,
    ];

    /// Lowercase name for logs and debug consoles.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Happy => "happy",
            Self::Excited => "excited",
            Self::Shocked => "shocked",
            Self::Curious => "curious",
            Self::Sleepy => "sleepy",
            Self::Love => "love",
        }
    }

    /// Eye shape shown while the emotion plays.
    #[must_use]
    pub const fn eye_shape(self) -> EyeShape {
        match self {
            Self::Happy => EyeShape::Happy,
            Self::Excited => EyeShape::Excited,
            Self::Shocked => EyeShape::Shocked,
            Self::Curious => EyeShape::Curious,
            Self::Sleepy => EyeShape::Sleepy,
            Self::Love => EyeShape::Love,
        }
    }

    /// Default playback length at normal speed.
    #[must_use]
    pub const fn base_duration_ms(self) -> u64 {
        match self {
            Self::Happy => 1200,
            Self::Excited => 1500,
            Self::Shocked => 1000,
            Self::Curious => 1400,
            Self::Sleepy => 1800,
            Self::Love => 1600,
        }
    }

    /// How high the body hops, in stage units.
    const fn hop_height(self) -> f32 {
        match self {
            Self::Excited => -8.0,
            Self::Shocked => -7.0,
            Self::Happy => -6.0,
            Self::Love => -4.0,
            Self::Curious => -3.0,
            Self::Sleepy => -1.0,
        }
    }
}

/// Caller-supplied playback options.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EmotionOptions {
    /// Playback speed multiplier (1.0 = normal), clamped to 0.25–4.0.
    pub speed: f32,
    /// Request a particle burst from the host when the emotion starts.
    pub particles: bool,
}

impl Default for EmotionOptions {
    fn default() -> Self {
        Self {
            speed: 1.0,
            particles: false,
        }
    }
}

/// Build the one-shot timeline for an emotion. `rest_shape` is the eye
/// shape restored when the expression relaxes: `Open` for character form,
/// `Bracket` while the character is a search bar.
pub fn build(emotion: Emotion, options: EmotionOptions, rest_shape: EyeShape) -> Timeline {
    let speed = options.speed.clamp(0.25, 4.0);
    let ms = |at: f32| -> u64 {
        let total = emotion.base_duration_ms() as f32 / speed;
        (total * at) as u64
    };
    let shape = emotion.eye_shape();
    let hop = emotion.hop_height();

    let phases = vec![
        // Expression snaps on immediately.
        Phase::new("express", 0, 0, Easing::Linear)
            .set_shape(ElementId::EyeLeft, shape)
            .set_shape(ElementId::EyeRight, shape),
        // Pop up with a little overshoot in the squash.
        Phase::new("hop-up", 0, ms(0.2), Easing::EaseOut).tween(
            ElementId::Body,
            PropertyId::Y,
            hop,
        ),
        Phase::new("squash", 0, ms(0.15), Easing::EaseOutBack).tween(
            ElementId::Body,
            PropertyId::Scale,
            1.12,
        ),
        // Come back down and settle.
        Phase::new("hop-down", ms(0.2), ms(0.25), Easing::EaseOutBack).tween(
            ElementId::Body,
            PropertyId::Y,
            0.0,
        ),
        Phase::new("unsquash", ms(0.3), ms(0.25), Easing::EaseOut).tween(
            ElementId::Body,
            PropertyId::Scale,
            1.0,
        ),
        // Hold the expression, then relax the face just before the end.
        Phase::new("relax", ms(0.9), 0, Easing::Linear)
            .set_shape(ElementId::EyeLeft, rest_shape)
            .set_shape(ElementId::EyeRight, rest_shape),
        Phase::new("rest", ms(0.9), ms(1.0) - ms(0.9), Easing::Linear)
            .tween(ElementId::Body, PropertyId::Y, 0.0)
            .tween(ElementId::Body, PropertyId::Scale, 1.0),
    ];

    Timeline::new(emotion.name(), false, phases)
}
