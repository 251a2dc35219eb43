//! Morph Producer
//!
//! The shape-shift between character form and search-bar form. Target
//! transforms for the brackets and eyes are computed from the measured
//! geometry of the search-bar target, never from hard-coded positions, so
//! the morph lands correctly wherever the host laid the bar out.

use crate::config::{SearchBarConfig, SearchTarget};
use crate::easing::Easing;
use crate::stage::{ElementId, EyeShape, PropertyId};
use crate::timeline::{Phase, Timeline};

/// Build the character → search-bar morph.
#[must_use]
pub fn to_search_bar(config: &SearchBarConfig, target: SearchTarget) -> Timeline {
    // Brackets cap the bar ends; eyes tuck in just inside them.
    let half = target.width / 2.0;
    let eye_inset = half - config.height / 2.0;

    Timeline::new(
        "morph-to-search",
        false,
        vec![
            Phase::new("gather", 0, 200, Easing::EaseIn)
                .tween(ElementId::Body, PropertyId::Scale, 0.9)
                .tween(ElementId::Body, PropertyId::Y, target.y),
            Phase::new("brackets-out", 150, 350, Easing::EaseOutCubic)
                .tween(ElementId::BracketLeft, PropertyId::X, target.x - half)
                .tween(ElementId::BracketRight, PropertyId::X, target.x + half)
                .tween(ElementId::BracketLeft, PropertyId::Y, target.y)
                .tween(ElementId::BracketRight, PropertyId::Y, target.y),
            Phase::new("eyes-to-brackets", 300, 250, Easing::EaseOutCubic)
                .set_shape(ElementId::EyeLeft, EyeShape::Bracket)
                .set_shape(ElementId::EyeRight, EyeShape::Bracket)
                .tween(ElementId::EyeLeft, PropertyId::X, target.x - eye_inset)
                .tween(ElementId::EyeRight, PropertyId::X, target.x + eye_inset),
            Phase::new("reveal", 350, 300, Easing::EaseOut)
                .tween(ElementId::SearchField, PropertyId::Opacity, 1.0)
                .tween(ElementId::Body, PropertyId::Opacity, 0.0)
                .tween(ElementId::Shadow, PropertyId::Opacity, 0.25)
                .tween(ElementId::Glow, PropertyId::Opacity, 0.15),
        ],
    )
}

/// Build the search-bar → character morph.
#[must_use]
pub fn to_character() -> Timeline {
    Timeline::new(
        "morph-to-character",
        false,
        vec![
            Phase::new("conceal", 0, 250, Easing::EaseIn)
                .tween(ElementId::SearchField, PropertyId::Opacity, 0.0)
                .tween(ElementId::Body, PropertyId::Opacity, 1.0),
            Phase::new("brackets-home", 150, 350, Easing::EaseOutBack)
                .tween(ElementId::BracketLeft, PropertyId::X, 0.0)
                .tween(ElementId::BracketRight, PropertyId::X, 0.0)
                .tween(ElementId::BracketLeft, PropertyId::Y, 0.0)
                .tween(ElementId::BracketRight, PropertyId::Y, 0.0),
            Phase::new("eyes-home", 250, 250, Easing::EaseOutBack)
                .tween(ElementId::EyeLeft, PropertyId::X, 0.0)
                .tween(ElementId::EyeRight, PropertyId::X, 0.0),
            Phase::new("reform", 400, 250, Easing::EaseOutCubic)
                .tween(ElementId::Body, PropertyId::Scale, 1.0)
                .tween(ElementId::Body, PropertyId::Y, 0.0)
                .tween(ElementId::Shadow, PropertyId::Opacity, 1.0)
                .tween(ElementId::Glow, PropertyId::Opacity, 1.0)
                .set_shape(ElementId::EyeLeft, EyeShape::Open)
                .set_shape(ElementId::EyeRight, EyeShape::Open),
        ],
    )
}
