//! Idle Loop Producer
//!
//! The default resting choreography: a slow float up and back down, a subtle
//! breathing scale, and a blink at a randomized offset so consecutive loops
//! don't feel mechanical. The loop's end pose equals its start pose, which
//! keeps wrap-around seamless.

use rand::Rng;

use crate::easing::Easing;
use crate::stage::{ElementId, EyeShape, PropertyId};
use crate::timeline::{Phase, Timeline};

/// One full loop of the idle float.
const LOOP_MS: u64 = 4200;

/// How long a blink keeps the eyes closed.
const BLINK_MS: u64 = 130;

/// Build one idle loop. `rng` randomizes bob depth and blink timing.
pub fn build(rng: &mut impl Rng) -> Timeline {
    let bob = -(rng.gen_range(3.5..4.5_f32));
    let blink_at = rng.gen_range(600..LOOP_MS - 900);

    let mut phases = vec![
        Phase::new("float-up", 0, LOOP_MS / 2, Easing::EaseInOut).tween(
            ElementId::Body,
            PropertyId::Y,
            bob,
        ),
        Phase::new("float-down", LOOP_MS / 2, LOOP_MS / 2, Easing::EaseInOut).tween(
            ElementId::Body,
            PropertyId::Y,
            0.0,
        ),
        Phase::new("breathe-in", 0, LOOP_MS / 2, Easing::EaseInOut).tween(
            ElementId::Body,
            PropertyId::Scale,
            1.03,
        ),
        Phase::new("breathe-out", LOOP_MS / 2, LOOP_MS / 2, Easing::EaseInOut).tween(
            ElementId::Body,
            PropertyId::Scale,
            1.0,
        ),
        Phase::new("blink-close", blink_at, 0, Easing::Linear)
            .set_shape(ElementId::EyeLeft, EyeShape::Blink)
            .set_shape(ElementId::EyeRight, EyeShape::Blink),
        Phase::new("blink-open", blink_at + BLINK_MS, 0, Easing::Linear)
            .set_shape(ElementId::EyeLeft, EyeShape::Open)
            .set_shape(ElementId::EyeRight, EyeShape::Open),
    ];

    // An occasional double blink reads as more alive.
    if rng.gen_bool(0.2) {
        let second = blink_at + 2 * BLINK_MS + 90;
        phases.push(
            Phase::new("blink-close", second, 0, Easing::Linear)
                .set_shape(ElementId::EyeLeft, EyeShape::Blink)
                .set_shape(ElementId::EyeRight, EyeShape::Blink),
        );
        phases.push(
            Phase::new("blink-open", second + BLINK_MS, 0, Easing::Linear)
                .set_shape(ElementId::EyeLeft, EyeShape::Open)
                .set_shape(ElementId::EyeRight, EyeShape::Open),
        );
    }

    Timeline::new("idle", true, phases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use std::time::Duration;

    #[test]
    fn test_idle_loops_and_covers_full_cycle() {
        let mut rng = StepRng::new(0, 1);
        let timeline = build(&mut rng);
        assert!(timeline.looping());
        assert_eq!(timeline.total_duration(), Duration::from_millis(LOOP_MS));
    }

    #[test]
    fn test_idle_touches_body_and_eyes_only() {
        let mut rng = StepRng::new(0, 1);
        let elements = build(&mut rng).elements();
        assert!(elements.contains(&ElementId::Body));
        assert!(elements.contains(&ElementId::EyeLeft));
        assert!(!elements.contains(&ElementId::Shadow));
        assert!(!elements.contains(&ElementId::SearchField));
    }

    #[test]
    fn test_idle_phase_offsets_monotonic() {
        let mut rng = StepRng::new(7, 13);
        let timeline = build(&mut rng);
        let offsets: Vec<_> = timeline.phases().iter().map(|p| p.start_offset).collect();
        assert!(offsets.windows(2).all(|w| w[0] <= w[1]));
    }
}
