//! Timeline Producers
//!
//! One producer per animation state: idle, emotion, power (transition), and
//! morph. Each producer is a pure function from current options/geometry to
//! a [`Timeline`](crate::Timeline); the controller picks the producer for a
//! granted state and hands the result to playback.
//!
//! Producers never consult the state machine and never write the stage;
//! authorization and execution stay separate.

pub mod emotion;
pub mod idle;
pub mod morph;
pub mod power;

pub use emotion::{Emotion, EmotionOptions};
