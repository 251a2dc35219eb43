//! # Anty Core
//!
//! The animation engine behind Anty, an animated mascot character. The
//! crate is pure choreography: it decides what every visual element of the
//! character should look like on each frame, and a host renderer draws it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  AnimationController                     │
//! │  the only authorized writer of character animation       │
//! └───────┬───────────────┬───────────────┬─────────────────┘
//!         │ asks          │ starts        │ per frame
//!         ▼               ▼               ▼
//! ┌──────────────┐ ┌──────────────┐ ┌──────────────────────┐
//! │ StateMachine │ │  Timelines   │ │ Shadow/Glow trackers │
//! │ grant / deny │ │ idle emotion │ │ follow the rise      │
//! │ + history    │ │ power morph  │ │                      │
//! └──────────────┘ └──────┬───────┘ └──────────┬───────────┘
//!                         │ write              │ write
//!                         ▼                    ▼
//!                  ┌────────────────────────────────┐
//!                  │             Stage              │
//!                  │ ElementId × PropertyId → f32   │
//!                  └────────────────────────────────┘
//! ```
//!
//! ## Design principles
//!
//! - **Priority before motion**: every animation request goes through the
//!   state machine first; a denial is a silent no-op.
//! - **Frame driven**: the host calls [`AnimationController::tick`] once per
//!   frame. Nothing spawns threads, nothing sleeps, nothing blocks.
//! - **Last writer wins, explicitly**: starting a timeline kills the prior
//!   timelines on the exact elements it targets, and the conflict tracker
//!   flags any overlap the controller did not arbitrate.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use anty_core::{AnimationController, Emotion, EmotionOptions, SearchBarConfig};
//!
//! let mut anty = AnimationController::new(SearchBarConfig::default());
//! anty.play_emotion(Emotion::Happy, EmotionOptions::default());
//! let events = anty.tick(Duration::from_millis(16));
//! # let _ = events;
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

pub mod config;
pub mod conflict;
pub mod controller;
pub mod easing;
pub mod machine;
pub mod stage;
pub mod state;
pub mod timeline;
pub mod timelines;
pub mod trackers;

pub use config::{AntyConfig, ConfigError, SearchBarConfig, SearchTarget};
pub use conflict::{AnimationSource, Conflict, ConflictTracker};
pub use controller::{AnimationController, ControllerDebugInfo, EngineEvent};
pub use easing::Easing;
pub use machine::{HistoryEntry, MachineDebugInfo, StateMachine};
pub use stage::{ElementId, EyeShape, PropertyId, Stage};
pub use state::{AnimationState, TransitionRules};
pub use timeline::{Phase, PhaseOp, PlayingTimeline, Timeline};
pub use timelines::{Emotion, EmotionOptions};
pub use trackers::{GlowTracker, ShadowTracker};
