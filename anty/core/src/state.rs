//! Animation States and the Transition Rule Table
//!
//! The mascot is always in exactly one [`AnimationState`]. States carry a
//! fixed priority; a request to enter a strictly higher-priority state is an
//! *escalation* and is always legal unless the rule table explicitly forbids
//! it. Equal-or-lower-priority moves need an explicit `true` entry or a
//! forced override.
//!
//! The rule table is plain data: all 36 ordered (from, to) pairs are written
//! out, so the one asymmetric exception (EMOTION → INTERACTION is forbidden
//! even though both are "high" states) is a visible, testable entry rather
//! than a buried conditional.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The six states the mascot can be in, ordered by priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    /// Powered down / dormant.
    Off,
    /// Default resting loop (floating, breathing, blinking).
    Idle,
    /// Power on/off choreography.
    Transition,
    /// Shape-shift between character and search-bar form.
    Morph,
    /// User actively engaged (search bar focused, typing).
    Interaction,
    /// One-shot reactive expression (happy, excited, shocked, ...).
    Emotion,
}

impl AnimationState {
    /// All states, in priority order.
    pub const ALL: [Self; 6] = [
        Self::Off,
        Self::Idle,
        Self::Transition,
        Self::Morph,
        Self::Interaction,
        Self::Emotion,
    ];

    /// Fixed priority rank (0 = lowest). TRANSITION and MORPH share a tier;
    /// they are never requested simultaneously.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Idle => 1,
            Self::Transition | Self::Morph => 2,
            Self::Interaction => 3,
            Self::Emotion => 4,
        }
    }

    /// Uppercase display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Idle => "IDLE",
            Self::Transition => "TRANSITION",
            Self::Morph => "MORPH",
            Self::Interaction => "INTERACTION",
            Self::Emotion => "EMOTION",
        }
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

use AnimationState::{Emotion, Idle, Interaction, Morph, Off, Transition};

/// Every ordered (from, to) pair and whether the move is allowed without a
/// forced override. Escalations are `true`, self-moves are `true`, everything
/// descending or tier-internal is `false`.
///
/// The single deliberate asymmetry: EMOTION → INTERACTION is `false` so that
/// focusing the search bar can never cut off an in-flight emotion.
const RULES: [(AnimationState, AnimationState, bool); 36] = [
    // From OFF: everything above is an escalation.
    (Off, Off, true),
    (Off, Idle, true),
    (Off, Transition, true),
    (Off, Morph, true),
    (Off, Interaction, true),
    (Off, Emotion, true),
    // From IDLE: powering down needs force, everything else escalates.
    (Idle, Off, false),
    (Idle, Idle, true),
    (Idle, Transition, true),
    (Idle, Morph, true),
    (Idle, Interaction, true),
    (Idle, Emotion, true),
    // From TRANSITION: exits go through forced completion hand-offs.
    (Transition, Off, false),
    (Transition, Idle, false),
    (Transition, Transition, true),
    (Transition, Morph, false),
    (Transition, Interaction, true),
    (Transition, Emotion, true),
    // From MORPH: same tier as TRANSITION, mutually exclusive.
    (Morph, Off, false),
    (Morph, Idle, false),
    (Morph, Transition, false),
    (Morph, Morph, true),
    (Morph, Interaction, true),
    (Morph, Emotion, true),
    // From INTERACTION: only an emotion may interrupt without force.
    (Interaction, Off, false),
    (Interaction, Idle, false),
    (Interaction, Transition, false),
    (Interaction, Morph, false),
    (Interaction, Interaction, true),
    (Interaction, Emotion, true),
    // From EMOTION: nothing interrupts a playing emotion. The INTERACTION
    // entry is the deliberate exception to "adjacency implies legality".
    (Emotion, Off, false),
    (Emotion, Idle, false),
    (Emotion, Transition, false),
    (Emotion, Morph, false),
    (Emotion, Interaction, false),
    (Emotion, Emotion, true),
];

/// The authoritative transition table.
///
/// Normally constructed once per [`StateMachine`](crate::StateMachine) via
/// [`TransitionRules::standard`]. Tests mutate copies to exercise the
/// missing-rule fallback.
#[derive(Clone, Debug)]
pub struct TransitionRules {
    map: HashMap<(AnimationState, AnimationState), bool>,
}

impl TransitionRules {
    /// Build the standard 36-entry table.
    #[must_use]
    pub fn standard() -> Self {
        let map = RULES.iter().map(|&(f, t, ok)| ((f, t), ok)).collect();
        Self { map }
    }

    /// Look up a pair. `None` means the table has a gap (a programming
    /// error, surfaced by [`Self::validate`]).
    #[must_use]
    pub fn allows(&self, from: AnimationState, to: AnimationState) -> Option<bool> {
        self.map.get(&(from, to)).copied()
    }

    /// Remove a pair from the table. Diagnostic/testing aid for exercising
    /// the missing-rule fallback; production code never calls this.
    pub fn remove(&mut self, from: AnimationState, to: AnimationState) -> Option<bool> {
        self.map.remove(&(from, to))
    }

    /// Number of entries present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Verify the table is total: every ordered pair of states has an entry.
    ///
    /// Logs an error for each gap and returns `false` if any pair is
    /// unspecified. Run at startup/test time to catch missing-rule bugs
    /// before they manifest as silently-stuck animations.
    #[must_use]
    pub fn validate(&self) -> bool {
        let mut complete = true;
        for from in AnimationState::ALL {
            for to in AnimationState::ALL {
                if !self.map.contains_key(&(from, to)) {
                    tracing::error!(%from, %to, "transition rule table is missing an entry");
                    complete = false;
                }
            }
        }
        complete
    }
}

impl Default for TransitionRules {
    fn default() -> Self {
        Self::standard()
    }
}
