//! The Animation State Machine
//!
//! Pure decision component: given a requested target state, decide whether
//! the move from the current state is permitted right now, and if so commit
//! to it. The machine never touches visual elements; the
//! [`AnimationController`](crate::AnimationController) owns one machine per
//! rendered character and consults it before starting any timeline.
//!
//! Denial is not an error. `transition` returning `false` is the only
//! failure signal, and callers treat it as "try later" or "no-op".

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::state::{AnimationState, TransitionRules};

/// Bounded history size; oldest entries are evicted FIFO.
const HISTORY_LIMIT: usize = 50;

/// One committed state, with the moment it was entered.
#[derive(Clone, Copy, Debug)]
pub struct HistoryEntry {
    /// The state that was committed.
    pub state: AnimationState,
    /// When the transition was recorded.
    pub at: Instant,
}

/// Introspection snapshot, cheap to produce and render in a debug overlay.
#[derive(Clone, Debug, Serialize)]
pub struct MachineDebugInfo {
    /// Current state.
    pub current_state: AnimationState,
    /// Previous state, if any transition has happened.
    pub previous_state: Option<AnimationState>,
    /// Priority rank of the current state.
    pub current_priority: u8,
    /// Total entries retained in history.
    pub history_size: usize,
    /// Most recent entries, oldest first, as `"STATE (1.2s ago)"` strings.
    pub recent_history: Vec<String>,
}

/// Priority-gated state machine for one mascot instance.
#[derive(Debug)]
pub struct StateMachine {
    current: AnimationState,
    previous: Option<AnimationState>,
    rules: TransitionRules,
    history: VecDeque<HistoryEntry>,
}

impl StateMachine {
    /// Create a fresh machine in IDLE with the standard rule table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(TransitionRules::standard())
    }

    /// Create a machine with a custom rule table (testing aid).
    #[must_use]
    pub fn with_rules(rules: TransitionRules) -> Self {
        let mut machine = Self {
            current: AnimationState::Idle,
            previous: None,
            rules,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
        };
        machine.record(AnimationState::Idle);
        machine
    }

    /// The state the mascot is currently in. Always defined.
    #[must_use]
    pub fn current_state(&self) -> AnimationState {
        self.current
    }

    /// The state before the last committed transition. `None` only before
    /// the first transition.
    #[must_use]
    pub fn previous_state(&self) -> Option<AnimationState> {
        self.previous
    }

    /// Fixed priority rank for a state (0–4).
    #[must_use]
    pub fn priority(&self, state: AnimationState) -> u8 {
        state.priority()
    }

    /// Request a transition to `to`.
    ///
    /// With `force` the move always succeeds and bypasses both the rule
    /// table and the priority check. A self-transition is always allowed and
    /// records a fresh history entry without changing the previous state.
    /// Returns whether the transition was committed.
    pub fn transition(&mut self, to: AnimationState, force: bool) -> bool {
        if force {
            tracing::debug!(from = %self.current, %to, "forced transition");
            self.commit(to);
            return true;
        }

        if to == self.current {
            self.record(to);
            return true;
        }

        if self.can_transition(self.current, to) {
            tracing::debug!(from = %self.current, %to, "transition granted");
            self.commit(to);
            true
        } else {
            tracing::debug!(from = %self.current, %to, "transition denied");
            false
        }
    }

    /// Pure predicate: would a move from `from` to `to` be permitted without
    /// force? No side effects; usable for pre-flight checks.
    #[must_use]
    pub fn can_transition(&self, from: AnimationState, to: AnimationState) -> bool {
        if from == to {
            return true;
        }
        match self.rules.allows(from, to) {
            Some(allowed) => allowed,
            None => {
                // A gap in the table degrades to over-cautious blocking:
                // escalation stays legal, everything else is denied.
                tracing::error!(%from, %to, "no transition rule for pair, using escalation default");
                to.priority() > from.priority()
            }
        }
    }

    /// Whether `to` may interrupt the *current* state. With `force` this is
    /// always `true`. Never mutates state.
    #[must_use]
    pub fn can_interrupt(&self, to: AnimationState, force: bool) -> bool {
        force || self.can_transition(self.current, to)
    }

    /// Force the machine back to IDLE unconditionally. The escape path every
    /// caller can take to un-stick the character.
    pub fn reset(&mut self) {
        tracing::debug!(from = %self.current, "state machine reset");
        self.commit(AnimationState::Idle);
    }

    /// Full retained history, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.iter().copied().collect()
    }

    /// The last `n` history entries, oldest-of-the-slice first.
    #[must_use]
    pub fn recent_history(&self, n: usize) -> Vec<HistoryEntry> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).copied().collect()
    }

    /// Snapshot for debug overlays and logs.
    #[must_use]
    pub fn debug_info(&self) -> MachineDebugInfo {
        MachineDebugInfo {
            current_state: self.current,
            previous_state: self.previous,
            current_priority: self.current.priority(),
            history_size: self.history.len(),
            recent_history: self
                .recent_history(10)
                .iter()
                .map(|e| format!("{} ({})", e.state, format_elapsed(e.at.elapsed())))
                .collect(),
        }
    }

    /// Verify the standard rule table is total. Logs and returns `false` on
    /// any gap.
    #[must_use]
    pub fn validate_rules() -> bool {
        TransitionRules::standard().validate()
    }

    fn commit(&mut self, to: AnimationState) {
        self.previous = Some(self.current);
        self.current = to;
        self.record(to);
    }

    fn record(&mut self, state: AnimationState) {
        if self.history.len() == HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            state,
            at: Instant::now(),
        });
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an elapsed duration as a short human-readable string.
fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        format!("{}ms ago", elapsed.as_millis())
    } else if secs < 60.0 {
        format!("{secs:.1}s ago")
    } else {
        format!("{:.1}m ago", secs / 60.0)
    }
}
