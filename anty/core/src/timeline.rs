//! Phased Timelines
//!
//! A timeline is one choreography (one emotion, one power-off, one morph):
//! an explicit ordered list of phases, each with a start offset, duration,
//! easing, and the property writes it performs. Phase lists are plain data,
//! so total duration and phase ordering are testable without running real
//! frames.
//!
//! Playback is frame-driven. [`PlayingTimeline::advance`] consumes a delta,
//! writes interpolated values into the [`Stage`], and reports completion.
//! Tween start values are captured from the stage when a phase first becomes
//! active, so a timeline killed mid-flight leaves elements wherever they
//! were and the next timeline picks up from there.

use std::collections::HashSet;
use std::time::Duration;

use crate::easing::Easing;
use crate::stage::{ElementId, EyeShape, PropertyId, Stage};

/// A single property write performed by a phase.
#[derive(Clone, Copy, Debug)]
pub enum PhaseOp {
    /// Interpolate a continuous property from its value at phase start to
    /// `to` over the phase duration.
    Tween {
        /// Target element.
        element: ElementId,
        /// Property to drive.
        property: PropertyId,
        /// End value.
        to: f32,
    },
    /// Snap an element's shape at phase start (no interpolation).
    SetShape {
        /// Target element.
        element: ElementId,
        /// Shape to apply.
        shape: EyeShape,
    },
}

/// One phase of a choreography.
#[derive(Clone, Debug)]
pub struct Phase {
    /// Short label for logs and debug overlays.
    pub label: &'static str,
    /// Offset from timeline start.
    pub start_offset: Duration,
    /// How long the phase's tweens run. Zero means snap.
    pub duration: Duration,
    /// Easing applied to tween progress.
    pub easing: Easing,
    /// Property writes this phase performs.
    pub ops: Vec<PhaseOp>,
}

impl Phase {
    /// Create an empty phase at `start_offset_ms` running `duration_ms`.
    #[must_use]
    pub fn new(label: &'static str, start_offset_ms: u64, duration_ms: u64, easing: Easing) -> Self {
        Self {
            label,
            start_offset: Duration::from_millis(start_offset_ms),
            duration: Duration::from_millis(duration_ms),
            easing,
            ops: Vec::new(),
        }
    }

    /// Add a tween op.
    #[must_use]
    pub fn tween(mut self, element: ElementId, property: PropertyId, to: f32) -> Self {
        self.ops.push(PhaseOp::Tween {
            element,
            property,
            to,
        });
        self
    }

    /// Add a shape snap op.
    #[must_use]
    pub fn set_shape(mut self, element: ElementId, shape: EyeShape) -> Self {
        self.ops.push(PhaseOp::SetShape { element, shape });
        self
    }

    /// Moment this phase ends.
    #[must_use]
    pub fn end_offset(&self) -> Duration {
        self.start_offset + self.duration
    }
}

/// A complete choreography, ready to play.
#[derive(Clone, Debug)]
pub struct Timeline {
    name: &'static str,
    looping: bool,
    phases: Vec<Phase>,
}

impl Timeline {
    /// Build a timeline. Phases are sorted by start offset so playback and
    /// introspection always see them in choreography order.
    #[must_use]
    pub fn new(name: &'static str, looping: bool, mut phases: Vec<Phase>) -> Self {
        phases.sort_by_key(|p| p.start_offset);
        Self {
            name,
            looping,
            phases,
        }
    }

    /// Timeline name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the timeline repeats until killed.
    #[must_use]
    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Phases in start-offset order.
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Total choreography duration: the latest phase end.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.phases
            .iter()
            .map(Phase::end_offset)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Every element this timeline touches. The controller kills prior
    /// tweens on exactly these before starting playback.
    #[must_use]
    pub fn elements(&self) -> HashSet<ElementId> {
        let mut set = HashSet::new();
        for phase in &self.phases {
            for op in &phase.ops {
                match *op {
                    PhaseOp::Tween { element, .. } | PhaseOp::SetShape { element, .. } => {
                        set.insert(element);
                    }
                }
            }
        }
        set
    }
}

#[derive(Clone, Debug, Default)]
struct PhaseRuntime {
    started: bool,
    /// Captured tween start values, indexed like the phase's ops.
    captures: Vec<f32>,
}

/// An in-flight timeline writing into a stage each tick.
#[derive(Clone, Debug)]
pub struct PlayingTimeline {
    timeline: Timeline,
    elapsed: Duration,
    paused: bool,
    completed: bool,
    runtime: Vec<PhaseRuntime>,
}

impl PlayingTimeline {
    /// Begin playback from the stage's current values.
    #[must_use]
    pub fn start(timeline: Timeline) -> Self {
        let runtime = vec![PhaseRuntime::default(); timeline.phases.len()];
        Self {
            timeline,
            elapsed: Duration::ZERO,
            paused: false,
            completed: false,
            runtime,
        }
    }

    /// The underlying choreography.
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Suspend playback without losing position.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume a paused timeline.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether playback is currently suspended.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether a non-looping timeline has finished.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Advance playback by `delta`, writing interpolated values into the
    /// stage. Returns `true` exactly once, on the tick a non-looping
    /// timeline completes.
    pub fn advance(&mut self, delta: Duration, stage: &mut Stage) -> bool {
        if self.paused || self.completed {
            return false;
        }

        self.elapsed += delta;
        let total = self.timeline.total_duration();

        for (index, phase) in self.timeline.phases.iter().enumerate() {
            if self.elapsed < phase.start_offset {
                // Sorted by start offset; nothing later is active either.
                break;
            }
            let runtime = &mut self.runtime[index];
            if !runtime.started {
                runtime.started = true;
                runtime.captures = phase
                    .ops
                    .iter()
                    .map(|op| match *op {
                        PhaseOp::Tween {
                            element, property, ..
                        } => stage.get(element, property),
                        PhaseOp::SetShape { element, shape } => {
                            stage.set_shape(element, shape);
                            0.0
                        }
                    })
                    .collect();
            }

            let t = if phase.duration.is_zero() {
                1.0
            } else {
                ((self.elapsed - phase.start_offset).as_secs_f32()
                    / phase.duration.as_secs_f32())
                .min(1.0)
            };
            let eased = phase.easing.apply(t);
            for (op, &from) in phase.ops.iter().zip(&runtime.captures) {
                if let PhaseOp::Tween {
                    element,
                    property,
                    to,
                } = *op
                {
                    stage.set(element, property, from + (to - from) * eased);
                }
            }
        }

        if self.elapsed >= total {
            // Land exactly on the end pose, including phases a large delta
            // skipped entirely.
            self.finish(stage);
            if self.timeline.looping {
                while self.elapsed >= total && !total.is_zero() {
                    self.elapsed -= total;
                }
                for runtime in &mut self.runtime {
                    runtime.started = false;
                    runtime.captures.clear();
                }
                return false;
            }
            self.completed = true;
            return true;
        }
        false
    }

    fn finish(&self, stage: &mut Stage) {
        for phase in &self.timeline.phases {
            for op in &phase.ops {
                match *op {
                    PhaseOp::Tween {
                        element,
                        property,
                        to,
                    } => stage.set(element, property, to),
                    PhaseOp::SetShape { element, shape } => stage.set_shape(element, shape),
                }
            }
        }
    }
}
