//! Shadow and Glow Followers
//!
//! Continuous per-frame observers that derive secondary visuals from the
//! body's current height, independent of which discrete state caused the
//! rise. The mapping uses a front-loaded power curve (exponent 0.6) so the
//! shadow reacts quickly to small hops and flattens out near the top.
//!
//! Followers are not gated by the state machine. When a choreography takes
//! explicit control of the shadow or glow (power-off does), the controller
//! pauses the follower first so two writers never fight over the same
//! property within a frame.

use crate::stage::{ElementId, PropertyId, Stage};

/// Exponent of the rise → effect curve; front-loaded (< 1.0).
const CURVE_EXPONENT: f32 = 0.6;

/// Rise (in stage units) at which the effect saturates.
const MAX_RISE: f32 = 10.0;

/// Fraction of the effect applied for the body's current height.
fn rise_fraction(stage: &Stage) -> f32 {
    let rise = -stage.get(ElementId::Body, PropertyId::Y);
    (rise.max(0.0) / MAX_RISE).min(1.0).powf(CURVE_EXPONENT)
}

/// Ground shadow follower: shrinks and fades as the body rises.
#[derive(Clone, Debug)]
pub struct ShadowTracker {
    attached: bool,
    paused: bool,
}

impl ShadowTracker {
    /// Shadow scale when the body is at maximum rise.
    const MIN_SCALE: f32 = 0.55;
    /// Shadow opacity when the body is at maximum rise.
    const MIN_OPACITY: f32 = 0.3;

    /// Create a detached tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attached: false,
            paused: false,
        }
    }

    /// Begin per-frame updates.
    pub fn start(&mut self) {
        self.attached = true;
        self.paused = false;
    }

    /// Remove the per-frame hook entirely.
    pub fn stop(&mut self) {
        self.attached = false;
    }

    /// Temporarily suspend updates without detaching.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after a pause.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether updates are currently being applied.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.attached && !self.paused
    }

    /// Snap the shadow to its resting values, bypassing interpolation.
    /// Used when forcibly resetting state.
    pub fn set_grounded(&self, stage: &mut Stage) {
        stage.set(ElementId::Shadow, PropertyId::Scale, 1.0);
        stage.set(ElementId::Shadow, PropertyId::Opacity, 1.0);
    }

    /// Per-frame update: read the body height, write the shadow.
    pub fn update(&self, stage: &mut Stage) {
        if !self.is_active() {
            return;
        }
        let f = rise_fraction(stage);
        stage.set(
            ElementId::Shadow,
            PropertyId::Scale,
            1.0 - (1.0 - Self::MIN_SCALE) * f,
        );
        stage.set(
            ElementId::Shadow,
            PropertyId::Opacity,
            1.0 - (1.0 - Self::MIN_OPACITY) * f,
        );
    }
}

impl Default for ShadowTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Ambient glow follower: brightens as the body rises.
#[derive(Clone, Debug)]
pub struct GlowTracker {
    attached: bool,
    paused: bool,
}

impl GlowTracker {
    /// Glow opacity with the body grounded.
    const BASE_OPACITY: f32 = 0.4;

    /// Create a detached tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            attached: false,
            paused: false,
        }
    }

    /// Begin per-frame updates.
    pub fn start(&mut self) {
        self.attached = true;
        self.paused = false;
    }

    /// Remove the per-frame hook entirely.
    pub fn stop(&mut self) {
        self.attached = false;
    }

    /// Temporarily suspend updates without detaching.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after a pause.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Whether updates are currently being applied.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.attached && !self.paused
    }

    /// Snap the glow to its resting value.
    pub fn set_grounded(&self, stage: &mut Stage) {
        stage.set(ElementId::Glow, PropertyId::Opacity, Self::BASE_OPACITY);
    }

    /// Per-frame update: read the body height, write the glow.
    pub fn update(&self, stage: &mut Stage) {
        if !self.is_active() {
            return;
        }
        let f = rise_fraction(stage);
        stage.set(
            ElementId::Glow,
            PropertyId::Opacity,
            Self::BASE_OPACITY + (1.0 - Self::BASE_OPACITY) * f,
        );
    }
}

impl Default for GlowTracker {
    fn default() -> Self {
        Self::new()
    }
}
