//! The Stage: shared visual property store
//!
//! Stands in for the DOM/SVG elements the original character is built from.
//! Timelines and trackers write property values here; the host reads them
//! back each frame to render however it likes (terminal cells, SVG, canvas).
//!
//! Exactly one writer may drive a given (element, property) slot at any
//! instant. That mutual exclusion is policy, not a lock: only the controller
//! starts writers, and it kills prior tweens on the elements it is about to
//! re-target. The [`ConflictTracker`](crate::ConflictTracker) audits the
//! policy during development.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The character's visual parts plus the morph target's parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementId {
    /// The mascot's body (position drives shadow/glow followers).
    Body,
    /// Left eye.
    EyeLeft,
    /// Right eye.
    EyeRight,
    /// Left search-bar bracket.
    BracketLeft,
    /// Right search-bar bracket.
    BracketRight,
    /// Ground shadow under the body.
    Shadow,
    /// Ambient glow behind the body.
    Glow,
    /// The morphed search input field.
    SearchField,
}

impl ElementId {
    /// All elements.
    pub const ALL: [Self; 8] = [
        Self::Body,
        Self::EyeLeft,
        Self::EyeRight,
        Self::BracketLeft,
        Self::BracketRight,
        Self::Shadow,
        Self::Glow,
        Self::SearchField,
    ];
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Body => "body",
            Self::EyeLeft => "eye-left",
            Self::EyeRight => "eye-right",
            Self::BracketLeft => "bracket-left",
            Self::BracketRight => "bracket-right",
            Self::Shadow => "shadow",
            Self::Glow => "glow",
            Self::SearchField => "search-field",
        };
        f.write_str(name)
    }
}

/// Continuous properties a tween can drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyId {
    /// Horizontal offset from the element's rest position.
    X,
    /// Vertical offset from rest; negative is up (rise off the ground).
    Y,
    /// Uniform scale, 1.0 at rest.
    Scale,
    /// Rotation in degrees.
    Rotation,
    /// Opacity, 0.0–1.0.
    Opacity,
}

impl PropertyId {
    /// Rest-pose value for a property.
    #[must_use]
    pub const fn rest_value(self) -> f32 {
        match self {
            Self::X | Self::Y | Self::Rotation => 0.0,
            Self::Scale | Self::Opacity => 1.0,
        }
    }
}

/// Discrete eye shapes. The actual path/glyph data is the host's concern;
/// the engine keys shapes symbolically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum EyeShape {
    /// Round open eye, the rest shape.
    #[default]
    Open,
    /// Mid-blink slit.
    Blink,
    /// Happy arc.
    Happy,
    /// Wide sparkling eye.
    Excited,
    /// Startled wide circle.
    Shocked,
    /// Sideways questioning look.
    Curious,
    /// Drooping half-closed lid.
    Sleepy,
    /// Heart shape.
    Love,
    /// Powered-down glyph.
    Off,
    /// Square bracket half, used in search-bar form.
    Bracket,
}

/// Owned property store for one character instance.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    values: HashMap<(ElementId, PropertyId), f32>,
    shapes: HashMap<ElementId, EyeShape>,
}

impl Stage {
    /// Create a stage in the rest pose: everything grounded, opaque,
    /// unscaled, eyes open.
    #[must_use]
    pub fn new() -> Self {
        let mut stage = Self::default();
        // The search field starts invisible until a morph reveals it.
        stage.set(ElementId::SearchField, PropertyId::Opacity, 0.0);
        stage
    }

    /// Read a property, falling back to its rest value.
    #[must_use]
    pub fn get(&self, element: ElementId, property: PropertyId) -> f32 {
        self.values
            .get(&(element, property))
            .copied()
            .unwrap_or_else(|| property.rest_value())
    }

    /// Write a property.
    pub fn set(&mut self, element: ElementId, property: PropertyId, value: f32) {
        self.values.insert((element, property), value);
    }

    /// Current shape of an element (meaningful for the eyes).
    #[must_use]
    pub fn shape(&self, element: ElementId) -> EyeShape {
        self.shapes.get(&element).copied().unwrap_or_default()
    }

    /// Set an element's shape.
    pub fn set_shape(&mut self, element: ElementId, shape: EyeShape) {
        self.shapes.insert(element, shape);
    }

    /// Snap an element's continuous properties back to the rest pose.
    pub fn reset_element(&mut self, element: ElementId) {
        for property in [
            PropertyId::X,
            PropertyId::Y,
            PropertyId::Scale,
            PropertyId::Rotation,
            PropertyId::Opacity,
        ] {
            self.values.remove(&(element, property));
        }
    }
}
