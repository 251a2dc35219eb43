//! Element-Ownership Conflict Tracker
//!
//! Development aid. Records which animation sources are currently touching
//! which elements and shouts (via `tracing::warn!`) when an element ends up
//! owned by two *different* source tags at once. That situation means some
//! code path bypassed the controller and mutated a shared element directly,
//! which is exactly the bug class the state machine exists to prevent.
//!
//! The registry never gates execution; conflicts are reported, not blocked.

use std::collections::{HashMap, HashSet};

use crate::stage::ElementId;

/// Who started an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationSource {
    /// Started by the controller after a state-machine grant.
    Controller,
    /// Started ad hoc, outside the controller's authority.
    Manual,
}

impl std::fmt::Display for AnimationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Controller => f.write_str("controller"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// A detected double-ownership.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// The contested element.
    pub element: ElementId,
    /// The source already holding the element.
    pub existing: AnimationSource,
    /// The source that just grabbed it too.
    pub incoming: AnimationSource,
}

#[derive(Clone, Copy, Debug)]
struct Ownership {
    animation: u64,
    source: AnimationSource,
}

/// Registry of which animations currently own which elements.
#[derive(Debug, Default)]
pub struct ConflictTracker {
    owners: HashMap<ElementId, Vec<Ownership>>,
    conflicts: Vec<Conflict>,
}

impl ConflictTracker {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `animation` (from `source`) started touching `elements`.
    /// Reports a conflict for every element already owned by a different
    /// source tag.
    pub fn register(
        &mut self,
        animation: u64,
        source: AnimationSource,
        elements: &HashSet<ElementId>,
    ) {
        for &element in elements {
            let owners = self.owners.entry(element).or_default();
            for existing in owners.iter() {
                if existing.source != source {
                    tracing::warn!(
                        %element,
                        existing = %existing.source,
                        incoming = %source,
                        "CONFLICT: two animation sources are driving the same element"
                    );
                    self.conflicts.push(Conflict {
                        element,
                        existing: existing.source,
                        incoming: source,
                    });
                }
            }
            owners.push(Ownership { animation, source });
        }
    }

    /// Release everything `animation` owned (completion or explicit stop).
    pub fn release(&mut self, animation: u64) {
        for owners in self.owners.values_mut() {
            owners.retain(|o| o.animation != animation);
        }
        self.owners.retain(|_, owners| !owners.is_empty());
    }

    /// How many animations currently own `element`.
    #[must_use]
    pub fn owner_count(&self, element: ElementId) -> usize {
        self.owners.get(&element).map_or(0, Vec::len)
    }

    /// Conflicts detected so far.
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Forget recorded conflicts (the ownership registry is untouched).
    pub fn clear_conflicts(&mut self) {
        self.conflicts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn elements(ids: &[ElementId]) -> HashSet<ElementId> {
        ids.iter().copied().collect()
    }

    #[test]
    fn test_single_source_never_conflicts() {
        let mut tracker = ConflictTracker::new();
        tracker.register(
            1,
            AnimationSource::Controller,
            &elements(&[ElementId::Body, ElementId::EyeLeft]),
        );
        tracker.register(
            2,
            AnimationSource::Controller,
            &elements(&[ElementId::Body]),
        );
        assert!(tracker.conflicts().is_empty());
        assert_eq!(tracker.owner_count(ElementId::Body), 2);
    }

    #[test]
    fn test_cross_source_ownership_is_flagged() {
        let mut tracker = ConflictTracker::new();
        tracker.register(1, AnimationSource::Controller, &elements(&[ElementId::Body]));
        tracker.register(2, AnimationSource::Manual, &elements(&[ElementId::Body]));

        assert_eq!(tracker.conflicts().len(), 1);
        let conflict = tracker.conflicts()[0];
        assert_eq!(conflict.element, ElementId::Body);
        assert_eq!(conflict.existing, AnimationSource::Controller);
        assert_eq!(conflict.incoming, AnimationSource::Manual);
    }

    #[test]
    fn test_release_removes_ownership() {
        let mut tracker = ConflictTracker::new();
        tracker.register(1, AnimationSource::Controller, &elements(&[ElementId::Body]));
        tracker.release(1);
        assert_eq!(tracker.owner_count(ElementId::Body), 0);

        // After release, a manual writer is no longer a conflict.
        tracker.register(2, AnimationSource::Manual, &elements(&[ElementId::Body]));
        assert!(tracker.conflicts().is_empty());
    }

    #[test]
    fn test_disjoint_elements_do_not_conflict() {
        let mut tracker = ConflictTracker::new();
        tracker.register(1, AnimationSource::Controller, &elements(&[ElementId::Body]));
        tracker.register(2, AnimationSource::Manual, &elements(&[ElementId::Shadow]));
        assert!(tracker.conflicts().is_empty());
    }

    #[test]
    fn test_clear_conflicts_keeps_registry() {
        let mut tracker = ConflictTracker::new();
        tracker.register(1, AnimationSource::Controller, &elements(&[ElementId::Body]));
        tracker.register(2, AnimationSource::Manual, &elements(&[ElementId::Body]));
        tracker.clear_conflicts();
        assert!(tracker.conflicts().is_empty());
        assert_eq!(tracker.owner_count(ElementId::Body), 2);
    }
}
