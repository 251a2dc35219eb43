//! Animation Controller
//!
//! The single authorized entry point for anything that wants to move the
//! mascot. Every operation follows the same shape:
//!
//! 1. Ask the [`StateMachine`] for the target state. Denied → no-op, return
//!    `false`, and nothing touches the stage.
//! 2. Granted → kill whatever tween set was driving the elements the new
//!    timeline is about to re-target, then start the new timeline.
//! 3. On natural completion of a one-shot, transition back toward
//!    IDLE/INTERACTION/OFF, using force only where priority demands it.
//!
//! All progression is frame-driven: the host calls [`AnimationController::tick`]
//! once per frame with the elapsed delta and receives completion events back.
//! Calls return immediately; nothing blocks.

use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;

use crate::config::{SearchBarConfig, SearchTarget};
use crate::conflict::{AnimationSource, ConflictTracker};
use crate::machine::{MachineDebugInfo, StateMachine};
use crate::stage::{ElementId, EyeShape, Stage};
use crate::state::AnimationState;
use crate::timeline::{PlayingTimeline, Timeline};
use crate::timelines::{emotion, idle, morph, power, Emotion, EmotionOptions};
use crate::trackers::{GlowTracker, ShadowTracker};

/// What a running timeline is for; routes its completion handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimelineKind {
    Idle,
    Emotion(Emotion),
    PowerOff,
    WakeUp,
    MorphToSearch,
    MorphToCharacter,
}

/// Notifications produced by [`AnimationController::tick`]. The synchronous
/// analogue of completion callbacks: the host drains them each frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineEvent {
    /// An emotion asked for a particle burst; the host's particle system
    /// decides what that looks like.
    SpawnParticles {
        /// The emotion that requested the burst.
        emotion: Emotion,
    },
    /// A one-shot emotion finished naturally.
    EmotionComplete(Emotion),
    /// The power-off choreography finished; the character is dormant.
    PoweredOff,
    /// The wake-up choreography finished; the character is idling again.
    WokeUp,
    /// The morph into search-bar form finished; interaction may begin.
    SearchOpened,
    /// The morph back into character form finished.
    SearchClosed,
}

struct ActiveTimeline {
    id: u64,
    kind: TimelineKind,
    playing: PlayingTimeline,
}

/// Debug snapshot of the whole controller, for overlays and consoles.
#[derive(Clone, Debug, Serialize)]
pub struct ControllerDebugInfo {
    /// State machine introspection.
    pub machine: MachineDebugInfo,
    /// Names of the timelines currently playing.
    pub active_timelines: Vec<String>,
    /// Whether the character is in search-bar form.
    pub search_mode: bool,
    /// Whether the shadow follower is applying updates.
    pub shadow_active: bool,
    /// Whether the glow follower is applying updates.
    pub glow_active: bool,
    /// Conflicts the ownership registry has recorded.
    pub conflict_count: usize,
}

/// Orchestrates one mascot instance: owns its state machine, stage,
/// followers, and every timeline that runs. Construct one per rendered
/// character; instances share nothing.
pub struct AnimationController {
    machine: StateMachine,
    stage: Stage,
    active: Vec<ActiveTimeline>,
    next_id: u64,
    shadow: ShadowTracker,
    glow: GlowTracker,
    conflicts: ConflictTracker,
    config: SearchBarConfig,
    search_target: Option<SearchTarget>,
    search_mode: bool,
    pending: Vec<EngineEvent>,
}

impl AnimationController {
    /// Create a controller in IDLE with the idle loop and followers running.
    #[must_use]
    pub fn new(config: SearchBarConfig) -> Self {
        debug_assert!(StateMachine::validate_rules());

        let mut controller = Self {
            machine: StateMachine::new(),
            stage: Stage::new(),
            active: Vec::new(),
            next_id: 0,
            shadow: ShadowTracker::new(),
            glow: GlowTracker::new(),
            conflicts: ConflictTracker::new(),
            config,
            search_target: None,
            search_mode: false,
            pending: Vec::new(),
        };
        controller.begin(TimelineKind::Idle, idle::build(&mut rand::thread_rng()));
        controller.shadow.start();
        controller.glow.start();
        controller.shadow.set_grounded(&mut controller.stage);
        controller.glow.set_grounded(&mut controller.stage);
        controller
    }

    // ------------------------------------------------------------------
    // Imperative control surface (UI → controller)
    // ------------------------------------------------------------------

    /// Play a one-shot emotion. Returns whether the state machine granted
    /// it and the timeline started. A dormant character shows nothing, so
    /// emotions while OFF are refused before the machine is asked.
    pub fn play_emotion(&mut self, emotion: Emotion, options: EmotionOptions) -> bool {
        if self.machine.current_state() == AnimationState::Off {
            tracing::debug!(emotion = emotion.name(), "emotion refused while dormant");
            return false;
        }
        if !self.machine.transition(AnimationState::Emotion, false) {
            tracing::debug!(emotion = emotion.name(), "emotion denied");
            return false;
        }
        self.pause_idle();
        if options.particles {
            self.pending.push(EngineEvent::SpawnParticles { emotion });
        }
        let rest_shape = if self.search_mode {
            EyeShape::Bracket
        } else {
            EyeShape::Open
        };
        self.begin(
            TimelineKind::Emotion(emotion),
            emotion::build(emotion, options, rest_shape),
        );
        true
    }

    /// Run the power-off choreography. The shadow and glow followers are
    /// paused for the duration; the choreography drives them explicitly.
    pub fn power_off(&mut self) -> bool {
        if !self.machine.transition(AnimationState::Transition, false) {
            tracing::debug!("power-off denied");
            return false;
        }
        self.remove_idle();
        self.shadow.pause();
        self.glow.pause();
        self.begin(TimelineKind::PowerOff, power::off());
        true
    }

    /// Run the wake-up choreography. Only a dormant character can wake;
    /// calling this in any other state is a logged no-op. Idle and the
    /// followers restart when the choreography completes.
    pub fn wake_up(&mut self) -> bool {
        if self.machine.current_state() != AnimationState::Off {
            tracing::debug!(state = %self.machine.current_state(), "wake-up refused while not dormant");
            return false;
        }
        if !self.machine.transition(AnimationState::Transition, false) {
            tracing::debug!("wake-up denied");
            return false;
        }
        // Normally already the case after power-off; restated so the wake
        // choreography is the sole writer of the body and followers.
        self.remove_idle();
        self.shadow.pause();
        self.glow.pause();
        self.begin(TimelineKind::WakeUp, power::wake());
        true
    }

    /// Morph the character into search-bar form. Denied as a no-op when the
    /// search-bar target has not been measured yet.
    pub fn morph_to_search_bar(&mut self) -> bool {
        let Some(target) = self.search_target else {
            tracing::warn!("morph requested but search-bar target is not measurable yet");
            return false;
        };
        if !self.machine.transition(AnimationState::Morph, false) {
            tracing::debug!("morph to search bar denied");
            return false;
        }
        self.pause_idle();
        self.shadow.pause();
        self.glow.pause();
        self.begin(
            TimelineKind::MorphToSearch,
            morph::to_search_bar(&self.config, target),
        );
        true
    }

    /// Morph from search-bar form back into the character. Leaving
    /// INTERACTION is a descent in priority, so this is a forced move.
    pub fn morph_to_character(&mut self) -> bool {
        if !self.search_mode {
            tracing::debug!("morph to character requested outside search mode");
            return false;
        }
        self.machine.transition(AnimationState::Morph, true);
        self.begin(TimelineKind::MorphToCharacter, morph::to_character());
        true
    }

    /// Suspend the idle loop without a state change. Used while a
    /// higher-priority animation drives the same transforms.
    pub fn pause_idle(&mut self) {
        if let Some(entry) = self.idle_mut() {
            entry.playing.pause();
        }
    }

    /// Resume a paused idle loop.
    pub fn resume_idle(&mut self) {
        if let Some(entry) = self.idle_mut() {
            entry.playing.resume();
        }
    }

    /// Emergency stop for unmount: kill every active tween and detach the
    /// followers. The stage is left wherever it was.
    pub fn kill_all(&mut self) {
        for entry in &self.active {
            self.conflicts.release(entry.id);
        }
        let killed = self.active.len();
        self.active.clear();
        self.shadow.stop();
        self.glow.stop();
        tracing::debug!(killed, "all timelines killed");
    }

    /// Escape hatch: force everything back to a grounded IDLE. Kills
    /// one-shot timelines, resets the stage to the rest pose, snaps the
    /// followers to grounded, and restarts the idle loop.
    pub fn reset(&mut self) {
        let stale: Vec<u64> = self
            .active
            .iter()
            .filter(|a| a.kind != TimelineKind::Idle)
            .map(|a| a.id)
            .collect();
        for id in &stale {
            self.conflicts.release(*id);
        }
        self.active.retain(|a| a.kind == TimelineKind::Idle);

        for element in ElementId::ALL {
            self.stage.reset_element(element);
        }
        self.stage.set(
            ElementId::SearchField,
            crate::stage::PropertyId::Opacity,
            0.0,
        );
        self.stage.set_shape(ElementId::EyeLeft, EyeShape::Open);
        self.stage.set_shape(ElementId::EyeRight, EyeShape::Open);

        self.machine.reset();
        self.search_mode = false;

        self.shadow.start();
        self.glow.start();
        self.shadow.set_grounded(&mut self.stage);
        self.glow.set_grounded(&mut self.stage);
        self.ensure_idle();
        self.resume_idle();
        tracing::debug!("controller reset to grounded idle");
    }

    // ------------------------------------------------------------------
    // Frame driving
    // ------------------------------------------------------------------

    /// Advance all active timelines by `delta`, apply the followers, handle
    /// completions, and return the events this frame produced.
    pub fn tick(&mut self, delta: Duration) -> Vec<EngineEvent> {
        let mut events = std::mem::take(&mut self.pending);

        let mut completed = Vec::new();
        for entry in &mut self.active {
            if entry.playing.advance(delta, &mut self.stage) {
                completed.push((entry.id, entry.kind));
            }
        }
        self.active.retain(|a| !a.playing.is_completed());
        for (id, kind) in completed {
            self.conflicts.release(id);
            self.on_complete(kind, &mut events);
        }

        // Followers run after the timelines so they see this frame's pose.
        self.shadow.update(&mut self.stage);
        self.glow.update(&mut self.stage);

        events
    }

    fn on_complete(&mut self, kind: TimelineKind, events: &mut Vec<EngineEvent>) {
        match kind {
            TimelineKind::Idle => {}
            TimelineKind::Emotion(emotion) => {
                // EMOTION outranks everything, so the hand-off back down is
                // forced; the bookkeeping state has in fact finished.
                if self.search_mode {
                    self.machine.transition(AnimationState::Interaction, true);
                } else {
                    // The emotion may have interrupted a choreography that
                    // removed idle or paused the followers; landing in IDLE
                    // must always leave a live character behind.
                    self.machine.transition(AnimationState::Idle, true);
                    self.shadow.resume();
                    self.glow.resume();
                    self.ensure_idle();
                    self.resume_idle();
                }
                events.push(EngineEvent::EmotionComplete(emotion));
            }
            TimelineKind::PowerOff => {
                self.machine.transition(AnimationState::Off, true);
                events.push(EngineEvent::PoweredOff);
            }
            TimelineKind::WakeUp => {
                self.machine.transition(AnimationState::Idle, true);
                self.shadow.resume();
                self.glow.resume();
                self.ensure_idle();
                self.resume_idle();
                events.push(EngineEvent::WokeUp);
            }
            TimelineKind::MorphToSearch => {
                // MORPH → INTERACTION is a plain escalation.
                self.machine.transition(AnimationState::Interaction, false);
                self.search_mode = true;
                events.push(EngineEvent::SearchOpened);
            }
            TimelineKind::MorphToCharacter => {
                self.machine.transition(AnimationState::Idle, true);
                self.search_mode = false;
                self.shadow.resume();
                self.glow.resume();
                self.ensure_idle();
                self.resume_idle();
                events.push(EngineEvent::SearchClosed);
            }
        }
    }

    // ------------------------------------------------------------------
    // Queries (controller → hosting UI)
    // ------------------------------------------------------------------

    /// Current animation state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.machine.current_state()
    }

    /// The state machine, for history and pre-flight checks.
    #[must_use]
    pub fn machine(&self) -> &StateMachine {
        &self.machine
    }

    /// The stage, for rendering.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Whether the character is currently in search-bar form.
    #[must_use]
    pub fn is_search_mode(&self) -> bool {
        self.search_mode
    }

    /// Search-bar styling, passed through to the host's renderer.
    #[must_use]
    pub fn config(&self) -> &SearchBarConfig {
        &self.config
    }

    /// Supply (or clear) the measured geometry of the search-bar target.
    pub fn set_search_target(&mut self, target: Option<SearchTarget>) {
        self.search_target = target;
    }

    /// The conflict registry, for ad-hoc animation sources to register
    /// against during development.
    pub fn conflict_tracker_mut(&mut self) -> &mut ConflictTracker {
        &mut self.conflicts
    }

    /// Snapshot for debug overlays.
    #[must_use]
    pub fn debug_snapshot(&self) -> ControllerDebugInfo {
        ControllerDebugInfo {
            machine: self.machine.debug_info(),
            active_timelines: self
                .active
                .iter()
                .map(|a| a.playing.timeline().name().to_string())
                .collect(),
            search_mode: self.search_mode,
            shadow_active: self.shadow.is_active(),
            glow_active: self.glow.is_active(),
            conflict_count: self.conflicts.conflicts().len(),
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Start a timeline after a grant: kill prior tweens on the exact
    /// elements it touches, register ownership, begin playback.
    fn begin(&mut self, kind: TimelineKind, timeline: Timeline) {
        let elements = timeline.elements();
        self.kill_on(&elements);

        let id = self.next_id;
        self.next_id += 1;
        self.conflicts
            .register(id, AnimationSource::Controller, &elements);
        tracing::debug!(name = timeline.name(), "timeline started");
        self.active.push(ActiveTimeline {
            id,
            kind,
            playing: PlayingTimeline::start(timeline),
        });
    }

    /// Kill every non-idle timeline touching any of `elements`. The idle
    /// loop is spared; it is paused (not writing) while one-shots run.
    fn kill_on(&mut self, elements: &HashSet<ElementId>) {
        let mut killed = Vec::new();
        self.active.retain(|entry| {
            let keep = entry.kind == TimelineKind::Idle
                || entry
                    .playing
                    .timeline()
                    .elements()
                    .is_disjoint(elements);
            if !keep {
                killed.push((entry.id, entry.playing.timeline().name()));
            }
            keep
        });
        for (id, name) in killed {
            self.conflicts.release(id);
            tracing::debug!(name, "timeline killed by newer writer");
        }
    }

    fn idle_mut(&mut self) -> Option<&mut ActiveTimeline> {
        self.active.iter_mut().find(|a| a.kind == TimelineKind::Idle)
    }

    fn remove_idle(&mut self) {
        if let Some(pos) = self.active.iter().position(|a| a.kind == TimelineKind::Idle) {
            let entry = self.active.remove(pos);
            self.conflicts.release(entry.id);
        }
    }

    fn ensure_idle(&mut self) {
        if self.idle_mut().is_none() {
            self.begin(TimelineKind::Idle, idle::build(&mut rand::thread_rng()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::PropertyId;
    use pretty_assertions::assert_eq;

    const FRAME: Duration = Duration::from_millis(16);

    fn controller_with_target() -> AnimationController {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        controller.set_search_target(Some(SearchTarget {
            x: 0.0,
            y: -2.0,
            width: 240.0,
            height: 44.0,
        }));
        controller
    }

    /// Tick until a predicate-matching event shows up, with a generous
    /// frame budget so a hung completion fails loudly.
    fn tick_until(
        controller: &mut AnimationController,
        wanted: impl Fn(&EngineEvent) -> bool,
    ) -> EngineEvent {
        for _ in 0..1000 {
            if let Some(event) = controller.tick(FRAME).into_iter().find(&wanted) {
                return event;
            }
        }
        panic!("event never arrived");
    }

    #[test]
    fn test_starts_idle_with_followers_running() {
        let controller = AnimationController::new(SearchBarConfig::default());
        assert_eq!(controller.state(), AnimationState::Idle);
        let snapshot = controller.debug_snapshot();
        assert!(snapshot.shadow_active);
        assert!(snapshot.glow_active);
        assert_eq!(snapshot.active_timelines, vec!["idle".to_string()]);
    }

    #[test]
    fn test_emotion_grant_and_completion() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        assert!(controller.play_emotion(Emotion::Happy, EmotionOptions::default()));
        assert_eq!(controller.state(), AnimationState::Emotion);

        let event = tick_until(&mut controller, |e| {
            matches!(e, EngineEvent::EmotionComplete(_))
        });
        assert_eq!(event, EngineEvent::EmotionComplete(Emotion::Happy));
        assert_eq!(controller.state(), AnimationState::Idle);
    }

    #[test]
    fn test_denied_emotion_leaves_stage_untouched() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        assert!(controller.play_emotion(Emotion::Excited, EmotionOptions::default()));

        // While EMOTION is active, power-off is a descent: denied.
        let y_before = controller.stage().get(ElementId::Body, PropertyId::Y);
        assert!(!controller.power_off());
        assert_eq!(controller.state(), AnimationState::Emotion);
        assert_eq!(
            controller.stage().get(ElementId::Body, PropertyId::Y),
            y_before
        );
    }

    #[test]
    fn test_particles_requested_once() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        controller.play_emotion(
            Emotion::Excited,
            EmotionOptions {
                speed: 1.0,
                particles: true,
            },
        );
        let events = controller.tick(FRAME);
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::SpawnParticles { .. })));
        // Only on the first frame.
        let events = controller.tick(FRAME);
        assert!(!events
            .iter()
            .any(|e| matches!(e, EngineEvent::SpawnParticles { .. })));
    }

    #[test]
    fn test_search_flow_end_to_end() {
        let mut controller = controller_with_target();

        assert!(controller.morph_to_search_bar());
        assert_eq!(controller.state(), AnimationState::Morph);

        let event = tick_until(&mut controller, |e| matches!(e, EngineEvent::SearchOpened));
        assert_eq!(event, EngineEvent::SearchOpened);
        assert_eq!(controller.state(), AnimationState::Interaction);
        assert!(controller.is_search_mode());
        assert_eq!(
            controller.stage().get(ElementId::SearchField, PropertyId::Opacity),
            1.0
        );

        assert!(controller.morph_to_character());
        let event = tick_until(&mut controller, |e| matches!(e, EngineEvent::SearchClosed));
        assert_eq!(event, EngineEvent::SearchClosed);
        assert_eq!(controller.state(), AnimationState::Idle);
        assert!(!controller.is_search_mode());
    }

    #[test]
    fn test_morph_denied_without_measurable_target() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        assert!(!controller.morph_to_search_bar());
        assert_eq!(controller.state(), AnimationState::Idle);
        assert!(!controller.is_search_mode());
    }

    #[test]
    fn test_morph_to_character_outside_search_mode_is_noop() {
        let mut controller = controller_with_target();
        assert!(!controller.morph_to_character());
        assert_eq!(controller.state(), AnimationState::Idle);
    }

    #[test]
    fn test_power_cycle() {
        let mut controller = AnimationController::new(SearchBarConfig::default());

        assert!(controller.power_off());
        assert_eq!(controller.state(), AnimationState::Transition);
        tick_until(&mut controller, |e| matches!(e, EngineEvent::PoweredOff));
        assert_eq!(controller.state(), AnimationState::Off);
        assert_eq!(
            controller.stage().get(ElementId::Body, PropertyId::Opacity),
            0.0
        );
        // Followers handed control to the choreography.
        assert!(!controller.debug_snapshot().shadow_active);

        assert!(controller.wake_up());
        tick_until(&mut controller, |e| matches!(e, EngineEvent::WokeUp));
        assert_eq!(controller.state(), AnimationState::Idle);
        assert!(controller.debug_snapshot().shadow_active);
        assert_eq!(
            controller.stage().get(ElementId::Body, PropertyId::Opacity),
            1.0
        );
    }

    #[test]
    fn test_interaction_cannot_cut_off_emotion() {
        let mut controller = controller_with_target();
        assert!(controller.play_emotion(Emotion::Shocked, EmotionOptions::default()));

        // Trying to open search mid-emotion is denied outright.
        assert!(!controller.morph_to_search_bar());
        assert_eq!(controller.state(), AnimationState::Emotion);

        // After the emotion finishes the morph goes through.
        tick_until(&mut controller, |e| {
            matches!(e, EngineEvent::EmotionComplete(_))
        });
        assert!(controller.morph_to_search_bar());
    }

    #[test]
    fn test_emotion_in_search_mode_returns_to_interaction() {
        let mut controller = controller_with_target();
        controller.morph_to_search_bar();
        tick_until(&mut controller, |e| matches!(e, EngineEvent::SearchOpened));

        assert!(controller.play_emotion(Emotion::Happy, EmotionOptions::default()));
        tick_until(&mut controller, |e| {
            matches!(e, EngineEvent::EmotionComplete(_))
        });
        assert_eq!(controller.state(), AnimationState::Interaction);
        assert!(controller.is_search_mode());
    }

    #[test]
    fn test_emotion_in_search_mode_keeps_bracket_eyes() {
        let mut controller = controller_with_target();
        controller.morph_to_search_bar();
        tick_until(&mut controller, |e| matches!(e, EngineEvent::SearchOpened));
        assert_eq!(controller.stage().shape(ElementId::EyeLeft), EyeShape::Bracket);

        controller.play_emotion(Emotion::Happy, EmotionOptions::default());
        tick_until(&mut controller, |e| {
            matches!(e, EngineEvent::EmotionComplete(_))
        });

        // Still a search bar, so the eyes relax back into bracket form.
        assert!(controller.is_search_mode());
        assert_eq!(controller.stage().shape(ElementId::EyeLeft), EyeShape::Bracket);
        assert_eq!(controller.stage().shape(ElementId::EyeRight), EyeShape::Bracket);
    }

    #[test]
    fn test_wake_up_refused_unless_dormant() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        assert!(!controller.wake_up());
        assert_eq!(controller.state(), AnimationState::Idle);

        // The idle loop stays the sole body writer and the followers stay on.
        let snapshot = controller.debug_snapshot();
        assert_eq!(snapshot.active_timelines, vec!["idle".to_string()]);
        assert!(snapshot.shadow_active);
        assert!(snapshot.glow_active);
    }

    #[test]
    fn test_emotion_refused_while_dormant() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        controller.power_off();
        tick_until(&mut controller, |e| matches!(e, EngineEvent::PoweredOff));

        assert!(!controller.play_emotion(Emotion::Happy, EmotionOptions::default()));
        assert_eq!(controller.state(), AnimationState::Off);
        assert!(controller.debug_snapshot().active_timelines.is_empty());
    }

    #[test]
    fn test_emotion_interrupting_power_off_recovers_live_idle() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        controller.power_off();
        controller.tick(FRAME);

        // TRANSITION -> EMOTION is an escalation; the power-off timeline is
        // killed and its completion never fires.
        assert!(controller.play_emotion(Emotion::Happy, EmotionOptions::default()));
        let events = tick_until(&mut controller, |e| {
            matches!(e, EngineEvent::EmotionComplete(_))
        });
        assert_eq!(events, EngineEvent::EmotionComplete(Emotion::Happy));

        // Landing in IDLE restarts the loop and the followers.
        assert_eq!(controller.state(), AnimationState::Idle);
        let snapshot = controller.debug_snapshot();
        assert!(snapshot.active_timelines.contains(&"idle".to_string()));
        assert!(snapshot.shadow_active);
        assert!(snapshot.glow_active);
    }

    #[test]
    fn test_new_emotion_replaces_running_emotion() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        assert!(controller.play_emotion(Emotion::Happy, EmotionOptions::default()));
        controller.tick(FRAME);

        // Self-transition on EMOTION is legal; the newer timeline takes the
        // elements over and the older one is killed, not completed.
        assert!(controller.play_emotion(Emotion::Shocked, EmotionOptions::default()));
        let event = tick_until(&mut controller, |e| {
            matches!(e, EngineEvent::EmotionComplete(_))
        });
        assert_eq!(event, EngineEvent::EmotionComplete(Emotion::Shocked));
        assert!(controller.debug_snapshot().conflict_count == 0);
    }

    #[test]
    fn test_reset_recovers_from_anywhere() {
        let mut controller = controller_with_target();
        controller.morph_to_search_bar();
        controller.tick(FRAME);
        controller.tick(FRAME);

        controller.reset();
        assert_eq!(controller.state(), AnimationState::Idle);
        assert!(!controller.is_search_mode());
        assert_eq!(
            controller.stage().get(ElementId::Body, PropertyId::Opacity),
            1.0
        );
        assert_eq!(
            controller.stage().get(ElementId::SearchField, PropertyId::Opacity),
            0.0
        );
        assert_eq!(controller.stage().shape(ElementId::EyeLeft), EyeShape::Open);
        assert!(controller.debug_snapshot().shadow_active);
    }

    #[test]
    fn test_kill_all_clears_everything() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        controller.play_emotion(Emotion::Love, EmotionOptions::default());
        controller.kill_all();

        let snapshot = controller.debug_snapshot();
        assert!(snapshot.active_timelines.is_empty());
        assert!(!snapshot.shadow_active);
        assert!(!snapshot.glow_active);
        assert_eq!(controller.conflict_tracker_mut().owner_count(ElementId::Body), 0);
    }

    #[test]
    fn test_pause_idle_freezes_the_float() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        // Let the float get going.
        for _ in 0..20 {
            controller.tick(FRAME);
        }
        controller.pause_idle();
        let y = controller.stage().get(ElementId::Body, PropertyId::Y);
        for _ in 0..10 {
            controller.tick(FRAME);
        }
        assert_eq!(controller.stage().get(ElementId::Body, PropertyId::Y), y);
        assert_eq!(controller.state(), AnimationState::Idle);

        controller.resume_idle();
        for _ in 0..10 {
            controller.tick(FRAME);
        }
        assert!(controller.stage().get(ElementId::Body, PropertyId::Y) != y);
    }

    #[test]
    fn test_instances_are_independent() {
        let mut a = AnimationController::new(SearchBarConfig::default());
        let mut b = AnimationController::new(SearchBarConfig::default());

        a.play_emotion(Emotion::Happy, EmotionOptions::default());
        assert_eq!(a.state(), AnimationState::Emotion);
        assert_eq!(b.state(), AnimationState::Idle);

        b.power_off();
        assert_eq!(a.state(), AnimationState::Emotion);
        assert_eq!(b.state(), AnimationState::Transition);
    }

    #[test]
    fn test_manual_source_is_flagged_against_controller() {
        let mut controller = AnimationController::new(SearchBarConfig::default());
        let body: std::collections::HashSet<_> = [ElementId::Body].into_iter().collect();
        controller
            .conflict_tracker_mut()
            .register(9999, AnimationSource::Manual, &body);
        assert_eq!(controller.debug_snapshot().conflict_count, 1);
        // Diagnostics only: the idle loop keeps running.
        controller.tick(FRAME);
        assert_eq!(controller.state(), AnimationState::Idle);
    }
}
