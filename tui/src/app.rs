//! Main Application
//!
//! The App drives the engine the way a web page would: it measures the
//! search-bar target from the terminal size, forwards key presses as
//! animation requests, ticks the controller once per frame, and reacts to
//! the events the tick returns. The engine never blocks; the loop's only
//! wait is the input poll timeout.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use anty_core::{
    AnimationController, AnimationState, Emotion, EmotionOptions, EngineEvent, SearchBarConfig,
    SearchTarget,
};

use crate::particles::ParticleField;
use crate::render;

/// Target frame duration (~30 FPS, plenty for terminal cells).
const FRAME: Duration = Duration::from_millis(33);

/// Main application state.
pub struct App {
    running: bool,
    controller: AnimationController,
    particles: ParticleField,
    idle_paused: bool,
    debug: bool,
    status: Option<(String, Instant)>,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Create the app with a fresh character.
    pub fn new() -> Self {
        Self {
            running: true,
            controller: AnimationController::new(SearchBarConfig::default()),
            particles: ParticleField::new(),
            idle_paused: false,
            debug: false,
            status: None,
        }
    }

    /// Run the frame loop until quit.
    pub fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        self.measure_search_target(terminal.size()?.width);
        let mut last_frame = Instant::now();

        while self.running {
            let now = Instant::now();
            let delta = now - last_frame;
            last_frame = now;

            for engine_event in self.controller.tick(delta) {
                self.on_engine_event(engine_event);
            }
            self.particles.update(delta);
            self.expire_status(now);

            let status = self.status.as_ref().map(|(text, _)| text.as_str());
            terminal.draw(|frame| {
                render::draw(frame, &self.controller, &self.particles, self.debug, status);
            })?;

            let budget = FRAME.saturating_sub(last_frame.elapsed());
            if event::poll(budget)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.on_key(key.code);
                    }
                    Event::Resize(width, _) => {
                        self.measure_search_target(width);
                    }
                    _ => {}
                }
            }
        }

        self.controller.kill_all();
        Ok(())
    }

    /// Translate a key press into an engine request. Denials are normal;
    /// the state machine already logged why.
    pub fn on_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('h') => self.emote(Emotion::Happy),
            KeyCode::Char('e') => self.emote(Emotion::Excited),
            KeyCode::Char('k') => self.emote(Emotion::Shocked),
            KeyCode::Char('c') => self.emote(Emotion::Curious),
            KeyCode::Char('z') => self.emote(Emotion::Sleepy),
            KeyCode::Char('l') => self.emote(Emotion::Love),
            KeyCode::Char('s') => {
                if self.controller.is_search_mode() {
                    self.controller.morph_to_character();
                } else if !self.controller.morph_to_search_bar() {
                    tracing::debug!(state = %self.controller.state(), "search morph denied");
                    self.show_status("search not available right now");
                }
            }
            KeyCode::Char('p') => {
                let granted = if self.controller.state() == AnimationState::Off {
                    self.controller.wake_up()
                } else {
                    self.controller.power_off()
                };
                if !granted {
                    tracing::debug!(state = %self.controller.state(), "power toggle denied");
                    self.show_status("power toggle denied");
                }
            }
            KeyCode::Char('i') => {
                if self.idle_paused {
                    self.controller.resume_idle();
                } else {
                    self.controller.pause_idle();
                }
                self.idle_paused = !self.idle_paused;
            }
            KeyCode::Char('r') => {
                self.controller.reset();
                self.idle_paused = false;
                self.show_status("reset");
            }
            KeyCode::Char('d') => {
                // Engine introspection is a development surface only.
                if cfg!(debug_assertions) {
                    self.debug = !self.debug;
                }
            }
            _ => {}
        }
    }

    fn emote(&mut self, emotion: Emotion) {
        let options = EmotionOptions {
            speed: 1.0,
            particles: matches!(emotion, Emotion::Excited | Emotion::Love),
        };
        if !self.controller.play_emotion(emotion, options) {
            tracing::debug!(emotion = emotion.name(), "emotion request denied");
            self.show_status("emotion denied");
        }
    }

    fn on_engine_event(&mut self, engine_event: EngineEvent) {
        tracing::trace!(?engine_event, "engine event");
        match engine_event {
            EngineEvent::SpawnParticles { .. } => {
                self.particles.burst(&mut rand::thread_rng());
            }
            EngineEvent::EmotionComplete(emotion) => {
                self.show_status(&format!("{} done", emotion.name()));
            }
            EngineEvent::PoweredOff => self.show_status("powered off"),
            EngineEvent::WokeUp => self.show_status("awake"),
            EngineEvent::SearchOpened => self.show_status("search open"),
            EngineEvent::SearchClosed => self.show_status("search closed"),
        }
    }

    /// Derive the search-bar geometry from the terminal width. Stage x
    /// units are quarter-cells, so the bar spans about half the screen.
    fn measure_search_target(&mut self, width: u16) {
        if width < 20 {
            // Too narrow to morph into; the engine will refuse the request.
            self.controller.set_search_target(None);
            return;
        }
        let bar_width = (f32::from(width) * 2.0).min(240.0);
        self.controller.set_search_target(Some(SearchTarget {
            x: 0.0,
            y: -4.0,
            width: bar_width,
            height: 44.0,
        }));
    }

    fn show_status(&mut self, text: &str) {
        self.status = Some((text.to_string(), Instant::now()));
    }

    fn expire_status(&mut self, now: Instant) {
        let expired = self
            .status
            .as_ref()
            .is_some_and(|(_, since)| now.duration_since(*since) > Duration::from_secs(3));
        if expired {
            self.status = None;
        }
    }

    /// The engine, for rendering and tests.
    pub fn controller(&self) -> &AnimationController {
        &self.controller
    }
}
