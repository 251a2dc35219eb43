//! Anty TUI - Terminal playground for the Anty animation engine
//!
//! A full-screen terminal host that renders the mascot from the engine's
//! stage values, frame by frame. The engine stays headless; this crate is
//! one possible renderer for it.
//!
//! # Architecture
//!
//! - **App**: event loop, key bindings, frame ticking
//! - **Render**: stage values to terminal glyphs
//! - **Particles**: burst effects requested by the engine

pub mod app;
pub mod particles;
pub mod render;

pub use app::App;
