//! Particle bursts
//!
//! The engine only ever asks for a burst; what it looks like is this
//! renderer's business. Particles live in stage coordinates (y negative is
//! up) and are converted to cells at draw time.

use std::time::Duration;

use rand::Rng;

const PARTICLE_LIFE: Duration = Duration::from_millis(900);
const BURST_SIZE: usize = 12;
const GLYPHS: &[char] = &['*', '+', '.', 'o'];

/// A single drifting glyph.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Horizontal position, stage units.
    pub x: f32,
    /// Vertical position, stage units (negative is up).
    pub y: f32,
    vx: f32,
    vy: f32,
    age: Duration,
    /// Glyph to draw.
    pub glyph: char,
}

impl Particle {
    /// 0.0 fresh, 1.0 expired. Drives fade-out styling.
    pub fn fade(&self) -> f32 {
        (self.age.as_secs_f32() / PARTICLE_LIFE.as_secs_f32()).min(1.0)
    }
}

/// All live particles for one character.
#[derive(Default)]
pub struct ParticleField {
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Create an empty field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scatter a burst around the character's origin.
    pub fn burst(&mut self, rng: &mut impl Rng) {
        for _ in 0..BURST_SIZE {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(4.0..9.0);
            self.particles.push(Particle {
                x: 0.0,
                y: -2.0,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed - 3.0,
                age: Duration::ZERO,
                glyph: GLYPHS[rng.gen_range(0..GLYPHS.len())],
            });
        }
    }

    /// Advance positions and retire expired particles.
    pub fn update(&mut self, delta: Duration) {
        let dt = delta.as_secs_f32();
        for particle in &mut self.particles {
            particle.x += particle.vx * dt;
            particle.y += particle.vy * dt;
            // Gentle gravity pulls the burst back down.
            particle.vy += 6.0 * dt;
            particle.age += delta;
        }
        self.particles.retain(|p| p.age < PARTICLE_LIFE);
    }

    /// Live particles, for rendering.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Whether anything is left to draw.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_burst_spawns_and_expires() {
        let mut field = ParticleField::new();
        let mut rng = rand::thread_rng();
        field.burst(&mut rng);
        assert_eq!(field.iter().count(), BURST_SIZE);

        field.update(Duration::from_millis(500));
        assert_eq!(field.iter().count(), BURST_SIZE);

        field.update(Duration::from_millis(500));
        assert!(field.is_empty());
    }

    #[test]
    fn test_fade_reaches_one_at_end_of_life() {
        let mut field = ParticleField::new();
        field.burst(&mut rand::thread_rng());
        field.update(Duration::from_millis(899));
        for particle in field.iter() {
            assert!(particle.fade() > 0.9);
            assert!(particle.fade() <= 1.0);
        }
    }
}
