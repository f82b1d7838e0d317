//! Particle record and the free functions that simulate and draw it.
//!
//! Simulation never touches a drawing surface: [`step_particle`] only needs
//! the viewport bounds and a random source, and [`draw_particle`] is a
//! separate pass.

use glam::{Vec2, Vec3};
use rand::Rng;

use crate::canvas::{Canvas, Viewport};
use crate::config::FieldConfig;

/// A single drifting dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Pixel position, origin top-left.
    pub position: Vec2,
    /// Pixels per tick. Fixed for the particle's whole existence.
    pub velocity: Vec2,
    pub radius: f32,
    pub opacity: f32,
    /// Ticks left before the particle is reset.
    pub life: u32,
    /// Value `life` was last (re)initialised to.
    pub life_span: u32,
}

/// What happened to a particle during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The particle drifted and faded.
    Moved,
    /// The particle left the viewport or ran out of life and was reset.
    Reset,
}

/// Create a particle with every attribute drawn at random.
pub fn spawn_particle<R: Rng + ?Sized>(
    rng: &mut R,
    viewport: Viewport,
    config: &FieldConfig,
) -> Particle {
    let speed = config.max_speed;
    let life = random_life(rng, config);

    Particle {
        position: random_position(rng, viewport),
        velocity: Vec2::new(
            rng.gen_range(-speed..=speed),
            rng.gen_range(-speed..=speed),
        ),
        radius: rng.gen_range(config.radius.clone()),
        opacity: rng.gen_range(config.reset_opacity.clone()),
        life,
        life_span: life,
    }
}

/// Re-place a particle somewhere inside the viewport with a fresh life.
///
/// Velocity and radius are kept.
pub fn reset_particle<R: Rng + ?Sized>(
    particle: &mut Particle,
    rng: &mut R,
    viewport: Viewport,
    config: &FieldConfig,
) {
    particle.position = random_position(rng, viewport);
    particle.life = random_life(rng, config);
    particle.life_span = particle.life;
    particle.opacity = rng.gen_range(config.reset_opacity.clone());
}

/// Advance a particle by one tick.
pub fn step_particle<R: Rng + ?Sized>(
    particle: &mut Particle,
    rng: &mut R,
    viewport: Viewport,
    config: &FieldConfig,
) -> StepOutcome {
    particle.position += particle.velocity;
    particle.life = particle.life.saturating_sub(1);
    particle.opacity = fade(particle.life, particle.life_span, config.max_opacity);

    if !viewport.contains(particle.position) || particle.life == 0 {
        reset_particle(particle, rng, viewport, config);
        StepOutcome::Reset
    } else {
        StepOutcome::Moved
    }
}

/// Fill the particle's disc at its current opacity.
pub fn draw_particle<C: Canvas + ?Sized>(particle: &Particle, canvas: &mut C, color: Vec3) {
    canvas.fill_circle(particle.position, particle.radius, color, particle.opacity);
}

/// Opacity for a particle with `life` ticks left out of `life_span`.
#[inline]
pub fn fade(life: u32, life_span: u32, max_opacity: f32) -> f32 {
    if life_span == 0 {
        return 0.0;
    }
    life as f32 / life_span as f32 * max_opacity
}

fn random_position<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Vec2 {
    Vec2::new(
        rng.gen::<f32>() * viewport.width as f32,
        rng.gen::<f32>() * viewport.height as f32,
    )
}

fn random_life<R: Rng + ?Sized>(rng: &mut R, config: &FieldConfig) -> u32 {
    rng.gen_range(config.life.clone())
}
