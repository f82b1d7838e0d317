//! The particle collection.
//!
//! A [`ParticleField`] owns every particle for one viewport size. Resizing
//! throws the whole collection away and seeds a new one, so particles jump
//! rather than rescale when the window changes size.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::canvas::{Canvas, Viewport};
use crate::config::FieldConfig;
use crate::links::draw_links;
use crate::particle::{draw_particle, spawn_particle, step_particle, Particle, StepOutcome};

/// Number of particles for a viewport: one per `area_per_particle` square
/// pixels, capped at `max_particles`.
pub fn particle_count(viewport: Viewport, config: &FieldConfig) -> usize {
    let by_area = viewport.area() / config.area_per_particle.max(1);
    usize::try_from(by_area)
        .unwrap_or(usize::MAX)
        .min(config.max_particles)
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub particles: usize,
    pub resets: usize,
    pub links: usize,
}

/// Fixed-size collection of particles for the current viewport.
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    viewport: Viewport,
    config: FieldConfig,
    rng: SmallRng,
}

impl ParticleField {
    /// Seed a field for `viewport`.
    pub fn new(viewport: Viewport, config: FieldConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let mut field = Self {
            particles: Vec::new(),
            viewport,
            config,
            rng,
        };
        field.reseed(viewport);
        field
    }

    /// Discard every particle and seed a fresh collection for `viewport`.
    pub fn reseed(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let count = particle_count(viewport, &self.config);

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = spawn_particle(&mut self.rng, viewport, &self.config);
            self.particles.push(particle);
        }

        log::debug!(
            "seeded {} particles for {}x{}",
            count,
            viewport.width,
            viewport.height
        );
    }

    /// Run one tick: clear, step and draw each particle in order, then draw
    /// the proximity links between the updated positions.
    pub fn tick<C: Canvas + ?Sized>(&mut self, canvas: &mut C) -> TickStats {
        canvas.clear();

        let mut resets = 0;
        for particle in &mut self.particles {
            if step_particle(particle, &mut self.rng, self.viewport, &self.config)
                == StepOutcome::Reset
            {
                resets += 1;
            }
            draw_particle(particle, canvas, self.config.color);
        }

        let links = draw_links(&self.particles, canvas, &self.config.links);

        TickStats {
            particles: self.particles.len(),
            resets,
            links,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access, for placing particles by hand.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::DrawList;
    use crate::particle::fade;
    use glam::Vec2;

    fn seeded(viewport: Viewport) -> ParticleField {
        ParticleField::new(viewport, FieldConfig::new().with_seed(42))
    }

    #[test]
    fn test_particle_count_scenarios() {
        let config = FieldConfig::default();
        assert_eq!(particle_count(Viewport::new(800, 600), &config), 16);
        assert_eq!(particle_count(Viewport::new(2000, 2000), &config), 25);
        assert_eq!(particle_count(Viewport::new(0, 0), &config), 0);
        assert_eq!(particle_count(Viewport::new(100, 100), &config), 0);
        assert_eq!(particle_count(Viewport::new(u32::MAX, u32::MAX), &config), 25);
    }

    #[test]
    fn test_particle_count_formula() {
        let config = FieldConfig::default();
        for width in (0..3000).step_by(137) {
            for height in (0..2200).step_by(91) {
                let expected = ((width as u64 * height as u64) / 30_000).min(25) as usize;
                assert_eq!(particle_count(Viewport::new(width, height), &config), expected);
            }
        }
    }

    #[test]
    fn test_new_field_has_count_particles() {
        let field = seeded(Viewport::new(800, 600));
        assert_eq!(field.len(), 16);
        assert!(field
            .particles()
            .iter()
            .all(|p| field.viewport().contains(p.position)));
    }

    #[test]
    fn test_reseed_replaces_collection() {
        let mut field = seeded(Viewport::new(800, 600));
        let before: Vec<_> = field.particles().to_vec();

        field.reseed(Viewport::new(2000, 2000));
        assert_eq!(field.len(), 25);
        assert_ne!(&before[..], &field.particles()[..16]);

        field.reseed(Viewport::new(1200, 900));
        let first = field.len();
        field.reseed(Viewport::new(1200, 900));
        assert_eq!(field.len(), first);
        assert_eq!(first, 25);
    }

    #[test]
    fn test_tick_draws_every_particle_after_clearing() {
        let viewport = Viewport::new(800, 600);
        let mut field = seeded(viewport);
        let mut list = DrawList::new(viewport);

        let stats = field.tick(&mut list);

        assert_eq!(list.clears(), 1);
        assert_eq!(stats.particles, 16);
        assert_eq!(list.circles().len(), 16);
        assert_eq!(list.lines().len(), stats.links);
        for (circle, particle) in list.circles().iter().zip(field.particles()) {
            assert_eq!(circle.center, particle.position.to_array());
            assert_eq!(circle.color[3], particle.opacity);
        }
    }

    #[test]
    fn test_tick_opacity_tracks_life() {
        let viewport = Viewport::new(800, 600);
        let mut field = seeded(viewport);
        let mut list = DrawList::new(viewport);

        for _ in 0..500 {
            let before: Vec<_> = field.particles().to_vec();
            field.tick(&mut list);
            for (old, new) in before.iter().zip(field.particles()) {
                let reset = new.life_span != old.life_span
                    || new.life + 1 != old.life
                    || new.position != old.position + old.velocity;
                if reset {
                    assert!((100..=200).contains(&new.life));
                    assert_eq!(new.life, new.life_span);
                    assert!((0.2..=0.7).contains(&new.opacity));
                } else {
                    let expected = fade(new.life, new.life_span, 0.7);
                    assert!((new.opacity - expected).abs() < 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_tick_links_close_particles() {
        let viewport = Viewport::new(800, 600);
        let mut field = ParticleField::new(
            viewport,
            FieldConfig::new().with_seed(9).with_max_particles(2),
        );
        {
            let particles = field.particles_mut();
            particles[0].position = Vec2::new(100.0, 100.0);
            particles[0].velocity = Vec2::ZERO;
            particles[0].life = 150;
            particles[1].position = Vec2::new(150.0, 100.0);
            particles[1].velocity = Vec2::ZERO;
            particles[1].life = 150;
        }
        let mut list = DrawList::new(viewport);

        let stats = field.tick(&mut list);

        assert_eq!(stats.links, 1);
        let line = list.lines()[0];
        assert_eq!(line.from, [100.0, 100.0]);
        assert_eq!(line.to, [150.0, 100.0]);
        assert!((line.color[3] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_tick_uses_configured_colors_and_link_style() {
        use crate::config::LinkStyle;
        use glam::Vec3;

        let viewport = Viewport::new(800, 600);
        let links = LinkStyle {
            max_distance: 200.0,
            width: 1.5,
            color: Vec3::Y,
            ..LinkStyle::default()
        };
        let mut field = ParticleField::new(
            viewport,
            FieldConfig::new()
                .with_seed(10)
                .with_max_particles(2)
                .with_color(Vec3::X)
                .with_links(links),
        );
        {
            let particles = field.particles_mut();
            for (particle, x) in particles.iter_mut().zip([100.0, 250.0]) {
                particle.position = Vec2::new(x, 100.0);
                particle.velocity = Vec2::ZERO;
                particle.life = 150;
            }
        }
        let mut list = DrawList::new(viewport);

        let stats = field.tick(&mut list);

        assert!(list.circles().iter().all(|c| c.color[..3] == [1.0, 0.0, 0.0]));
        // 150px apart: outside the default reach, inside the configured one.
        assert_eq!(stats.links, 1);
        let line = list.lines()[0];
        assert_eq!(line.width, 1.5);
        assert_eq!(line.color[..3], [0.0, 1.0, 0.0]);
        assert!((line.color[3] - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_empty_viewport_ticks_cleanly() {
        let viewport = Viewport::new(0, 0);
        let mut field = seeded(viewport);
        let mut list = DrawList::new(viewport);
        assert!(field.is_empty());
        assert_eq!(field.tick(&mut list), TickStats::default());
        assert_eq!(list.clears(), 1);
    }
}
