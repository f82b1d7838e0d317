//! Configuration for the particle backdrop.
//!
//! The defaults give at most 25 slow blue dots, one per 30 000 square
//! pixels, joined by faint lines when closer than 100 pixels. Builders exist
//! mostly so tests and benchmarks can pin a seed or shrink the field.
//!
//! ```ignore
//! let config = BackdropConfig::new()
//!     .with_field(FieldConfig::new().with_seed(7))
//!     .with_window_size(1280, 720);
//! ```

use glam::Vec3;
use std::ops::RangeInclusive;

/// `#3b82f6`, the colour shared by dots and links.
pub const DEFAULT_COLOR: Vec3 = Vec3::new(59.0 / 255.0, 130.0 / 255.0, 246.0 / 255.0);

/// Parameters of the particle simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    /// Hard cap on the number of particles, whatever the viewport area.
    pub max_particles: usize,
    /// Square pixels of viewport per particle.
    pub area_per_particle: u64,
    /// Maximum absolute velocity on each axis, in pixels per tick.
    pub max_speed: f32,
    /// Range the dot radius is drawn from.
    pub radius: RangeInclusive<f32>,
    /// Range the life countdown is drawn from, in ticks.
    pub life: RangeInclusive<u32>,
    /// Range opacity is re-randomised into on reset.
    pub reset_opacity: RangeInclusive<f32>,
    /// Opacity of a particle at full life.
    pub max_opacity: f32,
    /// Fill colour of the dots.
    pub color: Vec3,
    /// Seed for reproducible runs. `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Appearance of the proximity links.
    pub links: LinkStyle,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_particles: 25,
            area_per_particle: 30_000,
            max_speed: 0.25,
            radius: 1.0..=3.0,
            life: 100..=200,
            reset_opacity: 0.2..=0.7,
            max_opacity: 0.7,
            color: DEFAULT_COLOR,
            seed: None,
            links: LinkStyle::default(),
        }
    }
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the particle count.
    pub fn with_max_particles(mut self, max: usize) -> Self {
        self.max_particles = max;
        self
    }

    /// Set the viewport area each particle accounts for.
    ///
    /// Zero is clamped to one.
    pub fn with_area_per_particle(mut self, area: u64) -> Self {
        self.area_per_particle = area.max(1);
        self
    }

    /// Seed the random number generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the dot colour (RGB, 0.0-1.0).
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Replace the link style.
    pub fn with_links(mut self, links: LinkStyle) -> Self {
        self.links = links;
        self
    }
}

/// Appearance of the lines joining nearby particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkStyle {
    /// Particles closer than this (in pixels) are linked.
    pub max_distance: f32,
    /// Stroke opacity of a link between two coincident particles.
    pub max_opacity: f32,
    /// Stroke width in pixels.
    pub width: f32,
    /// Stroke colour.
    pub color: Vec3,
}

impl Default for LinkStyle {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            max_opacity: 0.1,
            width: 0.3,
            color: DEFAULT_COLOR,
        }
    }
}

impl LinkStyle {
    /// Squared link distance, compared against squared pair distances.
    #[inline]
    pub fn max_distance_sq(&self) -> f32 {
        self.max_distance * self.max_distance
    }
}

/// Everything the windowed backdrop needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct BackdropConfig {
    pub field: FieldConfig,
    /// Fixed inner size in logical pixels. `None` covers the current monitor.
    pub window_size: Option<(u32, u32)>,
    /// Let the desktop show through everywhere but the dots and lines.
    pub transparent: bool,
    pub title: String,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            window_size: None,
            transparent: true,
            title: "particle-backdrop".to_string(),
        }
    }
}

impl BackdropConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.field = field;
        self
    }

    /// Run in a fixed-size window instead of covering the monitor.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = Some((width, height));
        self
    }

    /// Draw over an opaque background instead of the desktop.
    pub fn opaque(mut self) -> Self {
        self.transparent = false;
        self
    }
}
