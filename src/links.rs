//! Proximity links between nearby particles.
//!
//! Every unordered pair is checked, so the cost is quadratic in the particle
//! count. The field caps the count (25 particles, 300 pairs) which keeps a
//! plain scan cheaper than any spatial index. Pairs are compared by squared
//! distance; the square root is only taken for pairs that end up linked.

use glam::Vec2;

use crate::canvas::Canvas;
use crate::config::LinkStyle;
use crate::particle::Particle;

/// A line to draw between two particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityLink {
    /// Indices of the two particles, `a < b`.
    pub a: usize,
    pub b: usize,
    pub from: Vec2,
    pub to: Vec2,
    pub opacity: f32,
}

/// Stroke opacity for two particles `distance_sq` apart, or `None` when they
/// are too far apart to be linked.
#[inline]
pub fn link_opacity(distance_sq: f32, style: &LinkStyle) -> Option<f32> {
    if distance_sq < style.max_distance_sq() {
        let distance = distance_sq.sqrt();
        Some((style.max_distance - distance) / style.max_distance * style.max_opacity)
    } else {
        None
    }
}

/// Iterate over every linked pair, in `(i, j)` order with `i < j`.
pub fn proximity_links<'a>(particles: &'a [Particle], style: &'a LinkStyle) -> Links<'a> {
    Links {
        particles,
        style,
        i: 0,
        j: 1,
    }
}

/// Stroke every proximity link. Returns the number of lines drawn.
pub fn draw_links<C: Canvas + ?Sized>(
    particles: &[Particle],
    canvas: &mut C,
    style: &LinkStyle,
) -> usize {
    let mut drawn = 0;
    for link in proximity_links(particles, style) {
        canvas.stroke_line(link.from, link.to, style.width, style.color, link.opacity);
        drawn += 1;
    }
    drawn
}

/// Iterator returned by [`proximity_links`].
pub struct Links<'a> {
    particles: &'a [Particle],
    style: &'a LinkStyle,
    i: usize,
    j: usize,
}

impl Iterator for Links<'_> {
    type Item = ProximityLink;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.particles.len();
        while self.i < n {
            while self.j < n {
                let (i, j) = (self.i, self.j);
                self.j += 1;

                let from = self.particles[i].position;
                let to = self.particles[j].position;
                if let Some(opacity) = link_opacity(from.distance_squared(to), self.style) {
                    return Some(ProximityLink {
                        a: i,
                        b: j,
                        from,
                        to,
                        opacity,
                    });
                }
            }
            self.i += 1;
            self.j = self.i + 1;
        }
        None
    }
}
