//! Drawing surface contract.
//!
//! The simulation only ever draws three things: it clears the surface, fills
//! circles and strokes lines. [`Canvas`] captures exactly that, and
//! [`Surface`] adds the pieces the animator needs to own a surface (a size
//! and a way to put the finished frame on screen).
//!
//! [`DrawList`] records those calls as GPU-ready instance records. The wgpu
//! renderer uploads it as-is; tests read it back.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::error::BackdropError;

/// Size of the drawing surface in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Area in square pixels.
    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether `point` lies inside `[0, width] x [0, height]`.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0
            && point.x <= self.width as f32
            && point.y >= 0.0
            && point.y <= self.height as f32
    }

    /// Whether nothing can be drawn (a minimised window, for instance).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Immediate-mode 2D drawing in pixel coordinates, origin top-left.
pub trait Canvas {
    /// Erase everything drawn since the last clear.
    fn clear(&mut self);

    /// Fill a disc.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32);

    /// Stroke a straight segment.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec3, alpha: f32);
}

/// A canvas the animator owns for its whole mounted lifetime.
pub trait Surface: Canvas {
    fn viewport(&self) -> Viewport;

    /// Match the surface to a new viewport size.
    fn resize(&mut self, viewport: Viewport);

    /// Put everything drawn since the last clear on screen.
    fn present(&mut self) -> Result<(), BackdropError>;
}

/// One filled disc, laid out for an instanced vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    /// Straight (not premultiplied) RGBA.
    pub color: [f32; 4],
}

/// One stroked segment, laid out for an instanced vertex buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LineInstance {
    pub from: [f32; 2],
    pub to: [f32; 2],
    /// Straight (not premultiplied) RGBA.
    pub color: [f32; 4],
    pub width: f32,
    pub _pad: [f32; 3],
}

/// A recording [`Surface`].
#[derive(Debug, Default)]
pub struct DrawList {
    viewport: Viewport,
    circles: Vec<CircleInstance>,
    lines: Vec<LineInstance>,
    clears: u64,
    presented: u64,
}

impl DrawList {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    pub fn circles(&self) -> &[CircleInstance] {
        &self.circles
    }

    pub fn lines(&self) -> &[LineInstance] {
        &self.lines
    }

    /// Number of times the list has been cleared.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Number of frames presented.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Total draw calls recorded since the last clear.
    pub fn draw_calls(&self) -> usize {
        self.circles.len() + self.lines.len()
    }
}

impl Canvas for DrawList {
    fn clear(&mut self) {
        self.circles.clear();
        self.lines.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32) {
        self.circles.push(CircleInstance {
            center: center.to_array(),
            radius,
            _pad: 0.0,
            color: color.extend(alpha).to_array(),
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec3, alpha: f32) {
        self.lines.push(LineInstance {
            from: from.to_array(),
            to: to.to_array(),
            color: color.extend(alpha).to_array(),
            width,
            _pad: [0.0; 3],
        });
    }
}

impl Surface for DrawList {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn present(&mut self) -> Result<(), BackdropError> {
        self.presented += 1;
        Ok(())
    }
}
