//! # particle-backdrop
//!
//! A subtle field of drifting dots, joined by faint lines when they come
//! close, drawn behind everything else on screen and never in the way of the
//! pointer.
//!
//! ## Quick Start
//!
//! ```ignore
//! use particle_backdrop::prelude::*;
//!
//! fn main() -> Result<(), BackdropError> {
//!     particle_backdrop::run(BackdropConfig::default())
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Particles and the field
//!
//! A [`Particle`] is plain data: position, velocity, radius, opacity and a
//! life countdown. Free functions step, reset and draw it. A
//! [`ParticleField`] owns `min(25, area / 30000)` of them and runs one tick
//! per display refresh: clear, step and draw every particle, then link every
//! pair closer than 100 pixels.
//!
//! ### Lifecycle
//!
//! The [`Animator`] mounts a field onto a [`Surface`] provided by a
//! [`Host`]. While mounted it holds one scheduled frame and one resize
//! listener; unmounting (or dropping it) releases both. A resize cancels the
//! scheduled frame before reseeding the field.
//!
//! ### Headless use
//!
//! [`ManualHost`] and [`DrawList`] stand in for the window and the GPU:
//!
//! ```ignore
//! let mut animator = Animator::mount(
//!     ManualHost::new(Viewport::new(800, 600)),
//!     DrawList::default(),
//!     FieldConfig::new().with_seed(7),
//! );
//! while let Some(frame) = animator.host_mut().next_frame() {
//!     animator.on_frame(frame)?;
//! }
//! ```

pub mod animator;
pub mod canvas;
pub mod config;
mod error;
pub mod field;
mod gpu;
pub mod host;
pub mod links;
pub mod particle;
pub mod time;
mod window;

pub use animator::{Animator, AnimatorState};
pub use canvas::{Canvas, DrawList, Surface, Viewport};
pub use config::{BackdropConfig, FieldConfig, LinkStyle};
pub use error::{BackdropError, GpuError};
pub use field::{particle_count, ParticleField, TickStats};
pub use glam::{Vec2, Vec3};
pub use gpu::GpuSurface;
pub use host::{FrameHandle, Host, ListenerId, ManualHost};
pub use links::{link_opacity, proximity_links, ProximityLink};
pub use particle::{Particle, StepOutcome};
pub use window::{run, App, WindowHost};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use particle_backdrop::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animator::{Animator, AnimatorState};
    pub use crate::canvas::{Canvas, DrawList, Surface, Viewport};
    pub use crate::config::{BackdropConfig, FieldConfig, LinkStyle};
    pub use crate::error::{BackdropError, GpuError};
    pub use crate::field::{ParticleField, TickStats};
    pub use crate::host::{FrameHandle, Host, ManualHost};
    pub use crate::particle::Particle;
    pub use crate::{Vec2, Vec3};
}
