//! Mount / resize / unmount lifecycle of the particle backdrop.
//!
//! ```text
//!            mount                 on_resize (reseed)
//! Stopped ───────────▶ Running ◀──────────────┐
//!    ▲                   │  └─────────────────┘
//!    └───── unmount ─────┘
//! ```
//!
//! While running the animator holds three resources: the surface (sized to
//! the viewport), a resize listener and exactly one scheduled frame. Unmount,
//! explicit or through `Drop`, gives the listener and the frame back to the
//! host. A stopped animator never starts again; mount a new one instead.

use crate::canvas::{Surface, Viewport};
use crate::config::FieldConfig;
use crate::error::BackdropError;
use crate::field::{ParticleField, TickStats};
use crate::host::{FrameHandle, Host, ListenerId};
use crate::time::Time;

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Stopped,
    Running,
}

/// Drives a [`ParticleField`] once per display refresh.
pub struct Animator<H: Host, S: Surface> {
    host: H,
    surface: S,
    field: ParticleField,
    pending_frame: Option<FrameHandle>,
    resize_listener: Option<ListenerId>,
    state: AnimatorState,
    time: Time,
}

impl<H: Host, S: Surface> Animator<H, S> {
    /// Size the surface to the host viewport, seed the field, start listening
    /// for resizes and schedule the first frame.
    pub fn mount(mut host: H, mut surface: S, config: FieldConfig) -> Self {
        let viewport = host.viewport();
        surface.resize(viewport);

        let field = ParticleField::new(viewport, config);
        let resize_listener = host.listen_resize();
        let first_frame = host.request_frame();

        log::info!(
            "backdrop mounted at {}x{} with {} particles",
            viewport.width,
            viewport.height,
            field.len()
        );

        Self {
            host,
            surface,
            field,
            pending_frame: Some(first_frame),
            resize_listener: Some(resize_listener),
            state: AnimatorState::Running,
            time: Time::new(),
        }
    }

    /// Run the tick for `handle` and schedule the next one.
    ///
    /// Returns `Ok(None)` without touching the surface when the animator is
    /// stopped or `handle` is not the frame currently scheduled. A failed
    /// present unmounts the animator before the error is returned.
    pub fn on_frame(&mut self, handle: FrameHandle) -> Result<Option<TickStats>, BackdropError> {
        if self.state != AnimatorState::Running || self.pending_frame != Some(handle) {
            log::trace!("ignoring stale frame {:?}", handle);
            return Ok(None);
        }
        self.pending_frame = None;

        let stats = self.field.tick(&mut self.surface);
        if let Err(e) = self.surface.present() {
            // Nothing is scheduled any more; release the listener too.
            self.unmount();
            return Err(e);
        }
        self.pending_frame = Some(self.host.request_frame());

        if self.time.update() && cfg!(debug_assertions) {
            log::debug!(
                "{:.1} fps, frame {}, {} particles, {} resets, {} links",
                self.time.fps(),
                self.time.frame(),
                stats.particles,
                stats.resets,
                stats.links
            );
        }

        Ok(Some(stats))
    }

    /// Resize the surface and reseed the field for `viewport`.
    ///
    /// The scheduled frame is cancelled before anything changes, so a frame
    /// requested for the old collection can never run against the new one.
    pub fn on_resize(&mut self, viewport: Viewport) {
        if self.state != AnimatorState::Running {
            return;
        }
        if let Some(handle) = self.pending_frame.take() {
            self.host.cancel_frame(handle);
        }

        self.surface.resize(viewport);
        self.field.reseed(viewport);

        self.pending_frame = Some(self.host.request_frame());
    }

    /// Cancel the scheduled frame and stop listening for resizes.
    ///
    /// Calling this on a stopped animator does nothing.
    pub fn unmount(&mut self) {
        if self.state == AnimatorState::Stopped {
            return;
        }
        if let Some(handle) = self.pending_frame.take() {
            self.host.cancel_frame(handle);
        }
        if let Some(listener) = self.resize_listener.take() {
            self.host.unlisten_resize(listener);
        }
        self.state = AnimatorState::Stopped;

        log::info!("backdrop unmounted after {} frames", self.time.frame());
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// The frame the animator is waiting for, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    /// Frames ticked since mount.
    pub fn frames(&self) -> u64 {
        self.time.frame()
    }

    pub fn is_listening(&self) -> bool {
        self.resize_listener.is_some()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<H: Host, S: Surface> Drop for Animator<H, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
