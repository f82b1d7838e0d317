//! The platform side of the animator: frame pacing and resize notification.
//!
//! A [`Host`] hands out a [`FrameHandle`] for every frame it schedules and a
//! [`ListenerId`] for every resize listener it registers. Both can be revoked.
//! The animator keeps at most one of each and gives them back on unmount.

use crate::canvas::Viewport;

/// Identifies one scheduled display-refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Identifies one registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Display-refresh scheduling and viewport notifications.
pub trait Host {
    /// Current viewport size in physical pixels.
    fn viewport(&self) -> Viewport;

    /// Ask for a callback on the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Revoke a callback. The handle must not be delivered afterwards.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Start delivering resize events.
    fn listen_resize(&mut self) -> ListenerId;

    /// Stop delivering resize events to `id`.
    fn unlisten_resize(&mut self, id: ListenerId);
}

/// A host driven by hand.
///
/// Frames are only delivered when [`ManualHost::next_frame`] is called, which
/// makes the animator fully deterministic for tests and headless runs.
#[derive(Debug, Default)]
pub struct ManualHost {
    viewport: Viewport,
    next_id: u64,
    pending: Vec<FrameHandle>,
    listeners: Vec<ListenerId>,
    requested: u64,
    cancelled: u64,
}

impl ManualHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// Change the viewport size. The caller forwards the resize to the
    /// animator, as a windowing system would.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Take the oldest pending frame, as the display refresh would.
    pub fn next_frame(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }

    /// Frames scheduled and neither delivered nor cancelled.
    pub fn pending_frames(&self) -> &[FrameHandle] {
        &self.pending
    }

    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Total frames ever requested.
    pub fn frames_requested(&self) -> u64 {
        self.requested
    }

    /// Total frames ever cancelled.
    pub fn frames_cancelled(&self) -> u64 {
        self.cancelled
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for ManualHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending.push(handle);
        self.requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.pending.len();
        self.pending.retain(|h| *h != handle);
        if self.pending.len() != before {
            self.cancelled += 1;
        }
    }

    fn listen_resize(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.push(id);
        id
    }

    fn unlisten_resize(&mut self, id: ListenerId) {
        self.listeners.retain(|l| *l != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_delivered_in_order() {
        let mut host = ManualHost::new(Viewport::new(10, 10));
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.next_frame(), Some(a));
        assert_eq!(host.next_frame(), Some(b));
        assert_eq!(host.next_frame(), None);
    }

    #[test]
    fn test_cancelled_frame_is_never_delivered() {
        let mut host = ManualHost::new(Viewport::new(10, 10));
        let handle = host.request_frame();
        host.cancel_frame(handle);
        host.cancel_frame(handle);

        assert_eq!(host.next_frame(), None);
        assert_eq!(host.frames_cancelled(), 1);
    }

    #[test]
    fn test_listeners() {
        let mut host = ManualHost::new(Viewport::new(10, 10));
        let id = host.listen_resize();
        assert_eq!(host.listeners(), &[id]);
        host.unlisten_resize(id);
        assert!(host.listeners().is_empty());
    }
}
