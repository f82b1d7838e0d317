//! winit shell: the window, its event loop and a [`Host`] built on top.
//!
//! Frames are paced by `Window::request_redraw`, which the compositor
//! delivers once per display refresh. There is no timer anywhere.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowId, WindowLevel},
};

use crate::animator::Animator;
use crate::canvas::Viewport;
use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::gpu::GpuSurface;
use crate::host::{FrameHandle, Host, ListenerId};

/// [`Host`] backed by a winit window.
///
/// At most one frame is pending at a time. Cancelling it means the next
/// `RedrawRequested` finds nothing to deliver.
pub struct WindowHost {
    window: Arc<Window>,
    next_id: u64,
    pending: Option<FrameHandle>,
    listeners: Vec<ListenerId>,
}

impl WindowHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_id: 0,
            pending: None,
            listeners: Vec::new(),
        }
    }

    /// Take the frame a `RedrawRequested` event stands for, if any.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn has_resize_listener(&self) -> bool {
        !self.listeners.is_empty()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for WindowHost {
    fn viewport(&self) -> Viewport {
        let size = self.window.inner_size();
        Viewport::new(size.width, size.height)
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending = Some(handle);
        self.window.request_redraw();
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
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

/// The backdrop application.
pub struct App {
    config: BackdropConfig,
    window: Option<Arc<Window>>,
    animator: Option<Animator<WindowHost, GpuSurface>>,
    error: Option<BackdropError>,
}

impl App {
    pub fn new(config: BackdropConfig) -> Self {
        Self {
            config,
            window: None,
            animator: None,
            error: None,
        }
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<(), BackdropError> {
        let mut window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_transparent(self.config.transparent)
            .with_window_level(WindowLevel::AlwaysOnBottom);

        window_attrs = match self.config.window_size {
            Some((width, height)) => window_attrs.with_inner_size(LogicalSize::new(width, height)),
            None => window_attrs
                .with_decorations(false)
                .with_fullscreen(Some(Fullscreen::Borderless(None))),
        };

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        if let Err(e) = window.set_cursor_hittest(false) {
            log::warn!("pointer events will not pass through the backdrop: {}", e);
        }

        let surface = pollster::block_on(GpuSurface::new(window.clone(), self.config.transparent))?;
        let host = WindowHost::new(window.clone());

        self.animator = Some(Animator::mount(host, surface, self.config.field.clone()));
        self.window = Some(window);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(mut animator) = self.animator.take() {
            animator.unmount();
        }
    }

    /// Deliver a redraw to the animator if it is the frame it asked for.
    fn redraw(&mut self) -> Result<(), BackdropError> {
        if let Some(animator) = &mut self.animator {
            if let Some(handle) = animator.host_mut().take_frame() {
                animator.on_frame(handle)?;
            }
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.mount(event_loop) {
            // Decorative: without a surface there is simply nothing to show.
            log::warn!("backdrop disabled: {}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                self.unmount();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(animator) = &mut self.animator {
                    if animator.host().has_resize_listener() {
                        animator.on_resize(Viewport::new(physical_size.width, physical_size.height));
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.redraw() {
                    log::error!("stopping backdrop: {}", e);
                    self.unmount();
                    self.error = Some(e);
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.unmount();
    }
}

/// Open the backdrop window and animate until it is closed.
pub fn run(config: BackdropConfig) -> Result<(), BackdropError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
