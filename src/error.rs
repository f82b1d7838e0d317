//! Error types for the backdrop.
//!
//! None of these ever reach the user as a message on screen: the backdrop is
//! decorative, so the window shell logs them and stops rendering.

use thiserror::Error;

/// Errors that can occur while acquiring or driving the GPU surface.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface and adapter share no texture format.
    #[error("surface reports no supported texture format")]
    NoSurfaceFormat,
    /// The surface ran out of memory while acquiring a frame.
    #[error("GPU surface is out of memory")]
    OutOfMemory,
}

/// Errors that can occur when running the backdrop.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create the window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialisation or presentation failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}
