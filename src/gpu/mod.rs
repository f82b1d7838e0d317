//! wgpu implementation of [`Surface`].

mod shapes;

use std::sync::Arc;

use glam::{Vec2, Vec3};
use winit::window::Window;

use crate::canvas::{Canvas, CircleInstance, DrawList, LineInstance, Surface, Viewport};
use crate::error::{BackdropError, GpuError};
use shapes::{InstanceBuffer, ScreenUniform, ShapePipelines};

/// Background used when the window is not see-through (`#0f172a`).
const OPAQUE_BACKGROUND: wgpu::Color = wgpu::Color {
    r: 15.0 / 255.0,
    g: 23.0 / 255.0,
    b: 42.0 / 255.0,
    a: 1.0,
};

/// A window surface that renders a [`DrawList`] with wgpu.
///
/// Canvas calls are recorded on the CPU; `present` uploads them and draws
/// every disc, then every line, in one render pass.
pub struct GpuSurface {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: ShapePipelines,
    circles: InstanceBuffer,
    lines: InstanceBuffer,
    clear_color: wgpu::Color,
    /// The target encodes to sRGB itself, so colours go in linear.
    linear_colors: bool,
    draw_list: DrawList,
}

impl GpuSurface {
    /// Acquire a GPU surface for `window`.
    ///
    /// `transparent` asks for a premultiplied-alpha swapchain so the desktop
    /// shows through; compositors that cannot do that get an opaque
    /// background instead.
    pub async fn new(window: Arc<Window>, transparent: bool) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Backdrop Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colours are given in sRGB already, as a 2D canvas takes them.
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuError::NoSurfaceFormat)?;
        let linear_colors = surface_format.is_srgb();
        if linear_colors {
            log::warn!("surface only offers sRGB formats, converting colours to linear");
        }

        let premultiplied = surface_caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied);
        let (alpha_mode, clear_color) = if transparent && premultiplied {
            (wgpu::CompositeAlphaMode::PreMultiplied, wgpu::Color::TRANSPARENT)
        } else {
            if transparent {
                log::warn!("compositor has no premultiplied alpha, drawing an opaque backdrop");
            }
            let mode = surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto);
            (mode, OPAQUE_BACKGROUND)
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        log::info!(
            "GPU surface ready: {} ({:?}), format {:?}, alpha {:?}",
            adapter.get_info().name,
            adapter.get_info().backend,
            surface_format,
            alpha_mode
        );

        let pipelines = ShapePipelines::new(&device, surface_format);
        let circles = InstanceBuffer::new(
            &device,
            "Circle Instance Buffer",
            std::mem::size_of::<CircleInstance>(),
            32,
        );
        let lines = InstanceBuffer::new(
            &device,
            "Line Instance Buffer",
            std::mem::size_of::<LineInstance>(),
            512,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            circles,
            lines,
            clear_color,
            linear_colors,
            draw_list: DrawList::new(Viewport::new(size.width, size.height)),
        })
    }

    fn target_color(&self, color: Vec3) -> Vec3 {
        if self.linear_colors {
            srgb_to_linear(color)
        } else {
            color
        }
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self, target: &wgpu::TextureView) {
        let viewport = self.draw_list.viewport();
        let screen = ScreenUniform {
            size: [viewport.width as f32, viewport.height as f32],
            _pad: [0.0; 2],
        };
        self.queue.write_buffer(
            &self.pipelines.screen_buffer,
            0,
            bytemuck::bytes_of(&screen),
        );
        self.circles
            .upload(&self.device, &self.queue, self.draw_list.circles());
        self.lines
            .upload(&self.device, &self.queue, self.draw_list.lines());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Backdrop Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Backdrop Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.pipelines.screen_bind_group, &[]);

            render_pass.set_pipeline(&self.pipelines.circle_pipeline);
            self.circles.draw(&mut render_pass);

            render_pass.set_pipeline(&self.pipelines.line_pipeline);
            self.lines.draw(&mut render_pass);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl Canvas for GpuSurface {
    fn clear(&mut self) {
        self.draw_list.clear();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3, alpha: f32) {
        let color = self.target_color(color);
        self.draw_list.fill_circle(center, radius, color, alpha);
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Vec3, alpha: f32) {
        let color = self.target_color(color);
        self.draw_list.stroke_line(from, to, width, color, alpha);
    }
}

impl Surface for GpuSurface {
    fn viewport(&self) -> Viewport {
        self.draw_list.viewport()
    }

    fn resize(&mut self, viewport: Viewport) {
        self.draw_list.resize(viewport);
        if !viewport.is_empty() {
            self.config.width = viewport.width;
            self.config.height = viewport.height;
            self.reconfigure();
        }
    }

    fn present(&mut self) -> Result<(), BackdropError> {
        if self.draw_list.viewport().is_empty() {
            return Ok(());
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(GpuError::OutOfMemory.into()),
            Err(e) => {
                log::warn!("skipping frame: {}", e);
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.render(&view);
        output.present();

        Ok(())
    }
}

/// Decode sRGB-encoded colour channels to linear light.
fn srgb_to_linear(color: Vec3) -> Vec3 {
    fn channel(c: f32) -> f32 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    Vec3::new(channel(color.x), channel(color.y), channel(color.z))
}
