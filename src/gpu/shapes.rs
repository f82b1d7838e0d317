//! Instanced pipelines for the two shapes the backdrop draws.
//!
//! Both pipelines expand one instance into a six-vertex quad in the vertex
//! shader. Discs are shaded with a one-pixel antialiased edge; lines are
//! expanded perpendicular to their direction. Output is premultiplied.

use bytemuck::{Pod, Zeroable};

use crate::canvas::{CircleInstance, LineInstance};

/// Screen uniform shared by both pipelines.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct ScreenUniform {
    pub size: [f32; 2],
    pub _pad: [f32; 2],
}

const CIRCLE_ATTRIBUTES: [wgpu::VertexAttribute; 3] = [
    // center
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    },
    // radius
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 8,
        shader_location: 1,
    },
    // color
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 16,
        shader_location: 2,
    },
];

const LINE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    // from
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 0,
        shader_location: 0,
    },
    // to
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x2,
        offset: 8,
        shader_location: 1,
    },
    // color
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 16,
        shader_location: 2,
    },
    // width
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32,
        offset: 32,
        shader_location: 3,
    },
];

/// Vertex buffer of instances that grows when a frame needs more room.
pub(crate) struct InstanceBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    stride: usize,
    capacity: usize,
    len: u32,
}

impl InstanceBuffer {
    pub fn new(device: &wgpu::Device, label: &'static str, stride: usize, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            label,
            buffer: create_instance_buffer(device, label, stride, capacity),
            stride,
            capacity,
            len: 0,
        }
    }

    /// Replace the buffer contents, reallocating if `data` does not fit.
    pub fn upload<T: Pod>(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        if data.len() > self.capacity {
            self.capacity = data.len().next_power_of_two();
            self.buffer = create_instance_buffer(device, self.label, self.stride, self.capacity);
            log::debug!("grew {} to {} instances", self.label, self.capacity);
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len() as u32;
    }

    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.len == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.buffer.slice(..));
        pass.draw(0..6, 0..self.len);
    }
}

fn create_instance_buffer(
    device: &wgpu::Device,
    label: &'static str,
    stride: usize,
    capacity: usize,
) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: (stride * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Pipelines plus the screen uniform they read.
pub(crate) struct ShapePipelines {
    pub circle_pipeline: wgpu::RenderPipeline,
    pub line_pipeline: wgpu::RenderPipeline,
    pub screen_buffer: wgpu::Buffer,
    pub screen_bind_group: wgpu::BindGroup,
}

impl ShapePipelines {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shape Shader"),
            source: wgpu::ShaderSource::Wgsl(SHAPES_SHADER.into()),
        });

        let screen_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screen Uniform Buffer"),
            size: std::mem::size_of::<ScreenUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Screen Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let screen_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Screen Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: screen_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shape Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let circle_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "Circle Pipeline",
            ("vs_circle", "fs_circle"),
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<CircleInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &CIRCLE_ATTRIBUTES,
            },
        );

        let line_pipeline = create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "Line Pipeline",
            ("vs_line", "fs_line"),
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<LineInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &LINE_ATTRIBUTES,
            },
        );

        Self {
            circle_pipeline,
            line_pipeline,
            screen_buffer,
            screen_bind_group,
        }
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    surface_format: wgpu::TextureFormat,
    label: &'static str,
    (vs_entry, fs_entry): (&'static str, &'static str),
    instance_layout: wgpu::VertexBufferLayout<'_>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            buffers: &[instance_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fs_entry),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

pub(crate) const SHAPES_SHADER: &str = r#"
struct Screen {
    size: vec2<f32>,
    _pad: vec2<f32>,
};

@group(0) @binding(0) var<uniform> screen: Screen;

// Pixel coordinates (origin top-left) to clip space.
fn to_clip(p: vec2<f32>) -> vec4<f32> {
    let ndc = p / screen.size * 2.0 - vec2<f32>(1.0, 1.0);
    return vec4<f32>(ndc.x, -ndc.y, 0.0, 1.0);
}

struct CircleOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) radius: f32,
    @location(2) color: vec4<f32>,
};

@vertex
fn vs_circle(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) center: vec2<f32>,
    @location(1) radius: f32,
    @location(2) color: vec4<f32>,
) -> CircleOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
    );

    // One extra pixel of quad for the antialiased rim.
    let local = corners[vertex_index] * (radius + 1.0);

    var out: CircleOut;
    out.clip_position = to_clip(center + local);
    out.local = local;
    out.radius = radius;
    out.color = color;
    return out;
}

@fragment
fn fs_circle(in: CircleOut) -> @location(0) vec4<f32> {
    let coverage = clamp(in.radius - length(in.local) + 0.5, 0.0, 1.0);
    let alpha = in.color.a * coverage;
    return vec4<f32>(in.color.rgb * alpha, alpha);
}

struct LineOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_line(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) p0: vec2<f32>,
    @location(1) p1: vec2<f32>,
    @location(2) color: vec4<f32>,
    @location(3) width: f32,
) -> LineOut {
    var along = array<f32, 6>(0.0, 0.0, 1.0, 0.0, 1.0, 1.0);
    var side = array<f32, 6>(-1.0, 1.0, -1.0, 1.0, -1.0, 1.0);

    let delta = p1 - p0;
    let len = length(delta);
    var dir = vec2<f32>(1.0, 0.0);
    if len > 0.0001 {
        dir = delta / len;
    }
    let normal = vec2<f32>(-dir.y, dir.x);

    // Hairlines are rasterised one pixel wide and dimmed to their true width.
    let drawn = max(width, 1.0);
    let pos = p0 + delta * along[vertex_index] + normal * side[vertex_index] * drawn * 0.5;

    var out: LineOut;
    out.clip_position = to_clip(pos);
    out.color = vec4<f32>(color.rgb, color.a * width / drawn);
    return out;
}

@fragment
fn fs_line(in: LineOut) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color.rgb * in.color.a, in.color.a);
}
"#;
