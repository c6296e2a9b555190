//! GPU renderer for the orrery scene

use common::{
    create_depth_texture, create_dynamic_buffer, create_uniform_buffer, CameraUniform, GraphicsContext,
    LineVertex, DEPTH_FORMAT,
};
use bytemuck::Zeroable;
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::catalog::{Appearance, BodyId};
use crate::geometry::Starfield;
use crate::scene::{SceneGraph, SceneNode};

pub const SUN_RADIUS: f32 = 30.0;
const SUN_COLOR: [f32; 4] = [1.0, 0.62, 0.12, 1.0];
const GUIDE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.2];

const KIND_SUN: u32 = 0;
const KIND_PLANET: u32 = 1;
const KIND_STAR: u32 = 2;

const FLAG_RINGS: u32 = 1;
const FLAG_ATMOSPHERE: u32 = 2;

/// Billboard instance for the sun, planets and stars
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BodyInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    pub rotation: f32,
    pub roughness: f32,
    pub kind: u32,
    pub flags: u32,
}

impl BodyInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        1 => Float32x3,
        2 => Float32,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32,
        6 => Float32,
        7 => Uint32,
        8 => Uint32,
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BodyInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }

    pub fn sun() -> Self {
        Self {
            position: [0.0; 3],
            radius: SUN_RADIUS,
            color: SUN_COLOR,
            emissive: SUN_COLOR,
            rotation: 0.0,
            roughness: 1.0,
            kind: KIND_SUN,
            flags: 0,
        }
    }

    pub fn from_node(node: &SceneNode) -> Self {
        Self {
            position: node.position.to_array(),
            radius: node.size,
            color: node.appearance.color,
            emissive: node.appearance.emissive,
            rotation: node.rotation,
            roughness: node.appearance.roughness,
            kind: KIND_PLANET,
            flags: appearance_flags(&node.appearance),
        }
    }

    pub fn star(position: Vec3, size: f32, brightness: f32) -> Self {
        Self {
            position: position.to_array(),
            radius: size,
            color: [brightness, brightness, brightness * 1.05, 1.0],
            emissive: [0.0; 4],
            rotation: 0.0,
            roughness: 1.0,
            kind: KIND_STAR,
            flags: 0,
        }
    }
}

fn appearance_flags(appearance: &Appearance) -> u32 {
    let mut flags = 0;
    if appearance.has_rings {
        flags |= FLAG_RINGS;
    }
    if appearance.has_atmosphere {
        flags |= FLAG_ATMOSPHERE;
    }
    flags
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
}

impl QuadVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

const QUAD_VERTICES: &[QuadVertex] = &[
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, -1.0] },
    QuadVertex { position: [1.0, 1.0] },
    QuadVertex { position: [-1.0, 1.0] },
];

/// Vertex range of one body's orbit guide in the guide buffer
#[derive(Debug, Clone, Copy)]
struct GuideRange {
    body: BodyId,
    start: u32,
    count: u32,
}

/// Per-frame draw counts produced by [`Renderer::update`]
pub struct RenderData {
    pub instance_count: u32,
    pub guide_ranges: Vec<(u32, u32)>,
}

pub struct Renderer {
    body_pipeline: wgpu::RenderPipeline,
    guide_pipeline: wgpu::RenderPipeline,

    quad_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    guide_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    depth_texture: wgpu::TextureView,

    guides: Vec<GuideRange>,
    max_instances: usize,
    max_guide_vertices: usize,
}

impl Renderer {
    pub fn new(ctx: &GraphicsContext, max_instances: usize, max_guide_vertices: usize) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Orrery Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/orrery.wgsl").into()),
        });

        let camera_buffer = create_uniform_buffer(device, "Camera Buffer", &CameraUniform::zeroed());

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Camera Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Orrery Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let color_target = Some(wgpu::ColorTargetState {
            format: ctx.config.format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        });

        let body_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Body Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_body",
                buffers: &[QuadVertex::layout(), BodyInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_body",
                targets: &[color_target.clone()],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let guide_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Orbit Guide Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_guide",
                buffers: &[LineVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_guide",
                targets: &[color_target],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineStrip,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let instance_buffer = create_dynamic_buffer::<BodyInstance>(
            device,
            "Body Instance Buffer",
            max_instances,
            wgpu::BufferUsages::VERTEX,
        );
        let guide_buffer = create_dynamic_buffer::<LineVertex>(
            device,
            "Orbit Guide Buffer",
            max_guide_vertices,
            wgpu::BufferUsages::VERTEX,
        );

        let depth_texture = create_depth_texture(device, ctx.size.width, ctx.size.height);

        Self {
            body_pipeline,
            guide_pipeline,
            quad_buffer,
            instance_buffer,
            guide_buffer,
            camera_buffer,
            bind_group,
            depth_texture,
            guides: Vec::new(),
            max_instances,
            max_guide_vertices,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    /// Replace the orbit guide geometry. Called when scale or projection changes.
    pub fn set_orbit_guides(&mut self, queue: &wgpu::Queue, guides: &[(BodyId, Vec<Vec3>)]) {
        let mut vertices = Vec::new();
        self.guides.clear();

        for (body, ring) in guides {
            if vertices.len() + ring.len() > self.max_guide_vertices {
                log::warn!("Orbit guide buffer full, skipping remaining guides");
                break;
            }
            let start = vertices.len() as u32;
            vertices.extend(ring.iter().map(|p| LineVertex::new(*p, GUIDE_COLOR)));
            self.guides.push(GuideRange {
                body: *body,
                start,
                count: ring.len() as u32,
            });
        }

        if !vertices.is_empty() {
            queue.write_buffer(&self.guide_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        log::debug!("Uploaded {} orbit guides ({} vertices)", self.guides.len(), vertices.len());
    }

    /// Upload camera, body and star data for this frame
    pub fn update(
        &self,
        queue: &wgpu::Queue,
        camera: &CameraUniform,
        scene: &SceneGraph,
        starfield: &Starfield,
        star_scale: f32,
    ) -> RenderData {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[*camera]));

        let mut instances = Vec::with_capacity(starfield.len() + scene.mounted() + 1);
        instances.push(BodyInstance::sun());
        instances.extend(scene.nodes().map(|(_, node)| BodyInstance::from_node(node)));
        instances.extend(
            starfield
                .stars
                .iter()
                .map(|s| BodyInstance::star(s.position, s.size * star_scale, s.brightness)),
        );
        instances.truncate(self.max_instances);

        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

        let guide_ranges = self
            .guides
            .iter()
            .filter(|g| scene.node(g.body).is_some_and(|n| n.guide_visible))
            .map(|g| (g.start, g.count))
            .collect();

        RenderData {
            instance_count: instances.len() as u32,
            guide_ranges,
        }
    }

    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, data: &RenderData) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Orrery Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.0,
                        g: 0.0,
                        b: 0.01,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(0, &self.bind_group, &[]);

        // Guides first so bodies are drawn over them
        if !data.guide_ranges.is_empty() {
            pass.set_pipeline(&self.guide_pipeline);
            pass.set_vertex_buffer(0, self.guide_buffer.slice(..));
            for (start, count) in &data.guide_ranges {
                pass.draw(*start..(*start + *count), 0..1);
            }
        }

        if data.instance_count > 0 {
            pass.set_pipeline(&self.body_pipeline);
            pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.draw(0..6, 0..data.instance_count);
        }
    }
}
