//! GPU renderer for the bubble scene.
//!
//! Owns the device, the two render pipelines, the disc geometry, and the
//! uniform buffers. One call to [`Renderer::render`] encodes a single pass
//! drawing the bubble and then the glow on top of it.

use wgpu::util::DeviceExt;

use crate::gpu::mesh;
use crate::gpu::pipeline;
use crate::lighting::LightingUniforms;
use crate::scene::{self, Scene};
use bytemuck::{Pod, Zeroable};
use std::iter;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct BubbleUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    color1: [f32; 4],
    color2: [f32; 4],
}

impl BubbleUniforms {
    fn new() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            color1: [1.0, 1.0, 1.0, 1.0],
            color2: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct GlowUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    /// x = opacity, yzw unused.
    opacity: [f32; 4],
}

impl GlowUniforms {
    fn new() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            normal_matrix: glam::Mat4::IDENTITY.to_cols_array_2d(),
            opacity: [1.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Vertex/index buffers for one disc.
struct MeshGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    num_indices: u32,
}

impl MeshGeometry {
    fn from_disc(
        device: &wgpu::Device,
        label: &str,
        radius: f32,
    ) -> Self {
        let (vertices, indices) = mesh::create_disc_geometry(
            radius,
            scene::DISC_SEGMENTS,
            scene::DISC_THETA_START,
            scene::DISC_THETA_LENGTH,
        );
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            num_indices: indices.len() as u32,
        }
    }
}

pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    size: wgpu::Extent3d,

    bubble_pipeline: wgpu::RenderPipeline,
    glow_pipeline: wgpu::RenderPipeline,

    bubble_uniform_buffer: wgpu::Buffer,
    glow_uniform_buffer: wgpu::Buffer,
    /// Light rig block; bound for both materials even though the unlit
    /// shaders never sample it (see lighting module docs).
    lighting_buffer: wgpu::Buffer,

    bubble_bind_group: wgpu::BindGroup,
    glow_bind_group: wgpu::BindGroup,

    bubble_geometry: MeshGeometry,
    glow_geometry: MeshGeometry,

    bubble_uniforms: BubbleUniforms,
    glow_uniforms: GlowUniforms,
}

impl Renderer {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let bubble_uniforms = BubbleUniforms::new();
        let glow_uniforms = GlowUniforms::new();

        let bubble_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Bubble Uniform Buffer"),
            contents: bytemuck::cast_slice(&[bubble_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let glow_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Glow Uniform Buffer"),
            contents: bytemuck::cast_slice(&[glow_uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lighting_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lighting Uniform Buffer"),
            contents: bytemuck::cast_slice(&[LightingUniforms::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bubble_bind_group_layout = material_bind_group_layout(
            &device,
            "bubble_bind_group_layout",
            std::mem::size_of::<BubbleUniforms>() as u64,
        );
        let glow_bind_group_layout = material_bind_group_layout(
            &device,
            "glow_bind_group_layout",
            std::mem::size_of::<GlowUniforms>() as u64,
        );

        let bubble_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bubble_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: bubble_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
            label: Some("bubble_bind_group"),
        });
        let glow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &glow_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: glow_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
            ],
            label: Some("glow_bind_group"),
        });

        let bubble_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Bubble Pipeline Layout"),
                bind_group_layouts: &[&bubble_bind_group_layout],
                push_constant_ranges: &[],
            });
        let glow_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Glow Pipeline Layout"),
            bind_group_layouts: &[&glow_bind_group_layout],
            push_constant_ranges: &[],
        });

        let bubble_pipeline =
            pipeline::create_bubble_pipeline(&device, &bubble_pipeline_layout, format);
        let glow_pipeline = pipeline::create_glow_pipeline(&device, &glow_pipeline_layout, format);

        let bubble_geometry = MeshGeometry::from_disc(&device, "Bubble", scene::BUBBLE_RADIUS);
        let glow_geometry = MeshGeometry::from_disc(&device, "Glow", scene::GLOW_RADIUS);

        Self {
            device,
            queue,
            size,
            bubble_pipeline,
            glow_pipeline,
            bubble_uniform_buffer,
            glow_uniform_buffer,
            lighting_buffer,
            bubble_bind_group,
            glow_bind_group,
            bubble_geometry,
            glow_geometry,
            bubble_uniforms,
            glow_uniforms,
        }
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Track the new output-buffer size. Zero dimensions are ignored; the
    /// caller keeps the previous surface configuration in that case.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
    }

    /// Draw one frame of the scene into `view`.
    pub fn render(&mut self, view: &wgpu::TextureView, scene: &Scene) {
        let view_matrix = scene.camera.view_matrix();
        let view_proj = scene.camera.view_projection_matrix().to_cols_array_2d();

        self.bubble_uniforms.view_proj = view_proj;
        self.bubble_uniforms.model = scene.bubble.transform.model_matrix().to_cols_array_2d();
        let [r1, g1, b1] = scene.bubble_material.color1;
        let [r2, g2, b2] = scene.bubble_material.color2;
        self.bubble_uniforms.color1 = [r1, g1, b1, 1.0];
        self.bubble_uniforms.color2 = [r2, g2, b2, 1.0];

        let glow_model = scene.glow.transform.model_matrix();
        self.glow_uniforms.view_proj = view_proj;
        self.glow_uniforms.model = glow_model.to_cols_array_2d();
        self.glow_uniforms.normal_matrix = (view_matrix * glow_model)
            .inverse()
            .transpose()
            .to_cols_array_2d();
        self.glow_uniforms.opacity = [scene.glow_material.opacity, 0.0, 0.0, 0.0];

        // Uniform writes happen before the pass is encoded; write_buffer is
        // immediate, not recorded in the command stream.
        self.queue.write_buffer(
            &self.bubble_uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.bubble_uniforms]),
        );
        self.queue.write_buffer(
            &self.glow_uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.glow_uniforms]),
        );
        self.queue.write_buffer(
            &self.lighting_buffer,
            0,
            bytemuck::cast_slice(&[scene.lights.to_uniforms()]),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.bubble_pipeline);
            render_pass.set_bind_group(0, &self.bubble_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.bubble_geometry.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                self.bubble_geometry.index_buffer.slice(..),
                wgpu::IndexFormat::Uint16,
            );
            render_pass.draw_indexed(0..self.bubble_geometry.num_indices, 0, 0..1);

            // Glow second: its additive rim accumulates over the bubble.
            render_pass.set_pipeline(&self.glow_pipeline);
            render_pass.set_bind_group(0, &self.glow_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.glow_geometry.vertex_buffer.slice(..));
            render_pass.set_index_buffer(
                self.glow_geometry.index_buffer.slice(..),
                wgpu::IndexFormat::Uint16,
            );
            render_pass.draw_indexed(0..self.glow_geometry.num_indices, 0, 0..1);
        }

        self.queue.submit(iter::once(encoder.finish()));
    }
}

/// Shared layout shape for both materials: per-mesh uniforms at binding 0,
/// the lighting block at binding 1.
fn material_bind_group_layout(
    device: &wgpu::Device,
    label: &str,
    uniform_size: u64,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(uniform_size),
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<LightingUniforms>() as u64,
                    ),
                },
                count: None,
            },
        ],
        label: Some(label),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes() {
        // Ensure proper alignment for GPU
        assert_eq!(std::mem::size_of::<BubbleUniforms>(), 160);
        assert_eq!(std::mem::size_of::<GlowUniforms>(), 208);
    }

    #[test]
    fn test_vertex_stride_matches_layout() {
        let desc = mesh::Vertex::desc();
        assert_eq!(desc.array_stride, 32);
        assert_eq!(desc.attributes.len(), 3);
    }
}
