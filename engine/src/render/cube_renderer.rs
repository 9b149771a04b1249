//! Cube Renderer
//!
//! The wgpu implementation of [`MeshBackend`]. Vertex stores are plain GPU
//! vertex buffers; each `draw_quads` call queues one indexed draw that is
//! issued by [`CubeRenderer::render_frame`] with its model matrix bound
//! through a dynamic-offset uniform slot.

use std::sync::Arc;

use glam::Mat4;
use wgpu::util::DeviceExt;
use winit::window::Window;

use super::backend::{MeshBackend, QUAD_BYTES, VertexStoreId, quad_indices};
use super::error::RenderError;
use super::gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig};
use super::shader::{CUBE_SHADER, create_shader_module};
use super::uniforms::{ModelUniforms, SceneUniforms};
use super::vertex::CubeVertex;

/// Draws beyond this many per frame are dropped.
pub const MAX_DRAWS: usize = 256;

struct VertexStore {
    buffer: wgpu::Buffer,
    quad_capacity: u32,
}

struct PendingDraw {
    store: VertexStoreId,
    quad_count: u32,
    model: Mat4,
}

pub struct CubeRenderer {
    ctx: GpuContext,
    pipeline: wgpu::RenderPipeline,
    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    /// Byte distance between model slots (64 bytes rounded up to the offset alignment).
    model_stride: u64,
    index_buffer: wgpu::Buffer,
    index_quad_capacity: u32,
    stores: Vec<Option<VertexStore>>,
    free_slots: Vec<u32>,
    draws: Vec<PendingDraw>,
    warned_draw_overflow: bool,
}

impl CubeRenderer {
    /// Create the GPU context for `window` and build the cube pipeline.
    ///
    /// Fails with [`RenderError::ShaderCompilation`] if the cube shader does not validate.
    pub fn new(window: Arc<Window>, config: GpuContextConfig) -> Result<Self, RenderError> {
        let ctx = GpuContext::new(window, config)?;
        let device = &ctx.device;

        let shader = create_shader_module(device, "Cube Shader", CUBE_SHADER)?;

        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Uniform Buffer"),
            contents: bytemuck::bytes_of(&SceneUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let model_size = std::mem::size_of::<ModelUniforms>() as u64;
        let model_stride = wgpu::util::align_to(
            model_size,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniform Buffer"),
            size: model_stride * MAX_DRAWS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
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

        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(model_size),
                },
                count: None,
            }],
        });

        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &model_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &model_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(model_size),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &model_layout],
            push_constant_ranges: &[],
        });

        // Face winding depends on the face sign, so both sides are drawn.
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cube Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[CubeVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
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
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: ctx.sample_count,
                ..Default::default()
            },
            multiview: None,
            cache: None,
        });

        let index_buffer = Self::create_index_buffer(&ctx.device, 0);

        tracing::info!(model_stride, "cube pipeline ready");

        Ok(Self {
            ctx,
            pipeline,
            scene_buffer,
            scene_bind_group,
            model_buffer,
            model_bind_group,
            model_stride,
            index_buffer,
            index_quad_capacity: 0,
            stores: Vec::new(),
            free_slots: Vec::new(),
            draws: Vec::new(),
            warned_draw_overflow: false,
        })
    }

    fn create_index_buffer(device: &wgpu::Device, quads: u32) -> wgpu::Buffer {
        // Never create a zero-sized buffer.
        let indices = quad_indices(quads.max(1));
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Quad Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        })
    }

    pub fn context(&self) -> &GpuContext {
        &self.ctx
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.ctx.resize(width, height);
    }

    pub fn reconfigure(&mut self) {
        self.ctx.reconfigure();
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.ctx.aspect_ratio()
    }

    fn store(&self, id: VertexStoreId) -> Option<&VertexStore> {
        self.stores.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Submit all draws queued since the last frame.
    ///
    /// The queue is cleared even when acquiring the surface texture fails.
    pub fn render_frame(
        &mut self,
        scene: &SceneUniforms,
        clear_color: [f32; 3],
    ) -> Result<(), wgpu::SurfaceError> {
        let draws = std::mem::take(&mut self.draws);
        let draw_count = draws.len().min(MAX_DRAWS);
        if draws.len() > MAX_DRAWS && !self.warned_draw_overflow {
            tracing::warn!(queued = draws.len(), MAX_DRAWS, "draw queue overflow, extra draws dropped");
            self.warned_draw_overflow = true;
        }

        let output = self.ctx.get_current_texture()?;
        let frame_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.ctx
            .queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(scene));

        if draw_count > 0 {
            let mut model_bytes = vec![0u8; self.model_stride as usize * draw_count];
            for (slot, draw) in draws.iter().take(draw_count).enumerate() {
                let start = slot * self.model_stride as usize;
                let uniforms = ModelUniforms::from(draw.model);
                let bytes = bytemuck::bytes_of(&uniforms);
                model_bytes[start..start + bytes.len()].copy_from_slice(bytes);
            }
            self.ctx
                .queue
                .write_buffer(&self.model_buffer, 0, &model_bytes);
        }

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cube Frame Encoder"),
            });

        {
            let (view, resolve_target) = match &self.ctx.msaa_view {
                Some(msaa) => (msaa, Some(&frame_view)),
                None => (&frame_view, None),
            };
            let [r, g, b] = clear_color;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cube Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for (slot, draw) in draws.iter().take(draw_count).enumerate() {
                let Some(store) = self.store(draw.store) else {
                    continue;
                };
                let quads = draw
                    .quad_count
                    .min(store.quad_capacity)
                    .min(self.index_quad_capacity);
                if quads == 0 {
                    continue;
                }
                let offset = (slot as u64 * self.model_stride) as wgpu::DynamicOffset;
                render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, store.buffer.slice(..));
                render_pass.draw_indexed(0..quads * 6, 0, 0..1);
            }
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

impl MeshBackend for CubeRenderer {
    fn create_vertex_store(&mut self, size_bytes: u64) -> VertexStoreId {
        let quad_capacity = (size_bytes / QUAD_BYTES) as u32;
        let buffer = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cube Vertex Store"),
            size: size_bytes.max(QUAD_BYTES),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        if quad_capacity > self.index_quad_capacity {
            self.index_buffer = Self::create_index_buffer(&self.ctx.device, quad_capacity);
            self.index_quad_capacity = quad_capacity;
        }

        let store = VertexStore {
            buffer,
            quad_capacity,
        };
        let id = match self.free_slots.pop() {
            Some(slot) => {
                self.stores[slot as usize] = Some(store);
                slot
            }
            None => {
                self.stores.push(Some(store));
                (self.stores.len() - 1) as u32
            }
        };
        tracing::debug!(store = id, size_bytes, "vertex store created");
        VertexStoreId(id)
    }

    fn upload_vertices(&mut self, store: VertexStoreId, offset_bytes: u64, data: &[u8]) {
        let Some(target) = self.store(store) else {
            tracing::warn!(?store, "upload to unknown vertex store ignored");
            return;
        };
        // write_buffer requires 4-byte aligned sizes; vertex data always is.
        if data.is_empty() || data.len() % 4 != 0 {
            return;
        }
        self.ctx.queue.write_buffer(&target.buffer, offset_bytes, data);
    }

    fn draw_quads(&mut self, store: VertexStoreId, quad_count: u32, model: Mat4) {
        self.draws.push(PendingDraw {
            store,
            quad_count,
            model,
        });
    }

    fn release_vertex_store(&mut self, store: VertexStoreId) {
        if let Some(slot) = self.stores.get_mut(store.0 as usize) {
            if slot.take().is_some() {
                self.free_slots.push(store.0);
                tracing::debug!(store = store.0, "vertex store released");
            }
        }
    }
}
