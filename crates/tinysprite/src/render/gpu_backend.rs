use anyhow::Result;
use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::paint::Color;
use crate::render::batch::{
    quad_indices, vertex_buffer_size, BatchConfig, DrawBackend, TextureHandle, TextureId,
    VertexLayout,
};
use crate::render::{RenderCtx, Texture};

use super::common::{alpha_blend, texture_bind_group_layout, ViewportUniform};

/// [`DrawBackend`] on wgpu.
///
/// Owns the static index buffer, the dynamic vertex buffer sized for one full
/// batch, and the pipeline for one [`VertexLayout`]. Every draw is recorded in
/// its own command buffer and submitted immediately, so the vertex buffer can
/// be rewritten from offset zero for the next batch: `Queue::write_buffer`
/// lands before the next submission, never under an earlier one.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    label: &'static str,

    pipeline: wgpu::RenderPipeline,
    texture_bgl: wgpu::BindGroupLayout,

    viewport: Viewport,
    viewport_ubo: wgpu::Buffer,
    viewport_bind_group: wgpu::BindGroup,

    vbo: wgpu::Buffer,
    ibo: wgpu::Buffer,
    uploaded_bytes: u64,

    texture: BoundTexture<wgpu::BindGroup>,

    target: Option<wgpu::TextureView>,
    warned_no_target: bool,
}

impl WgpuBackend {
    /// Builds the pipeline for `L` and allocates buffers for `config.capacity`
    /// quads.
    ///
    /// Fails if the capacity is out of range or the shader/pipeline does not
    /// validate. Nothing can be drawn without them, so there is no fallback.
    pub fn new<L: VertexLayout>(ctx: &RenderCtx<'_>, config: &BatchConfig) -> Result<Self> {
        config.validate()?;
        let label = L::NAME;

        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(L::SHADER.into()),
        });

        let viewport_bgl = ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tinysprite viewport bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: Some(ViewportUniform::min_binding_size()),
                },
                count: None,
            }],
        });

        let texture_bgl = texture_bind_group_layout(ctx.device, "tinysprite texture bgl");

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&viewport_bgl, &texture_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[L::buffer_layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // The two triangles of a quad wind in opposite directions.
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            log::error!("{label} pipeline failed validation: {err}");
            anyhow::bail!("{label} pipeline failed validation: {err}");
        }

        let viewport_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tinysprite viewport ubo"),
            contents: bytemuck::bytes_of(&ViewportUniform::new(ctx.viewport)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let viewport_bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tinysprite viewport bind group"),
            layout: &viewport_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        let indices = quad_indices(config.capacity);
        let ibo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tinysprite quad ibo"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let vbo_size = vertex_buffer_size::<L::Vertex>(config.capacity);
        let vbo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tinysprite batch vbo"),
            size: vbo_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::info!(
            "{label} batch ready: {} quads, {vbo_size} B vertices, {} B indices",
            config.capacity,
            indices.len() * 2
        );

        Ok(Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            label,
            pipeline,
            texture_bgl,
            viewport: ctx.viewport,
            viewport_ubo,
            viewport_bind_group,
            vbo,
            ibo,
            uploaded_bytes: 0,
            texture: BoundTexture::default(),
            target: None,
            warned_no_target: false,
        })
    }

    /// Sets the color view that following clears and draws render into.
    pub fn set_target(&mut self, view: &wgpu::TextureView) {
        self.target = Some(view.clone());
    }

    /// Updates the projection. Writes the uniform only when the size changed.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.queue.write_buffer(
            &self.viewport_ubo,
            0,
            bytemuck::bytes_of(&ViewportUniform::new(viewport)),
        );
    }

    fn target_or_warn(&mut self) -> Option<wgpu::TextureView> {
        if self.target.is_none() && !self.warned_no_target {
            log::warn!("{}: no render target set; output dropped", self.label);
            self.warned_no_target = true;
        }
        self.target.clone()
    }
}

impl DrawBackend for WgpuBackend {
    type Texture = Texture;

    fn upload_vertices(&mut self, bytes: &[u8]) {
        self.queue.write_buffer(&self.vbo, 0, bytes);
        self.uploaded_bytes = bytes.len() as u64;
    }

    fn bind_texture(&mut self, texture: &Texture) {
        let device = &self.device;
        let layout = &self.texture_bgl;
        self.texture.bind(texture.id(), || {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("tinysprite texture bind group"),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(texture.view()),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(texture.sampler()),
                    },
                ],
            })
        });
    }

    fn draw_indexed(&mut self, index_count: u32) {
        let Some(view) = self.target_or_warn() else { return };
        let Some(texture_bg) = self.texture.group() else { return };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tinysprite batch encoder"),
        });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tinysprite batch pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.viewport_bind_group, &[]);
            rpass.set_bind_group(1, texture_bg, &[]);
            rpass.set_vertex_buffer(0, self.vbo.slice(..self.uploaded_bytes));
            rpass.set_index_buffer(self.ibo.slice(..), wgpu::IndexFormat::Uint16);
            rpass.draw_indexed(0..index_count, 0, 0..1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn clear(&mut self, color: Color) {
        let Some(view) = self.target_or_warn() else { return };

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tinysprite clear encoder"),
        });

        // Dropped before the encoder is finished.
        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tinysprite clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn end_frame(&mut self) {
        self.target = None;
    }
}

/// Bind group of the one texture currently bound.
///
/// Only the live group is held: binding another texture drops the previous
/// group and the view it references.
struct BoundTexture<G> {
    slot: Option<(TextureId, G)>,
}

impl<G> Default for BoundTexture<G> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<G> BoundTexture<G> {
    /// Makes `id` the bound texture, building its group with `make` unless it
    /// is already bound.
    fn bind(&mut self, id: TextureId, make: impl FnOnce() -> G) {
        if !matches!(&self.slot, Some((bound, _)) if *bound == id) {
            self.slot = Some((id, make()));
        }
    }

    #[inline]
    fn group(&self) -> Option<&G> {
        self.slot.as_ref().map(|(_, group)| group)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::{Rc, Weak};

    use super::*;

    #[test]
    fn only_the_latest_texture_group_stays_alive() {
        let mut bound = BoundTexture::default();
        let mut released: Vec<Weak<TextureId>> = Vec::new();

        for _ in 0..64 {
            let id = TextureId::next();
            let group = Rc::new(id);
            released.push(Rc::downgrade(&group));
            bound.bind(id, move || group);
        }

        let live = released.iter().filter(|w| w.upgrade().is_some()).count();
        assert_eq!(live, 1);
        assert!(released.last().and_then(Weak::upgrade).is_some());
    }

    #[test]
    fn rebinding_the_same_texture_keeps_its_group() {
        let mut bound = BoundTexture::default();
        let id = TextureId::next();
        let mut built = 0;
        for _ in 0..3 {
            bound.bind(id, || {
                built += 1;
                built
            });
        }
        assert_eq!(built, 1);
        assert_eq!(bound.group(), Some(&1));
    }

    #[test]
    fn switching_back_rebuilds_the_group() {
        let mut bound = BoundTexture::default();
        let (a, b) = (TextureId::next(), TextureId::next());
        bound.bind(a, || "a1");
        bound.bind(b, || "b");
        bound.bind(a, || "a2");
        assert_eq!(bound.group(), Some(&"a2"));
    }
}
