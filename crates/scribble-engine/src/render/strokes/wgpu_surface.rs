use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use crate::geom::FLOATS_PER_VERTEX;
use crate::render::{RenderCtx, RenderTarget};

use super::error::{StrokeRenderError, Unavailable};
use super::surface::{DrawCall, StrokeSurface};

/// GPU resources of the stroke renderer, kept across frames.
///
/// Owned by [`StrokeRenderer`](super::StrokeRenderer); built lazily on the first
/// frame and rebuilt only when the surface format changes (pipeline) or the vertex
/// array's space changes (vertex buffer).
#[derive(Default)]
pub struct StrokeGpuCache {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    camera_ubo: Option<wgpu::Buffer>,

    vertex_buffer: Option<wgpu::Buffer>,
}

impl core::fmt::Debug for StrokeGpuCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StrokeGpuCache")
            .field("pipeline_format", &self.pipeline_format)
            .field("has_pipeline", &self.pipeline.is_some())
            .field(
                "vertex_buffer_size",
                &self.vertex_buffer.as_ref().map(|b| b.size()),
            )
            .finish()
    }
}

impl StrokeGpuCache {
    /// Size of the current GPU vertex buffer in bytes.
    pub fn vertex_buffer_size(&self) -> Option<u64> {
        self.vertex_buffer.as_ref().map(|b| b.size())
    }
}

/// [`StrokeSurface`] over a wgpu frame.
///
/// Strokes are drawn in world space with the context's camera, on top of whatever
/// the target already holds (load, no clear).
pub struct WgpuStrokeSurface<'a, 'c, 't> {
    ctx: &'a RenderCtx<'c>,
    target: &'a mut RenderTarget<'t>,
    view_proj: Mat4,
}

impl<'a, 'c, 't> WgpuStrokeSurface<'a, 'c, 't> {
    pub fn new(ctx: &'a RenderCtx<'c>, target: &'a mut RenderTarget<'t>) -> Self {
        let view_proj = ctx.view_proj();
        Self {
            ctx,
            target,
            view_proj,
        }
    }

    /// Builds the pipeline for the current surface format. Validation errors are
    /// captured in an error scope; on failure nothing is cached.
    fn ensure_pipeline(&self, cache: &mut StrokeGpuCache) -> Result<(), StrokeRenderError> {
        let ctx = self.ctx;
        if cache.pipeline_format == Some(ctx.surface_format) && cache.pipeline.is_some() {
            return Ok(());
        }

        let error_scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scribble stroke shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/stroke.wgsl").into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("scribble stroke bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: wgpu::BufferSize::new(
                                std::mem::size_of::<CameraUniform>() as u64,
                            ),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("scribble stroke pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scribble stroke pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[stroke_vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Ribbons wind counter-clockwise toward the viewer; backs are culled.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        pipeline_build_result(pollster::block_on(error_scope.pop()))?;
        log::debug!("stroke pipeline built for {:?}", ctx.surface_format);

        cache.pipeline_format = Some(ctx.surface_format);
        cache.pipeline = Some(pipeline);
        cache.bind_group_layout = Some(bind_group_layout);

        cache.bind_group = None;
        cache.camera_ubo = None;
        Ok(())
    }

    fn ensure_bindings(&self, cache: &mut StrokeGpuCache) {
        if cache.bind_group.is_some() && cache.camera_ubo.is_some() {
            return;
        }
        let Some(bgl) = cache.bind_group_layout.as_ref() else { return };

        let camera_ubo = self.ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("scribble stroke camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scribble stroke bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_ubo.as_entire_binding(),
            }],
        });

        cache.camera_ubo = Some(camera_ubo);
        cache.bind_group = Some(bind_group);
    }

    fn write_camera_uniform(&self, cache: &StrokeGpuCache) {
        let Some(ubo) = cache.camera_ubo.as_ref() else { return };
        let u = CameraUniform {
            view_proj: self.view_proj.to_cols_array_2d(),
        };
        self.ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

impl StrokeSurface for WgpuStrokeSurface<'_, '_, '_> {
    type Cache = StrokeGpuCache;

    fn check_available(&self) -> Result<(), StrokeRenderError> {
        if !self.ctx.viewport.is_valid() {
            return Err(Unavailable::Surface(format!(
                "viewport {}x{} has no area",
                self.ctx.viewport.width, self.ctx.viewport.height
            ))
            .into());
        }
        Ok(())
    }

    fn prepare_pipeline(&mut self, cache: &mut StrokeGpuCache) -> Result<(), StrokeRenderError> {
        let format = self.ctx.surface_format;
        if format.is_depth_stencil_format() || !format.has_color_aspect() {
            return Err(StrokeRenderError::PipelineUnavailable(format!(
                "{format:?} cannot be a stroke color target"
            )));
        }

        self.ensure_pipeline(cache)?;
        self.ensure_bindings(cache);
        self.write_camera_uniform(cache);
        Ok(())
    }

    fn allocate_vertex_buffer(&mut self, cache: &mut StrokeGpuCache, contents: &[f32]) {
        cache.vertex_buffer = Some(self.ctx.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("scribble stroke vbo"),
                contents: bytemuck::cast_slice(contents),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            },
        ));
    }

    fn write_vertex_buffer(&mut self, cache: &mut StrokeGpuCache, float_offset: usize, data: &[f32]) {
        let Some(vbo) = cache.vertex_buffer.as_ref() else {
            log::warn!("stroke vertex write before buffer allocation; dropped");
            return;
        };
        let offset = (float_offset * std::mem::size_of::<f32>()) as u64;
        self.ctx.queue.write_buffer(vbo, offset, bytemuck::cast_slice(data));
    }

    fn draw_strokes(&mut self, cache: &StrokeGpuCache, calls: &[DrawCall]) {
        if calls.is_empty() {
            return;
        }

        let Some(pipeline) = cache.pipeline.as_ref() else { return };
        let Some(bind_group) = cache.bind_group.as_ref() else { return };
        let Some(vbo) = cache.vertex_buffer.as_ref() else { return };

        let mut rpass = self.target.begin_pass("scribble stroke pass", None);

        rpass.push_debug_group("DrawStrokes");
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);

        for call in calls {
            rpass.set_vertex_buffer(0, vbo.slice(call.byte_offset..));
            rpass.draw(0..call.vertex_count, 0..1);
        }

        rpass.pop_debug_group();
    }
}

/// Maps the error scope around a pipeline build to the renderer's error.
fn pipeline_build_result<E: std::fmt::Display>(
    scope_error: Option<E>,
) -> Result<(), StrokeRenderError> {
    match scope_error {
        None => Ok(()),
        Some(err) => {
            log::error!("stroke pipeline build failed: {err}");
            Err(StrokeRenderError::PipelineUnavailable(err.to_string()))
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

const STROKE_VERTEX_ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x4, // position (w = 1)
    1 => Float32x4  // color
];

fn stroke_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: (FLOATS_PER_VERTEX * std::mem::size_of::<f32>()) as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &STROKE_VERTEX_ATTRS,
    }
}
