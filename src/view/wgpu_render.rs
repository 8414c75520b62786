use wgpu::*;

use crate::config::ViewConfig;
use crate::model::{DrawRange, SceneBuffers};
use crate::utils::{align_to, GeometryBuffers};
use crate::view::{FrameGlobals, GpuContext, ObjectDraw, Renderer, VERTEX_ATTRIBUTES};

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;
const INITIAL_OBJECT_CAPACITY: usize = 16;

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub light_direction: [f32; 4],
    pub ambient_color: [f32; 4],
    pub diffuse_color: [f32; 4],
}

impl From<&FrameGlobals> for GlobalsUniform {
    fn from(g: &FrameGlobals) -> Self {
        Self {
            view_proj: g.view_proj.to_cols_array_2d(),
            light_direction: g.light_direction.extend(0.0).to_array(),
            ambient_color: g.ambient_color.extend(1.0).to_array(),
            diffuse_color: g.diffuse_color.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub view_transform: [[f32; 4]; 4],
    pub world_transform: [[f32; 4]; 4],
    pub material_color: [f32; 4],
}

impl From<&ObjectDraw> for ObjectUniform {
    fn from(d: &ObjectDraw) -> Self {
        Self {
            view_transform: d.view_transform.to_cols_array_2d(),
            world_transform: d.world_transform.to_cols_array_2d(),
            material_color: d.material_color.extend(1.0).to_array(),
        }
    }
}

struct PendingDraw {
    uniform: ObjectUniform,
    range: DrawRange,
}

pub fn create_depth_texture(device: &Device, width: u32, height: u32) -> (Texture, TextureView) {
    let depth_texture = device.create_texture(&TextureDescriptor {
        label: Some("depth_texture"),
        size: Extent3d { width: width.max(1), height: height.max(1), depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

fn uniform_layout_entry(visibility: ShaderStages, dynamic: bool, min_size: u64) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding: 0,
        visibility,
        ty: BindingType::Buffer {
            ty: BufferBindingType::Uniform,
            has_dynamic_offset: dynamic,
            min_binding_size: BufferSize::new(min_size),
        },
        count: None,
    }
}

/// wgpu implementation of the draw-submission interface.
pub struct WgpuRenderer {
    gpu: GpuContext,
    pipeline: RenderPipeline,
    clear_color: Color,

    globals_buffer: Buffer,
    globals_bind_group: BindGroup,

    // One slot per object at `object_stride` byte offsets, addressed with dynamic offsets.
    object_layout: BindGroupLayout,
    object_buffer: Buffer,
    object_bind_group: BindGroup,
    object_stride: u64,
    object_capacity: usize,
    object_staging: Vec<u8>,

    _depth_texture: Texture,
    depth_view: TextureView,

    geometry: Option<GeometryBuffers>,
    draws: Vec<PendingDraw>,
}

impl WgpuRenderer {
    pub fn new(gpu: GpuContext, view: &ViewConfig) -> Self {
        let device = gpu.device.clone();
        let globals_size = std::mem::size_of::<GlobalsUniform>() as u64;
        let object_size = std::mem::size_of::<ObjectUniform>() as u64;
        let object_stride = align_to(object_size, device.limits().min_uniform_buffer_offset_alignment as u64);

        let globals_buffer = device.create_buffer(&BufferDescriptor {
            label: Some("globals_buffer"),
            size: globals_size,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("globals_bind_group_layout"),
            entries: &[uniform_layout_entry(ShaderStages::VERTEX_FRAGMENT, false, globals_size)],
        });
        let globals_bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("globals_bind_group"),
            layout: &globals_layout,
            entries: &[BindGroupEntry { binding: 0, resource: globals_buffer.as_entire_binding() }],
        });

        let object_layout = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("object_bind_group_layout"),
            entries: &[uniform_layout_entry(ShaderStages::VERTEX_FRAGMENT, true, object_size)],
        });
        let (object_buffer, object_bind_group) =
            create_object_slots(&device, &object_layout, object_stride, INITIAL_OBJECT_CAPACITY);

        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("world_shader"),
            source: ShaderSource::Wgsl(include_str!("shaders/world.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&globals_layout, &object_layout],
            push_constant_ranges: &[],
        });

        // One tightly packed vec3 buffer per named attribute.
        let attributes: Vec<VertexAttribute> = VERTEX_ATTRIBUTES
            .iter()
            .map(|&(name, location)| {
                tracing::debug!(name, location, "binding vertex attribute");
                VertexAttribute { offset: 0, shader_location: location, format: VertexFormat::Float32x3 }
            })
            .collect();
        let vertex_buffers: Vec<VertexBufferLayout> = attributes
            .iter()
            .map(|attribute| VertexBufferLayout {
                array_stride: std::mem::size_of::<[f32; 3]>() as BufferAddress,
                step_mode: VertexStepMode::Vertex,
                attributes: std::slice::from_ref(attribute),
            })
            .collect();

        let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("world_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &vertex_buffers,
                compilation_options: Default::default(),
            },
            fragment: Some(FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(ColorTargetState { format: gpu.format, blend: Some(BlendState::REPLACE), write_mask: ColorWrites::ALL })],
                compilation_options: Default::default(),
            }),
            primitive: PrimitiveState {
                topology: PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: CompareFunction::Less,
                stencil: StencilState::default(),
                bias: DepthBiasState::default(),
            }),
            multisample: MultisampleState { count: 1, mask: !0, alpha_to_coverage_enabled: false },
            multiview: None,
            cache: None,
        });

        let (depth_texture, depth_view) = create_depth_texture(&device, gpu.config.width, gpu.config.height);
        let [r, g, b, a] = view.clear_color;

        Self {
            gpu,
            pipeline,
            clear_color: Color { r, g, b, a },
            globals_buffer,
            globals_bind_group,
            object_layout,
            object_buffer,
            object_bind_group,
            object_stride,
            object_capacity: INITIAL_OBJECT_CAPACITY,
            object_staging: Vec::new(),
            _depth_texture: depth_texture,
            depth_view,
            geometry: None,
            draws: Vec::new(),
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.gpu.config.width, self.gpu.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width, height) == self.size() {
            return;
        }
        self.gpu.reconfigure(width, height);
        let (texture, view) = create_depth_texture(&self.gpu.device, width, height);
        self._depth_texture = texture;
        self.depth_view = view;
    }

    fn ensure_object_capacity(&mut self, count: usize) {
        if count <= self.object_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        tracing::debug!(from = self.object_capacity, to = capacity, "growing object uniform buffer");
        let (buffer, bind_group) = create_object_slots(&self.gpu.device, &self.object_layout, self.object_stride, capacity);
        self.object_buffer = buffer;
        self.object_bind_group = bind_group;
        self.object_capacity = capacity;
    }

    fn render(&mut self, draws: &[PendingDraw]) {
        self.ensure_object_capacity(draws.len());

        let stride = self.object_stride as usize;
        self.object_staging.clear();
        self.object_staging.resize(stride * draws.len(), 0);
        for (i, draw) in draws.iter().enumerate() {
            let bytes = bytemuck::bytes_of(&draw.uniform);
            self.object_staging[i * stride..i * stride + bytes.len()].copy_from_slice(bytes);
        }
        if !self.object_staging.is_empty() {
            self.gpu.queue.write_buffer(&self.object_buffer, 0, &self.object_staging);
        }

        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                tracing::warn!("surface lost, reconfiguring and skipping frame");
                let (width, height) = self.size();
                self.gpu.reconfigure(width, height);
                return;
            }
            Err(e) => {
                tracing::warn!("skipping frame: {e:?}");
                return;
            }
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = self.gpu.device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(geometry) = &self.geometry {
                rp.set_pipeline(&self.pipeline);
                rp.set_bind_group(0, &self.globals_bind_group, &[]);
                rp.set_vertex_buffer(0, geometry.position_buffer.slice(..));
                rp.set_vertex_buffer(1, geometry.normal_buffer.slice(..));
                rp.set_index_buffer(geometry.index_buffer.slice(..), IndexFormat::Uint32);

                for (i, draw) in draws.iter().enumerate() {
                    let DrawRange { first_index, index_count } = draw.range;
                    if index_count == 0 || first_index + index_count > geometry.index_count {
                        continue;
                    }
                    let offset = (i as u64 * self.object_stride) as DynamicOffset;
                    rp.set_bind_group(1, &self.object_bind_group, &[offset]);
                    rp.draw_indexed(first_index..first_index + index_count, 0, 0..1);
                }
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }
}

fn create_object_slots(device: &Device, layout: &BindGroupLayout, stride: u64, capacity: usize) -> (Buffer, BindGroup) {
    let buffer = device.create_buffer(&BufferDescriptor {
        label: Some("object_buffer"),
        size: stride * capacity as u64,
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&BindGroupDescriptor {
        label: Some("object_bind_group"),
        layout,
        entries: &[BindGroupEntry {
            binding: 0,
            resource: BindingResource::Buffer(BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
            }),
        }],
    });
    (buffer, bind_group)
}

impl Renderer for WgpuRenderer {
    fn register_geometry(&mut self, buffers: &SceneBuffers) {
        self.geometry = Some(GeometryBuffers::upload(buffers, &self.gpu.device));
    }

    fn set_globals(&mut self, globals: &FrameGlobals) {
        let uniform = GlobalsUniform::from(globals);
        self.gpu.queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    fn draw(&mut self, draw: &ObjectDraw) {
        self.draws.push(PendingDraw { uniform: ObjectUniform::from(draw), range: draw.range });
    }

    fn present(&mut self) {
        let draws = std::mem::take(&mut self.draws);
        self.render(&draws);
        self.draws = draws;
        self.draws.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use crate::model::ObjectId;

    #[test]
    fn test_uniform_layouts_match_shader() {
        // WGSL: mat4 + 3 x vec4 and 2 x mat4 + vec4.
        assert_eq!(std::mem::size_of::<GlobalsUniform>(), 112);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 144);
    }

    #[test]
    fn test_object_uniform_from_draw() {
        let draw = ObjectDraw {
            id: ObjectId(3),
            view_transform: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            world_transform: Mat4::IDENTITY,
            material_color: Vec3::new(0.8, 0.2, 0.1),
            range: DrawRange { first_index: 6, index_count: 36 },
        };
        let uniform = ObjectUniform::from(&draw);
        assert_eq!(uniform.view_transform[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniform.world_transform, Mat4::IDENTITY.to_cols_array_2d());
        assert_eq!(uniform.material_color, [0.8, 0.2, 0.1, 1.0]);
    }
}
