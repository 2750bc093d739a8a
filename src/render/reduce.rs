use super::helpers;
use sonify_core::pyramid::pyramid_levels;
use sonify_core::ReduceOp;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ReduceUniforms {
    pass_index: u32,
    src_width: u32,
    src_height: u32,
    _pad: u32,
}

/// GPU side of the min/max pyramid. Level sizes come from
/// `sonify_core::pyramid::pyramid_levels`, so the CPU reference and this pass
/// fold exactly the same blocks.
pub(crate) struct ReducePass {
    pipeline: wgpu::RenderPipeline,
    bgl: wgpu::BindGroupLayout,
}

impl ReducePass {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("minmax_shader"),
            source: wgpu::ShaderSource::Wgsl(sonify_core::MINMAX_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("minmax_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("minmax_layout"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = helpers::make_fullscreen_pipeline(
            device,
            "minmax_pipeline",
            &layout,
            &shader,
            "fs_reduce",
            helpers::PACKED_FORMAT,
        );
        Self { pipeline, bgl }
    }

    /// Record one full pass from `source` down to 1x1 and return the final
    /// level's texture.
    pub(crate) fn encode(
        &self,
        device: &wgpu::Device,
        encoder: &mut wgpu::CommandEncoder,
        source: &wgpu::TextureView,
        source_size: (u32, u32),
        op: ReduceOp,
    ) -> wgpu::Texture {
        let levels = pyramid_levels(source_size.0, source_size.1);
        let mut src_view = source.clone();
        let (mut src_w, mut src_h) = source_size;
        let mut last = None;

        for (i, (w, h)) in levels.iter().copied().enumerate() {
            let label = format!("minmax_{}_{}", op as u32, i);
            let (tex, view) = helpers::create_packed_texture(device, &label, w, h);
            let uniforms = ReduceUniforms {
                pass_index: op as u32,
                src_width: src_w,
                src_height: src_h,
                _pad: 0,
            };
            let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("minmax_uniforms"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("minmax_bg"),
                layout: &self.bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&src_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                ],
            });
            helpers::blit(encoder, &label, &view, &self.pipeline, &bind_group);
            src_view = view;
            (src_w, src_h) = (w, h);
            last = Some(tex);
        }

        // pyramid_levels always yields at least the 1x1 level
        last.unwrap_or_else(|| helpers::create_packed_texture(device, "minmax_empty", 1, 1).0)
    }
}
