use super::helpers;

pub(crate) const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Offscreen targets for one depth measurement.
///
/// - `packed_*` receives the base-256 packed linear depth at viewport size.
/// - `zbuffer_*` is the hardware depth buffer used for nearest-surface tests.
///
/// Created per recompute and dropped with it, so nothing outlives the epoch.
pub(crate) struct DepthTargets {
    pub(crate) packed_tex: wgpu::Texture,
    pub(crate) packed_view: wgpu::TextureView,
    pub(crate) _zbuffer_tex: wgpu::Texture,
    pub(crate) zbuffer_view: wgpu::TextureView,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl DepthTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let (packed_tex, packed_view) =
            helpers::create_packed_texture(device, "packed_depth", width, height);
        let (zbuffer_tex, zbuffer_view) = helpers::create_color_texture(
            device,
            "zbuffer",
            width,
            height,
            DEPTH_STENCIL_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        Self {
            packed_tex,
            packed_view,
            _zbuffer_tex: zbuffer_tex,
            zbuffer_view,
            width,
            height,
        }
    }
}
