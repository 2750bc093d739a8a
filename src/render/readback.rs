use anyhow::anyhow;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

#[inline]
pub(crate) fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * 4;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// A texture copy waiting in a mappable buffer.
pub(crate) struct PendingReadback {
    buffer: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bpr: u32,
}

/// Record a copy of an `Rgba8Unorm` texture into a fresh MAP_READ buffer.
pub(crate) fn copy_texture(
    device: &wgpu::Device,
    encoder: &mut wgpu::CommandEncoder,
    texture: &wgpu::Texture,
    width: u32,
    height: u32,
) -> PendingReadback {
    let padded_bpr = padded_bytes_per_row(width);
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("readback"),
        size: (padded_bpr as u64) * (height as u64),
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });
    encoder.copy_texture_to_buffer(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::TexelCopyBufferInfo {
            buffer: &buffer,
            layout: wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(padded_bpr),
                rows_per_image: Some(height),
            },
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
    PendingReadback {
        buffer,
        width,
        height,
        padded_bpr,
    }
}

impl PendingReadback {
    /// Map the buffer and return tightly packed RGBA rows, bottom row first.
    ///
    /// WebGPU copies row 0 = top; the depth image convention is row 0 =
    /// bottom, so rows are flipped while the padding is stripped.
    pub(crate) async fn read_bottom_up(self, device: &wgpu::Device) -> anyhow::Result<Vec<u8>> {
        let slice = self.buffer.slice(..);
        let promise = js_sys::Promise::new(&mut |resolve, reject| {
            slice.map_async(wgpu::MapMode::Read, move |res| {
                _ = match res {
                    Ok(()) => resolve.call0(&JsValue::NULL),
                    Err(e) => reject.call1(&JsValue::NULL, &JsValue::from_str(&e.to_string())),
                };
            });
        });
        let _ = device.poll(wgpu::Maintain::Poll);
        JsFuture::from(promise)
            .await
            .map_err(|e| anyhow!("map_async failed: {:?}", e))?;

        let row_bytes = (self.width * 4) as usize;
        let mut out = Vec::with_capacity(row_bytes * self.height as usize);
        {
            let data = slice.get_mapped_range();
            for row in (0..self.height as usize).rev() {
                let start = row * self.padded_bpr as usize;
                out.extend_from_slice(&data[start..start + row_bytes]);
            }
        }
        self.buffer.unmap();
        Ok(out)
    }
}
