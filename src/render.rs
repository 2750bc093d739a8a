use anyhow::anyhow;
use sonify_core::{decode_depth, Aabb, Camera, DepthImage, DepthRange, ReduceOp};
use std::cell::RefCell;

mod encoder;
mod helpers;
mod readback;
mod reduce;
mod targets;

use encoder::{DepthPass, MeshBuffers};
use reduce::ReducePass;
use targets::DepthTargets;

/// What one measurement produces: the full packed image for pointer lookups
/// and the reduced near/far range.
pub struct Measurement {
    pub image: DepthImage,
    pub range: DepthRange,
}

/// Offscreen WebGPU device that renders the host mesh to packed depth and
/// reduces it. It never presents to the canvas; the host viewer owns that.
pub struct DepthMeasurer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    depth_pass: DepthPass,
    reduce_pass: ReducePass,
    mesh: RefCell<Option<MeshBuffers>>,
}

impl DepthMeasurer {
    pub async fn new() -> anyhow::Result<Self> {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: Some("sonify"),
                },
                None,
            )
            .await
            .map_err(|e| anyhow!(format!("request_device error: {:?}", e)))?;
        let depth_pass = DepthPass::new(&device);
        let reduce_pass = ReducePass::new(&device);
        log::info!("[gpu] depth measurer ready");
        Ok(Self {
            device,
            queue,
            depth_pass,
            reduce_pass,
            mesh: RefCell::new(None),
        })
    }

    /// Replace the uploaded model. `positions` is flat xyz.
    pub fn set_mesh(&self, positions: &[f32], indices: &[u32]) {
        if positions.len() % 3 != 0 {
            log::warn!("[gpu] position buffer length {} is not xyz", positions.len());
        }
        let usable = positions.len() - positions.len() % 3;
        let mesh = MeshBuffers::upload(&self.device, &positions[..usable], indices);
        log::info!(
            "[gpu] model uploaded: {} vertices, {} indices",
            usable / 3,
            mesh.index_count
        );
        *self.mesh.borrow_mut() = Some(mesh);
    }

    /// Render the model with planes tightened to `model`, read the packed
    /// image back and reduce it to a depth range.
    ///
    /// `camera` is the host camera; only a tightened copy reaches the GPU.
    pub async fn measure(
        &self,
        camera: &Camera,
        model: &Aabb,
        width: u32,
        height: u32,
    ) -> anyhow::Result<Measurement> {
        let tight = camera.tightened_to(model);
        let targets = DepthTargets::new(&self.device, width, height);
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("measure"),
            });
        {
            let mesh = self.mesh.borrow();
            self.depth_pass
                .encode(&self.device, &mut encoder, &targets, mesh.as_ref(), &tight);
        }

        let image_copy = readback::copy_texture(
            &self.device,
            &mut encoder,
            &targets.packed_tex,
            targets.width,
            targets.height,
        );
        let mut extremes = Vec::with_capacity(ReduceOp::PASSES.len());
        for op in ReduceOp::PASSES {
            let last = self.reduce_pass.encode(
                &self.device,
                &mut encoder,
                &targets.packed_view,
                (targets.width, targets.height),
                op,
            );
            extremes.push(readback::copy_texture(&self.device, &mut encoder, &last, 1, 1));
        }
        self.queue.submit(Some(encoder.finish()));

        let mut reduced = [0.0_f32; 2];
        for (slot, pending) in reduced.iter_mut().zip(extremes) {
            let px = pending.read_bottom_up(&self.device).await?;
            *slot = decode_depth([px[0], px[1], px[2], px[3]]);
        }
        let rgba = image_copy.read_bottom_up(&self.device).await?;
        let range = DepthRange::new(reduced[0], reduced[1]);
        log::debug!(
            "[gpu] measured {}x{} near={:.5} far={:.5} planes=({:.3},{:.3})",
            targets.width,
            targets.height,
            range.near,
            range.far,
            tight.znear,
            tight.zfar
        );
        Ok(Measurement {
            image: DepthImage::new(targets.width, targets.height, rgba),
            range,
        })
    }
}
