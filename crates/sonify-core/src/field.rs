//! Per-epoch depth field and the single-pixel sampler.

use crate::codec::decode_depth;
use crate::geometry::{Aabb, Camera, CameraPreset, ProjectedBounds, Viewport};
use crate::mapping::SampleParams;
use crate::proximity::{gain_for, gain_reference_distance};
use crate::pyramid::DepthImage;
use crate::range::DepthRange;

/// Everything a pointer sample needs, captured at one range recompute.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthField {
    pub range: DepthRange,
    pub bounds: ProjectedBounds,
    pub gain_reference: f32,
    pub image: DepthImage,
}

impl DepthField {
    /// Assemble a field from a rendered depth image and its reduced range.
    ///
    /// `camera` must be the camera the image was rendered with; projected
    /// bounds use the preset's corner pair.
    pub fn new(
        image: DepthImage,
        range: DepthRange,
        camera: &Camera,
        model: &Aabb,
        preset: CameraPreset,
    ) -> Self {
        let viewport = Viewport::new(image.width, image.height);
        let bounds = ProjectedBounds::from_preset(model, camera, preset, viewport);
        let gain_reference = gain_reference_distance(viewport, &bounds);
        log::debug!(
            "[field] range=({:.5},{:.5}) bounds=({:.1},{:.1} {:.1}x{:.1}) ref={:.1}",
            range.near,
            range.far,
            bounds.min_x,
            bounds.min_y,
            bounds.width,
            bounds.height,
            gain_reference
        );
        Self {
            range,
            bounds,
            gain_reference,
            image,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.image.width, self.image.height)
    }

    /// Packed texel under a screen position (origin top-left). The image is
    /// stored bottom row first, so the row is flipped.
    pub fn read_pixel(&self, x: f32, y: f32) -> [u8; 4] {
        let h = self.image.height as f32;
        let col = x.max(0.0) as u32;
        let row = (h - y).max(0.0) as u32;
        self.image.texel(col, row)
    }

    /// Normalized depth in `[0, 1]` under a screen position.
    pub fn sample_depth(&self, x: f32, y: f32) -> f32 {
        self.range.normalize(decode_depth(self.read_pixel(x, y)))
    }

    /// Audio parameters for a pointer (or synthetic scan) position.
    pub fn sample(&self, x: f32, y: f32) -> SampleParams {
        let depth = self.sample_depth(x, y);
        let gain = gain_for(x, y, &self.bounds, self.gain_reference);
        log::trace!("[field] ({x:.1},{y:.1}) depth={depth:.4} gain={gain:.3}");
        SampleParams::new(depth, gain)
    }
}
