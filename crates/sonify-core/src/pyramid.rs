//! Min/max reduction pyramid planning and the CPU reference reducer.
//!
//! The GPU path in the web frontend runs the same level chain with
//! `shaders/minmax.wgsl`; this module defines the level sizes it allocates and
//! the exact per-texel rule it implements.

use crate::codec::{decode_depth, encode_depth, is_empty};
use crate::range::DepthRange;
use smallvec::SmallVec;

/// Level dimensions of a reduction chain. 16 levels cover 65536 px.
pub type Levels = SmallVec<[(u32, u32); 16]>;

/// Which extreme a reduction pass keeps. The discriminant is the shader's
/// `pass` uniform.
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReduceOp {
    Min = 0,
    Max = 1,
}

impl ReduceOp {
    pub const PASSES: [ReduceOp; 2] = [ReduceOp::Min, ReduceOp::Max];

    /// Combine two packed texels. `Min` treats empty texels as absent so the
    /// cleared background never wins.
    #[inline]
    pub fn combine(self, a: [u8; 4], b: [u8; 4]) -> [u8; 4] {
        match self {
            ReduceOp::Min => {
                if is_empty(a) {
                    b
                } else if is_empty(b) || decode_depth(a) <= decode_depth(b) {
                    a
                } else {
                    b
                }
            }
            ReduceOp::Max => {
                if decode_depth(a) >= decode_depth(b) {
                    a
                } else {
                    b
                }
            }
        }
    }
}

pub fn next_power_of_two(n: u32) -> u32 {
    n.max(1).next_power_of_two()
}

/// Sizes of every level from the first reduction down to 1x1.
///
/// The first level is half the next power of two of each source dimension, so
/// its 2x2 footprints cover the whole source; each following level halves
/// again, flooring at 1.
pub fn pyramid_levels(width: u32, height: u32) -> Levels {
    let mut levels = Levels::new();
    let mut w = next_power_of_two(width);
    let mut h = next_power_of_two(height);
    loop {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        levels.push((w, h));
        if w == 1 && h == 1 {
            break;
        }
    }
    levels
}

/// Packed depth image. Row 0 is the bottom row, matching render-target
/// readback order.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl DepthImage {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), (width * height * 4) as usize);
        Self {
            width,
            height,
            rgba,
        }
    }

    pub fn empty(width: u32, height: u32) -> Self {
        Self::new(width, height, vec![0; (width * height * 4) as usize])
    }

    /// Build from unpacked depths (0.0 = no surface), row-major, bottom row first.
    pub fn from_depths(width: u32, height: u32, depths: &[f32]) -> Self {
        let mut rgba = Vec::with_capacity(depths.len() * 4);
        for d in depths {
            if *d > 0.0 {
                rgba.extend_from_slice(&encode_depth(*d));
            } else {
                rgba.extend_from_slice(&[0; 4]);
            }
        }
        Self::new(width, height, rgba)
    }

    /// Texel at `(x, y)` clamped to the image edge.
    #[inline]
    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }

    fn set_texel(&mut self, x: u32, y: u32, v: [u8; 4]) {
        let i = ((y * self.width + x) * 4) as usize;
        self.rgba[i..i + 4].copy_from_slice(&v);
    }
}

/// One reduction step: each destination texel folds the 2x2 source block
/// starting at `(2x, 2y)`, clamped to the source edge.
pub fn reduce_level(src: &DepthImage, op: ReduceOp, width: u32, height: u32) -> DepthImage {
    let mut dst = DepthImage::empty(width, height);
    for y in 0..height {
        for x in 0..width {
            let (sx, sy) = (x * 2, y * 2);
            let v = op.combine(
                op.combine(src.texel(sx, sy), src.texel(sx + 1, sy)),
                op.combine(src.texel(sx, sy + 1), src.texel(sx + 1, sy + 1)),
            );
            dst.set_texel(x, y, v);
        }
    }
    dst
}

/// Run one full pass down to 1x1 and decode the surviving texel.
pub fn reduce_pass(image: &DepthImage, op: ReduceOp) -> f32 {
    let mut current = image.clone();
    for (w, h) in pyramid_levels(image.width, image.height) {
        current = reduce_level(&current, op, w, h);
    }
    decode_depth(current.texel(0, 0))
}

/// Min pass then max pass, as the GPU reducer does.
pub fn reduce_to_range(image: &DepthImage) -> DepthRange {
    let near = reduce_pass(image, ReduceOp::Min);
    let far = reduce_pass(image, ReduceOp::Max);
    DepthRange::new(near, far)
}
