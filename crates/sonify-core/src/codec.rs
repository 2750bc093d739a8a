//! Packed RGBA8 depth encoding.
//!
//! Depth in `[0, 1]` is stored as four base-256 digits of `depth * 255`, with
//! the `r` byte most significant and `a` least. The shader in
//! `shaders/depth.wgsl` writes the same layout.

use crate::constants::{DEPTH_WEIGHT_A, DEPTH_WEIGHT_B, DEPTH_WEIGHT_G, DEPTH_WEIGHT_R};

/// Recover a depth value from its packed bytes.
#[inline]
pub fn decode_depth(rgba: [u8; 4]) -> f32 {
    rgba[3] as f32 * DEPTH_WEIGHT_A
        + rgba[2] as f32 * DEPTH_WEIGHT_B
        + rgba[1] as f32 * DEPTH_WEIGHT_G
        + rgba[0] as f32 * DEPTH_WEIGHT_R
}

/// Pack a depth value. Values outside `[0, 1]` are clamped.
pub fn encode_depth(depth: f32) -> [u8; 4] {
    let mut v = depth.clamp(0.0, 1.0) as f64 * 255.0;
    let mut out = [0u8; 4];
    for byte in out.iter_mut() {
        let digit = v.floor().min(255.0);
        *byte = digit as u8;
        v = (v - digit) * 256.0;
    }
    out
}

/// All-zero bytes mark a pixel no surface was drawn into.
#[inline]
pub fn is_empty(rgba: [u8; 4]) -> bool {
    rgba == [0, 0, 0, 0]
}
