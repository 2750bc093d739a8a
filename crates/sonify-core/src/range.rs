/// Scene depth bounds used to normalize raw depth samples.
///
/// Derived once per activation, resize or camera-preset change. All samples
/// taken during that epoch are normalized against the same pair.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DepthRange {
    pub near: f32,
    pub far: f32,
}

impl DepthRange {
    /// Build a range from two extremes in either order.
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            near: a.min(b),
            far: a.max(b),
        }
    }

    #[inline]
    pub fn span(&self) -> f32 {
        self.far - self.near
    }

    /// True when there is no usable depth spread (empty scene or flat extent).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.span() > 0.0)
    }

    /// Map a decoded depth into `[0, 1]` relative to this range.
    ///
    /// Depths in front of `near` clamp to 0. A degenerate range always yields 0.
    pub fn normalize(&self, depth: f32) -> f32 {
        if self.is_degenerate() {
            return 0.0;
        }
        ((depth - self.near) / self.span()).clamp(0.0, 1.0)
    }
}
