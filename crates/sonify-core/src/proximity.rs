//! Master gain from pointer proximity to the model's screen footprint.

use crate::constants::GAIN_FALLOFF;
use crate::geometry::{ProjectedBounds, Viewport};

/// Reference distance at which gain has fallen to 10%.
///
/// Distance from the target center to its corner, with the corner pulled in by
/// half the projected bounds on each axis. Computed once per range recompute.
pub fn gain_reference_distance(viewport: Viewport, bounds: &ProjectedBounds) -> f32 {
    let dx = (viewport.width as f32 - bounds.width) / 2.0;
    let dy = (viewport.height as f32 - bounds.height) / 2.0;
    (dx * dx + dy * dy).sqrt()
}

/// Linear falloff from 1.0 at the footprint to 0.1 at `reference`.
///
/// Not clamped here; the audio side smooths toward this target.
pub fn gain_for(x: f32, y: f32, bounds: &ProjectedBounds, reference: f32) -> f32 {
    let dist = bounds.distance_to_point(x, y);
    if dist <= 0.0 {
        return 1.0;
    }
    if !(reference > 0.0) {
        return 1.0 - GAIN_FALLOFF;
    }
    1.0 - GAIN_FALLOFF * (dist / reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> ProjectedBounds {
        ProjectedBounds {
            min_x: 100.0,
            min_y: 50.0,
            width: 200.0,
            height: 100.0,
        }
    }

    #[test]
    fn center_is_full_volume() {
        let b = bounds();
        let c = b.center();
        let reference = gain_reference_distance(Viewport::new(400, 200), &b);
        assert_eq!(gain_for(c.x, c.y, &b, reference), 1.0);
    }

    #[test]
    fn reference_distance_reaches_ten_percent() {
        let b = bounds();
        let reference = gain_reference_distance(Viewport::new(800, 600), &b);
        let g = gain_for(b.min_x + b.width + reference, b.min_y, &b, reference);
        assert!((g - 0.1).abs() < 1e-5);
    }

    #[test]
    fn zero_reference_never_divides() {
        let b = bounds();
        let g = gain_for(0.0, 0.0, &b, 0.0);
        assert!(g.is_finite());
    }
}
