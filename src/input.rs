use glam::{Vec2, Vec3};
use web_sys as web;

/// Pointer position in canvas backing pixels (origin top-left), the same
/// space the depth image and projected bounds use.
#[inline]
pub fn pointer_canvas_px(ev: &web::PointerEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let x_css = ev.client_x() as f32 - rect.left() as f32;
    let y_css = ev.client_y() as f32 - rect.top() as f32;
    let sx = (x_css / rect.width() as f32) * canvas.width() as f32;
    let sy = (y_css / rect.height() as f32) * canvas.height() as f32;
    Vec2::new(sx, sy)
}

/// Read an xyz triple handed over from JS.
pub fn vec3_arg(name: &str, v: &[f32]) -> Result<Vec3, String> {
    match v {
        [x, y, z, ..] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("{name}: expected 3 components, got {}", v.len())),
    }
}

/// Bounds of a flat xyz position list, or `None` when it holds no vertex.
pub fn positions_bounds(positions: &[f32]) -> Option<(Vec3, Vec3)> {
    let mut it = positions.chunks_exact(3).map(|c| Vec3::new(c[0], c[1], c[2]));
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
}
