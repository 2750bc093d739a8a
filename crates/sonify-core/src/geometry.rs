//! Camera, bounding-box and screen-space geometry.
//!
//! These types avoid referencing platform-specific APIs. The web frontend fills
//! them from the host viewer and uses them to build the depth-pass matrices and
//! the projected bounds that drive scanning and proximity gain.

use crate::error::SonifyError;
use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

/// Smallest near plane handed to the depth pass when the camera sits inside
/// or right against the model bounds.
pub const MIN_NEAR_PLANE: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    Perspective { fovy_radians: f32 },
    /// Orthographic with the given visible height in world units.
    Orthographic { height: f32 },
}

/// Simple right-handed camera description.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub projection: Projection,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix (WebGPU depth range).
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fovy_radians } => {
                Mat4::perspective_rh(fovy_radians, self.aspect, self.znear, self.zfar)
            }
            Projection::Orthographic { height } => {
                let hh = height * 0.5;
                let hw = hh * self.aspect;
                Mat4::orthographic_rh(-hw, hw, -hh, hh, self.znear, self.zfar)
            }
        }
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_direction(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }

    /// Signed distance of `point` in front of the camera along its view direction.
    #[inline]
    pub fn view_depth(&self, point: Vec3) -> f32 {
        self.view_direction().dot(point - self.eye)
    }

    /// Copy of this camera with near/far clamped to the extent of `bounds`.
    pub fn tightened_to(&self, bounds: &Aabb) -> Camera {
        let (znear, zfar) = tightened_planes(self, bounds);
        Camera {
            znear,
            zfar,
            ..self.clone()
        }
    }
}

/// Axis-aligned bounding box in the scene's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.size().cmple(Vec3::ZERO).any()
    }

    /// Pick a corner: a 1 selects `max` on that axis, a 0 selects `min`.
    #[inline]
    pub fn corner(&self, select: [u8; 3]) -> Vec3 {
        Vec3::new(
            if select[0] != 0 { self.max.x } else { self.min.x },
            if select[1] != 0 { self.max.y } else { self.min.y },
            if select[2] != 0 { self.max.z } else { self.min.z },
        )
    }

    pub fn corners(&self) -> [Vec3; 8] {
        BOX_CORNERS.map(|c| self.corner(c))
    }
}

const BOX_CORNERS: [[u8; 3]; 8] = [
    [1, 1, 1],
    [0, 1, 1],
    [0, 0, 1],
    [1, 0, 1],
    [0, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [1, 0, 0],
];

/// Near/far planes that just enclose `bounds` as seen from `camera`.
///
/// Every corner is measured along the view direction; the extremes become the
/// new planes so depth precision lands on the model, not the whole frustum.
pub fn tightened_planes(camera: &Camera, bounds: &Aabb) -> (f32, f32) {
    let (near, far) = bounds
        .corners()
        .iter()
        .map(|c| camera.view_depth(*c))
        .fold((f32::MAX, f32::MIN), |(lo, hi), d| (lo.min(d), hi.max(d)));
    let near = near.max(MIN_NEAR_PLANE);
    let far = far.max(near + MIN_NEAR_PLANE);
    (near, far)
}

/// The six canonical viewing directions of the host's orbit navigation.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraPreset {
    Left = 0,
    Right = 1,
    Top = 2,
    Bottom = 3,
    #[default]
    Front = 4,
    Back = 5,
}

impl CameraPreset {
    pub const ALL: [CameraPreset; 6] = [
        CameraPreset::Left,
        CameraPreset::Right,
        CameraPreset::Top,
        CameraPreset::Bottom,
        CameraPreset::Front,
        CameraPreset::Back,
    ];

    /// Bounding-box corners used as the screen-space (min, max) anchors.
    #[inline]
    pub fn corners(self) -> PresetCorners {
        PRESET_CORNERS[self as usize]
    }
}

impl TryFrom<u8> for CameraPreset {
    type Error = SonifyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CameraPreset::ALL
            .get(value as usize)
            .copied()
            .ok_or(SonifyError::InvalidPreset(value))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresetCorners {
    pub min: [u8; 3],
    pub max: [u8; 3],
}

/// Corner selection per preset, indexed by `CameraPreset as usize`.
pub const PRESET_CORNERS: [PresetCorners; 6] = [
    // left
    PresetCorners {
        min: [0, 1, 0],
        max: [0, 0, 1],
    },
    // right
    PresetCorners {
        min: [1, 1, 1],
        max: [1, 0, 0],
    },
    // top
    PresetCorners {
        min: [0, 1, 0],
        max: [1, 1, 1],
    },
    // bottom
    PresetCorners {
        min: [0, 0, 1],
        max: [1, 0, 0],
    },
    // front
    PresetCorners {
        min: [0, 1, 1],
        max: [1, 0, 1],
    },
    // back
    PresetCorners {
        min: [1, 1, 0],
        max: [0, 0, 0],
    },
];

/// Pixel dimensions of the render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Project a world-space point to screen pixels (origin top-left, y down).
pub fn project_corner(point: Vec3, camera: &Camera, viewport: Viewport) -> Vec2 {
    let clip = camera.projection_matrix() * camera.view_matrix() * point.extend(1.0);
    let ndc = if clip.w.abs() > f32::EPSILON {
        clip.xy() / clip.w
    } else {
        clip.xy()
    };
    let half_w = viewport.width as f32 * 0.5;
    let half_h = viewport.height as f32 * 0.5;
    Vec2::new(ndc.x * half_w + half_w, -ndc.y * half_h + half_h)
}

/// Screen-space rectangle covered by the model under the current preset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProjectedBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub width: f32,
    pub height: f32,
}

impl ProjectedBounds {
    /// Anchor the rectangle on the preset's min corner and size it by the
    /// absolute offset to its max corner.
    pub fn from_preset(
        bounds: &Aabb,
        camera: &Camera,
        preset: CameraPreset,
        viewport: Viewport,
    ) -> Self {
        let corners = preset.corners();
        let min = project_corner(bounds.corner(corners.min), camera, viewport);
        let max = project_corner(bounds.corner(corners.max), camera, viewport);
        Self {
            min_x: min.x,
            min_y: min.y,
            width: (min.x - max.x).abs(),
            height: (min.y - max.y).abs(),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min_x + self.width * 0.5,
            self.min_y + self.height * 0.5,
        )
    }

    /// Planar distance from a point to the rectangle, 0 inside or on the edge.
    pub fn distance_to_point(&self, x: f32, y: f32) -> f32 {
        let dx = (self.min_x - x).max(0.0).max(x - (self.min_x + self.width));
        let dy = (self.min_y - y).max(0.0).max(y - (self.min_y + self.height));
        (dx * dx + dy * dy).sqrt()
    }
}
