use glam::{DMat4, DVec3};

pub const FOV_DEG: f64 = 45.0;
pub const CAMERA_Z: f64 = 20.0;
const NEAR: f64 = 0.1;
const FAR: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Pixel size of the surface plus the world-space extent visible at `z = 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenGeometry {
    pub screen: Size,
    pub viewport: Size,
}

impl ScreenGeometry {
    /// Zero-area surfaces are treated as 1x1.
    pub fn from_pixels(width: u32, height: u32) -> Self {
        let screen = Size {
            width: width.max(1) as f64,
            height: height.max(1) as f64,
        };
        let camera = Camera::new(screen.width / screen.height);
        Self {
            screen,
            viewport: camera.visible_size(),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.screen.width / self.screen.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub fov_deg: f64,
    pub z: f64,
    pub aspect: f64,
}

impl Camera {
    pub fn new(aspect: f64) -> Self {
        Self {
            fov_deg: FOV_DEG,
            z: CAMERA_Z,
            aspect,
        }
    }

    /// World-space width and height of the frustum slice at `z = 0`.
    pub fn visible_size(&self) -> Size {
        let height = 2.0 * (self.fov_deg.to_radians() / 2.0).tan() * self.z;
        Size {
            width: height * self.aspect,
            height,
        }
    }

    pub fn view_proj(&self) -> DMat4 {
        let proj = DMat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, NEAR, FAR);
        let view = DMat4::from_translation(DVec3::new(0.0, 0.0, -self.z));
        proj * view
    }
}
