use glam::{DMat4, DQuat, DVec3, Mat4};

/// Local transform of a scene node: translate, then rotate about Z, then scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: DVec3,
    pub rotation_z: f64,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation_z: 0.0,
            scale: DVec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(
            self.scale,
            DQuat::from_rotation_z(self.rotation_z),
            self.position,
        )
    }

    /// World matrix of this node under a parent whose world matrix is `parent`.
    pub fn world(&self, parent: &DMat4) -> DMat4 {
        *parent * self.matrix()
    }
}

/// Shader inputs for one tile, in the units the tile shader expects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileParams {
    pub plane_size: [f32; 2],
    /// Source image size in pixels, `[0, 0]` until it has loaded.
    pub image_size: [f32; 2],
    pub time: f32,
    pub speed: f32,
    pub border_radius: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct TileDraw {
    /// Index of the tile (and its title) in the renderer's slots.
    pub slot: usize,
    pub mvp: Mat4,
    pub title_mvp: Mat4,
    pub params: TileParams,
}

/// Everything the renderer needs for one frame, in draw order.
#[derive(Clone, Debug, Default)]
pub struct SceneFrame {
    pub tiles: Vec<TileDraw>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: DVec3, b: DVec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn child_inherits_parent_transform() {
        let parent = Transform {
            position: DVec3::new(3.0, -1.0, 0.0),
            rotation_z: 0.0,
            scale: DVec3::new(4.0, 2.0, 1.0),
        };
        let child = Transform {
            position: DVec3::new(0.0, -0.625, 0.0),
            rotation_z: 0.0,
            scale: DVec3::new(0.5, 0.15, 1.0),
        };
        let world = child.world(&parent.matrix());
        let centre = world.transform_point3(DVec3::ZERO);
        assert!(close(centre, DVec3::new(3.0, -1.0 - 0.625 * 2.0, 0.0)), "{centre:?}");
        let right_edge = world.transform_point3(DVec3::new(0.5, 0.0, 0.0));
        assert!((right_edge.x - centre.x - 0.5 * 0.5 * 4.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_is_applied_after_scale() {
        let t = Transform {
            position: DVec3::ZERO,
            rotation_z: std::f64::consts::FRAC_PI_2,
            scale: DVec3::new(2.0, 1.0, 1.0),
        };
        let p = t.matrix().transform_point3(DVec3::new(1.0, 0.0, 0.0));
        assert!(close(p, DVec3::new(0.0, 2.0, 0.0)), "{p:?}");
    }
}
