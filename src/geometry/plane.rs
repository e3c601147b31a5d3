/// Unit quad in the XY plane, centred on the origin and split into a grid so the
/// vertex shader has something to bend. UV `(0, 0)` is the top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneGeometry {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

/// Grid used for tiles, dense enough for a smooth ripple.
pub const TILE_WIDTH_SEGMENTS: u32 = 100;
pub const TILE_HEIGHT_SEGMENTS: u32 = 50;

impl PlaneGeometry {
    pub fn new(width_segments: u32, height_segments: u32) -> Self {
        let wx = width_segments.max(1);
        let hy = height_segments.max(1);
        let cols = wx + 1;
        let rows = hy + 1;

        let mut positions = Vec::with_capacity((cols * rows) as usize);
        let mut uvs = Vec::with_capacity((cols * rows) as usize);
        for iy in 0..rows {
            let v = iy as f32 / hy as f32;
            for ix in 0..cols {
                let u = ix as f32 / wx as f32;
                positions.push([u - 0.5, 0.5 - v, 0.0]);
                uvs.push([u, v]);
            }
        }

        let mut indices = Vec::with_capacity((wx * hy * 6) as usize);
        for iy in 0..hy {
            for ix in 0..wx {
                let a = iy * cols + ix;
                let b = a + 1;
                let c = a + cols;
                let d = c + 1;
                // counter-clockwise seen from +Z
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }

        Self {
            positions,
            uvs,
            indices,
        }
    }

    pub fn tile() -> Self {
        Self::new(TILE_WIDTH_SEGMENTS, TILE_HEIGHT_SEGMENTS)
    }

    pub fn quad() -> Self {
        Self::new(1, 1)
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
