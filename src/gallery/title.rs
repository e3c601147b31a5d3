use glam::DVec3;
use image::{Rgba, RgbaImage};

use crate::colors::Color;
use crate::font::{FontSpec, GLYPH_H, GLYPH_W, glyph_rows};

use super::scene::Transform;

/// Total padding added around the measured text, split evenly between both sides.
pub const CANVAS_PADDING: u32 = 20;
/// Label height as a fraction of the parent tile's height.
pub const HEIGHT_FRACTION: f64 = 0.15;
/// Space between the tile's bottom edge and the label, in parent units.
pub const GAP: f64 = 0.05;

/// Text label drawn under a tile. Its transform is local to the owning tile.
pub struct TitleMesh {
    canvas: RgbaImage,
    pub transform: Transform,
}

impl TitleMesh {
    pub fn new(text: &str, font: &FontSpec, color: Color) -> Self {
        let canvas = rasterize_label(text, font, color);
        let mut title = Self {
            canvas,
            transform: Transform::default(),
        };
        title.fit_to_parent(DVec3::ONE);
        title
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn aspect(&self) -> f64 {
        self.canvas.width() as f64 / self.canvas.height().max(1) as f64
    }

    /// Sizes and places the label in parent-local units. The X scale is divided by
    /// the parent's X/Y ratio so the label keeps its own aspect on screen.
    pub fn fit_to_parent(&mut self, parent_scale: DVec3) {
        let height = HEIGHT_FRACTION;
        let ratio = if parent_scale.x.abs() > f64::EPSILON {
            parent_scale.y / parent_scale.x
        } else {
            1.0
        };
        let width = height * self.aspect() * ratio;
        self.transform.scale = DVec3::new(width, height, 1.0);
        self.transform.position = DVec3::new(0.0, -0.5 - height * 0.5 - GAP, 0.0);
    }
}

/// Draws `text` centred on a transparent canvas sized to the text plus padding.
pub fn rasterize_label(text: &str, font: &FontSpec, color: Color) -> RgbaImage {
    let text_w = font.measure(text);
    let width = text_w + CANVAS_PADDING;
    let height = font.line_height() + CANVAS_PADDING;
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    let scale = font.glyph_scale();
    let glyph_h = GLYPH_H * scale;
    let x0 = (width - text_w) / 2;
    let y0 = height.saturating_sub(glyph_h) / 2;
    let smear = if font.bold { 1 } else { 0 };
    let px = Rgba(color.to_rgba8());

    let mut pen_x = x0;
    for ch in text.chars() {
        let rows = glyph_rows(ch);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let cell_x = pen_x + col * scale;
                let cell_y = y0 + row as u32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale + smear {
                        let x = cell_x + dx;
                        let y = cell_y + dy;
                        if x < width && y < height {
                            canvas.put_pixel(x, y, px);
                        }
                    }
                }
            }
        }
        pen_x += font.advance();
    }
    canvas
}
