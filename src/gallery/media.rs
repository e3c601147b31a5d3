use std::path::{Path, PathBuf};

use glam::DVec3;

use crate::colors::Color;
use crate::font::FontSpec;

use super::GalleryItem;
use super::scene::{TileParams, Transform};
use super::scroll::{Direction, ScrollState};
use super::title::TitleMesh;
use super::viewport::ScreenGeometry;

/// World-space gap between neighbouring tiles.
pub const PADDING: f64 = 2.0;
/// Ripple clock advance per frame.
pub const TIME_STEP: f64 = 0.04;

const REFERENCE_SCREEN_HEIGHT: f64 = 1500.0;
const TILE_HEIGHT_PX: f64 = 900.0;
const TILE_WIDTH_PX: f64 = 700.0;

/// Appearance shared by every tile of one gallery.
#[derive(Clone, Debug)]
pub struct TileStyle {
    pub bend: f64,
    pub border_radius: f64,
    pub text_color: Color,
    pub font: FontSpec,
}

/// Vertical sag and Z rotation of a tile centred at `x` on a circular arc whose
/// chord spans the viewport (`half_width` each side) and whose height is `|bend|`.
pub fn bend_offset(x: f64, half_width: f64, bend: f64) -> (f64, f64) {
    if bend == 0.0 {
        return (0.0, 0.0);
    }
    let b = bend.abs();
    let radius = (half_width * half_width + b * b) / (2.0 * b);
    let effective_x = x.abs().min(half_width);
    let arc = radius - (radius * radius - effective_x * effective_x).sqrt();
    let angle = (effective_x / radius).asin();
    if bend > 0.0 {
        (-arc, -x.signum() * angle)
    } else {
        (arc, x.signum() * angle)
    }
}

/// One tile of the loop: a textured quad with its title below it.
pub struct MediaItem {
    index: usize,
    length: usize,
    image: PathBuf,
    image_size: Option<(u32, u32)>,
    bend: f64,
    border_radius: f64,
    geometry: ScreenGeometry,
    pub plane: Transform,
    pub title: TitleMesh,
    /// Home position, `width * index`.
    pub x: f64,
    /// Wraparound offset, a whole multiple of `width_total`.
    pub extra: f64,
    pub width: f64,
    pub width_total: f64,
    pub is_before: bool,
    pub is_after: bool,
    time: f64,
    speed: f64,
}

impl MediaItem {
    pub fn new(
        index: usize,
        length: usize,
        item: &GalleryItem,
        style: &TileStyle,
        geometry: ScreenGeometry,
        time: f64,
    ) -> Self {
        let mut media = Self {
            index,
            length,
            image: item.image.clone(),
            image_size: None,
            bend: style.bend,
            border_radius: style.border_radius,
            geometry,
            plane: Transform::default(),
            title: TitleMesh::new(&item.text, &style.font, style.text_color),
            x: 0.0,
            extra: 0.0,
            width: 0.0,
            width_total: 0.0,
            is_before: false,
            is_after: false,
            time,
            speed: 0.0,
        };
        media.resize(geometry);
        media
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn image(&self) -> &Path {
        &self.image
    }

    pub fn set_image_size(&mut self, width: u32, height: u32) {
        self.image_size = Some((width, height));
    }

    pub fn update(&mut self, scroll: &ScrollState, direction: Direction) {
        let x = self.x - scroll.current - self.extra;
        let half_viewport = self.geometry.viewport.width / 2.0;
        let (y, rotation_z) = bend_offset(x, half_viewport, self.bend);
        self.plane.position = DVec3::new(x, y, 0.0);
        self.plane.rotation_z = rotation_z;

        self.speed = scroll.speed();
        self.time += TIME_STEP;

        let half_tile = self.plane.scale.x / 2.0;
        self.is_before = x + half_tile < -half_viewport;
        self.is_after = x - half_tile > half_viewport;

        if direction == Direction::Right && self.is_before {
            self.extra -= self.width_total;
            self.is_before = false;
            self.is_after = false;
        }
        if direction == Direction::Left && self.is_after {
            self.extra += self.width_total;
            self.is_before = false;
            self.is_after = false;
        }
    }

    pub fn resize(&mut self, geometry: ScreenGeometry) {
        self.geometry = geometry;
        let screen = geometry.screen;
        let viewport = geometry.viewport;
        let scale = screen.height / REFERENCE_SCREEN_HEIGHT;
        self.plane.scale = DVec3::new(
            viewport.width * (TILE_WIDTH_PX * scale) / screen.width,
            viewport.height * (TILE_HEIGHT_PX * scale) / screen.height,
            1.0,
        );
        self.title.fit_to_parent(self.plane.scale);

        self.width = self.plane.scale.x + PADDING;
        self.width_total = self.width * self.length as f64;
        self.x = self.width * self.index as f64;
    }

    pub fn params(&self) -> TileParams {
        let image_size = self
            .image_size
            .map(|(w, h)| [w as f32, h as f32])
            .unwrap_or([0.0, 0.0]);
        TileParams {
            plane_size: [self.plane.scale.x as f32, self.plane.scale.y as f32],
            image_size,
            time: self.time as f32,
            speed: self.speed as f32,
            border_radius: self.border_radius as f32,
        }
    }
}
