//! Circular campaign gallery: a looping, bendable row of rounded image tiles.

pub mod app;
pub mod loader;
pub mod media;
pub mod scene;
pub mod scroll;
pub mod title;
pub mod viewport;

use std::path::PathBuf;

use crate::config::GalleryConfig;

pub use app::{GalleryApp, Host, InputEvent, SceneRenderer};

/// One entry of the caller-supplied list. The gallery shows each entry twice.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryItem {
    pub image: PathBuf,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct GalleryOptions {
    pub items: Vec<GalleryItem>,
    pub bend: f64,
    pub text_color: String,
    pub border_radius: f64,
    pub font: String,
    pub scroll_speed: f64,
    pub scroll_ease: f64,
}

impl Default for GalleryOptions {
    fn default() -> Self {
        Self::from_config(&GalleryConfig::default(), Vec::new())
    }
}

impl GalleryOptions {
    pub fn from_config(config: &GalleryConfig, items: Vec<GalleryItem>) -> Self {
        Self {
            items,
            bend: config.bend,
            text_color: config.text_color.clone(),
            border_radius: config.border_radius,
            font: config.font.clone(),
            scroll_speed: config.scroll_speed,
            scroll_ease: config.scroll_ease,
        }
    }
}
