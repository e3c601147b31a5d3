use serde::{Deserialize, Serialize};

// every field has a default: a partial (or empty) config.json is valid.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub gallery: GalleryConfig,
    pub window: WindowConfig,
    pub performance: PerformanceConfig,
    pub data: DataConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct GalleryConfig {
    /// Curvature of the tile row. 0 keeps it flat, the sign picks concave or convex.
    pub bend: f64,
    pub text_color: String,
    /// Corner radius in normalized quad space, `[0, 1]`.
    pub border_radius: f64,
    pub font: String,
    pub scroll_speed: f64,
    pub scroll_ease: f64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            bend: 3.0,
            text_color: "#ffffff".to_string(),
            border_radius: 0.05,
            font: "bold 28px DM Sans".to_string(),
            scroll_speed: 2.0,
            scroll_ease: 0.05,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub background_rgba: [f64; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Campañas de Ayuda".to_string(),
            width: 1280,
            height: 500,
            background_rgba: [18.0, 18.0, 24.0, 1.0],
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct PerformanceConfig {
    pub msaa_samples: u32,
    pub prefer_vrr: bool,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            msaa_samples: 4,
            prefer_vrr: true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct DataConfig {
    pub campaigns_path: String,
    pub assets_dir: String,
    pub image_extension: String,
    pub ledger_page_size: usize,
    /// Objective category to filter the gallery by on startup.
    pub category: Option<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            campaigns_path: "data/campaigns.json".to_string(),
            assets_dir: "assets".to_string(),
            image_extension: "png".to_string(),
            ledger_page_size: 6,
            category: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_uses_documented_defaults() {
        let config: Config = serde_json::from_str("{}").expect("empty object parses");
        assert_eq!(config.gallery.bend, 3.0);
        assert_eq!(config.gallery.text_color, "#ffffff");
        assert_eq!(config.gallery.border_radius, 0.05);
        assert_eq!(config.gallery.scroll_speed, 2.0);
        assert_eq!(config.gallery.scroll_ease, 0.05);
        assert_eq!(config.data.ledger_page_size, 6);
        assert!(config.data.category.is_none());
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "gallery": { "bend": 0.0 }, "performance": { "msaa_samples": 1 } }"#)
                .expect("partial config parses");
        assert_eq!(config.gallery.bend, 0.0);
        assert_eq!(config.gallery.scroll_speed, 2.0);
        assert_eq!(config.performance.msaa_samples, 1);
        assert!(config.performance.prefer_vrr);
    }
}
