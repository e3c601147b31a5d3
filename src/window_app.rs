use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::campaigns::{Campaign, CampaignData, Objective, filter_by_category, format_thousands, gallery_items};
use crate::config::Config;
use crate::gallery::app::PointerSource;
use crate::gallery::{GalleryApp, GalleryOptions, Host, InputEvent};
use crate::gpu::gpu::GalleryRenderer;
use crate::ledger::Ledger;

const LINE_PX: f64 = 36.0;

/// The window's client area, as seen by the gallery.
pub struct WindowHost {
    window: Arc<Window>,
}

impl Host for WindowHost {
    fn client_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

/// Wheel movement in pixels, positive when scrolling down (forward through the row).
/// Horizontal movement is used only when there is no vertical component.
pub fn wheel_delta(delta: MouseScrollDelta) -> f64 {
    let (x, y) = match delta {
        MouseScrollDelta::LineDelta(x, y) => (x as f64 * LINE_PX, y as f64 * LINE_PX),
        MouseScrollDelta::PixelDelta(p) => (p.x, p.y),
    };
    if y != 0.0 { -y } else { -x }
}

/// Category bound to a digit key: `0` clears the filter, `1..` pick objectives in order.
/// `None` when the digit is not bound.
pub fn category_for_key(objectives: &[Objective], key: &str) -> Option<Option<String>> {
    let digit: usize = key.parse().ok()?;
    if digit == 0 {
        return Some(None);
    }
    objectives
        .get(digit - 1)
        .map(|objective| Some(objective.category.clone()))
}

/// Console help: the category keys, then the campaigns Left/Right cycle through.
pub fn key_help(data: &CampaignData) -> String {
    let mut out = String::new();
    for (i, objective) in data.objectives.iter().enumerate().take(9) {
        out.push_str(&format!("  [{}] {}\n", i + 1, objective.title));
    }
    out.push_str("  [0] todas\n");
    let names: Vec<&str> = data.campaigns.iter().map(|c| c.short_name()).collect();
    out.push_str(&format!("  Left/Right: {}\n", names.join(" / ")));
    out.push_str("  PageUp/PageDown: transparencia\n");
    out
}

pub fn campaign_summary(campaign: &Campaign) -> String {
    format!(
        "{} | ${} / ${} MXN ({:.0}%)",
        campaign.name,
        format_thousands(campaign.raised),
        format_thousands(campaign.goal),
        campaign.progress_percent()
    )
}

pub struct GalleryWindow {
    config: Config,
    data: CampaignData,
    category: Option<String>,
    active: usize,
    ledger: Ledger,
    window: Option<Arc<Window>>,
    gallery: Option<GalleryApp<WindowHost, GalleryRenderer>>,
    cursor_x: f64,
}

impl GalleryWindow {
    pub fn new(config: Config, data: CampaignData) -> Self {
        let ledger = Ledger::new(data.transactions.clone(), config.data.ledger_page_size);
        let category = config.data.category.clone();
        Self {
            config,
            data,
            category,
            active: 0,
            ledger,
            window: None,
            gallery: None,
            cursor_x: 0.0,
        }
    }

    fn visible_campaigns(&self) -> Vec<&Campaign> {
        filter_by_category(&self.data.campaigns, self.category.as_deref())
    }

    /// Tears down the current gallery, then builds one for the filtered campaigns.
    fn rebuild_gallery(&mut self) -> anyhow::Result<()> {
        if let Some(mut old) = self.gallery.take() {
            old.destroy();
        }
        let Some(window) = self.window.clone() else {
            return Ok(());
        };

        let items = gallery_items(
            &self.visible_campaigns(),
            Path::new(&self.config.data.assets_dir),
            &self.config.data.image_extension,
        );
        let options = GalleryOptions::from_config(&self.config.gallery, items);
        let config = &self.config;
        let gallery = GalleryApp::new(WindowHost { window }, options, |host| {
            GalleryRenderer::new(host.window.clone(), config)
        })?;
        self.gallery = Some(gallery);
        Ok(())
    }

    fn show_active_campaign(&mut self) {
        let visible = self.visible_campaigns();
        if visible.is_empty() {
            return;
        }
        let campaign = visible[self.active % visible.len()];
        let summary = campaign_summary(campaign);
        println!("{summary}");
        println!("  {} ({}, {})", campaign.description, campaign.location, campaign.date);
        if let Some(window) = self.window.as_ref() {
            window.set_title(&format!("{} | {}", self.config.window.title, summary));
        }
    }

    fn cycle_campaign(&mut self, forward: bool) {
        let count = self.visible_campaigns().len();
        if count == 0 {
            return;
        }
        self.active = if forward {
            (self.active + 1) % count
        } else {
            (self.active + count - 1) % count
        };
        self.show_active_campaign();
    }

    fn apply_category(&mut self, event_loop: &ActiveEventLoop, category: Option<String>) {
        if category == self.category {
            return;
        }
        let before: Vec<String> = self.visible_campaigns().iter().map(|c| c.id.clone()).collect();
        self.category = category;
        let after: Vec<String> = self.visible_campaigns().iter().map(|c| c.id.clone()).collect();
        println!(
            "Filter: {} ({} campaigns)",
            self.category.as_deref().unwrap_or("todas"),
            after.len()
        );
        if before == after {
            return;
        }
        self.active = 0;
        if let Err(err) = self.rebuild_gallery() {
            log_error!("Gallery rebuild failed: {err:#}");
            println!("Failed to rebuild gallery: {err:#}");
            event_loop.exit();
            return;
        }
        self.show_active_campaign();
    }

    fn print_ledger_page(&self) {
        println!("Transparencia");
        print!("{}", self.ledger.render_current());
    }

    fn send(&mut self, event: InputEvent) {
        if let Some(gallery) = self.gallery.as_mut() {
            gallery.handle_input(event, Instant::now());
        }
    }
}

impl ApplicationHandler for GalleryWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Wait);

        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.as_str())
            .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height))
            .with_min_inner_size(LogicalSize::new(260, 180))
            .with_resizable(true);

        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(err) => {
                println!("Failed to create gallery window: {err}");
                log_error!("Failed to create gallery window: {err}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window);

        if let Err(err) = self.rebuild_gallery() {
            println!("Failed to start gallery: {err:#}");
            log_error!("Failed to start gallery: {err:#}");
            event_loop.exit();
            return;
        }
        self.show_active_campaign();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(mut gallery) = self.gallery.take() {
                    gallery.destroy();
                }
                event_loop.exit();
            }
            WindowEvent::Destroyed => {
                self.gallery = None;
                self.window = None;
                event_loop.exit();
            }
            WindowEvent::Resized(_) => self.send(InputEvent::Resize),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_x = position.x;
                self.send(InputEvent::PointerMove {
                    source: PointerSource::Mouse,
                    x: position.x,
                });
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button != MouseButton::Left {
                    return;
                }
                let event = match state {
                    ElementState::Pressed => InputEvent::PointerDown {
                        source: PointerSource::Mouse,
                        x: self.cursor_x,
                    },
                    ElementState::Released => InputEvent::PointerUp {
                        source: PointerSource::Mouse,
                    },
                };
                self.send(event);
            }
            WindowEvent::Touch(touch) => {
                let source = PointerSource::Touch;
                let x = touch.location.x;
                let event = match touch.phase {
                    TouchPhase::Started => InputEvent::PointerDown { source, x },
                    TouchPhase::Moved => InputEvent::PointerMove { source, x },
                    TouchPhase::Ended | TouchPhase::Cancelled => InputEvent::PointerUp { source },
                };
                self.send(event);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.send(InputEvent::Wheel {
                    delta: wheel_delta(delta),
                });
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                match &event.logical_key {
                    Key::Named(NamedKey::ArrowLeft) => self.cycle_campaign(false),
                    Key::Named(NamedKey::ArrowRight) => self.cycle_campaign(true),
                    Key::Named(NamedKey::PageDown) => {
                        self.ledger.next();
                        self.print_ledger_page();
                    }
                    Key::Named(NamedKey::PageUp) => {
                        self.ledger.prev();
                        self.print_ledger_page();
                    }
                    Key::Character(text) => {
                        if let Some(category) = category_for_key(&self.data.objectives, text.as_str()) {
                            self.apply_category(event_loop, category);
                        }
                    }
                    _ => {}
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gallery) = self.gallery.as_mut() {
                    gallery.frame(Instant::now());
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn objective(category: &str) -> Objective {
        Objective {
            id: category.to_string(),
            title: category.to_string(),
            description: String::new(),
            category: category.to_string(),
        }
    }

    #[test]
    fn wheel_down_scrolls_forward() {
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, -1.0)), 36.0);
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, 2.0)), -72.0);
        assert_eq!(
            wheel_delta(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -12.5))),
            12.5
        );
    }

    #[test]
    fn horizontal_wheel_is_used_without_vertical() {
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(-1.0, 0.0)), 36.0);
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, 0.0)), 0.0);
    }

    #[test]
    fn digit_keys_map_to_objectives() {
        let objectives = vec![objective("ayuda"), objective("reconstruccion"), objective("educacion")];
        assert_eq!(category_for_key(&objectives, "0"), Some(None));
        assert_eq!(category_for_key(&objectives, "1"), Some(Some("ayuda".to_string())));
        assert_eq!(category_for_key(&objectives, "3"), Some(Some("educacion".to_string())));
        assert_eq!(category_for_key(&objectives, "4"), None);
        assert_eq!(category_for_key(&objectives, "a"), None);
    }

    #[test]
    fn key_help_lists_objectives_and_short_names() {
        let campaign = |id: &str, name: &str| Campaign {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            image: id.to_string(),
            goal: 1.0,
            raised: 0.0,
            category: "ayuda".to_string(),
            date: String::new(),
            location: String::new(),
        };
        let data = CampaignData {
            objectives: vec![objective("ayuda"), objective("educacion")],
            campaigns: vec![
                campaign("otis", "Huracán Otis – Acapulco"),
                campaign("tabasco", "Inundaciones - Tabasco"),
            ],
            transactions: Vec::new(),
        };
        let help = key_help(&data);
        assert!(help.contains("  [1] ayuda\n  [2] educacion\n  [0] todas\n"), "{help}");
        assert!(help.contains("Left/Right: Huracán Otis / Inundaciones\n"), "{help}");
    }

    #[test]
    fn summary_shows_progress() {
        let campaign = Campaign {
            id: "huracan-otis".to_string(),
            name: "Huracán Otis".to_string(),
            description: String::new(),
            image: "huracan-otis".to_string(),
            goal: 5_000_000.0,
            raised: 3_250_000.0,
            category: "ayuda".to_string(),
            date: "2023-10-25".to_string(),
            location: "Acapulco".to_string(),
        };
        assert_eq!(
            campaign_summary(&campaign),
            "Huracán Otis | $3,250,000 / $5,000,000 MXN (65%)"
        );
    }
}
