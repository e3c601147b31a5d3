use std::collections::HashSet;
use std::time::Instant;

use image::RgbaImage;
use rand::random;

use crate::colors::{Color, parse_color};
use crate::font::FontSpec;

use super::loader::{DecodedImage, ImageLoader, LoaderMsg};
use super::media::{MediaItem, TileStyle};
use super::scene::{SceneFrame, TileDraw};
use super::scroll::{Debounce, SNAP_DEBOUNCE, ScrollState};
use super::viewport::{Camera, ScreenGeometry};
use super::{GalleryItem, GalleryOptions};

const DRAG_FACTOR: f64 = 0.025;
const WHEEL_FACTOR: f64 = 0.2;

/// The area the gallery draws into.
pub trait Host {
    /// Client area in physical pixels.
    fn client_size(&self) -> (u32, u32);
    /// Ask for one more call to [`GalleryApp::frame`].
    fn request_frame(&mut self);
}

/// GPU side of the gallery. Tiles are addressed by the order they were added in.
pub trait SceneRenderer {
    fn add_tile(&mut self, title: &RgbaImage);
    /// Uploads `image` once and binds it to every slot in `slots`.
    fn set_tile_image(&mut self, slots: &[usize], image: &DecodedImage);
    fn resize(&mut self, width: u32, height: u32);
    fn render(&mut self, frame: &SceneFrame);
    /// Releases every tile resource. The renderer is dropped right after.
    fn detach(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerSource {
    Mouse,
    Touch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Resize,
    /// Positive `delta` scrolls the row forward, like a downward wheel turn.
    Wheel { delta: f64 },
    PointerDown { source: PointerSource, x: f64 },
    PointerMove { source: PointerSource, x: f64 },
    PointerUp { source: PointerSource },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKind {
    Resize,
    Wheel,
    MouseDown,
    MouseMove,
    MouseUp,
    TouchStart,
    TouchMove,
    TouchEnd,
}

const ALL_INPUT_KINDS: [InputKind; 8] = [
    InputKind::Resize,
    InputKind::Wheel,
    InputKind::MouseDown,
    InputKind::MouseMove,
    InputKind::MouseUp,
    InputKind::TouchStart,
    InputKind::TouchMove,
    InputKind::TouchEnd,
];

impl InputEvent {
    pub fn kind(&self) -> InputKind {
        use PointerSource::{Mouse, Touch};
        match *self {
            InputEvent::Resize => InputKind::Resize,
            InputEvent::Wheel { .. } => InputKind::Wheel,
            InputEvent::PointerDown { source: Mouse, .. } => InputKind::MouseDown,
            InputEvent::PointerDown { source: Touch, .. } => InputKind::TouchStart,
            InputEvent::PointerMove { source: Mouse, .. } => InputKind::MouseMove,
            InputEvent::PointerMove { source: Touch, .. } => InputKind::TouchMove,
            InputEvent::PointerUp { source: Mouse } => InputKind::MouseUp,
            InputEvent::PointerUp { source: Touch } => InputKind::TouchEnd,
        }
    }
}

/// Input kinds this gallery instance is subscribed to.
#[derive(Debug, Default)]
pub struct Listeners {
    kinds: HashSet<InputKind>,
}

impl Listeners {
    pub fn subscribe_all(&mut self) {
        self.kinds.extend(ALL_INPUT_KINDS);
    }

    pub fn accepts(&self, kind: InputKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn clear(&mut self) {
        self.kinds.clear();
    }
}

/// At most one outstanding frame request; none after cancel.
#[derive(Debug, Default)]
struct FrameLoop {
    pending: bool,
    cancelled: bool,
}

impl FrameLoop {
    fn schedule(&mut self, host: &mut impl Host) {
        if self.cancelled || self.pending {
            return;
        }
        self.pending = true;
        host.request_frame();
    }

    fn take(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    fn cancel(&mut self) {
        self.pending = false;
        self.cancelled = true;
    }
}

pub struct GalleryApp<H: Host, R: SceneRenderer> {
    host: H,
    renderer: Option<R>,
    loader: Option<ImageLoader>,
    camera: Camera,
    geometry: ScreenGeometry,
    scroll: ScrollState,
    scroll_speed: f64,
    medias: Vec<MediaItem>,
    is_down: bool,
    start_x: f64,
    listeners: Listeners,
    frame_loop: FrameLoop,
    snap: Debounce,
}

impl<H: Host, R: SceneRenderer> GalleryApp<H, R> {
    /// Builds the scene for `options.items` (each shown twice) and requests the first frame.
    /// `make_renderer` creates the drawing surface for `host`.
    pub fn new(
        host: H,
        options: GalleryOptions,
        make_renderer: impl FnOnce(&H) -> anyhow::Result<R>,
    ) -> anyhow::Result<Self> {
        let mut renderer = make_renderer(&host)?;
        let (width, height) = host.client_size();
        let geometry = ScreenGeometry::from_pixels(width, height);
        renderer.resize(geometry.screen.width as u32, geometry.screen.height as u32);

        let text_color = parse_color(&options.text_color).unwrap_or_else(|| {
            log_warn!("Unrecognised text color {:?}, using white", options.text_color);
            Color::WHITE
        });
        let style = TileStyle {
            bend: options.bend,
            border_radius: options.border_radius,
            text_color,
            font: FontSpec::parse(&options.font),
        };

        let doubled: Vec<&GalleryItem> = options.items.iter().chain(options.items.iter()).collect();
        let length = doubled.len();
        let medias: Vec<MediaItem> = doubled
            .iter()
            .enumerate()
            .map(|(index, item)| MediaItem::new(index, length, item, &style, geometry, random::<f64>() * 100.0))
            .collect();
        for media in &medias {
            renderer.add_tile(media.title.canvas());
        }

        let paths: Vec<_> = medias.iter().map(|m| m.image().to_path_buf()).collect();
        let loader = (!paths.is_empty()).then(|| ImageLoader::spawn(&paths));

        log!(
            "Gallery created: {} tiles, {}x{} px, bend {}",
            length,
            width,
            height,
            options.bend
        );

        let mut listeners = Listeners::default();
        listeners.subscribe_all();

        let mut app = Self {
            host,
            renderer: Some(renderer),
            loader,
            camera: Camera::new(geometry.aspect()),
            geometry,
            scroll: ScrollState::new(options.scroll_ease),
            scroll_speed: options.scroll_speed,
            medias,
            is_down: false,
            start_x: 0.0,
            listeners,
            frame_loop: FrameLoop::default(),
            snap: Debounce::new(SNAP_DEBOUNCE),
        };
        app.frame_loop.schedule(&mut app.host);
        Ok(app)
    }

    /// Routes one input event. Events of kinds the instance is not subscribed to are dropped.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) {
        if !self.listeners.accepts(event.kind()) {
            return;
        }
        match event {
            InputEvent::Resize => self.on_resize(),
            InputEvent::Wheel { delta } => self.on_wheel(delta, now),
            InputEvent::PointerDown { x, .. } => self.on_pointer_down(x),
            InputEvent::PointerMove { x, .. } => self.on_pointer_move(x),
            InputEvent::PointerUp { .. } => self.on_pointer_up(),
        }
    }

    fn on_pointer_down(&mut self, x: f64) {
        self.is_down = true;
        self.scroll.position = self.scroll.current;
        self.start_x = x;
    }

    fn on_pointer_move(&mut self, x: f64) {
        if !self.is_down {
            return;
        }
        let distance = (self.start_x - x) * (self.scroll_speed * DRAG_FACTOR);
        self.scroll.target = self.scroll.position + distance;
    }

    fn on_pointer_up(&mut self) {
        self.is_down = false;
        self.on_check();
    }

    fn on_wheel(&mut self, delta: f64, now: Instant) {
        if delta == 0.0 || !delta.is_finite() {
            return;
        }
        let step = if delta > 0.0 {
            self.scroll_speed
        } else {
            -self.scroll_speed
        };
        self.scroll.target += step * WHEEL_FACTOR;
        self.snap.poke(now);
    }

    /// Snaps the scroll target to the nearest tile boundary.
    fn on_check(&mut self) {
        let Some(first) = self.medias.first() else {
            return;
        };
        self.scroll.snap(first.width);
    }

    fn on_resize(&mut self) {
        let (width, height) = self.host.client_size();
        self.geometry = ScreenGeometry::from_pixels(width, height);
        self.camera = Camera::new(self.geometry.aspect());
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(
                self.geometry.screen.width as u32,
                self.geometry.screen.height as u32,
            );
        }
        for media in &mut self.medias {
            media.resize(self.geometry);
        }
    }

    /// Runs the pending frame, if any. Returns whether a frame ran.
    pub fn frame(&mut self, now: Instant) -> bool {
        if !self.frame_loop.take() {
            return false;
        }
        if self.snap.fire_if_due(now) {
            self.on_check();
        }
        self.poll_loader();
        self.update();
        true
    }

    fn update(&mut self) {
        self.scroll.step();
        let direction = self.scroll.direction();
        for media in &mut self.medias {
            media.update(&self.scroll, direction);
        }
        if let Some(renderer) = self.renderer.as_mut() {
            let scene = build_frame(&self.camera, &self.medias);
            renderer.render(&scene);
        }
        self.scroll.commit();
        self.frame_loop.schedule(&mut self.host);
    }

    fn poll_loader(&mut self) {
        let Some(loader) = self.loader.as_ref() else {
            return;
        };
        let msgs = loader.drain();
        if !msgs.is_empty() {
            self.apply_loaded(msgs);
        }
    }

    fn apply_loaded(&mut self, msgs: Vec<LoaderMsg>) {
        for msg in msgs {
            match msg {
                LoaderMsg::Loaded(image) => {
                    let slots: Vec<usize> = self
                        .medias
                        .iter()
                        .filter(|m| m.image() == image.path.as_path())
                        .map(|m| m.index())
                        .collect();
                    for &slot in &slots {
                        self.medias[slot].set_image_size(image.width, image.height);
                    }
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.set_tile_image(&slots, &image);
                    }
                    log!(
                        "Loaded {} ({}x{}) for {} tiles",
                        image.path.display(),
                        image.width,
                        image.height,
                        slots.len()
                    );
                }
                LoaderMsg::Failed { path, reason } => {
                    log_warn!("Tile image {} unavailable: {}", path.display(), reason);
                }
            }
        }
    }

    /// Stops the frame loop, unsubscribes every listener and releases the surface.
    /// Safe to call more than once.
    pub fn destroy(&mut self) {
        self.frame_loop.cancel();
        self.snap.cancel();
        self.listeners.clear();
        self.is_down = false;
        self.loader = None;
        if let Some(mut renderer) = self.renderer.take() {
            renderer.detach();
            log!("Gallery destroyed");
        }
    }
}

fn build_frame(camera: &Camera, medias: &[MediaItem]) -> SceneFrame {
    let view_proj = camera.view_proj();
    let tiles = medias
        .iter()
        .map(|media| {
            let model = media.plane.matrix();
            let title_world = media.title.transform.world(&model);
            TileDraw {
                slot: media.index(),
                mvp: (view_proj * model).as_mat4(),
                title_mvp: (view_proj * title_world).as_mat4(),
                params: media.params(),
            }
        })
        .collect();
    SceneFrame { tiles }
}
