use std::sync::Arc;

use image::RgbaImage;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::config::Config;
use crate::gallery::SceneRenderer;
use crate::gallery::loader::DecodedImage;
use crate::gallery::scene::SceneFrame;
use crate::geometry::plane::PlaneGeometry;

use super::msaa;
use super::textures;
use super::types::{TileUniform, TitleUniform, plane_vertices};

struct Mesh {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

impl Mesh {
    fn new(device: &wgpu::Device, label: &str, geometry: &PlaneGeometry) -> Self {
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} vertices")),
            contents: bytemuck::cast_slice(&plane_vertices(geometry)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} indices")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertices,
            indices,
            index_count: geometry.index_count(),
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_vertex_buffer(0, self.vertices.slice(..));
        pass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

struct TileSlot {
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    title_uniform: wgpu::Buffer,
    title_bind_group: wgpu::BindGroup,
}

/// wgpu renderer for one gallery: a surface on the window, two pipelines and one
/// bind group pair (tile + title) per tile.
pub struct GalleryRenderer {
    _window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    tile_pipeline: wgpu::RenderPipeline,
    title_pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    image_sampler: wgpu::Sampler,
    title_sampler: wgpu::Sampler,
    tile_mesh: Mesh,
    title_mesh: Mesh,
    placeholder_view: wgpu::TextureView,
    tiles: Vec<TileSlot>,
    msaa_samples: u32,
    msaa_view: Option<wgpu::TextureView>,
    clear_color: wgpu::Color,
}

impl GalleryRenderer {
    pub fn new(window: Arc<Window>, app_config: &Config) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let instance = wgpu::Instance::default();

        // The surface borrows the window; the Arc kept in `_window` outlives it.
        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .map_err(|e| anyhow::anyhow!("request_adapter failed: {e}"))?;

        let requested_msaa = msaa::normalize_samples(app_config.performance.msaa_samples);
        let mut required_features = wgpu::Features::empty();
        if requested_msaa != 1
            && requested_msaa != 4
            && adapter
                .features()
                .contains(wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES)
        {
            required_features |= wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES;
        }

        let (device, queue) =
            pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
                label: Some("gallery device"),
                required_features,
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
                experimental_features: wgpu::ExperimentalFeatures::default(),
            }))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;

        let present_mode = if app_config.performance.prefer_vrr
            && caps.present_modes.contains(&wgpu::PresentMode::Mailbox)
        {
            wgpu::PresentMode::Mailbox
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let msaa_samples =
            msaa::select_samples(&adapter, config.format, app_config.performance.msaa_samples);
        let msaa_view = msaa::create_target(&device, &config, msaa_samples);
        log!(
            "Renderer: {:?}, {:?}, {}x MSAA",
            adapter.get_info().backend,
            config.format,
            msaa_samples
        );

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("gallery bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let image_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tile image sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });
        let title_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("title sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("gallery pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let tile_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tile.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/tile.wgsl").into()),
        });
        let title_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("title.wgsl"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/title.wgsl").into()),
        });

        let make_pipeline = |label: &str, module: &wgpu::ShaderModule| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some("vs_main"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &[super::types::Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some("fs_main"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: msaa_samples,
                    ..Default::default()
                },
                multiview_mask: None,
                cache: None,
            })
        };
        let tile_pipeline = make_pipeline("tile pipeline", &tile_shader);
        let title_pipeline = make_pipeline("title pipeline", &title_shader);

        let tile_mesh = Mesh::new(&device, "tile", &PlaneGeometry::tile());
        let title_mesh = Mesh::new(&device, "title", &PlaneGeometry::quad());
        let (_placeholder, placeholder_view) = textures::placeholder(&device, &queue);

        let bg = app_config.window.background_rgba;
        let clear_color = wgpu::Color {
            r: (bg[0] / 255.0).clamp(0.0, 1.0),
            g: (bg[1] / 255.0).clamp(0.0, 1.0),
            b: (bg[2] / 255.0).clamp(0.0, 1.0),
            a: bg[3].clamp(0.0, 1.0),
        };

        Ok(Self {
            _window: window,
            surface,
            device,
            queue,
            config,
            tile_pipeline,
            title_pipeline,
            bind_group_layout,
            image_sampler,
            title_sampler,
            tile_mesh,
            title_mesh,
            placeholder_view,
            tiles: Vec::new(),
            msaa_samples,
            msaa_view,
            clear_color,
        })
    }

    fn bind_group(
        &self,
        label: &str,
        uniform: &wgpu::Buffer,
        view: &wgpu::TextureView,
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }
}

impl SceneRenderer for GalleryRenderer {
    fn add_tile(&mut self, title: &RgbaImage) {
        let uniform = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tile uniform"),
            size: std::mem::size_of::<TileUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let title_uniform = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("title uniform"),
            size: std::mem::size_of::<TitleUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let (_title_texture, title_view) = textures::upload_rgba_srgb(
            &self.device,
            &self.queue,
            "title texture",
            title.as_raw(),
            title.width(),
            title.height(),
            false,
        );
        let bind_group = self.bind_group("tile bind group", &uniform, &self.placeholder_view, &self.image_sampler);
        let title_bind_group =
            self.bind_group("title bind group", &title_uniform, &title_view, &self.title_sampler);
        self.tiles.push(TileSlot {
            uniform,
            bind_group,
            title_uniform,
            title_bind_group,
        });
    }

    fn set_tile_image(&mut self, slots: &[usize], image: &DecodedImage) {
        let (_texture, view) = textures::upload_rgba_srgb(
            &self.device,
            &self.queue,
            "tile image",
            &image.rgba,
            image.width,
            image.height,
            true,
        );
        for &slot in slots {
            if slot >= self.tiles.len() {
                log_warn!("Image {} targets missing tile {}", image.path.display(), slot);
                continue;
            }
            let bind_group =
                self.bind_group("tile bind group", &self.tiles[slot].uniform, &view, &self.image_sampler);
            self.tiles[slot].bind_group = bind_group;
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if self.config.width == width && self.config.height == height {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.msaa_view = msaa::create_target(&self.device, &self.config, self.msaa_samples);
    }

    fn render(&mut self, frame: &SceneFrame) {
        for draw in &frame.tiles {
            let Some(slot) = self.tiles.get(draw.slot) else {
                continue;
            };
            self.queue
                .write_buffer(&slot.uniform, 0, bytemuck::bytes_of(&TileUniform::from_draw(draw)));
            self.queue.write_buffer(
                &slot.title_uniform,
                0,
                bytemuck::bytes_of(&TitleUniform::from_draw(draw)),
            );
        }

        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log_error!("Surface out of memory");
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => return,
            Err(wgpu::SurfaceError::Other) => return,
        };
        let swapchain_view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("gallery encoder"),
            });

        {
            let (color_view, resolve_target) = match self.msaa_view.as_ref() {
                Some(msaa_view) => (msaa_view, Some(&swapchain_view)),
                None => (&swapchain_view, None),
            };

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("gallery pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            for draw in &frame.tiles {
                let Some(slot) = self.tiles.get(draw.slot) else {
                    continue;
                };
                pass.set_pipeline(&self.tile_pipeline);
                pass.set_bind_group(0, &slot.bind_group, &[]);
                self.tile_mesh.draw(&mut pass);

                pass.set_pipeline(&self.title_pipeline);
                pass.set_bind_group(0, &slot.title_bind_group, &[]);
                self.title_mesh.draw(&mut pass);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();
    }

    fn detach(&mut self) {
        self.tiles.clear();
    }
}
