use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Full mip chain starting at `base`, halving each level down to 1x1.
pub fn mip_chain(base: &RgbaImage) -> Vec<RgbaImage> {
    let mut levels = vec![base.clone()];
    loop {
        let Some(prev) = levels.last() else {
            break;
        };
        let (w, h) = prev.dimensions();
        if w <= 1 && h <= 1 {
            break;
        }
        let next = imageops::resize(prev, (w / 2).max(1), (h / 2).max(1), FilterType::Triangle);
        levels.push(next);
    }
    levels
}

fn write_level(queue: &wgpu::Queue, texture: &wgpu::Texture, level: u32, img: &RgbaImage) {
    let (w, h) = img.dimensions();
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level: level,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        img.as_raw(),
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * w),
            rows_per_image: Some(h),
        },
        wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
    );
}

/// Uploads straight-alpha RGBA8 pixels as an sRGB texture. With `mipmaps`, the
/// whole chain is built on the CPU. A buffer that does not match `width * height`
/// falls back to a transparent 1x1 texture.
pub fn upload_rgba_srgb(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    rgba: &[u8],
    width: u32,
    height: u32,
    mipmaps: bool,
) -> (wgpu::Texture, wgpu::TextureView) {
    let base = if width > 0 && height > 0 && rgba.len() == (width as usize) * (height as usize) * 4 {
        RgbaImage::from_raw(width, height, rgba.to_vec())
    } else {
        None
    };
    let base = base.unwrap_or_else(|| {
        log_warn!("{}: invalid RGBA buffer ({}x{}, {} bytes)", label, width, height, rgba.len());
        RgbaImage::new(1, 1)
    });

    let levels = if mipmaps {
        mip_chain(&base)
    } else {
        vec![base]
    };
    let (w, h) = levels[0].dimensions();

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: w,
            height: h,
            depth_or_array_layers: 1,
        },
        mip_level_count: levels.len() as u32,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    for (level, img) in levels.iter().enumerate() {
        write_level(queue, &texture, level as u32, img);
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

/// Transparent 1x1 stand-in used until a tile image arrives.
pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> (wgpu::Texture, wgpu::TextureView) {
    upload_rgba_srgb(device, queue, "tile placeholder", &[0, 0, 0, 0], 1, 1, false)
}
