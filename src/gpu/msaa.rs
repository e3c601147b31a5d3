/// Rounds a configured sample count to one wgpu can use: 1, 2, 4 or 8.
pub fn normalize_samples(samples: u32) -> u32 {
    match samples {
        0 | 1 => 1,
        2 => 2,
        3 | 4 => 4,
        _ => 8,
    }
}

fn best_supported(requested: u32, flags: wgpu::TextureFormatFeatureFlags) -> u32 {
    let requested = normalize_samples(requested);
    [
        (8, wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X8),
        (4, wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X4),
        (2, wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X2),
    ]
    .into_iter()
    .find(|&(count, flag)| count <= requested && flags.contains(flag))
    .map(|(count, _)| count)
    .unwrap_or(1)
}

/// Highest sample count not above `requested` that the adapter supports for `format`.
pub fn select_samples(adapter: &wgpu::Adapter, format: wgpu::TextureFormat, requested: u32) -> u32 {
    best_supported(requested, adapter.get_texture_format_features(format).flags)
}

/// Multisampled colour target matching the surface, or `None` when not multisampling.
pub fn create_target(
    device: &wgpu::Device,
    surface_config: &wgpu::SurfaceConfiguration,
    samples: u32,
) -> Option<wgpu::TextureView> {
    if samples <= 1 {
        return None;
    }
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("gallery msaa color"),
        size: wgpu::Extent3d {
            width: surface_config.width.max(1),
            height: surface_config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: samples,
        dimension: wgpu::TextureDimension::D2,
        format: surface_config.format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    Some(texture.create_view(&wgpu::TextureViewDescriptor::default()))
}
