use bytemuck::{Pod, Zeroable};

use crate::gallery::scene::TileDraw;
use crate::geometry::plane::PlaneGeometry;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

pub fn plane_vertices(geometry: &PlaneGeometry) -> Vec<Vertex> {
    geometry
        .positions
        .iter()
        .zip(&geometry.uvs)
        .map(|(&position, &uv)| Vertex { position, uv })
        .collect()
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct TileUniform {
    pub mvp: [[f32; 4]; 4],
    // plane size in world units, source image size in pixels (0 = not loaded)
    pub plane_sizes: [f32; 2],
    pub image_sizes: [f32; 2],
    pub time: f32,
    pub speed: f32,
    pub border_radius: f32,
    pub _pad: f32,
}

impl TileUniform {
    pub fn from_draw(draw: &TileDraw) -> Self {
        Self {
            mvp: draw.mvp.to_cols_array_2d(),
            plane_sizes: draw.params.plane_size,
            image_sizes: draw.params.image_size,
            time: draw.params.time,
            speed: draw.params.speed,
            border_radius: draw.params.border_radius,
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct TitleUniform {
    pub mvp: [[f32; 4]; 4],
}

impl TitleUniform {
    pub fn from_draw(draw: &TileDraw) -> Self {
        Self {
            mvp: draw.title_mvp.to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TileUniform, TitleUniform, Vertex};

    #[derive(Clone, Debug)]
    enum WgslType {
        Scalar,
        Vec(u32),
        Mat4,
    }

    #[derive(Clone, Debug)]
    struct WgslField {
        name: String,
        ty: WgslType,
    }

    fn round_up(value: usize, align: usize) -> usize {
        if align == 0 {
            return value;
        }
        value.div_ceil(align) * align
    }

    fn parse_wgsl_type(raw: &str) -> WgslType {
        let ty = raw.trim();
        if ty == "f32" || ty == "u32" || ty == "i32" {
            return WgslType::Scalar;
        }
        if ty == "mat4x4<f32>" {
            return WgslType::Mat4;
        }
        if ty.starts_with("vec") {
            let n = ty
                .chars()
                .nth(3)
                .and_then(|ch| ch.to_digit(10))
                .expect("vector width");
            return WgslType::Vec(n);
        }
        panic!("unsupported WGSL type in uniform: {ty}");
    }

    fn wgsl_align_and_size(ty: &WgslType) -> (usize, usize) {
        match ty {
            WgslType::Scalar => (4, 4),
            WgslType::Vec(2) => (8, 8),
            WgslType::Vec(3) => (16, 12),
            WgslType::Vec(4) => (16, 16),
            WgslType::Vec(n) => panic!("unsupported vec width: {n}"),
            WgslType::Mat4 => (16, 64),
        }
    }

    fn extract_struct_fields(wgsl_src: &str, struct_name: &str) -> Vec<WgslField> {
        let marker = format!("struct {struct_name}");
        let start = wgsl_src
            .find(&marker)
            .unwrap_or_else(|| panic!("struct {struct_name} must exist"));
        let body = &wgsl_src[start..];
        let open = body.find('{').expect("struct opening brace");
        let after_open = &body[(open + 1)..];

        let mut out = Vec::new();
        for line in after_open.lines() {
            let trimmed = line.split("//").next().unwrap_or("").trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('}') {
                break;
            }
            let no_comma = trimmed.trim_end_matches(',').trim();
            let (name_raw, ty_raw) = no_comma
                .split_once(':')
                .unwrap_or_else(|| panic!("invalid {struct_name} field line: {trimmed}"));
            out.push(WgslField {
                name: name_raw.trim().to_string(),
                ty: parse_wgsl_type(ty_raw.trim()),
            });
        }
        out
    }

    fn simulate_uniform_layout(wgsl_src: &str, struct_name: &str) -> (Vec<(String, usize)>, usize) {
        let mut offsets = Vec::new();
        let mut offset = 0;
        for field in extract_struct_fields(wgsl_src, struct_name) {
            let (align, size) = wgsl_align_and_size(&field.ty);
            offset = round_up(offset, align);
            offsets.push((field.name, offset));
            offset += size;
        }
        (offsets, round_up(offset, 16))
    }

    fn assert_layout_match(
        wgsl_src: &str,
        struct_name: &str,
        rust_offsets: Vec<(&'static str, usize)>,
        rust_size: usize,
    ) {
        let (wgsl_offsets, wgsl_size) = simulate_uniform_layout(wgsl_src, struct_name);
        assert_eq!(
            wgsl_offsets.len(),
            rust_offsets.len(),
            "{struct_name}: field count differs (wgsl {wgsl_offsets:?}, rust {rust_offsets:?})"
        );
        for ((wgsl_name, wgsl_off), (rust_name, rust_off)) in wgsl_offsets.iter().zip(&rust_offsets) {
            assert_eq!(wgsl_name, rust_name, "{struct_name}: field order differs");
            assert_eq!(
                wgsl_off, rust_off,
                "{struct_name}.{wgsl_name}: wgsl offset {wgsl_off}, rust offset {rust_off}"
            );
        }
        assert_eq!(wgsl_size, rust_size, "{struct_name}: size differs");
    }

    #[test]
    fn tile_uniform_matches_wgsl_layout() {
        let rust = vec![
            ("mvp", std::mem::offset_of!(TileUniform, mvp)),
            ("plane_sizes", std::mem::offset_of!(TileUniform, plane_sizes)),
            ("image_sizes", std::mem::offset_of!(TileUniform, image_sizes)),
            ("time", std::mem::offset_of!(TileUniform, time)),
            ("speed", std::mem::offset_of!(TileUniform, speed)),
            ("border_radius", std::mem::offset_of!(TileUniform, border_radius)),
            ("_pad", std::mem::offset_of!(TileUniform, _pad)),
        ];
        assert_layout_match(
            include_str!("shaders/tile.wgsl"),
            "TileUniform",
            rust,
            std::mem::size_of::<TileUniform>(),
        );
        assert_eq!(std::mem::size_of::<TileUniform>(), 96);
    }

    #[test]
    fn title_uniform_matches_wgsl_layout() {
        let rust = vec![("mvp", std::mem::offset_of!(TitleUniform, mvp))];
        assert_layout_match(
            include_str!("shaders/title.wgsl"),
            "TitleUniform",
            rust,
            std::mem::size_of::<TitleUniform>(),
        );
    }

    fn wgsl_fn_body<'a>(wgsl_src: &'a str, name: &str) -> &'a str {
        let start = wgsl_src
            .find(&format!("fn {name}("))
            .unwrap_or_else(|| panic!("fn {name} must exist"));
        let body = &wgsl_src[start..];
        let end = body.find("\n}").expect("function closing brace");
        &body[..end]
    }

    // CPU copy of the tile shader's corner mask, `b` being the inner box half-size.
    fn rounded_box_sdf(p: [f32; 2], b: [f32; 2], r: f32) -> f32 {
        let q = [p[0].abs() - b[0], p[1].abs() - b[1]];
        let outside = (q[0].max(0.0).powi(2) + q[1].max(0.0).powi(2)).sqrt();
        outside + q[0].max(q[1]).min(0.0) - r
    }

    fn tile_mask(uv: [f32; 2], r: f32) -> f32 {
        rounded_box_sdf([uv[0] - 0.5, uv[1] - 0.5], [0.5 - r, 0.5 - r], r)
    }

    #[test]
    fn tile_sdf_matches_wgsl_source() {
        let src = include_str!("shaders/tile.wgsl");
        let body: String = wgsl_fn_body(src, "rounded_box_sdf").split_whitespace().collect();
        assert!(body.contains("letq=abs(p)-b;"), "{body}");
        assert!(
            body.contains("returnlength(max(q,vec2<f32>(0.0)))+min(max(q.x,q.y),0.0)-r;"),
            "{body}"
        );
        let caller: String = wgsl_fn_body(src, "fs_main").split_whitespace().collect();
        assert!(
            caller.contains("rounded_box_sdf(in.uv-vec2<f32>(0.5),vec2<f32>(0.5-r),r)"),
            "{caller}"
        );
    }

    #[test]
    fn tile_mask_reaches_the_quad_edge() {
        let r = 0.05;
        for x in [0.5, 0.9, 0.96, 0.98, 0.999] {
            let d = tile_mask([x, 0.5], r);
            assert!(d < 0.0, "uv.x {x}: d {d} should be inside");
            assert!((d - (x - 1.0)).abs() < 1e-5, "uv.x {x}: d {d}");
        }
        assert!(tile_mask([1.0, 0.5], r).abs() < 1e-6);
        // rounded corner: the very corner is cut, the point on the arc is the edge
        assert!(tile_mask([0.999, 0.999], r) > 0.0);
        let on_arc = 0.95 + r * std::f32::consts::FRAC_1_SQRT_2;
        assert!(tile_mask([on_arc, on_arc], r).abs() < 1e-5);
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        assert_eq!(Vertex::layout().array_stride, 20);
    }
}
