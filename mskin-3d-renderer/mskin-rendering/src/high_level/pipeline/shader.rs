use glam::{Mat4, UVec2, Vec2, Vec4};
use image::{Rgba, RgbaImage};

pub struct VertexInput {
    pub position: Vec4,
    pub tex_coord: Vec2,
}

#[derive(Clone, Copy, Debug)]
pub struct VertexOutput {
    pub position: Vec4,
    pub tex_coord: Vec2,
}

pub struct ShaderState<'a> {
    pub transform: Mat4,
    pub texture: &'a RgbaImage,
}

pub fn vertex_shader(vertex: VertexInput, state: &ShaderState) -> VertexOutput {
    VertexOutput {
        position: state.transform * vertex.position,
        tex_coord: vertex.tex_coord,
    }
}

/// Inclusive texel rectangle covered by one triangle's texture coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TexelBounds {
    pub min: UVec2,
    pub max: UVec2,
}

impl TexelBounds {
    /// Computes the texels spanned by `tex_coords` on a texture of `size` (with `v` flipped).
    pub fn from_tex_coords(tex_coords: [Vec2; 3], size: UVec2) -> Self {
        const SNAP: f32 = 1e-3;

        let size_f = size.as_vec2();
        let texels = tex_coords.map(|uv| Vec2::new(uv.x, 1.0 - uv.y) * size_f);

        let lower = texels[0].min(texels[1]).min(texels[2]);
        let upper = texels[0].max(texels[1]).max(texels[2]);

        let last = size.saturating_sub(UVec2::ONE).as_vec2();

        let min = (lower + SNAP).floor().clamp(Vec2::ZERO, last);
        let max = ((upper - SNAP).ceil() - 1.0).clamp(min, last.max(min));

        Self {
            min: min.as_uvec2(),
            max: max.as_uvec2(),
        }
    }
}

/// Samples the bound texture at `(u, 1 - v)` with nearest filtering, staying inside `bounds`.
///
/// Returns `None` (discard) unless the texel is fully opaque.
pub fn fragment_shader(tex_coord: Vec2, bounds: TexelBounds, state: &ShaderState) -> Option<Rgba<u8>> {
    let texture = state.texture;
    let (width, height) = texture.dimensions();

    if width == 0 || height == 0 {
        return None;
    }

    let texel = Vec2::new(tex_coord.x * width as f32, (1.0 - tex_coord.y) * height as f32)
        .floor()
        .clamp(bounds.min.as_vec2(), bounds.max.as_vec2())
        .as_uvec2()
        .min(UVec2::new(width - 1, height - 1));

    let color = *texture.get_pixel(texel.x, texel.y);

    (color[3] == 255).then_some(color)
}
