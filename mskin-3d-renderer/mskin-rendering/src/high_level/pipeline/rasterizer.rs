use glam::{UVec2, Vec2, Vec3};
use mskin_lib::{merge_colors, Color};

use crate::low_level::{mesh::Mesh, vertex::Vertex};

use super::{
    shader::{fragment_shader, vertex_shader, ShaderState, TexelBounds, VertexInput},
    RenderTarget,
};

/// Tolerance for pixel centres that land exactly on a shared edge.
const EDGE_EPSILON: f32 = 1e-5;

/// A vertex after the vertex stage, mapped to screen space.
#[derive(Clone, Copy, Debug)]
struct ScreenVertex {
    /// `x` and `y` in pixels (row 0 at the top), `z` is the depth in `[0, 1]`
    screen: Vec3,
    old_w_recip: f32,
    tex_coord: Vec2,
    /// Whether the vertex is in front of the camera
    visible: bool,
}

/// Rasterizes every triangle of `mesh` into `target`. Returns the number of fragments written.
pub(super) fn draw_mesh(target: &mut RenderTarget, mesh: &Mesh, state: &ShaderState) -> usize {
    let size = Vec2::new(target.size.width as f32, target.size.height as f32);

    let vertices = mesh
        .vertices()
        .iter()
        .map(|vertex| apply_vertex_shader(vertex, size, state))
        .collect::<Vec<_>>();

    mesh.indices()
        .chunks_exact(3)
        .map(|triangle| {
            let triangle = [
                vertices[triangle[0] as usize],
                vertices[triangle[1] as usize],
                vertices[triangle[2] as usize],
            ];

            draw_triangle(target, triangle, state)
        })
        .sum()
}

fn apply_vertex_shader(vertex: &Vertex, size: Vec2, state: &ShaderState) -> ScreenVertex {
    let result = vertex_shader(
        VertexInput {
            position: vertex.homogeneous_position(),
            tex_coord: vertex.uv,
        },
        state,
    );

    let w = result.position.w;
    let old_w_recip = w.recip();

    // Apply perspective divide
    let ndc = result.position.truncate() * old_w_recip;

    ScreenVertex {
        screen: Vec3::new(
            (ndc.x + 1.0) * 0.5 * size.x,
            (1.0 - ndc.y) * 0.5 * size.y,
            ndc.z * 0.5 + 0.5,
        ),
        old_w_recip,
        tex_coord: result.tex_coord,
        visible: w > 0.0,
    }
}

fn draw_triangle(target: &mut RenderTarget, [va, vb, vc]: [ScreenVertex; 3], state: &ShaderState) -> usize {
    // Triangles crossing the camera plane are never part of our framed presets
    if !(va.visible && vb.visible && vc.visible) {
        return 0;
    }

    let Some(barycentric_state) = barycentric_coordinates_state(va.screen.truncate(), vb.screen.truncate(), vc.screen.truncate()) else {
        return 0;
    };

    // Find the bounding box (in pixels), clamped to the target
    let vx = Vec3::new(va.screen.x, vb.screen.x, vc.screen.x);
    let vy = Vec3::new(va.screen.y, vb.screen.y, vc.screen.y);

    let clamp_axis = |value: f32, max: u32| value.clamp(0.0, max as f32) as u32;

    let (min_x, max_x) = (
        clamp_axis(vx.min_element().floor(), target.size.width),
        clamp_axis(vx.max_element().ceil(), target.size.width),
    );
    let (min_y, max_y) = (
        clamp_axis(vy.min_element().floor(), target.size.height),
        clamp_axis(vy.max_element().ceil(), target.size.height),
    );

    let (texture_width, texture_height) = state.texture.dimensions();
    let texel_bounds = TexelBounds::from_tex_coords(
        [va.tex_coord, vb.tex_coord, vc.tex_coord],
        UVec2::new(texture_width, texture_height),
    );

    let mut written = 0;

    for screen_y in min_y..max_y {
        for screen_x in min_x..max_x {
            let point = Vec2::new(screen_x as f32 + 0.5, screen_y as f32 + 0.5);
            let barycentric = barycentric_state.coordinates(point);

            // If the pixel is outside the triangle, skip it
            if barycentric.min_element() < -EDGE_EPSILON {
                continue;
            }

            let depth = barycentric.dot(Vec3::new(va.screen.z, vb.screen.z, vc.screen.z));
            let stored_depth = &mut target.depth.get_pixel_mut(screen_x, screen_y).0[0];

            if depth > *stored_depth {
                continue;
            }

            // Compute the perspective-corrected texture coordinates
            let weights = barycentric * Vec3::new(va.old_w_recip, vb.old_w_recip, vc.old_w_recip);
            let interpolated_recip_w = weights.element_sum().recip();

            let tex_coord = (va.tex_coord * weights.x + vb.tex_coord * weights.y + vc.tex_coord * weights.z)
                * interpolated_recip_w;

            let Some(color) = fragment_shader(tex_coord, texel_bounds, state) else {
                // Discarded pixel
                continue;
            };

            let pixel = target.color.get_pixel_mut(screen_x, screen_y);
            *pixel = merge_colors(Color::from(color), Color::from(*pixel)).into();

            *stored_depth = depth;
            written += 1;
        }
    }

    written
}

struct BarycentricState {
    v0: Vec2,
    v1: Vec2,
    d00: f32,
    d01: f32,
    d11: f32,
    inv_denom: f32,

    a: Vec2,
}

impl BarycentricState {
    /// Weights of `a`, `b` and `c` for `point`.
    #[inline]
    fn coordinates(&self, point: Vec2) -> Vec3 {
        let v2 = point - self.a;

        let d20 = v2.dot(self.v0);
        let d21 = v2.dot(self.v1);

        let v = (self.d11 * d20 - self.d01 * d21) * self.inv_denom;
        let w = (self.d00 * d21 - self.d01 * d20) * self.inv_denom;

        Vec3::new(1.0 - v - w, v, w)
    }
}

/// Returns `None` for degenerate (zero-area) triangles.
fn barycentric_coordinates_state(a: Vec2, b: Vec2, c: Vec2) -> Option<BarycentricState> {
    let v0 = b - a;
    let v1 = c - a;

    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);

    let denom = d00 * d11 - d01 * d01;

    if denom.abs() <= f32::EPSILON {
        return None;
    }

    Some(BarycentricState {
        v0,
        v1,
        d00,
        d01,
        d11,
        inv_denom: denom.recip(),
        a,
    })
}
