use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};

pub type VertexUvCoordinates = Vec2;

/// One interleaved vertex: `[x, y, z, w, u, v]`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// The position of the vertex
    pub position: Vec3,
    /// The homogeneous coordinate of the position
    pub w: f32,
    /// The uv coordinates of the vertex
    pub uv: VertexUvCoordinates,
}

impl Vertex {
    #[must_use]
    pub fn new(position: Vec4, uv: VertexUvCoordinates) -> Self {
        Vertex {
            position: position.truncate(),
            w: position.w,
            uv,
        }
    }

    #[must_use]
    pub fn homogeneous_position(&self) -> Vec4 {
        self.position.extend(self.w)
    }

    /// Bit pattern of every component, used to deduplicate identical vertices.
    /// Negative zero is folded into positive zero so equal values share a key.
    pub(crate) fn key(&self) -> [u32; 6] {
        let components: [f32; 6] = bytemuck::cast(*self);

        components.map(|component| (component + 0.0).to_bits())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn vertex_is_interleaved() {
        let vertex = Vertex::new(Vec4::new(1.0, 2.0, 3.0, 4.0), Vec2::new(5.0, 6.0));
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&vertex));

        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn signed_zeros_share_a_key() {
        let positive = Vertex::new(Vec4::new(0.0, 1.0, 0.0, 1.0), Vec2::new(0.0, 0.5));
        let negative = Vertex::new(Vec4::new(-0.0, 1.0, -0.0, 1.0), Vec2::new(-0.0, 0.5));

        assert_eq!(positive.key(), negative.key());
    }
}
