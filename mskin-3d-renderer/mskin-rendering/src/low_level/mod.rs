// Re-export some types from the glam crate
pub use glam::{Mat4, Vec2, Vec3, Vec4};

pub mod mesh;
pub mod vertex;
