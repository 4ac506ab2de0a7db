pub mod errors;
pub mod high_level;
pub mod low_level;

pub use high_level::{
    camera::{Camera, CameraSettings},
    model::Model,
    pipeline::{GraphicsContext, Size},
    presets::{CameraPreset, ModelPreset, SkinPreset},
    renderer::RenderEngine,
};
