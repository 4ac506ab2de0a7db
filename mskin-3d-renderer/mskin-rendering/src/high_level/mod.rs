pub mod camera;
pub mod model;
pub mod pipeline;
pub mod presets;
pub mod renderer;

pub(crate) mod utils;
