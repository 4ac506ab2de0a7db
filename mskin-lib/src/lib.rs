pub mod color;
pub mod errors;
pub mod flat;
pub mod normalizer;
pub mod raster;
pub mod skin;

pub use color::{merge_colors, Color};
pub use raster::{BlendMode, RasterImage, Rect};
pub use skin::{ArmWidth, SkinArea, SkinImage};
