use glam::{Vec2, Vec3};
use mskin_lib::{ArmWidth, SkinArea};
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::high_level::{camera::CameraSettings, pipeline::Size};

/// The mesh assets shipped with the renderer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum ModelPreset {
    Block,
    Steve,
    SteveNoOverlay,
    Alex,
    AlexNoOverlay,
    SteveHead,
    SteveHeadNoOverlay,
}

impl ModelPreset {
    #[must_use]
    pub fn file_name(self) -> String {
        format!("{self}.obj")
    }
}

/// Every camera used by the renderer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumIter, EnumCount, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum CameraPreset {
    BodyWithOverlay,
    BodyNoOverlay,
    BodyWithOverlaySlim,
    BodyNoOverlaySlim,
    HeadWithOverlay,
    HeadNoOverlay,
    BlockIcon,
}

const BODY_POSITION: Vec3 = Vec3::new(-18.7939, 29.6808, 32.5519);
const BODY_ROTATION: Vec3 = Vec3::new(-0.349_066, -0.523_599, 0.0);
const HEAD_POSITION: Vec3 = Vec3::new(-12.2474, 38.0, 12.2474);
const HEAD_ROTATION: Vec3 = Vec3::new(-0.523_599, -0.785_398, 0.0);

impl CameraPreset {
    #[must_use]
    pub const fn settings(self) -> CameraSettings {
        const fn body(scale: f32, post_offset: Vec2) -> CameraSettings {
            CameraSettings {
                size: Size::new(525, 960),
                position: BODY_POSITION,
                rotation: BODY_ROTATION,
                scale: Vec2::splat(scale),
                post_offset,
            }
        }

        const fn head(size: u32, scale: f32, offset_y: f32) -> CameraSettings {
            CameraSettings {
                size: Size::new(size, size),
                position: HEAD_POSITION,
                rotation: HEAD_ROTATION,
                scale: Vec2::splat(scale),
                post_offset: Vec2::new(0.0, offset_y),
            }
        }

        match self {
            Self::BodyWithOverlay => body(2.2113, Vec2::new(0.0496, -0.077)),
            Self::BodyNoOverlay => body(2.2949, Vec2::new(0.0512, -0.068)),
            Self::BodyWithOverlaySlim => body(2.2113, Vec2::new(0.0342, -0.077)),
            Self::BodyNoOverlaySlim => body(2.2949, Vec2::new(0.0355, -0.068)),
            Self::HeadWithOverlay => head(420, 2.6401, 0.1566),
            Self::HeadNoOverlay => head(400, 2.9871, 0.1392),
            Self::BlockIcon => CameraSettings {
                size: Size::new(150, 150),
                position: Vec3::new(24.4949, 20.0, 24.4949),
                rotation: Vec3::new(-0.523_599, 0.785_398, 0.0),
                scale: Vec2::splat(2.9871),
                post_offset: Vec2::new(0.0, 0.1391),
            },
        }
    }
}

/// A skin render request, checked exhaustively at compile time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SkinPreset {
    pub area: SkinArea,
    pub overlay: bool,
    pub arm_width: ArmWidth,
}

impl SkinPreset {
    #[must_use]
    pub const fn new(area: SkinArea, overlay: bool, arm_width: ArmWidth) -> Self {
        Self {
            area,
            overlay,
            arm_width,
        }
    }

    /// The camera and model that render this preset. Heads look the same for both arm widths.
    #[must_use]
    pub const fn resolve(self) -> (CameraPreset, ModelPreset) {
        use ArmWidth::{Slim, Wide};
        use SkinArea::{Body, Head};

        match (self.area, self.overlay, self.arm_width) {
            (Body, true, Wide) => (CameraPreset::BodyWithOverlay, ModelPreset::Steve),
            (Body, false, Wide) => (CameraPreset::BodyNoOverlay, ModelPreset::SteveNoOverlay),
            (Body, true, Slim) => (CameraPreset::BodyWithOverlaySlim, ModelPreset::Alex),
            (Body, false, Slim) => (CameraPreset::BodyNoOverlaySlim, ModelPreset::AlexNoOverlay),
            (Head, true, _) => (CameraPreset::HeadWithOverlay, ModelPreset::SteveHead),
            (Head, false, _) => (CameraPreset::HeadNoOverlay, ModelPreset::SteveHeadNoOverlay),
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn model_presets_map_to_asset_names() {
        let names = ModelPreset::iter().map(ModelPreset::file_name).collect::<Vec<_>>();

        assert_eq!(
            names,
            [
                "block.obj",
                "steve.obj",
                "steveNoOverlay.obj",
                "alex.obj",
                "alexNoOverlay.obj",
                "steveHead.obj",
                "steveHeadNoOverlay.obj",
            ]
        );
    }

    #[test]
    fn six_distinct_skin_presets() {
        let resolved = SkinArea::iter()
            .flat_map(|area| {
                ArmWidth::iter().flat_map(move |arm_width| {
                    [true, false].map(|overlay| SkinPreset::new(area, overlay, arm_width).resolve())
                })
            })
            .collect::<HashSet<_>>();

        assert_eq!(resolved.len(), 6);
        assert!(!resolved.iter().any(|(camera, _)| *camera == CameraPreset::BlockIcon));
    }

    #[test]
    fn body_with_overlay_is_525_by_960() {
        let (camera, _) = SkinPreset::new(SkinArea::Body, true, ArmWidth::Wide).resolve();

        assert_eq!(camera.settings().size, Size::new(525, 960));
        assert_eq!(CameraPreset::BlockIcon.settings().size, Size::new(150, 150));
    }
}
