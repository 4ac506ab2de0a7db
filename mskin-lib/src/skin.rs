use derive_more::Deref;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    errors::{MskinError, Result},
    raster::RasterImage,
};

pub const SKIN_WIDTH: u32 = 64;
pub const MODERN_SKIN_HEIGHT: u32 = 64;
pub const LEGACY_SKIN_HEIGHT: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkinArea {
    Head,
    Body,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ArmWidth {
    #[default]
    #[strum(to_string = "wide", serialize = "classic")]
    Wide,
    Slim,
}

impl ArmWidth {
    #[must_use]
    pub const fn from_slim(slim: bool) -> Self {
        if slim {
            Self::Slim
        } else {
            Self::Wide
        }
    }

    /// Width in pixels of an arm face on the skin sheet.
    #[must_use]
    pub const fn pixels(self) -> u32 {
        match self {
            Self::Wide => 4,
            Self::Slim => 3,
        }
    }
}

/// A [`RasterImage`] that is known to have valid skin dimensions (64x64 or legacy 64x32).
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct SkinImage(RasterImage);

impl SkinImage {
    pub fn new(image: RasterImage) -> Result<Self> {
        let (width, height) = image.dimensions();

        if width != SKIN_WIDTH || !matches!(height, LEGACY_SKIN_HEIGHT | MODERN_SKIN_HEIGHT) {
            return Err(MskinError::InvalidSkinDimensions { width, height });
        }

        Ok(Self(image))
    }

    pub fn from_compressed_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(RasterImage::create_from_compressed_bytes(bytes)?)
    }

    #[must_use]
    pub fn is_legacy(&self) -> bool {
        self.0.height() == LEGACY_SKIN_HEIGHT
    }

    #[must_use]
    pub fn as_raster(&self) -> &RasterImage {
        &self.0
    }

    /// Mutable access to the pixels. The dimensions cannot change through this handle's drawing operations.
    pub(crate) fn as_raster_mut(&mut self) -> &mut RasterImage {
        &mut self.0
    }

    #[must_use]
    pub fn into_raster(self) -> RasterImage {
        self.0
    }
}

impl TryFrom<RasterImage> for SkinImage {
    type Error = MskinError;

    fn try_from(value: RasterImage) -> Result<Self> {
        Self::new(value)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn accepts_modern_and_legacy_sizes() {
        assert!(!SkinImage::new(RasterImage::create_empty(64, 64)).unwrap().is_legacy());
        assert!(SkinImage::new(RasterImage::create_empty(64, 32)).unwrap().is_legacy());
    }

    #[test]
    fn rejects_other_sizes() {
        for (width, height) in [(32, 64), (64, 48), (128, 128), (0, 0), (64, 65)] {
            let result = SkinImage::new(RasterImage::create_empty(width, height));

            assert!(matches!(
                result,
                Err(MskinError::InvalidSkinDimensions { width: w, height: h }) if w == width && h == height
            ));
        }
    }

    #[test]
    fn parses_arm_width_names() {
        assert_eq!("slim".parse::<ArmWidth>().unwrap(), ArmWidth::Slim);
        assert_eq!("Classic".parse::<ArmWidth>().unwrap(), ArmWidth::Wide);
        assert_eq!("WIDE".parse::<ArmWidth>().unwrap(), ArmWidth::Wide);
        assert_eq!("body".parse::<SkinArea>().unwrap(), SkinArea::Body);
        assert!("legs".parse::<SkinArea>().is_err());
    }
}
