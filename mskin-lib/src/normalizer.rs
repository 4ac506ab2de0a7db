//! Canonicalization of player skins into the modern 64x64 layout.
//!
//! [`normalize`] runs three steps in order:
//! 1. [`upgrade_legacy`] turns 64x32 skins into 64x64 ones by mirroring the right limbs onto the left.
//! 2. [`blank_unused_regions`] clears pixels that no model ever samples.
//! 3. [`fix_first_layer_opacity`] makes the base layer fully opaque.
//!
//! [`enforce_min_max_alpha_on_second_layer`] is kept separate, the flat renderer needs the overlay untouched.

use tracing::{instrument, trace};

use crate::{
    color::Color,
    errors::{MskinError, Result},
    raster::{RasterImage, Rect},
    skin::{SkinImage, MODERN_SKIN_HEIGHT, SKIN_WIDTH},
};

/// `(source, destination)` pairs mirrored from the legacy right limbs onto the new left limbs.
const LEGACY_LIMB_COPIES: [(Rect, (i32, i32)); 12] = [
    // Leg top and bottom
    (Rect::square(8, 16, 4), (24, 48)),
    (Rect::square(4, 16, 4), (20, 48)),
    // Arm top and bottom
    (Rect::square(44, 16, 4), (36, 48)),
    (Rect::square(48, 16, 4), (40, 48)),
    // Leg sides
    (Rect::new(4, 20, 4, 12), (20, 52)),
    (Rect::new(8, 20, 4, 12), (16, 52)),
    (Rect::new(12, 20, 4, 12), (28, 52)),
    (Rect::new(0, 20, 4, 12), (24, 52)),
    // Arm sides
    (Rect::new(44, 20, 4, 12), (36, 52)),
    (Rect::new(48, 20, 4, 12), (32, 52)),
    (Rect::new(52, 20, 4, 12), (44, 52)),
    (Rect::new(40, 20, 4, 12), (40, 52)),
];

/// Sprite sheet cells that are not mapped onto any face of the player model.
pub const UNUSED_REGIONS: [Rect; 18] = [
    // Head and hat
    Rect::square(0, 0, 8),
    Rect::new(24, 0, 16, 8),
    Rect::square(56, 0, 8),
    // Legs, body and arms
    Rect::square(0, 16, 4),
    Rect::new(12, 16, 8, 4),
    Rect::new(36, 16, 8, 4),
    Rect::square(52, 16, 4),
    Rect::new(56, 16, 8, 16),
    // Pants, jacket and sleeves
    Rect::square(0, 32, 4),
    Rect::new(12, 32, 8, 4),
    Rect::new(36, 32, 8, 4),
    Rect::square(52, 32, 4),
    Rect::new(56, 32, 8, 16),
    // Left limbs
    Rect::square(0, 48, 4),
    Rect::new(12, 48, 8, 4),
    Rect::new(28, 48, 8, 4),
    Rect::new(44, 48, 8, 4),
    Rect::square(60, 48, 4),
];

/// Regions holding the base (first) layer of the player model.
pub const FIRST_LAYER_REGIONS: [Rect; 10] = [
    // Head
    Rect::new(8, 0, 16, 8),
    Rect::new(0, 8, 32, 8),
    // Right leg, body and right arm
    Rect::new(4, 16, 8, 4),
    Rect::new(20, 16, 16, 4),
    Rect::new(44, 16, 8, 4),
    Rect::new(0, 20, 56, 12),
    // Left leg and left arm
    Rect::new(20, 48, 8, 4),
    Rect::new(36, 48, 8, 4),
    Rect::new(16, 52, 16, 12),
    Rect::new(32, 52, 16, 12),
];

/// Regions holding the overlay (second) layer of the player model.
pub const SECOND_LAYER_REGIONS: [Rect; 4] = [
    // Hat
    Rect::new(32, 0, 32, 16),
    // Pants, jacket and sleeves
    Rect::new(0, 32, 64, 16),
    // Left pants
    Rect::square(0, 48, 16),
    // Left sleeve
    Rect::square(48, 48, 16),
];

/// Runs the full canonicalization pipeline. The result is always 64x64.
#[instrument(level = "trace", skip(skin), fields(legacy = skin.is_legacy()))]
pub fn normalize(skin: SkinImage) -> Result<SkinImage> {
    let mut skin = upgrade_legacy(skin)?;

    blank_unused_regions(&mut skin)?;
    fix_first_layer_opacity(&mut skin)?;

    Ok(skin)
}

/// Upgrades a legacy 64x32 skin to the 64x64 layout. Modern skins are returned as-is.
pub fn upgrade_legacy(skin: SkinImage) -> Result<SkinImage> {
    if !skin.is_legacy() {
        return Ok(skin);
    }

    trace!("Upgrading legacy skin to the modern layout");

    let legacy = skin.into_raster();
    let mut upgraded = RasterImage::create_empty(SKIN_WIDTH, MODERN_SKIN_HEIGHT);

    upgraded.draw_image(&legacy, 0, 0)?;

    for (source, destination) in LEGACY_LIMB_COPIES {
        upgraded.draw_sub_image_flipped(&legacy, source, destination)?;
    }

    SkinImage::new(upgraded)
}

/// Clears every unused region and canonicalizes invisible pixels to `{0, 0, 0, 0}`.
pub fn blank_unused_regions(skin: &mut SkinImage) -> Result<()> {
    require_modern(skin)?;

    let image = skin.as_raster_mut();

    for rect in UNUSED_REGIONS {
        image.fill_rect(rect, Color::TRANSPARENT)?;
    }

    image.map_pixels(|pixel| {
        if pixel.is_transparent() {
            Color::TRANSPARENT
        } else {
            pixel
        }
    });

    Ok(())
}

/// Makes the base layer fully opaque. Holes are filled with solid black.
pub fn fix_first_layer_opacity(skin: &mut SkinImage) -> Result<()> {
    require_modern(skin)?;

    let image = skin.as_raster_mut();

    for rect in FIRST_LAYER_REGIONS {
        image.map_rect(rect, |pixel| {
            if pixel.is_transparent() {
                Color::BLACK
            } else {
                pixel.with_alpha(255)
            }
        })?;
    }

    Ok(())
}

/// Clamps overlay alpha to either fully transparent or fully opaque.
pub fn enforce_min_max_alpha_on_second_layer(skin: &mut SkinImage) -> Result<()> {
    require_modern(skin)?;

    let image = skin.as_raster_mut();

    for rect in SECOND_LAYER_REGIONS {
        image.map_rect(rect, |pixel| {
            if pixel.is_transparent() {
                pixel
            } else {
                pixel.with_alpha(255)
            }
        })?;
    }

    Ok(())
}

fn require_modern(skin: &SkinImage) -> Result<()> {
    if skin.is_legacy() {
        return Err(MskinError::InvalidSkinDimensions {
            width: skin.width(),
            height: skin.height(),
        });
    }

    Ok(())
}
