use tracing::instrument;

use crate::{
    errors::Result,
    raster::{BlendMode, RasterImage, Rect},
    skin::{ArmWidth, SkinImage},
};

pub const HEAD_SIZE: (u32, u32) = (8, 8);
pub const BODY_SIZE: (u32, u32) = (16, 32);

/// A single front face copied onto the flat canvas.
#[derive(Debug, Clone, Copy)]
struct FlatPart {
    base: Rect,
    overlay: (i32, i32),
    destination: (i32, i32),
}

impl FlatPart {
    const fn new(base: Rect, overlay: (i32, i32), destination: (i32, i32)) -> Self {
        Self {
            base,
            overlay,
            destination,
        }
    }

    fn overlay_rect(&self) -> Rect {
        Rect::new(self.overlay.0, self.overlay.1, self.base.width, self.base.height)
    }

    fn draw(&self, canvas: &mut RasterImage, skin: &RasterImage, overlay: bool) -> Result<()> {
        canvas.draw_sub_image(skin, self.base, self.destination, true, BlendMode::Replace)?;

        if overlay {
            canvas.draw_sub_image(skin, self.overlay_rect(), self.destination, false, BlendMode::Add)?;
        }

        Ok(())
    }
}

const HEAD: FlatPart = FlatPart::new(Rect::square(8, 8, 8), (40, 8), (0, 0));

fn body_parts(arm_width: ArmWidth) -> [FlatPart; 6] {
    let arm = arm_width.pixels();

    [
        FlatPart::new(Rect::square(8, 8, 8), (40, 8), (4, 0)),
        FlatPart::new(Rect::new(20, 20, 8, 12), (20, 36), (4, 8)),
        FlatPart::new(Rect::new(44, 20, arm, 12), (44, 36), (4 - arm as i32, 8)),
        FlatPart::new(Rect::new(36, 52, arm, 12), (52, 52), (12, 8)),
        FlatPart::new(Rect::new(4, 20, 4, 12), (4, 36), (4, 20)),
        FlatPart::new(Rect::new(20, 52, 4, 12), (4, 52), (8, 20)),
    ]
}

/// Flat front view of the head, 8x8.
#[instrument(level = "trace", skip(skin))]
pub fn extract_head(skin: &SkinImage, overlay: bool) -> Result<RasterImage> {
    let mut canvas = RasterImage::create_empty(HEAD_SIZE.0, HEAD_SIZE.1);

    HEAD.draw(&mut canvas, skin.as_raster(), overlay)?;

    Ok(canvas)
}

/// Flat front view of the whole player, 16x32.
#[instrument(level = "trace", skip(skin))]
pub fn extract_body(skin: &SkinImage, overlay: bool, slim: bool) -> Result<RasterImage> {
    let mut canvas = RasterImage::create_empty(BODY_SIZE.0, BODY_SIZE.1);

    for part in body_parts(ArmWidth::from_slim(slim)) {
        part.draw(&mut canvas, skin.as_raster(), overlay)?;
    }

    Ok(canvas)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{color::Color, normalizer::normalize};

    fn skin_with(fills: &[(Rect, Color)]) -> SkinImage {
        let mut image = RasterImage::create_empty(64, 64);

        for (rect, color) in fills {
            image.fill_rect(*rect, *color).unwrap();
        }

        normalize(SkinImage::new(image).unwrap()).unwrap()
    }

    #[test]
    fn head_without_overlay_is_the_face() {
        let face = Color::opaque(200, 150, 100);
        let skin = skin_with(&[
            (Rect::square(8, 8, 8), face),
            (Rect::square(40, 8, 8), Color::opaque(1, 1, 1)),
        ]);

        let head = extract_head(&skin, false).unwrap();

        assert_eq!(head.dimensions(), HEAD_SIZE);
        assert_eq!(head, RasterImage::new_filled(8, 8, face));
    }

    #[test]
    fn head_overlay_is_composited() {
        let face = Color::opaque(200, 150, 100);
        let hat = Color::new(0, 0, 255, 255);

        let mut skin = skin_with(&[(Rect::square(8, 8, 8), face)]);
        let mut image = skin.clone().into_raster();
        image.set(40, 8, hat).unwrap();
        skin = SkinImage::new(image).unwrap();

        let head = extract_head(&skin, true).unwrap();

        assert_eq!(head.get(0, 0).unwrap(), hat);
        assert_eq!(head.get(1, 0).unwrap(), face);
    }

    #[test]
    fn body_layout_places_every_part() {
        let head = Color::opaque(10, 0, 0);
        let torso = Color::opaque(20, 0, 0);
        let right_arm = Color::opaque(30, 0, 0);
        let left_arm = Color::opaque(40, 0, 0);
        let right_leg = Color::opaque(50, 0, 0);
        let left_leg = Color::opaque(60, 0, 0);

        let skin = skin_with(&[
            (Rect::square(8, 8, 8), head),
            (Rect::new(20, 20, 8, 12), torso),
            (Rect::new(44, 20, 4, 12), right_arm),
            (Rect::new(36, 52, 4, 12), left_arm),
            (Rect::new(4, 20, 4, 12), right_leg),
            (Rect::new(20, 52, 4, 12), left_leg),
        ]);

        let body = extract_body(&skin, false, false).unwrap();

        assert_eq!(body.dimensions(), BODY_SIZE);
        assert_eq!(body.get(4, 0).unwrap(), head);
        assert_eq!(body.get(11, 7).unwrap(), head);
        assert_eq!(body.get(4, 8).unwrap(), torso);
        assert_eq!(body.get(0, 8).unwrap(), right_arm);
        assert_eq!(body.get(15, 19).unwrap(), left_arm);
        assert_eq!(body.get(4, 20).unwrap(), right_leg);
        assert_eq!(body.get(11, 31).unwrap(), left_leg);

        assert_eq!(body.get(0, 0).unwrap(), Color::TRANSPARENT);
        assert_eq!(body.get(0, 20).unwrap(), Color::TRANSPARENT);
    }

    #[test]
    fn slim_body_has_narrower_arms() {
        let skin = skin_with(&[(Rect::new(0, 0, 64, 64), Color::opaque(5, 5, 5))]);

        let body = extract_body(&skin, false, true).unwrap();

        assert_eq!(body.get(0, 8).unwrap(), Color::TRANSPARENT);
        assert_eq!(body.get(1, 8).unwrap(), Color::opaque(5, 5, 5));
        assert_eq!(body.get(14, 8).unwrap(), Color::opaque(5, 5, 5));
        assert_eq!(body.get(15, 8).unwrap(), Color::TRANSPARENT);
    }
}
