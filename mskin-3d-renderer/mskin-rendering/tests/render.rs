use std::{collections::HashMap, path::PathBuf, sync::Arc};

use mskin_lib::{
    normalizer::upgrade_legacy, ArmWidth, Color, RasterImage, Rect, SkinArea, SkinImage,
};
use mskin_rendering::{
    errors::MskinRenderingError, Camera, CameraPreset, GraphicsContext, Model, ModelPreset,
    RenderEngine, Size, SkinPreset,
};
use strum::IntoEnumIterator;

fn models_directory() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/models")
}

fn engine() -> RenderEngine {
    RenderEngine::new(models_directory()).expect("model assets should load")
}

fn skin(fills: &[(Rect, Color)]) -> SkinImage {
    let mut image = RasterImage::create_empty(64, 64);

    for (rect, color) in fills {
        image.fill_rect(*rect, *color).unwrap();
    }

    SkinImage::new(image).unwrap()
}

fn opaque_pixels(image: &RasterImage) -> HashMap<Color, usize> {
    let mut counts = HashMap::new();

    for y in 0..image.height() as i32 {
        for x in 0..image.width() as i32 {
            let color = image.get(x, y).unwrap();
            if !color.is_transparent() {
                *counts.entry(color).or_default() += 1;
            }
        }
    }

    counts
}

const RED: Color = Color::opaque(200, 30, 30);
const BLUE: Color = Color::opaque(30, 30, 200);
const GREEN: Color = Color::opaque(30, 200, 30);

#[test]
fn every_asset_loads_with_expected_triangles() {
    let engine = engine();

    let expected = [
        (ModelPreset::Block, 12),
        (ModelPreset::Steve, 144),
        (ModelPreset::SteveNoOverlay, 72),
        (ModelPreset::Alex, 144),
        (ModelPreset::AlexNoOverlay, 72),
        (ModelPreset::SteveHead, 24),
        (ModelPreset::SteveHeadNoOverlay, 12),
    ];

    for (preset, triangles) in expected {
        let model = engine.model(preset);

        assert_eq!(model.mesh().triangle_count(), triangles, "{preset}");
        assert_eq!(model.texture_size(), Size::new(64, 64));
        assert!(model.mesh().vertices().len() <= triangles * 3);
    }
}

#[test]
fn missing_assets_fail_at_startup() {
    let result = RenderEngine::new(models_directory().join("does-not-exist"));

    assert!(matches!(result, Err(MskinRenderingError::ModelIoError(..))));
}

#[test]
fn render_output_matches_preset_dimensions() {
    let engine = engine();
    let skin = skin(&[(Rect::new(0, 0, 64, 64), GREEN)]);

    for area in SkinArea::iter() {
        for arm_width in ArmWidth::iter() {
            for overlay in [true, false] {
                let (camera, _) = SkinPreset::new(area, overlay, arm_width).resolve();
                let expected = camera.settings().size;

                let render = engine
                    .render_skin(skin.clone(), area, overlay, arm_width == ArmWidth::Slim)
                    .unwrap();

                assert_eq!(render.dimensions(), (expected.width, expected.height));
                assert!(!opaque_pixels(&render).is_empty());
            }
        }
    }

    let head = engine.render_skin(skin.clone(), SkinArea::Head, true, false).unwrap();
    assert_eq!(head.dimensions(), (420, 420));

    let body = engine.render_skin(skin, SkinArea::Body, true, false).unwrap();
    assert_eq!(body.dimensions(), (525, 960));
}

#[test]
fn uniform_block_renders_in_its_own_color() {
    let engine = engine();
    let gray = Color::opaque(128, 128, 128);

    let render = engine
        .render_block(&RasterImage::new_filled(64, 64, gray))
        .unwrap();

    assert_eq!(render.dimensions(), (150, 150));

    let opaque = opaque_pixels(&render);
    assert_eq!(opaque.len(), 1);
    assert!(opaque[&gray] > 150 * 150 / 3);

    for y in 0..150 {
        for x in 0..150 {
            let alpha = render.get(x, y).unwrap().alpha;
            assert!(alpha == 0 || alpha == 255);
        }
    }
}

#[test]
fn block_textures_of_any_size_are_resized() {
    let engine = engine();

    let render = engine
        .render_block(&RasterImage::new_filled(16, 16, BLUE))
        .unwrap();

    assert_eq!(render.dimensions(), (150, 150));
    assert_eq!(opaque_pixels(&render).keys().copied().collect::<Vec<_>>(), [BLUE]);
}

#[test]
fn hat_hides_the_head_underneath() {
    let engine = engine();
    let skin = skin(&[(Rect::new(0, 0, 32, 16), RED), (Rect::new(32, 0, 32, 16), BLUE)]);

    let with_overlay = opaque_pixels(&engine.render_skin(skin.clone(), SkinArea::Head, true, false).unwrap());
    let without_overlay = opaque_pixels(&engine.render_skin(skin, SkinArea::Head, false, false).unwrap());

    assert!(with_overlay.contains_key(&BLUE));
    assert!(!with_overlay.contains_key(&RED));

    assert_eq!(without_overlay.keys().copied().collect::<Vec<_>>(), [RED]);
}

#[test]
fn translucent_overlay_is_clamped_to_opaque() {
    let engine = engine();
    let translucent_blue = BLUE.with_alpha(90);
    let skin = skin(&[(Rect::new(0, 0, 32, 16), RED), (Rect::new(32, 0, 32, 16), translucent_blue)]);

    let render = opaque_pixels(&engine.render_skin(skin, SkinArea::Head, true, false).unwrap());

    assert!(render.contains_key(&BLUE));
    assert!(!render.contains_key(&translucent_blue));
}

#[test]
fn rendered_colors_come_from_the_skin() {
    let engine = engine();
    let palette = [
        (Rect::new(0, 0, 32, 16), RED),
        (Rect::new(0, 16, 64, 16), GREEN),
        (Rect::new(0, 48, 64, 16), BLUE),
    ];

    let render = engine.render_skin(skin(&palette), SkinArea::Body, false, false).unwrap();
    let colors = opaque_pixels(&render);

    assert!(colors.contains_key(&RED));
    assert!(colors.contains_key(&GREEN));
    assert!(colors.keys().all(|color| [RED, GREEN, BLUE, Color::BLACK].contains(color)));
}

#[test]
fn legacy_skins_render_like_their_upgrade() {
    let engine = engine();

    let mut legacy = RasterImage::create_empty(64, 32);
    legacy.fill_rect(Rect::new(0, 16, 16, 16), RED).unwrap();
    legacy.fill_rect(Rect::new(40, 16, 16, 16), GREEN).unwrap();
    let legacy = SkinImage::new(legacy).unwrap();

    let upgraded = upgrade_legacy(legacy.clone()).unwrap();

    assert_eq!(
        engine.render_skin(legacy, SkinArea::Body, true, false).unwrap(),
        engine.render_skin(upgraded, SkinArea::Body, true, false).unwrap()
    );
}

#[test]
fn concurrent_renders_are_serialized_and_identical() {
    let engine = Arc::new(engine());
    let skin = skin(&[(Rect::new(0, 0, 64, 64), GREEN), (Rect::new(8, 8, 8, 8), RED)]);

    let expected = engine.render_skin(skin.clone(), SkinArea::Head, true, false).unwrap();

    std::thread::scope(|scope| {
        let handles = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                let skin = skin.clone();
                scope.spawn(move || engine.render_skin(skin, SkinArea::Head, true, false).unwrap())
            })
            .collect::<Vec<_>>();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn mismatched_texture_is_rejected() {
    let mut context = GraphicsContext::new();
    let source = std::fs::read_to_string(models_directory().join(ModelPreset::Block.file_name())).unwrap();
    let model = Model::from_source(&mut context, "block", &source).unwrap();
    let camera = Camera::new(&mut context, CameraPreset::BlockIcon.settings());

    let result = camera.render(&mut context, &model, &RasterImage::create_empty(64, 32), true);

    assert!(matches!(result, Err(MskinRenderingError::TextureSizeMismatch { .. })));
    assert!(camera
        .render(&mut context, &model, &RasterImage::create_empty(64, 64), true)
        .is_ok());
}
