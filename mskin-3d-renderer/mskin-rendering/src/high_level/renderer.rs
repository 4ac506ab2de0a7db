use std::{path::Path, sync::Mutex};

use mskin_lib::{
    normalizer::{enforce_min_max_alpha_on_second_layer, normalize},
    ArmWidth, RasterImage, SkinArea, SkinImage,
};
use strum::IntoEnumIterator;
use tracing::{info, instrument, trace_span};

use crate::{
    errors::Result,
    high_level::{
        camera::Camera,
        model::Model,
        pipeline::GraphicsContext,
        presets::{CameraPreset, ModelPreset, SkinPreset},
    },
};

/// Owns every camera and model preset plus the single graphics context they draw with.
///
/// Presets are read-only after construction. The context is behind one mutex that is held for
/// exactly one render.
#[derive(Debug)]
pub struct RenderEngine {
    context: Mutex<GraphicsContext>,
    /// Indexed by `CameraPreset as usize`
    cameras: Vec<Camera>,
    /// Indexed by `ModelPreset as usize`
    models: Vec<Model>,
}

impl RenderEngine {
    /// Loads every model preset from `models_directory` and builds every camera preset.
    pub fn new(models_directory: impl AsRef<Path>) -> Result<Self> {
        let models_directory = models_directory.as_ref();
        let mut context = GraphicsContext::new();

        let models = ModelPreset::iter()
            .map(|preset| Model::load(&mut context, &models_directory.join(preset.file_name())))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::with_models(context, models))
    }

    fn with_models(mut context: GraphicsContext, models: Vec<Model>) -> Self {
        let cameras = CameraPreset::iter()
            .map(|preset| {
                let camera = Camera::new(&mut context, preset.settings());
                info!(camera = %preset, size = %camera.get_size(), "Built camera preset");
                camera
            })
            .collect();

        Self {
            context: Mutex::new(context),
            cameras,
            models,
        }
    }

    #[must_use]
    pub fn camera(&self, preset: CameraPreset) -> &Camera {
        &self.cameras[preset as usize]
    }

    #[must_use]
    pub fn model(&self, preset: ModelPreset) -> &Model {
        &self.models[preset as usize]
    }

    /// Normalizes `skin` and renders it with the preset for `(area, overlay, slim)`.
    #[instrument(level = "trace", skip(self, skin))]
    pub fn render_skin(&self, skin: SkinImage, area: SkinArea, overlay: bool, slim: bool) -> Result<RasterImage> {
        let mut skin = normalize(skin)?;
        enforce_min_max_alpha_on_second_layer(&mut skin)?;

        let (camera, model) = SkinPreset::new(area, overlay, ArmWidth::from_slim(slim)).resolve();

        self.render(camera, model, skin.as_raster())
    }

    /// Renders an arbitrary texture onto the block model, resized to the model's texture size first.
    #[instrument(level = "trace", skip(self, texture))]
    pub fn render_block(&self, texture: &RasterImage) -> Result<RasterImage> {
        let size = self.model(ModelPreset::Block).texture_size();
        let texture = texture.resize_exact(size.width, size.height);

        self.render(CameraPreset::BlockIcon, ModelPreset::Block, &texture)
    }

    fn render(&self, camera: CameraPreset, model: ModelPreset, texture: &RasterImage) -> Result<RasterImage> {
        let camera = self.camera(camera);
        let model = self.model(model);

        let mut context = {
            let _guard = trace_span!("lock_context").entered();
            self.context.lock()?
        };

        camera.render(&mut context, model, texture, true)
    }
}
