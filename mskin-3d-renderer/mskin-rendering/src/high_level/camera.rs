use glam::{Mat4, Vec2, Vec3};
use mskin_lib::RasterImage;
use tracing::instrument;

use crate::{
    errors::Result,
    high_level::{
        model::Model,
        pipeline::{FramebufferHandle, GraphicsContext, Size},
        utils::camera_getters_setters,
    },
};

/// Vertical field of view of every camera (in degrees)
pub const FIELD_OF_VIEW: f32 = 90.0;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 100.0;

/// Everything needed to build a [`Camera`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraSettings {
    /// Output size in pixels
    pub size: Size,
    pub position: Vec3,
    /// Pitch (x), yaw (y) and roll (z), in radians
    pub rotation: Vec3,
    /// Scale applied after projection
    pub scale: Vec2,
    /// Offset applied after projection and scale, in clip space
    pub post_offset: Vec2,
}

/// A camera orbiting a model fixed at the origin, with its own offscreen target.
#[derive(Clone, Debug)]
pub struct Camera {
    size: Size,
    position: Vec3,
    rotation: Vec3,
    scale: Vec2,
    post_offset: Vec2,

    framebuffer: FramebufferHandle,
    mvp: Mat4,
}

impl Camera {
    pub fn new(context: &mut GraphicsContext, settings: CameraSettings) -> Self {
        let mut camera = Camera {
            size: settings.size,
            position: settings.position,
            rotation: settings.rotation,
            scale: settings.scale,
            post_offset: settings.post_offset,
            framebuffer: context.create_framebuffer(settings.size),
            mvp: Mat4::IDENTITY,
        };

        camera.recompute_mvp();
        camera
    }

    camera_getters_setters!(
        position: Vec3,
        rotation: Vec3,
        scale: Vec2,
        post_offset: Vec2
    );

    #[must_use]
    pub fn get_size(&self) -> Size {
        self.size
    }

    #[must_use]
    pub fn get_mvp(&self) -> Mat4 {
        self.mvp
    }

    fn recompute_mvp(&mut self) {
        self.mvp = Self::compute_mvp(
            self.size,
            self.position,
            self.rotation,
            self.scale,
            self.post_offset,
        );
    }

    /// `post * projection * view`, where the view undoes the camera's own rotation and position.
    #[must_use]
    pub fn compute_mvp(size: Size, position: Vec3, rotation: Vec3, scale: Vec2, post_offset: Vec2) -> Mat4 {
        let view = Mat4::from_rotation_z(-rotation.z)
            * Mat4::from_rotation_x(-rotation.x)
            * Mat4::from_rotation_y(-rotation.y)
            * Mat4::from_translation(-position);

        let projection = Mat4::perspective_rh_gl(
            FIELD_OF_VIEW.to_radians(),
            size.aspect_ratio(),
            NEAR_PLANE,
            FAR_PLANE,
        );

        let post = Mat4::from_translation(post_offset.extend(0.0))
            * Mat4::from_scale(scale.extend(1.0));

        post * projection * view
    }

    /// Renders `model` textured with `texture` and reads the result back.
    #[instrument(level = "trace", skip(self, context, model, texture), fields(model = model.name(), size = %self.size))]
    pub fn render(
        &self,
        context: &mut GraphicsContext,
        model: &Model,
        texture: &RasterImage,
        clear: bool,
    ) -> Result<RasterImage> {
        context.bind_framebuffer(self.framebuffer)?;
        context.bind_texture(model.texture())?;
        context.upload_texture(texture.dimensions().into(), texture.as_bytes())?;
        context.set_transform(self.mvp);

        if clear {
            context.clear()?;
        }

        context.draw_indexed(model.mesh())?;

        Ok(RasterImage::from(context.read_pixels()?))
    }
}

#[cfg(test)]
mod test {
    use glam::Vec4;

    use super::*;

    fn settings() -> CameraSettings {
        CameraSettings {
            size: Size::new(200, 100),
            position: Vec3::new(0.0, 0.0, 10.0),
            rotation: Vec3::ZERO,
            scale: Vec2::ONE,
            post_offset: Vec2::ZERO,
        }
    }

    #[test]
    fn origin_projects_to_the_centre() {
        let mut context = GraphicsContext::new();
        let camera = Camera::new(&mut context, settings());

        let clip = camera.get_mvp() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn setters_recompute_the_matrix() {
        let mut context = GraphicsContext::new();
        let mut camera = Camera::new(&mut context, settings());
        let before = camera.get_mvp();

        camera.set_post_offset(Vec2::new(0.25, -0.5));

        let clip = camera.get_mvp() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert_ne!(camera.get_mvp(), before);
        assert!((ndc.x - 0.25).abs() < 1e-5);
        assert!((ndc.y + 0.5).abs() < 1e-5);

        camera.set_post_offset(Vec2::ZERO);
        assert_eq!(camera.get_mvp(), before);
    }

    #[test]
    fn yaw_orbits_around_the_model() {
        let mut context = GraphicsContext::new();

        // A camera on the +X axis turned to face the origin sees the origin in the centre
        let mut settings = settings();
        settings.position = Vec3::new(10.0, 0.0, 0.0);
        settings.rotation = Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0);

        let camera = Camera::new(&mut context, settings);
        let clip = camera.get_mvp() * Vec4::new(0.0, 0.0, 0.0, 1.0);

        assert!(clip.w > 0.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
    }

    #[test]
    fn wide_targets_squash_horizontally() {
        let mut context = GraphicsContext::new();
        let camera = Camera::new(&mut context, settings());

        let clip = camera.get_mvp() * Vec4::new(1.0, 1.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!((ndc.y / ndc.x - 2.0).abs() < 1e-4);
    }
}
