use derive_more::Display;
use glam::Mat4;
use image::{ImageBuffer, Luma, RgbaImage};
use tracing::{instrument, trace};

use crate::{
    errors::{MskinRenderingError, Result},
    low_level::mesh::Mesh,
};

use super::{rasterizer, shader::ShaderState, Size};

pub type DepthBuffer = ImageBuffer<Luma<f32>, Vec<f32>>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
#[display("framebuffer #{_0}")]
pub struct FramebufferHandle(usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display)]
#[display("texture #{_0}")]
pub struct TextureHandle(usize);

/// An offscreen color and depth target.
#[derive(Debug)]
pub struct RenderTarget {
    pub size: Size,
    pub color: RgbaImage,
    pub depth: DepthBuffer,
}

impl RenderTarget {
    fn new(size: Size) -> Self {
        Self {
            size,
            color: RgbaImage::new(size.width, size.height),
            depth: DepthBuffer::from_pixel(size.width, size.height, Luma([1.0])),
        }
    }

    pub fn clear(&mut self) {
        self.color.fill(0);
        self.depth.fill(1.0);
    }
}

#[derive(Debug)]
struct Texture {
    size: Size,
    data: Option<RgbaImage>,
}

/// A single software graphics context.
///
/// Like a real GPU context it carries bound state: the current framebuffer, the
/// current texture and the uploaded transform. Callers must not interleave two
/// renders on the same context, which is why it is only ever handed out as `&mut`.
#[derive(Debug, Default)]
pub struct GraphicsContext {
    framebuffers: Vec<RenderTarget>,
    textures: Vec<Texture>,

    bound_framebuffer: Option<FramebufferHandle>,
    bound_texture: Option<TextureHandle>,
    transform: Mat4,
}

impl GraphicsContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_framebuffer(&mut self, size: Size) -> FramebufferHandle {
        self.framebuffers.push(RenderTarget::new(size));

        FramebufferHandle(self.framebuffers.len() - 1)
    }

    pub fn create_texture(&mut self, size: Size) -> TextureHandle {
        self.textures.push(Texture { size, data: None });

        TextureHandle(self.textures.len() - 1)
    }

    pub fn bind_framebuffer(&mut self, handle: FramebufferHandle) -> Result<()> {
        if handle.0 >= self.framebuffers.len() {
            return Err(MskinRenderingError::InvalidHandle(handle.0));
        }

        self.bound_framebuffer = Some(handle);
        Ok(())
    }

    pub fn bind_texture(&mut self, handle: TextureHandle) -> Result<()> {
        if handle.0 >= self.textures.len() {
            return Err(MskinRenderingError::InvalidHandle(handle.0));
        }

        self.bound_texture = Some(handle);
        Ok(())
    }

    /// Uploads RGBA pixels into the bound texture. The size must match the texture exactly.
    #[instrument(level = "trace", skip(self, bytes))]
    pub fn upload_texture(&mut self, size: Size, bytes: &[u8]) -> Result<()> {
        let handle = self.bound_texture.ok_or(MskinRenderingError::NoTextureBound)?;
        let texture = self
            .textures
            .get_mut(handle.0)
            .ok_or(MskinRenderingError::InvalidHandle(handle.0))?;

        if texture.size != size || bytes.len() != size.pixel_count() * 4 {
            return Err(MskinRenderingError::TextureSizeMismatch {
                expected: texture.size,
                actual: size,
            });
        }

        let image = RgbaImage::from_raw(size.width, size.height, bytes.to_vec()).ok_or(
            MskinRenderingError::TextureSizeMismatch {
                expected: texture.size,
                actual: size,
            },
        )?;

        texture.data = Some(image);
        Ok(())
    }

    pub fn set_transform(&mut self, transform: Mat4) {
        self.transform = transform;
    }

    pub fn clear(&mut self) -> Result<()> {
        self.bound_target_mut()?.clear();
        Ok(())
    }

    /// Draws an indexed triangle list into the bound framebuffer, sampling the bound texture.
    #[instrument(level = "trace", skip_all, fields(triangles = mesh.triangle_count()))]
    pub fn draw_indexed(&mut self, mesh: &Mesh) -> Result<()> {
        let framebuffer = self
            .bound_framebuffer
            .ok_or(MskinRenderingError::NoFramebufferBound)?;
        let texture = self.bound_texture.ok_or(MskinRenderingError::NoTextureBound)?;

        let texture = self
            .textures
            .get(texture.0)
            .ok_or(MskinRenderingError::InvalidHandle(texture.0))?
            .data
            .as_ref()
            .ok_or(MskinRenderingError::TextureNotUploaded)?;

        let target = self
            .framebuffers
            .get_mut(framebuffer.0)
            .ok_or(MskinRenderingError::InvalidHandle(framebuffer.0))?;

        let state = ShaderState {
            transform: self.transform,
            texture,
        };

        let drawn = rasterizer::draw_mesh(target, mesh, &state);
        trace!(drawn, "Rasterized mesh");

        Ok(())
    }

    /// Copies the bound color buffer out, top row first.
    pub fn read_pixels(&self) -> Result<RgbaImage> {
        let handle = self
            .bound_framebuffer
            .ok_or(MskinRenderingError::NoFramebufferBound)?;

        self.framebuffers
            .get(handle.0)
            .map(|target| target.color.clone())
            .ok_or(MskinRenderingError::InvalidHandle(handle.0))
    }

    fn bound_target_mut(&mut self) -> Result<&mut RenderTarget> {
        let handle = self
            .bound_framebuffer
            .ok_or(MskinRenderingError::NoFramebufferBound)?;

        self.framebuffers
            .get_mut(handle.0)
            .ok_or(MskinRenderingError::InvalidHandle(handle.0))
    }
}
