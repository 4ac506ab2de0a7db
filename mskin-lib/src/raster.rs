use std::io::Cursor;

use image::{
    codecs::png::PngEncoder, imageops::FilterType, ExtendedColorType, ImageEncoder, RgbaImage,
};
use itertools::iproduct;
use tracing::{instrument, trace_span};

use crate::{
    color::{merge_colors, Color},
    errors::{MskinError, Result},
};

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub const fn square(x: i32, y: i32, size: u32) -> Self {
        Self::new(x, y, size, size)
    }
}

/// How a copied pixel is combined with the pixel already present in the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendMode {
    Replace,
    Add,
}

/// An owned RGBA raster. Every pixel access goes through [`RasterImage::check_rect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    image: RgbaImage,
}

impl RasterImage {
    /// Creates a fully transparent canvas.
    #[must_use]
    pub fn create_empty(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    #[must_use]
    pub fn new_filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, color.into()),
        }
    }

    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self> {
        let actual = bytes.len();
        let expected = width as usize * height as usize * 4;

        Some(bytes)
            .filter(|_| actual == expected)
            .and_then(|bytes| RgbaImage::from_raw(width, height, bytes))
            .map(Self::from)
            .ok_or(MskinError::InvalidBufferLength {
                actual,
                width,
                height,
            })
    }

    /// Decodes a compressed image, adding an opaque alpha channel if the source had none.
    #[instrument(level = "trace", skip(bytes), fields(len = bytes.len()))]
    pub fn create_from_compressed_bytes(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes).map_err(MskinError::DecodeError)?;

        Ok(Self {
            image: image.into_rgba8(),
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.image.into_raw()
    }

    #[must_use]
    pub fn as_rgba_image(&self) -> &RgbaImage {
        &self.image
    }

    #[must_use]
    pub fn into_rgba_image(self) -> RgbaImage {
        self.image
    }

    /// Validates that `rect` lies entirely inside this image and returns its origin as unsigned coordinates.
    pub fn check_rect(&self, rect: Rect) -> Result<(u32, u32)> {
        let (width, height) = self.dimensions();

        let fits = rect.x >= 0
            && rect.y >= 0
            && i64::from(rect.x) + i64::from(rect.width) <= i64::from(width)
            && i64::from(rect.y) + i64::from(rect.height) <= i64::from(height);

        if fits {
            Ok((rect.x as u32, rect.y as u32))
        } else if rect.width == 1 && rect.height == 1 {
            Err(MskinError::OutOfBounds {
                x: rect.x,
                y: rect.y,
                width,
                height,
            })
        } else {
            Err(MskinError::RectOutOfBounds {
                x: rect.x,
                y: rect.y,
                w: rect.width,
                h: rect.height,
                width,
                height,
            })
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Result<Color> {
        let (x, y) = self.check_rect(Rect::square(x, y, 1))?;

        Ok((*self.image.get_pixel(x, y)).into())
    }

    pub fn set(&mut self, x: i32, y: i32, color: Color) -> Result<()> {
        let (x, y) = self.check_rect(Rect::square(x, y, 1))?;

        self.image.put_pixel(x, y, color.into());

        Ok(())
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<()> {
        self.map_rect(rect, |_| color)
    }

    /// Replaces every pixel inside `rect` with the result of `mapper`.
    pub fn map_rect<F: FnMut(Color) -> Color>(&mut self, rect: Rect, mut mapper: F) -> Result<()> {
        let (x0, y0) = self.check_rect(rect)?;

        for (y, x) in iproduct!(y0..y0 + rect.height, x0..x0 + rect.width) {
            let pixel = self.image.get_pixel_mut(x, y);
            *pixel = mapper(Color::from(*pixel)).into();
        }

        Ok(())
    }

    /// Replaces every pixel of the image with the result of `mapper`.
    pub fn map_pixels<F: FnMut(Color) -> Color>(&mut self, mut mapper: F) {
        for pixel in self.image.pixels_mut() {
            *pixel = mapper(Color::from(*pixel)).into();
        }
    }

    /// Copies the whole of `src` at the given offset. No clipping is performed.
    pub fn draw_image(&mut self, src: &Self, x: i32, y: i32) -> Result<()> {
        let (src_width, src_height) = src.dimensions();

        let (x, y) = self
            .check_rect(Rect::new(x, y, src_width, src_height))
            .map_err(|_| MskinError::ImageDoesNotFit {
                src_width,
                src_height,
                x,
                y,
                width: self.width(),
                height: self.height(),
            })?;

        for (sx, sy, pixel) in src.image.enumerate_pixels() {
            self.image.put_pixel(x + sx, y + sy, *pixel);
        }

        Ok(())
    }

    /// Copies `src_rect` of `src` to `(dst_x, dst_y)`, skipping fully transparent source pixels.
    pub fn draw_sub_image(
        &mut self,
        src: &Self,
        src_rect: Rect,
        (dst_x, dst_y): (i32, i32),
        ignore_alpha: bool,
        mode: BlendMode,
    ) -> Result<()> {
        self.copy_sub_image(src, src_rect, (dst_x, dst_y), false, |source, destination| {
            if source.is_transparent() {
                return destination;
            }

            match mode {
                BlendMode::Replace if ignore_alpha => source.with_alpha(255),
                BlendMode::Replace => source,
                BlendMode::Add => merge_colors(source, destination),
            }
        })
    }

    /// Copies `src_rect` of `src` to `(dst_x, dst_y)`, mirrored horizontally within the copied rectangle.
    pub fn draw_sub_image_flipped(
        &mut self,
        src: &Self,
        src_rect: Rect,
        (dst_x, dst_y): (i32, i32),
    ) -> Result<()> {
        self.copy_sub_image(src, src_rect, (dst_x, dst_y), true, |source, destination| {
            if source.is_transparent() {
                destination
            } else {
                source
            }
        })
    }

    fn copy_sub_image<F: Fn(Color, Color) -> Color>(
        &mut self,
        src: &Self,
        src_rect: Rect,
        (dst_x, dst_y): (i32, i32),
        flip: bool,
        combine: F,
    ) -> Result<()> {
        let (sx, sy) = src.check_rect(src_rect)?;
        let (dx, dy) = self.check_rect(Rect::new(dst_x, dst_y, src_rect.width, src_rect.height))?;

        for (y, x) in iproduct!(0..src_rect.height, 0..src_rect.width) {
            let read_x = if flip { src_rect.width - 1 - x } else { x };

            let source = Color::from(*src.image.get_pixel(sx + read_x, sy + y));
            let pixel = self.image.get_pixel_mut(dx + x, dy + y);

            *pixel = combine(source, Color::from(*pixel)).into();
        }

        Ok(())
    }

    /// Nearest-neighbour resize to exactly `width` by `height`.
    #[must_use]
    pub fn resize_exact(&self, width: u32, height: u32) -> Self {
        if self.dimensions() == (width, height) {
            return self.clone();
        }

        let _guard = trace_span!("resize_exact", width, height).entered();

        Self {
            image: image::imageops::resize(&self.image, width, height, FilterType::Nearest),
        }
    }

    /// Size that covers `target` while preserving the aspect ratio of `(width, height)`.
    #[must_use]
    pub fn fit_outside_size((width, height): (u32, u32), (target_width, target_height): (u32, u32)) -> (u32, u32) {
        let ratio = f64::max(
            f64::from(target_width) / f64::from(width.max(1)),
            f64::from(target_height) / f64::from(height.max(1)),
        );

        let scale = |value: u32| ((f64::from(value) * ratio).round() as u32).max(1);

        (scale(width), scale(height))
    }

    /// Encodes the image losslessly as PNG, optionally nearest-neighbour resizing it first ("fit outside").
    #[instrument(level = "trace", skip(self))]
    pub fn to_compressed_bytes(&self, resize: Option<(u32, u32)>) -> Result<Vec<u8>> {
        let resized;
        let image = match resize {
            Some(target) => {
                let (width, height) = Self::fit_outside_size(self.dimensions(), target);
                resized = self.resize_exact(width, height);
                &resized
            }
            None => self,
        };

        let _guard = trace_span!("write_image_bytes").entered();

        let mut out = Cursor::new(Vec::new());
        PngEncoder::new(&mut out).write_image(
            image.as_bytes(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(MskinError::EncodeError)?;

        Ok(out.into_inner())
    }
}

impl From<RgbaImage> for RasterImage {
    fn from(image: RgbaImage) -> Self {
        Self { image }
    }
}
