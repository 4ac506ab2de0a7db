use thiserror::Error;

#[derive(Error, Debug)]
pub enum MskinError {
    #[error("Pixel ({x}, {y}) is out of bounds for a {width}x{height} image")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    #[error("Rectangle ({x}, {y}, {w}x{h}) does not fit inside a {width}x{height} image")]
    RectOutOfBounds {
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        width: u32,
        height: u32,
    },
    #[error("Image of size {src_width}x{src_height} does not fit at ({x}, {y}) inside a {width}x{height} image")]
    ImageDoesNotFit {
        src_width: u32,
        src_height: u32,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
    #[error("Invalid skin dimensions: {width}x{height} (expected 64x64 or 64x32)")]
    InvalidSkinDimensions { width: u32, height: u32 },
    #[error("Invalid pixel buffer length {actual} for a {width}x{height} image")]
    InvalidBufferLength {
        actual: usize,
        width: u32,
        height: u32,
    },
    #[error("Unable to decode image: {0}")]
    DecodeError(#[source] image::ImageError),
    #[error("Unable to encode image: {0}")]
    EncodeError(#[source] image::ImageError),
}

impl MskinError {
    /// Whether this error was caused by the caller's input rather than by a failure inside the library.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidSkinDimensions { .. } | Self::DecodeError(_) | Self::InvalidBufferLength { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, MskinError>;
