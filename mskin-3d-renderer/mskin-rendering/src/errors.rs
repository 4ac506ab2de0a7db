use std::{path::PathBuf, sync::PoisonError};

use mskin_lib::errors::MskinError;
use thiserror::Error;

use crate::high_level::pipeline::Size;

#[derive(Debug, Error)]
pub enum MskinRenderingError {
    #[error("Unable to parse model (line {line}): {reason}")]
    ModelParseError { line: usize, reason: String },
    #[error("Model has {0} unique vertices, but at most 65535 can be indexed")]
    TooManyVertices(usize),
    #[error("Model {0} does not declare its texture size")]
    MissingTextureSize(String),
    #[error("Unable to read model from {1}: {0}")]
    ModelIoError(std::io::Error, PathBuf),
    #[error("Texture upload of size {actual} does not match the bound texture of size {expected}")]
    TextureSizeMismatch { expected: Size, actual: Size },
    #[error("No framebuffer is bound")]
    NoFramebufferBound,
    #[error("No texture is bound")]
    NoTextureBound,
    #[error("Texture was bound before any data was uploaded to it")]
    TextureNotUploaded,
    #[error("Invalid graphics context handle: {0}")]
    InvalidHandle(usize),
    #[error("Index {index} is out of range for a buffer of {len} vertices")]
    IndexOutOfRange { index: u16, len: usize },
    #[error("Graphics context lock was poisoned by a panicking render")]
    ContextPoisoned,
    #[error("Skin error: {0}")]
    SkinError(#[from] MskinError),
}

impl<T> From<PoisonError<T>> for MskinRenderingError {
    fn from(_: PoisonError<T>) -> Self {
        Self::ContextPoisoned
    }
}

pub(crate) type Result<T> = std::result::Result<T, MskinRenderingError>;
