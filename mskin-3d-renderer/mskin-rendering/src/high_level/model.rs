use std::path::Path;

use tracing::info;

use crate::{
    errors::{MskinRenderingError, Result},
    high_level::pipeline::{GraphicsContext, Size, TextureHandle},
    low_level::mesh::Mesh,
};

/// Directive declaring the texture size a model's UVs were authored against, e.g. `texsize 64 64`.
const TEXTURE_SIZE_DIRECTIVE: &str = "texsize";

/// A loaded mesh together with the texture slot it samples from.
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    mesh: Mesh,
    texture_size: Size,
    texture: TextureHandle,
}

impl Model {
    pub fn from_source(
        context: &mut GraphicsContext,
        name: impl Into<String>,
        source: &str,
    ) -> Result<Self> {
        let name = name.into();
        let texture_size = declared_texture_size(source)?
            .ok_or_else(|| MskinRenderingError::MissingTextureSize(name.clone()))?;
        let mesh = Mesh::parse(source)?;

        info!(
            model = %name,
            vertices = mesh.vertices().len(),
            texture = %texture_size,
            triangles = mesh.triangle_count(),
            "Loaded model"
        );

        Ok(Self {
            name,
            mesh,
            texture_size,
            texture: context.create_texture(texture_size),
        })
    }

    pub fn load(context: &mut GraphicsContext, path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| MskinRenderingError::ModelIoError(e, path.to_path_buf()))?;

        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned());

        Self::from_source(context, name, &source)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[must_use]
    pub fn texture_size(&self) -> Size {
        self.texture_size
    }

    #[must_use]
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }
}

/// Reads the `texsize <width> <height>` directive. A source may declare it at most once.
fn declared_texture_size(source: &str) -> Result<Option<Size>> {
    let mut declared = None;

    for (number, line) in source.lines().enumerate() {
        let mut tokens = line.split_whitespace();

        if tokens.next() != Some(TEXTURE_SIZE_DIRECTIVE) {
            continue;
        }

        let parse_error = |reason: &str| MskinRenderingError::ModelParseError {
            line: number + 1,
            reason: reason.to_owned(),
        };

        if declared.is_some() {
            return Err(parse_error("texture size is declared more than once"));
        }

        let dimensions = tokens
            .map(str::parse::<u32>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| parse_error("texture size must be two positive integers"))?;

        declared = match dimensions.as_slice() {
            [width, height] if *width > 0 && *height > 0 => Some(Size::new(*width, *height)),
            _ => return Err(parse_error("texture size must be two positive integers")),
        };
    }

    Ok(declared)
}
