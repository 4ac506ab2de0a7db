use std::collections::{hash_map::Entry, HashMap};

use glam::{Vec2, Vec4};
use itertools::Itertools;
use tracing::instrument;

use crate::{
    errors::{MskinRenderingError, Result},
    low_level::vertex::Vertex,
};

/// Largest number of unique vertices addressable by a 16-bit index buffer.
pub const MAX_UNIQUE_VERTICES: usize = u16::MAX as usize;

/// A deduplicated, indexed triangle list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u16>) -> Result<Self> {
        if vertices.len() > MAX_UNIQUE_VERTICES {
            return Err(MskinRenderingError::TooManyVertices(vertices.len()));
        }

        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(MskinRenderingError::IndexOutOfRange {
                index,
                len: vertices.len(),
            });
        }

        Ok(Self { vertices, indices })
    }

    /// Deduplicates a flat triangle stream into an indexed mesh.
    pub fn from_triangle_stream<I: IntoIterator<Item = Vertex>>(stream: I) -> Result<Self> {
        let mut seen: HashMap<[u32; 6], u16> = HashMap::new();
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for vertex in stream {
            let index = match seen.entry(vertex.key()) {
                Entry::Occupied(entry) => *entry.get(),
                Entry::Vacant(entry) => {
                    if vertices.len() >= MAX_UNIQUE_VERTICES {
                        return Err(MskinRenderingError::TooManyVertices(vertices.len() + 1));
                    }

                    vertices.push(vertex);
                    *entry.insert((vertices.len() - 1) as u16)
                }
            };

            indices.push(index);
        }

        Ok(Self { vertices, indices })
    }

    /// Parses a Wavefront-style mesh with `v`, `vt` and `f` directives. Everything else is ignored.
    #[instrument(level = "trace", skip(source), fields(len = source.len()))]
    pub fn parse(source: &str) -> Result<Self> {
        let mut positions: Vec<Vec4> = Vec::new();
        let mut tex_coords: Vec<Vec2> = Vec::new();
        let mut stream: Vec<Vertex> = Vec::new();

        for (number, line) in source.lines().enumerate() {
            let line_number = number + 1;
            let mut tokens = line.split_whitespace();

            match tokens.next() {
                Some("v") => {
                    let values = parse_floats(tokens, line_number)?;

                    let position = match values.as_slice() {
                        [x, y] => Vec4::new(*x, *y, 0.0, 1.0),
                        [x, y, z] => Vec4::new(*x, *y, *z, 1.0),
                        [x, y, z, w] => Vec4::new(*x, *y, *z, *w),
                        _ => return Err(parse_error(line_number, "expected 2 to 4 position components")),
                    };

                    positions.push(position);
                }
                Some("vt") => {
                    let values = parse_floats(tokens, line_number)?;

                    let uv = match values.as_slice() {
                        [u] => Vec2::new(*u, 0.0),
                        [u, v, ..] => Vec2::new(*u, *v),
                        _ => return Err(parse_error(line_number, "expected a texture coordinate")),
                    };

                    tex_coords.push(uv);
                }
                Some("f") => {
                    let corners = tokens
                        .map(|reference| {
                            resolve_corner(reference, &positions, &tex_coords, line_number)
                        })
                        .collect::<Result<Vec<_>>>()?;

                    let [first, rest @ ..] = corners.as_slice() else {
                        return Err(parse_error(line_number, "face has no vertices"));
                    };

                    if rest.len() < 2 {
                        return Err(parse_error(line_number, "face needs at least 3 vertices"));
                    }

                    for (second, third) in rest.iter().tuple_windows() {
                        stream.extend([*first, *second, *third]);
                    }
                }
                _ => {}
            }
        }

        Self::from_triangle_stream(stream)
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[must_use]
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// The vertex buffer as interleaved `[x, y, z, w, u, v]` floats.
    #[must_use]
    pub fn interleaved(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn parse_error(line: usize, reason: impl Into<String>) -> MskinRenderingError {
    MskinRenderingError::ModelParseError {
        line,
        reason: reason.into(),
    }
}

fn parse_floats<'a>(tokens: impl Iterator<Item = &'a str>, line: usize) -> Result<Vec<f32>> {
    tokens
        .map(|token| {
            token
                .parse::<f32>()
                .map_err(|e| parse_error(line, format!("invalid number {token:?}: {e}")))
        })
        .collect()
}

/// Resolves a 1-based (or negative, relative to the end) reference into `items`.
fn resolve_index<T: Copy>(items: &[T], reference: &str, line: usize) -> Result<T> {
    let index: i64 = reference
        .parse()
        .map_err(|e| parse_error(line, format!("invalid index {reference:?}: {e}")))?;

    let resolved = match index {
        0 => None,
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => usize::try_from(items.len() as i64 + i).ok(),
    };

    resolved
        .and_then(|i| items.get(i).copied())
        .ok_or_else(|| parse_error(line, format!("index {index} is out of range ({} defined)", items.len())))
}

fn resolve_corner(
    reference: &str,
    positions: &[Vec4],
    tex_coords: &[Vec2],
    line: usize,
) -> Result<Vertex> {
    let mut parts = reference.split('/');

    let position = match parts.next() {
        Some(position) if !position.is_empty() => resolve_index(positions, position, line)?,
        _ => return Err(parse_error(line, format!("missing position in {reference:?}"))),
    };

    let uv = match parts.next() {
        Some(uv) if !uv.is_empty() => resolve_index(tex_coords, uv, line)?,
        _ => Vec2::ZERO,
    };

    Ok(Vertex::new(position, uv))
}
