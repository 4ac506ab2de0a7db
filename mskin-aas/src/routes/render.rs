use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderValue},
    response::{IntoResponse, Response},
};
use mskin_lib::{RasterImage, SkinArea, SkinImage};
use tokio::task::spawn_blocking;

use super::{query::RenderQueryParams, MskinState};
use crate::error::{MskinAasError, Result};

const IMAGE_PNG_MIME: &str = "image/png";

pub(crate) fn create_image_response(png: Vec<u8>) -> Response {
    let mut response = png.into_response();

    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(IMAGE_PNG_MIME));

    response
}

pub(crate) fn parse_area(area: String) -> Result<SkinArea> {
    area.parse().map_err(|_| MskinAasError::InvalidRenderArea(area))
}

pub async fn render_skin(
    State(state): State<MskinState>,
    Path(area): Path<String>,
    Query(query): Query<RenderQueryParams>,
    body: Bytes,
) -> Result<Response> {
    let area = parse_area(area)?;
    let resize = query.output_size(state.max_output_size)?;
    let engine = Arc::clone(&state.engine);

    let png = spawn_blocking(move || -> Result<Vec<u8>> {
        let skin = SkinImage::from_compressed_bytes(&body)?;
        let render = engine.render_skin(skin, area, query.overlay(), query.slim())?;

        Ok(render.to_compressed_bytes(resize)?)
    })
    .await??;

    Ok(create_image_response(png))
}

pub async fn render_block(
    State(state): State<MskinState>,
    Query(query): Query<RenderQueryParams>,
    body: Bytes,
) -> Result<Response> {
    let resize = query.output_size(state.max_output_size)?;
    let engine = Arc::clone(&state.engine);

    let png = spawn_blocking(move || -> Result<Vec<u8>> {
        let texture = RasterImage::create_from_compressed_bytes(&body)?;
        let render = engine.render_block(&texture)?;

        Ok(render.to_compressed_bytes(resize)?)
    })
    .await??;

    Ok(create_image_response(png))
}
