use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Response,
};
use mskin_lib::{
    flat::{extract_body, extract_head},
    normalizer::normalize,
    SkinArea, SkinImage,
};
use tokio::task::spawn_blocking;

use super::{
    query::RenderQueryParams,
    render::{create_image_response, parse_area},
    MskinState,
};
use crate::error::Result;

pub async fn render_flat(
    State(state): State<MskinState>,
    Path(area): Path<String>,
    Query(query): Query<RenderQueryParams>,
    body: Bytes,
) -> Result<Response> {
    let area = parse_area(area)?;
    let resize = query.output_size(state.max_output_size)?;

    let png = spawn_blocking(move || -> Result<Vec<u8>> {
        let skin = normalize(SkinImage::from_compressed_bytes(&body)?)?;

        let flat = match area {
            SkinArea::Head => extract_head(&skin, query.overlay())?,
            SkinArea::Body => extract_body(&skin, query.overlay(), query.slim())?,
        };

        Ok(flat.to_compressed_bytes(resize)?)
    })
    .await??;

    Ok(create_image_response(png))
}
