use axum::{body::Bytes, extract::Query, response::Response};
use mskin_lib::{normalizer::normalize, SkinImage};
use tokio::task::spawn_blocking;

use super::{query::SkinQueryParams, render::create_image_response};
use crate::error::Result;

pub async fn process_skin(Query(query): Query<SkinQueryParams>, body: Bytes) -> Result<Response> {
    let png = spawn_blocking(move || -> Result<Vec<u8>> {
        let skin = SkinImage::from_compressed_bytes(&body)?;

        let skin = if query.raw.unwrap_or(false) {
            skin
        } else {
            normalize(skin)?
        };

        Ok(skin.as_raster().to_compressed_bytes(None)?)
    })
    .await??;

    Ok(create_image_response(png))
}
