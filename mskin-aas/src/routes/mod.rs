mod flat;
pub mod query;
mod render;
mod skin;

use std::sync::Arc;

use axum::{routing::post, Router};
use mskin_rendering::RenderEngine;

pub use flat::render_flat;
pub use render::{render_block, render_skin};
pub use skin::process_skin;

use crate::{config::RenderingConfiguration, utils::tracing::MskinTracing};

#[derive(Clone, Debug)]
pub struct MskinState {
    pub engine: Arc<RenderEngine>,
    pub max_output_size: u32,
}

impl MskinState {
    #[must_use]
    pub fn new(engine: RenderEngine, config: &RenderingConfiguration) -> Self {
        Self {
            engine: Arc::new(engine),
            max_output_size: config.max_output_size,
        }
    }
}

pub fn router(state: MskinState) -> Router {
    Router::new()
        .route("/render/block", post(render_block))
        .route("/render/{area}", post(render_skin))
        .route("/2d/{area}", post(render_flat))
        .route("/skin", post(process_skin))
        .layer(MskinTracing::new_trace_layer())
        .with_state(state)
}
