use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mskin_lib::errors::MskinError;
use mskin_rendering::errors::MskinRenderingError;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Error, Debug)]
pub enum MskinAasError {
    #[error("Invalid skin: {0}")]
    SkinError(#[from] MskinError),
    #[error("Render error: {0}")]
    RenderError(#[from] MskinRenderingError),
    #[error("Invalid render area: {0}. Valid values are head and body.")]
    InvalidRenderArea(String),
    #[error("The size you've specified ({0}) is invalid. Valid values are between 1 and {1}.")]
    InvalidSize(u32, u32),
    #[error("Render task failed: {0}")]
    RenderTaskError(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, MskinAasError>;

impl MskinAasError {
    /// Bad input is the client's fault, anything else is ours.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SkinError(err) | Self::RenderError(MskinRenderingError::SkinError(err))
                if err.is_invalid_input() =>
            {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidRenderArea(_) | Self::InvalidSize(..) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MskinAasError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(error = %self, "Failed to handle request");
        } else {
            debug!(error = %self, "Rejected request");
        }

        (status, self.to_string()).into_response()
    }
}
