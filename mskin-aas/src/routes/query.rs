use serde::Deserialize;

use crate::error::{MskinAasError, Result};

///  The options are:
///  - `?overlay=<bool>`: whether to draw the second layer (defaults to `true`)
///  - `?slim=<bool>`: whether to use the slim (3px) arms (defaults to `false`)
///  - `?size=<size>`: fit the output over a `size`x`size` square (keeps the aspect ratio)
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RenderQueryParams {
    pub overlay: Option<bool>,
    pub slim: Option<bool>,
    pub size: Option<u32>,
}

impl RenderQueryParams {
    #[must_use]
    pub fn overlay(&self) -> bool {
        self.overlay.unwrap_or(true)
    }

    #[must_use]
    pub fn slim(&self) -> bool {
        self.slim.unwrap_or(false)
    }

    /// The requested resize target, rejected when outside `1..=max_output_size`.
    pub fn output_size(&self, max_output_size: u32) -> Result<Option<(u32, u32)>> {
        self.size
            .map(|size| {
                if (1..=max_output_size).contains(&size) {
                    Ok((size, size))
                } else {
                    Err(MskinAasError::InvalidSize(size, max_output_size))
                }
            })
            .transpose()
    }
}

/// `?raw=<bool>`: return the decoded skin without normalizing it.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SkinQueryParams {
    pub raw: Option<bool>,
}
