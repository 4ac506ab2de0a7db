use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use twelf::{config, Layer};

/// Prefix of every environment variable read by the service.
pub const ENV_PREFIX: &str = "MSKIN_";

#[config]
#[derive(Default, Debug)]
pub struct MskinConfiguration {
    pub server: ServerConfiguration,
    pub rendering: RenderingConfiguration,
    pub tracing: TracingConfiguration,
}

impl MskinConfiguration {
    /// Loads the configuration from the defaults, then `path` (a TOML file) if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, twelf::Error> {
        let mut layers = vec![Layer::DefaultTrait];

        if let Some(path) = path {
            layers.push(Layer::Toml(path.to_path_buf()));
        }

        layers.push(Layer::Env(Some(ENV_PREFIX.to_string())));

        Self::with_layers(&layers)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServerConfiguration {
    /// The address to bind the server to.
    #[serde(default = "default_address")]
    pub address: String,
    /// The port to bind the server to.
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RenderingConfiguration {
    /// The directory holding the model presets (`steve.obj`, `block.obj`, ...).
    #[serde(default = "default_models_directory")]
    pub models_directory: PathBuf,
    /// The largest `size` a client may ask renders to be resized to.
    #[serde(default = "default_max_output_size")]
    pub max_output_size: u32,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TracingConfiguration {
    /// Whether to log as JSON lines instead of human readable text.
    #[serde(default)]
    pub json: bool,
    /// The filter directives to use when `RUST_LOG` isn't set.
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
        }
    }
}

impl Default for RenderingConfiguration {
    fn default() -> Self {
        Self {
            models_directory: default_models_directory(),
            max_output_size: default_max_output_size(),
        }
    }
}

impl Default for TracingConfiguration {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_filter(),
        }
    }
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

#[inline]
const fn default_port() -> u16 {
    8621
}

fn default_models_directory() -> PathBuf {
    PathBuf::from("assets/models")
}

#[inline]
const fn default_max_output_size() -> u32 {
    1024
}

fn default_filter() -> String {
    "info".to_string()
}
