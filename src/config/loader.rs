//! ConfigLoader: layers config sources and deserializes `VfsConfig`.

use super::{paths, VfsConfig};
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use std::path::Path;

/// Environment prefix; `SIMVFS__STORAGE__BACKEND=memory` sets `storage.backend`
pub const ENV_PREFIX: &str = "SIMVFS";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// Precedence: global file (lowest) -> `explicit` file -> environment (highest).
    /// The explicit file must exist; the global one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<VfsConfig, ApiError> {
        let mut builder = Config::builder();
        if let Some(global) = paths::global_config_path() {
            builder = builder.add_source(File::from(global.as_path()).required(false));
        }
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }
        Self::finish(builder)
    }

    /// Load configuration from one file plus the environment, ignoring the global file.
    pub fn load_from_file(path: &Path) -> Result<VfsConfig, ApiError> {
        let builder = Config::builder().add_source(File::from(path).required(true));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<VfsConfig, ApiError> {
        let config: VfsConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.codec.validate()?;
        Ok(config)
    }
}
