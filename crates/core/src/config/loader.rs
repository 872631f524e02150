use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::{Path, PathBuf};

use super::{types::Config, ConfigError};

/// Environment variable prefix. Nested keys are separated by `__`, as in
/// `HARBINGER_FLAC__COMPRESSION=5`.
pub const ENV_PREFIX: &str = "HARBINGER_";

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "HARBINGER_CONFIG";

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "harbinger.toml";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::new().merge(Toml::file(path)))
}

/// Load configuration from defaults, an optional file, and the environment.
///
/// The file is `explicit` if given, else the one named by `HARBINGER_CONFIG`,
/// else `harbinger.toml` in the working directory when present. A file that
/// was asked for but does not exist is an error.
pub fn load_layered(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    match locate_config(explicit) {
        Some(path) => load_config(&path),
        None => extract(Figment::new()),
    }
}

/// Works out which config file to read, if any.
pub fn locate_config(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    local.is_file().then_some(local)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
