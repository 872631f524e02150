use super::{types::Config, ConfigError};
use crate::discovery::GlobPattern;

/// Validate configuration
/// Currently validates:
/// - `batch.threads` is not 0
/// - Pattern lists are non-empty and every pattern compiles
/// - Tool names are not blank
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.batch.threads == Some(0) {
        return Err(ConfigError::ValidationError(
            "batch.threads cannot be 0".to_string(),
        ));
    }

    for (section, patterns) in [
        ("flac", &config.flac.patterns),
        ("opus", &config.opus.patterns),
    ] {
        if patterns.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{section}.patterns cannot be empty"
            )));
        }
        for pattern in patterns {
            GlobPattern::compile(pattern, config.batch.recursive)
                .map_err(|e| ConfigError::ValidationError(format!("{section}.patterns: {e}")))?;
        }
    }

    for (key, name) in config.tools.entries() {
        if name.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "tools.{key} cannot be empty"
            )));
        }
    }

    Ok(())
}
